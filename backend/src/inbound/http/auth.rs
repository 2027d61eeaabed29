//! Identity endpoints: sign in, sign out, session probe, admin bootstrap.
//!
//! ```text
//! POST /api/v1/login {"email":"admin@event.io","password":"..."}
//! POST /api/v1/logout
//! GET  /api/v1/session
//! POST /api/v1/session/bootstrap-admin
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, LoginValidationError, Profile, SessionStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "investor@fund.vc")]
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

pub(crate) fn map_login_validation_error(err: LoginValidationError) -> Error {
    let (field, code) = match err {
        LoginValidationError::EmptyEmail => ("email", "empty_email"),
        LoginValidationError::InvalidEmail => ("email", "invalid_email"),
        LoginValidationError::EmptyPassword => ("password", "empty_password"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionStatus,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Identity store unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionStatus>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let identity = state.login.authenticate(&credentials).await?;
    session.persist_identity(&identity.id)?;
    info!(identity_id = %identity.id, "signed in");
    let status = state.account.session_status(&identity.id).await?;
    Ok(web::Json(status))
}

/// Drop the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Resolve the caller into `unauthenticated`, `no_profile` or `authenticated`.
///
/// Never fails for a missing or stale cookie; that is simply
/// `unauthenticated`.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Session status", body = SessionStatus),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "sessionStatus",
    security([])
)]
#[get("/session")]
pub async fn session_status(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SessionStatus>> {
    let status = match session.identity_id()? {
        Some(id) => state.account.session_status(&id).await?,
        None => SessionStatus::Unauthenticated,
    };
    Ok(web::Json(status))
}

/// Attach an admin profile to the signed-in identity.
///
/// Recovery path for an identity stuck without a profile.
#[utoipa::path(
    post,
    path = "/api/v1/session/bootstrap-admin",
    responses(
        (status = 201, description = "Admin profile created", body = Profile),
        (status = 401, description = "Not signed in", body = Error),
        (status = 409, description = "A profile already exists", body = Error)
    ),
    tags = ["auth"],
    operation_id = "bootstrapAdmin",
    security(("SessionCookie" = []))
)]
#[post("/session/bootstrap-admin")]
pub async fn bootstrap_admin(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let id = session.require_identity()?;
    let profile = state.account_command.bootstrap_admin(&id).await?;
    Ok(HttpResponse::Created().json(profile))
}
