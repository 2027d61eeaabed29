//! Admin management of investor accounts.
//!
//! ```text
//! GET    /api/v1/investors
//! POST   /api/v1/investors {"email":"angel@fund.vc","password":"..."}
//! DELETE /api/v1/investors/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, Profile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::map_login_validation_error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_profile_id};

/// Body for `POST /api/v1/investors`.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewInvestorRequest {
    #[schema(example = "angel@fund.vc")]
    pub email: String,
    pub password: String,
}

/// Investor profiles, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/investors",
    responses(
        (status = 200, description = "Investors", body = [Profile]),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Admin role required", body = Error)
    ),
    tags = ["investors"],
    operation_id = "listInvestors",
    security(("SessionCookie" = []))
)]
#[get("/investors")]
pub async fn list_investors(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Profile>>> {
    session.require_admin(&state).await?;
    Ok(web::Json(state.investors.list().await?))
}

/// Provision an investor identity and profile.
#[utoipa::path(
    post,
    path = "/api/v1/investors",
    request_body = NewInvestorRequest,
    responses(
        (status = 201, description = "Investor created", body = Profile),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Admin role required", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 503, description = "Provisioning not configured", body = Error)
    ),
    tags = ["investors"],
    operation_id = "createInvestor",
    security(("SessionCookie" = []))
)]
#[post("/investors")]
pub async fn create_investor(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<NewInvestorRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin(&state).await?;
    let NewInvestorRequest { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(map_login_validation_error)?;
    let profile = state.investors.create(&credentials).await?;
    Ok(HttpResponse::Created().json(profile))
}

/// Remove an investor with their selections.
#[utoipa::path(
    delete,
    path = "/api/v1/investors/{id}",
    params(("id" = String, Path, description = "Investor profile id")),
    responses(
        (status = 204, description = "Investor removed"),
        (status = 403, description = "Admin role required", body = Error),
        (status = 404, description = "Unknown investor", body = Error),
        (status = 503, description = "Provisioning not configured", body = Error)
    ),
    tags = ["investors"],
    operation_id = "deleteInvestor",
    security(("SessionCookie" = []))
)]
#[delete("/investors/{id}")]
pub async fn delete_investor(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_admin(&state).await?;
    let id = parse_profile_id(&path.into_inner(), FieldName::new("id"))?;
    state.investors.delete(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
