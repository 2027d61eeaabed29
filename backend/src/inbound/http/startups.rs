//! Startup browsing and admin management.
//!
//! ```text
//! GET    /api/v1/startups
//! GET    /api/v1/startups/{id}
//! POST   /api/v1/startups
//! PUT    /api/v1/startups/{id}
//! DELETE /api/v1/startups/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{Error, Startup, StartupFields};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_startup_draft, parse_startup_id};

const ID_FIELD: FieldName = FieldName::new("id");

/// All startups, newest first. Any signed-in role.
#[utoipa::path(
    get,
    path = "/api/v1/startups",
    responses(
        (status = 200, description = "Startups", body = [Startup]),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "No profile", body = Error)
    ),
    tags = ["startups"],
    operation_id = "listStartups",
    security(("SessionCookie" = []))
)]
#[get("/startups")]
pub async fn list_startups(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Startup>>> {
    session.require_profile(&state).await?;
    Ok(web::Json(state.startups_query.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/startups/{id}",
    params(("id" = String, Path, description = "Startup id")),
    responses(
        (status = 200, description = "Startup", body = Startup),
        (status = 404, description = "Unknown startup", body = Error)
    ),
    tags = ["startups"],
    operation_id = "getStartup",
    security(("SessionCookie" = []))
)]
#[get("/startups/{id}")]
pub async fn get_startup(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Startup>> {
    session.require_profile(&state).await?;
    let id = parse_startup_id(&path.into_inner(), ID_FIELD)?;
    Ok(web::Json(state.startups_query.get(&id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/startups",
    request_body = StartupFields,
    responses(
        (status = 201, description = "Startup created", body = Startup),
        (status = 400, description = "Missing field", body = Error),
        (status = 403, description = "Admin role required", body = Error)
    ),
    tags = ["startups"],
    operation_id = "createStartup",
    security(("SessionCookie" = []))
)]
#[post("/startups")]
pub async fn create_startup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<StartupFields>,
) -> ApiResult<HttpResponse> {
    session.require_admin(&state).await?;
    let draft = parse_startup_draft(payload.into_inner())?;
    let startup = state.startups.create(draft).await?;
    Ok(HttpResponse::Created().json(startup))
}

/// Replace a startup's editable fields.
#[utoipa::path(
    put,
    path = "/api/v1/startups/{id}",
    params(("id" = String, Path, description = "Startup id")),
    request_body = StartupFields,
    responses(
        (status = 200, description = "Startup updated", body = Startup),
        (status = 400, description = "Missing field", body = Error),
        (status = 404, description = "Unknown startup", body = Error)
    ),
    tags = ["startups"],
    operation_id = "updateStartup",
    security(("SessionCookie" = []))
)]
#[put("/startups/{id}")]
pub async fn update_startup(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<StartupFields>,
) -> ApiResult<web::Json<Startup>> {
    session.require_admin(&state).await?;
    let id = parse_startup_id(&path.into_inner(), ID_FIELD)?;
    let draft = parse_startup_draft(payload.into_inner())?;
    Ok(web::Json(state.startups.update(&id, draft).await?))
}

/// Delete a startup and its selections. Refused while it is on stage.
#[utoipa::path(
    delete,
    path = "/api/v1/startups/{id}",
    params(("id" = String, Path, description = "Startup id")),
    responses(
        (status = 204, description = "Startup deleted"),
        (status = 404, description = "Unknown startup", body = Error),
        (status = 409, description = "Startup is in the live round", body = Error)
    ),
    tags = ["startups"],
    operation_id = "deleteStartup",
    security(("SessionCookie" = []))
)]
#[delete("/startups/{id}")]
pub async fn delete_startup(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_admin(&state).await?;
    let id = parse_startup_id(&path.into_inner(), ID_FIELD)?;
    state.startups.delete(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
