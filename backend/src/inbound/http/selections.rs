//! Investor selections.
//!
//! ```text
//! GET    /api/v1/selections
//! POST   /api/v1/selections/{startupId}/toggle
//! PUT    /api/v1/selections/{startupId}
//! DELETE /api/v1/selections/{startupId}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{Error, SelectedStartup, Selection, ToggleOutcome};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_startup_id};

const STARTUP_ID_FIELD: FieldName = FieldName::new("startupId");

/// The caller's selected startups, newest selection first.
#[utoipa::path(
    get,
    path = "/api/v1/selections",
    responses(
        (status = 200, description = "Selected startups", body = [SelectedStartup]),
        (status = 403, description = "Investor role required", body = Error)
    ),
    tags = ["selections"],
    operation_id = "listSelections",
    security(("SessionCookie" = []))
)]
#[get("/selections")]
pub async fn list_selections(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<SelectedStartup>>> {
    let investor = session.require_investor(&state).await?;
    Ok(web::Json(state.selections_query.selected(&investor.id).await?))
}

/// Flip the selection state of a startup.
#[utoipa::path(
    post,
    path = "/api/v1/selections/{startupId}/toggle",
    params(("startupId" = String, Path, description = "Startup id")),
    responses(
        (status = 200, description = "State after the toggle", body = ToggleOutcome),
        (status = 404, description = "Unknown startup", body = Error)
    ),
    tags = ["selections"],
    operation_id = "toggleSelection",
    security(("SessionCookie" = []))
)]
#[post("/selections/{startup_id}/toggle")]
pub async fn toggle_selection(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ToggleOutcome>> {
    let investor = session.require_investor(&state).await?;
    let startup_id = parse_startup_id(&path.into_inner(), STARTUP_ID_FIELD)?;
    Ok(web::Json(
        state.selections.toggle(&investor.id, &startup_id).await?,
    ))
}

/// Mark a startup, refreshing an existing mark.
#[utoipa::path(
    put,
    path = "/api/v1/selections/{startupId}",
    params(("startupId" = String, Path, description = "Startup id")),
    responses(
        (status = 200, description = "Selection stored", body = Selection),
        (status = 404, description = "Unknown startup", body = Error)
    ),
    tags = ["selections"],
    operation_id = "selectStartup",
    security(("SessionCookie" = []))
)]
#[put("/selections/{startup_id}")]
pub async fn select_startup(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Selection>> {
    let investor = session.require_investor(&state).await?;
    let startup_id = parse_startup_id(&path.into_inner(), STARTUP_ID_FIELD)?;
    Ok(web::Json(
        state.selections.select(&investor.id, &startup_id).await?,
    ))
}

/// Remove a mark. Removing an absent mark succeeds.
#[utoipa::path(
    delete,
    path = "/api/v1/selections/{startupId}",
    params(("startupId" = String, Path, description = "Startup id")),
    responses((status = 204, description = "Selection removed")),
    tags = ["selections"],
    operation_id = "deselectStartup",
    security(("SessionCookie" = []))
)]
#[delete("/selections/{startup_id}")]
pub async fn deselect_startup(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let investor = session.require_investor(&state).await?;
    let startup_id = parse_startup_id(&path.into_inner(), STARTUP_ID_FIELD)?;
    state.selections.deselect(&investor.id, &startup_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
