//! Admin dashboard aggregates.
//!
//! ```text
//! GET /api/v1/admin/dashboard
//! GET /api/v1/admin/matchmaking
//! ```

use actix_web::{get, web};

use crate::domain::{Dashboard, Error, InvestorMatches};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Totals, rankings and recent activity.
#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = Dashboard),
        (status = 403, description = "Admin role required", body = Error)
    ),
    tags = ["admin"],
    operation_id = "getDashboard",
    security(("SessionCookie" = []))
)]
#[get("/admin/dashboard")]
pub async fn get_dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Dashboard>> {
    session.require_admin(&state).await?;
    Ok(web::Json(state.insights.dashboard().await?))
}

/// Every investor with the startups they selected.
#[utoipa::path(
    get,
    path = "/api/v1/admin/matchmaking",
    responses(
        (status = 200, description = "Matches per investor", body = [InvestorMatches]),
        (status = 403, description = "Admin role required", body = Error)
    ),
    tags = ["admin"],
    operation_id = "getMatchmaking",
    security(("SessionCookie" = []))
)]
#[get("/admin/matchmaking")]
pub async fn get_matchmaking(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<InvestorMatches>>> {
    session.require_admin(&state).await?;
    Ok(web::Json(state.insights.matchmaking().await?))
}
