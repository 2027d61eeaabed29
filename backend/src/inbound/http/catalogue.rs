//! Picker options for describing a startup.
//!
//! ```text
//! GET /api/v1/catalogue/options
//! ```

use actix_web::{HttpResponse, get, http::header, web};

use crate::domain::{CatalogueOptions, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Sectors, funding stages and countries.
///
/// The lists are static, so clients may cache them for a day.
#[utoipa::path(
    get,
    path = "/api/v1/catalogue/options",
    responses(
        (status = 200, description = "Option lists", body = CatalogueOptions),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "getCatalogueOptions",
    security(("SessionCookie" = []))
)]
#[get("/catalogue/options")]
pub async fn get_catalogue_options(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_profile(&state).await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "private, max-age=86400"))
        .json(CatalogueOptions::all()))
}
