//! HTTP inbound adapter exposing REST endpoints.

pub mod assets;
pub mod auth;
pub mod catalogue;
pub mod error;
pub mod health;
pub mod insights;
pub mod investors;
pub mod rounds;
pub mod selections;
pub mod session;
pub mod session_config;
pub mod startups;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`.
///
/// Callers mount this inside a scope and provide [`state::HttpState`] plus a
/// session middleware.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::login)
        .service(auth::logout)
        .service(auth::session_status)
        .service(auth::bootstrap_admin)
        .service(investors::list_investors)
        .service(investors::create_investor)
        .service(investors::delete_investor)
        .service(catalogue::get_catalogue_options)
        .service(startups::list_startups)
        .service(startups::get_startup)
        .service(startups::create_startup)
        .service(startups::update_startup)
        .service(startups::delete_startup)
        // `/rounds/active` must precede any `/rounds/{id}` pattern.
        .service(rounds::get_active_round)
        .service(rounds::list_rounds)
        .service(rounds::start_round)
        .service(rounds::stop_round)
        .service(selections::list_selections)
        .service(selections::toggle_selection)
        .service(selections::select_startup)
        .service(selections::deselect_startup)
        .service(insights::get_dashboard)
        .service(insights::get_matchmaking)
        .service(assets::upload_asset)
        .service(assets::download_asset);
}
