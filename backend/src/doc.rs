//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST handler and the session cookie security
//! scheme. Schemas reached from request and response bodies are collected
//! automatically; only the shared error payload is listed explicitly. The
//! document backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Pitch matchmaking API",
        description = "Admin and investor dashboard for live startup pitch rounds."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::session_status,
        crate::inbound::http::auth::bootstrap_admin,
        crate::inbound::http::investors::list_investors,
        crate::inbound::http::investors::create_investor,
        crate::inbound::http::investors::delete_investor,
        crate::inbound::http::catalogue::get_catalogue_options,
        crate::inbound::http::startups::list_startups,
        crate::inbound::http::startups::get_startup,
        crate::inbound::http::startups::create_startup,
        crate::inbound::http::startups::update_startup,
        crate::inbound::http::startups::delete_startup,
        crate::inbound::http::rounds::get_active_round,
        crate::inbound::http::rounds::list_rounds,
        crate::inbound::http::rounds::start_round,
        crate::inbound::http::rounds::stop_round,
        crate::inbound::http::selections::list_selections,
        crate::inbound::http::selections::toggle_selection,
        crate::inbound::http::selections::select_startup,
        crate::inbound::http::selections::deselect_startup,
        crate::inbound::http::insights::get_dashboard,
        crate::inbound::http::insights::get_matchmaking,
        crate::inbound::http::assets::upload_asset,
        crate::inbound::http::assets::download_asset,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(Error, ErrorCode)),
    tags(
        (name = "auth", description = "Sign-in, sign-out and session status"),
        (name = "investors", description = "Investor provisioning (admin)"),
        (name = "catalogue", description = "Fixed sector, category and country options"),
        (name = "startups", description = "Startup catalogue"),
        (name = "rounds", description = "Pitch rounds and the live countdown"),
        (name = "selections", description = "Investor interest in startups"),
        (name = "admin", description = "Dashboard and matchmaking aggregates"),
        (name = "assets", description = "Logo and pitch deck uploads"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
/// OpenAPI document for the REST surface.
pub struct ApiDoc;
