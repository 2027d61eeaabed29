//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use pitchmatch::Trace;
#[cfg(debug_assertions)]
use pitchmatch::doc::ApiDoc;
use pitchmatch::inbound::http::configure_api;
use pitchmatch::inbound::http::health::{HealthState, live, ready};
use pitchmatch::inbound::http::session_config::SessionSettings;
use pitchmatch::inbound::ws;

use state_builders::{AppStates, build_states};

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    states: AppStates,
    session: SessionSettings,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        states,
        session,
    } = deps;

    // The session wraps the whole app so the `/ws` upgrade can read it.
    let app = App::new()
        .app_data(health_state)
        .app_data(states.http)
        .app_data(states.ws)
        .wrap(session.middleware())
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(configure_api))
        .service(ws::ws_entry)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// Signal handling is left to the caller so liveness can be failed before
/// the server drains.
///
/// # Errors
/// Propagates [`std::io::Error`] when the adapters cannot be prepared or the
/// socket cannot be bound.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let states = build_states(&config).await?;
    let deps = AppDependencies {
        health_state: health_state.clone(),
        states,
        session: config.session.clone(),
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(config.bind_addr())?
        .disable_signals()
        .run();

    health_state.mark_ready();
    Ok(server)
}
