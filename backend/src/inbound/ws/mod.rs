//! WebSocket inbound adapter streaming the live round to signed-in clients.
//!
//! Responsibilities:
//! - validate upgrade requests (origin allow-list, session, profile)
//! - start a per-connection follower of the active round
//! - keep WebSocket framing concerns at the edge of the system

use actix_web::http::header::{HeaderValue, ORIGIN};
use actix_web::{HttpRequest, HttpResponse, get, web};
use tracing::{error, info, warn};
use url::Url;

use crate::domain::ActiveRoundFollower;
use crate::inbound::http::session::SessionContext;

mod session;

pub mod messages;
pub mod origin;
pub mod state;

/// Handle WebSocket upgrade for the `/ws` endpoint.
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<state::WsState>,
    session: SessionContext,
    req: HttpRequest,
    body: web::Payload,
) -> actix_web::Result<HttpResponse> {
    let mut origin_iter = req.headers().get_all(ORIGIN);
    let origin_header = origin_iter.next().ok_or_else(|| {
        error!("Missing Origin header on WebSocket upgrade");
        actix_web::error::ErrorForbidden("Origin not allowed")
    })?;
    if origin_iter.next().is_some() {
        error!("Multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }
    validate_origin(&state.origins, origin_header)?;

    let identity = session.require_identity()?;
    let profile = state.account.profile(&identity).await?;
    let follower = ActiveRoundFollower::spawn(state.rounds.clone(), state.feed.as_ref()).await?;

    let (response, ws_session, stream) = actix_ws::handle(&req, body).map_err(|error| {
        warn!(error = %error, "WebSocket handshake rejected");
        error
    })?;
    info!(profile = %profile.id, role = %profile.role, "live round socket opened");
    actix_web::rt::spawn(session::handle_ws_session(
        follower,
        state.clock.clone(),
        ws_session,
        stream,
    ));
    Ok(response)
}

fn validate_origin(
    origins: &origin::AllowedOrigins,
    origin_header: &HeaderValue,
) -> actix_web::Result<()> {
    let origin_value = origin_header.to_str().map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as string");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    let origin = Url::parse(origin_value).map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if origins.allows(&origin) {
        Ok(())
    } else {
        warn!(
            origin = origin_value,
            "Rejected WS upgrade due to disallowed Origin"
        );
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}
