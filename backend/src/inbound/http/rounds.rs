//! Round controller endpoints.
//!
//! ```text
//! GET  /api/v1/rounds/active
//! GET  /api/v1/rounds
//! POST /api/v1/rounds {"startupId":"...","durationMinutes":5}
//! POST /api/v1/rounds/{id}/stop
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ActiveRound, Error, Round, RoundId, Startup};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_duration, parse_startup_id, parse_uuid,
};

/// The live round as clients render it, with its countdown resolved at a
/// reference instant.
///
/// Clients keep ticking locally from `round.startsAt` and
/// `round.durationMinutes`; the resolved fields only seed the first frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveRoundView {
    pub round: Round,
    pub startup: Option<Startup>,
    pub ends_at: DateTime<Utc>,
    pub remaining_seconds: u64,
    /// Remaining time as `MM:SS`.
    #[schema(example = "04:30")]
    pub display: String,
    pub ending_soon: bool,
}

impl ActiveRoundView {
    /// Project the active round onto its countdown at `now`.
    pub fn at(active: ActiveRound, now: DateTime<Utc>) -> Self {
        let countdown = active.round.countdown();
        Self {
            ends_at: countdown.end_time(),
            remaining_seconds: countdown.remaining_seconds(now),
            display: countdown.format_remaining(now),
            ending_soon: countdown.is_ending_soon(now),
            round: active.round,
            startup: active.startup,
        }
    }
}

/// Body for `POST /api/v1/rounds`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartRoundRequest {
    pub startup_id: String,
    #[schema(minimum = 1, maximum = 1440, example = 5)]
    pub duration_minutes: u32,
}

/// The live round, or `null` when idle. Any signed-in role.
#[utoipa::path(
    get,
    path = "/api/v1/rounds/active",
    responses(
        (status = 200, description = "Live round or null", body = Option<ActiveRoundView>),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["rounds"],
    operation_id = "getActiveRound",
    security(("SessionCookie" = []))
)]
#[get("/rounds/active")]
pub async fn get_active_round(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Option<ActiveRoundView>>> {
    session.require_profile(&state).await?;
    let now = state.clock.utc();
    let view = state
        .rounds_query
        .active()
        .await?
        .map(|active| ActiveRoundView::at(active, now));
    Ok(web::Json(view))
}

/// Round history, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/rounds",
    responses(
        (status = 200, description = "Rounds", body = [Round]),
        (status = 403, description = "Admin role required", body = Error)
    ),
    tags = ["rounds"],
    operation_id = "listRounds",
    security(("SessionCookie" = []))
)]
#[get("/rounds")]
pub async fn list_rounds(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Round>>> {
    session.require_admin(&state).await?;
    Ok(web::Json(state.rounds_query.history().await?))
}

/// Put a startup on stage, replacing any live round.
#[utoipa::path(
    post,
    path = "/api/v1/rounds",
    request_body = StartRoundRequest,
    responses(
        (status = 201, description = "Round started", body = Round),
        (status = 400, description = "Invalid duration or id", body = Error),
        (status = 403, description = "Admin role required", body = Error),
        (status = 404, description = "Unknown startup", body = Error)
    ),
    tags = ["rounds"],
    operation_id = "startRound",
    security(("SessionCookie" = []))
)]
#[post("/rounds")]
pub async fn start_round(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<StartRoundRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin(&state).await?;
    let StartRoundRequest {
        startup_id,
        duration_minutes,
    } = payload.into_inner();
    let startup_id = parse_startup_id(&startup_id, FieldName::new("startupId"))?;
    let duration = parse_duration(duration_minutes, FieldName::new("durationMinutes"))?;
    let round = state.rounds.start(&startup_id, duration).await?;
    Ok(HttpResponse::Created().json(round))
}

/// End a round. Stopping an already stopped round succeeds.
#[utoipa::path(
    post,
    path = "/api/v1/rounds/{id}/stop",
    params(("id" = String, Path, description = "Round id")),
    responses(
        (status = 200, description = "Round stopped", body = Round),
        (status = 404, description = "Unknown round", body = Error)
    ),
    tags = ["rounds"],
    operation_id = "stopRound",
    security(("SessionCookie" = []))
)]
#[post("/rounds/{id}/stop")]
pub async fn stop_round(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Round>> {
    session.require_admin(&state).await?;
    let id = RoundId::from_uuid(parse_uuid(&path.into_inner(), FieldName::new("id"))?);
    Ok(web::Json(state.rounds.stop(&id).await?))
}
