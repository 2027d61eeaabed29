//! Wire-level message definitions for the WebSocket adapter.
//!
//! Every server frame is a JSON object tagged by `type`. Clients keep their
//! own countdown ticking from `round.round.startsAt`; frames only arrive when
//! the active round changes or on request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ActiveRound, ChangeEvent};
use crate::inbound::http::rounds::ActiveRoundView;

/// Frames sent by the client.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Ask for the current active round again.
    Refresh,
}

/// Frames sent by the server.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Snapshot of the live round, `round: null` when idle.
    ActiveRound {
        /// Change that prompted the snapshot, as `table/kind`. `null` for the
        /// first frame and for explicit refreshes.
        event: Option<String>,
        round: Option<ActiveRoundView>,
    },
}

impl ServerMessage {
    /// Resolve `active` at `now` into an `activeRound` frame.
    pub fn active_round(
        trigger: Option<ChangeEvent>,
        active: Option<ActiveRound>,
        now: DateTime<Utc>,
    ) -> Self {
        Self::ActiveRound {
            event: trigger.map(|event| event.to_string()),
            round: active.map(|active| ActiveRoundView::at(active, now)),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use insta::assert_json_snapshot;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;
    use crate::domain::{ChangeKind, ChangeTable, Round, RoundId, Startup, StartupId};

    fn live_round() -> ActiveRound {
        let starts_at = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("valid instant");
        let startup_id = StartupId::from_uuid(Uuid::from_u128(2));
        ActiveRound {
            round: Round {
                id: RoundId::from_uuid(Uuid::from_u128(1)),
                current_round_number: 3,
                duration_minutes: 5,
                starts_at,
                is_active: true,
                startup_id: Some(startup_id),
                created_at: starts_at,
                updated_at: starts_at,
            },
            startup: Some(Startup {
                id: startup_id,
                name: "Orbital".into(),
                sector: "DeepTech".into(),
                category: "Seed".into(),
                country: "France".into(),
                one_line_pitch: "Satellites as a service".into(),
                demo_url: None,
                pitch_deck_url: None,
                logo_url: None,
                created_at: starts_at,
            }),
        }
    }

    #[rstest]
    fn serialises_active_round_frame() {
        let active = live_round();
        let now = active.round.starts_at + chrono::TimeDelta::seconds(30);
        let message = ServerMessage::active_round(
            Some(ChangeEvent::new(ChangeTable::Rounds, ChangeKind::Insert)),
            Some(active),
            now,
        );
        assert_json_snapshot!(message);
    }

    #[rstest]
    fn idle_frame_has_null_round() {
        let message = ServerMessage::active_round(None, None, Utc::now());
        assert_eq!(
            serde_json::to_value(&message).expect("serialises"),
            serde_json::json!({ "type": "activeRound", "event": null, "round": null })
        );
    }

    #[rstest]
    #[case(r#"{"type":"refresh"}"#, true)]
    #[case(r#"{"type":"subscribe"}"#, false)]
    #[case("refresh", false)]
    fn parses_client_frames(#[case] raw: &str, #[case] ok: bool) {
        let parsed = serde_json::from_str::<ClientMessage>(raw);
        assert_eq!(parsed.is_ok(), ok);
    }
}
