//! Investor selections ("matches") of startups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ProfileId, RoundId, Startup, StartupId};

/// One investor's mark on one startup. Unique per `(investor_id, startup_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub investor_id: ProfileId,
    pub startup_id: StartupId,
    /// Round that was live when the mark was made.
    pub round_id: Option<RoundId>,
    pub is_top_selected: bool,
    pub created_at: DateTime<Utc>,
}

impl Selection {
    /// A fresh top selection made at `now`.
    pub fn mark(
        investor_id: ProfileId,
        startup_id: StartupId,
        round_id: Option<RoundId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            investor_id,
            startup_id,
            round_id,
            is_top_selected: true,
            created_at: now,
        }
    }
}

/// A selection joined with the startup it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectedStartup {
    pub startup: Startup,
    pub round_id: Option<RoundId>,
    pub selected_at: DateTime<Utc>,
}

/// Result of toggling a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ToggleOutcome {
    /// Whether the startup is selected after the toggle.
    pub selected: bool,
}
