//! Timed pitch rounds.
//!
//! A round binds one startup to a countdown anchor. Rounds are never deleted;
//! the table doubles as the event's history log.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Countdown, Startup, StartupId};

/// Round identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct RoundId(Uuid);

impl RoundId {
    /// Generate a new random id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Longest round the controller accepts: one day.
pub const MAX_ROUND_MINUTES: u32 = 24 * 60;

/// Raised when a round duration is outside the accepted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("round duration must be between 1 and {MAX_ROUND_MINUTES} minutes")]
pub struct RoundDurationError;

/// Round length in whole minutes, between one and [`MAX_ROUND_MINUTES`].
///
/// The upper bound keeps every accepted value inside the `INTEGER` column
/// used by the PostgreSQL adapter.
///
/// # Examples
/// ```
/// use pitchmatch::domain::RoundDuration;
///
/// assert_eq!(RoundDuration::new(5).unwrap().minutes(), 5);
/// assert!(RoundDuration::new(0).is_err());
/// assert!(RoundDuration::new(24 * 60 + 1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "u32", into = "u32")]
#[schema(value_type = u32)]
pub struct RoundDuration(u32);

impl RoundDuration {
    /// Validate a duration in minutes.
    ///
    /// # Errors
    /// [`RoundDurationError`] for zero or anything above [`MAX_ROUND_MINUTES`].
    pub fn new(minutes: u32) -> Result<Self, RoundDurationError> {
        if !(1..=MAX_ROUND_MINUTES).contains(&minutes) {
            return Err(RoundDurationError);
        }
        Ok(Self(minutes))
    }

    /// Length in whole minutes.
    pub fn minutes(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for RoundDuration {
    type Error = RoundDurationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoundDuration> for u32 {
    fn from(value: RoundDuration) -> Self {
        value.0
    }
}

/// Persisted round record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub id: RoundId,
    /// Position in the event, one more than the highest number before it.
    pub current_round_number: u32,
    /// Length chosen when the round was started.
    pub duration_minutes: u32,
    /// Countdown anchor shared by every client.
    pub starts_at: DateTime<Utc>,
    /// At most one round has this set.
    pub is_active: bool,
    /// `None` once the startup has been deleted.
    pub startup_id: Option<StartupId>,
    pub created_at: DateTime<Utc>,
    /// Last start or stop write.
    pub updated_at: DateTime<Utc>,
}

impl Round {
    /// Countdown anchored on this round's start and duration.
    pub fn countdown(&self) -> Countdown {
        Countdown::new(self.starts_at, self.duration_minutes)
    }
}

/// Everything a store needs to open a new live round.
///
/// The store assigns the id, the round number and the bookkeeping timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewRound {
    pub startup_id: StartupId,
    pub duration: RoundDuration,
    pub starts_at: DateTime<Utc>,
}

/// Round controller state as seen by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RoundState {
    Idle,
    #[serde(rename_all = "camelCase")]
    Live { round_id: RoundId },
}

/// The live round together with the startup it presents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveRound {
    pub round: Round,
    pub startup: Option<Startup>,
}

impl ActiveRound {
    /// Controller state implied by an optional active round.
    pub fn state_of(active: Option<&Self>) -> RoundState {
        match active {
            Some(active) => RoundState::Live {
                round_id: active.round.id,
            },
            None => RoundState::Idle,
        }
    }
}
