//! Startups pitching at the event.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Startup identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct StartupId(Uuid);

impl StartupId {
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

impl fmt::Display for StartupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Persisted startup record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Startup {
    pub id: StartupId,
    pub name: String,
    pub sector: String,
    /// Funding stage.
    pub category: String,
    pub country: String,
    pub one_line_pitch: String,
    pub demo_url: Option<String>,
    pub pitch_deck_url: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Startup {
    /// Assemble a startup from a validated draft.
    pub fn from_draft(id: StartupId, draft: StartupDraft, created_at: DateTime<Utc>) -> Self {
        let StartupDraft {
            name,
            sector,
            category,
            country,
            one_line_pitch,
            demo_url,
            pitch_deck_url,
            logo_url,
        } = draft;
        Self {
            id,
            name,
            sector,
            category,
            country,
            one_line_pitch,
            demo_url,
            pitch_deck_url,
            logo_url,
            created_at,
        }
    }

    /// Replace every editable field with the draft, keeping id and creation time.
    pub fn apply(&mut self, draft: StartupDraft) {
        *self = Self::from_draft(self.id, draft, self.created_at);
    }
}

/// Raw, unvalidated startup fields as submitted by an admin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartupFields {
    pub name: String,
    pub sector: String,
    pub category: String,
    pub country: String,
    pub one_line_pitch: String,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub pitch_deck_url: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Validation failures for [`StartupDraft`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StartupValidationError {
    #[error("{field} must not be empty")]
    MissingField { field: &'static str },
}

impl StartupValidationError {
    /// Name of the offending field in wire form.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } => field,
        }
    }
}

/// Validated startup contents.
///
/// ## Invariants
/// - `name`, `sector`, `category`, `country` and `one_line_pitch` are trimmed
///   and non-empty.
/// - Optional URLs are trimmed; blank values collapse to `None`.
///
/// # Examples
/// ```
/// use pitchmatch::domain::{StartupDraft, StartupFields};
///
/// let draft = StartupDraft::new(StartupFields {
///     name: " Orbital ".into(),
///     sector: "DeepTech".into(),
///     category: "Seed".into(),
///     country: "France".into(),
///     one_line_pitch: "Satellites as a service".into(),
///     demo_url: Some("  ".into()),
///     ..StartupFields::default()
/// })
/// .unwrap();
/// assert_eq!(draft.name(), "Orbital");
/// assert!(draft.demo_url().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupDraft {
    name: String,
    sector: String,
    category: String,
    country: String,
    one_line_pitch: String,
    demo_url: Option<String>,
    pitch_deck_url: Option<String>,
    logo_url: Option<String>,
}

fn required(value: &str, field: &'static str) -> Result<String, StartupValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StartupValidationError::MissingField { field });
    }
    Ok(trimmed.to_owned())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

impl StartupDraft {
    /// Validate raw fields.
    pub fn new(fields: StartupFields) -> Result<Self, StartupValidationError> {
        Ok(Self {
            name: required(&fields.name, "name")?,
            sector: required(&fields.sector, "sector")?,
            category: required(&fields.category, "category")?,
            country: required(&fields.country, "country")?,
            one_line_pitch: required(&fields.one_line_pitch, "oneLinePitch")?,
            demo_url: optional(fields.demo_url),
            pitch_deck_url: optional(fields.pitch_deck_url),
            logo_url: optional(fields.logo_url),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn demo_url(&self) -> Option<&str> {
        self.demo_url.as_deref()
    }
}

impl TryFrom<StartupFields> for StartupDraft {
    type Error = StartupValidationError;

    fn try_from(value: StartupFields) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
