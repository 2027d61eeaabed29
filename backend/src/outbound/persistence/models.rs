//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types validate
//! every column and report failures as [`RowDecodeError`].

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Email, Identity, Profile, ProfileId, Role, Round, RoundId, Selection, Startup, StartupId,
};

use super::schema::{identities, matches, profiles, rounds, startups};

/// A stored row that does not satisfy the domain invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {table} row: {message}")]
pub(crate) struct RowDecodeError {
    table: &'static str,
    message: String,
}

impl RowDecodeError {
    fn new(table: &'static str, message: impl ToString) -> Self {
        Self {
            table,
            message: message.to_string(),
        }
    }
}

/// Convert a domain counter into an `INTEGER` column value.
pub(crate) fn to_db_int(value: u32) -> Result<i32, String> {
    i32::try_from(value).map_err(|_| format!("{value} exceeds the integer column range"))
}

fn from_db_int(table: &'static str, value: i32) -> Result<u32, RowDecodeError> {
    u32::try_from(value).map_err(|_| RowDecodeError::new(table, format!("negative value {value}")))
}

// ---------------------------------------------------------------------------
// Identities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = identities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IdentityRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl IdentityRow {
    pub(crate) fn into_identity(self) -> Result<Identity, RowDecodeError> {
        let email = Email::new(&self.email).map_err(|err| RowDecodeError::new("identities", err))?;
        Ok(Identity {
            id: ProfileId::from_uuid(self.id),
            email,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = identities)]
pub(crate) struct NewIdentityRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Profile> for ProfileRow {
    fn from(profile: &Profile) -> Self {
        Self {
            id: *profile.id.as_uuid(),
            email: profile.email.as_str().to_owned(),
            role: profile.role.as_str().to_owned(),
            created_at: profile.created_at,
        }
    }
}

impl TryFrom<ProfileRow> for Profile {
    type Error = RowDecodeError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let email = Email::new(&row.email).map_err(|err| RowDecodeError::new("profiles", err))?;
        let role: Role = row
            .role
            .parse()
            .map_err(|err| RowDecodeError::new("profiles", err))?;
        Ok(Self {
            id: ProfileId::from_uuid(row.id),
            email,
            role,
            created_at: row.created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Startups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = startups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct StartupRow {
    pub id: Uuid,
    pub name: String,
    pub sector: String,
    pub category: String,
    pub country: String,
    pub one_line_pitch: String,
    pub demo_url: Option<String>,
    pub pitch_deck_url: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Startup> for StartupRow {
    fn from(startup: &Startup) -> Self {
        Self {
            id: *startup.id.as_uuid(),
            name: startup.name.clone(),
            sector: startup.sector.clone(),
            category: startup.category.clone(),
            country: startup.country.clone(),
            one_line_pitch: startup.one_line_pitch.clone(),
            demo_url: startup.demo_url.clone(),
            pitch_deck_url: startup.pitch_deck_url.clone(),
            logo_url: startup.logo_url.clone(),
            created_at: startup.created_at,
        }
    }
}

impl From<StartupRow> for Startup {
    fn from(row: StartupRow) -> Self {
        Self {
            id: StartupId::from_uuid(row.id),
            name: row.name,
            sector: row.sector,
            category: row.category,
            country: row.country,
            one_line_pitch: row.one_line_pitch,
            demo_url: row.demo_url,
            pitch_deck_url: row.pitch_deck_url,
            logo_url: row.logo_url,
            created_at: row.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Rounds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = rounds)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RoundRow {
    pub id: Uuid,
    pub current_round_number: i32,
    pub duration_minutes: i32,
    pub starts_at: DateTime<Utc>,
    pub is_active: bool,
    pub startup_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<RoundRow> for Round {
    type Error = RowDecodeError;

    fn try_from(row: RoundRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RoundId::from_uuid(row.id),
            current_round_number: from_db_int("rounds", row.current_round_number)?,
            duration_minutes: from_db_int("rounds", row.duration_minutes)?,
            starts_at: row.starts_at,
            is_active: row.is_active,
            startup_id: row.startup_id.map(StartupId::from_uuid),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Matches (selections)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = matches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MatchRow {
    pub investor_id: Uuid,
    pub startup_id: Uuid,
    pub round_id: Option<Uuid>,
    pub is_top_selected: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Selection> for MatchRow {
    fn from(selection: &Selection) -> Self {
        Self {
            investor_id: *selection.investor_id.as_uuid(),
            startup_id: *selection.startup_id.as_uuid(),
            round_id: selection.round_id.map(|id| *id.as_uuid()),
            is_top_selected: selection.is_top_selected,
            created_at: selection.created_at,
        }
    }
}

impl From<MatchRow> for Selection {
    fn from(row: MatchRow) -> Self {
        Self {
            investor_id: ProfileId::from_uuid(row.investor_id),
            startup_id: StartupId::from_uuid(row.startup_id),
            round_id: row.round_id.map(RoundId::from_uuid),
            is_top_selected: row.is_top_selected,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Row decoding coverage; no database required.
    use super::*;
    use rstest::rstest;

    fn round_row(number: i32, duration: i32) -> RoundRow {
        let now = Utc::now();
        RoundRow {
            id: Uuid::new_v4(),
            current_round_number: number,
            duration_minutes: duration,
            starts_at: now,
            is_active: true,
            startup_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn round_rows_decode() {
        let round = Round::try_from(round_row(4, 3)).expect("valid row");
        assert_eq!(round.current_round_number, 4);
        assert_eq!(round.duration_minutes, 3);
        assert_eq!(round.startup_id, None);
    }

    #[rstest]
    fn negative_counters_are_rejected() {
        let err = Round::try_from(round_row(-1, 3)).expect_err("negative number");
        assert!(err.to_string().contains("rounds"));
    }

    #[rstest]
    #[case("admin", Role::Admin)]
    #[case("investor", Role::Investor)]
    fn profile_roles_decode(#[case] raw: &str, #[case] expected: Role) {
        let row = ProfileRow {
            id: Uuid::new_v4(),
            email: "ada@fund.vc".into(),
            role: raw.into(),
            created_at: Utc::now(),
        };
        assert_eq!(Profile::try_from(row).expect("valid").role, expected);
    }

    #[rstest]
    fn unknown_roles_are_rejected() {
        let row = ProfileRow {
            id: Uuid::new_v4(),
            email: "ada@fund.vc".into(),
            role: "owner".into(),
            created_at: Utc::now(),
        };
        assert!(Profile::try_from(row).is_err());
    }

    #[rstest]
    fn oversized_counters_do_not_wrap() {
        assert_eq!(to_db_int(7), Ok(7));
        assert!(to_db_int(u32::MAX).is_err());
    }
}
