//! In-process store implementing every repository port.
//!
//! Used when no database is configured and throughout the test suites. All
//! tables live behind one mutex, so each port call is atomic. That is what
//! makes `start_round` safe here: deactivation, numbering and insertion
//! happen under a single lock acquisition.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::ports::{
    IdentityRepository, IdentityRepositoryError, ProfileRepository, ProfileRepositoryError,
    RoundRepository, RoundRepositoryError, SelectionRepository, SelectionRepositoryError,
    StartupRepository, StartupRepositoryError,
};
use crate::domain::{
    Email, Identity, LoginCredentials, NewRound, Profile, ProfileId, Role, Round, RoundId,
    Selection, Startup, StartupId,
};
use crate::outbound::password::{hash_password_blocking, verify_password_blocking};

struct StoredIdentity {
    identity: Identity,
    password_hash: String,
}

#[derive(Default)]
struct Tables {
    identities: HashMap<ProfileId, StoredIdentity>,
    profiles: HashMap<ProfileId, Profile>,
    startups: HashMap<StartupId, Startup>,
    rounds: Vec<Round>,
    selections: HashMap<(ProfileId, StartupId), Selection>,
}

/// Mutex-guarded tables with relational delete semantics.
///
/// Deleting a profile or startup removes its selections; deleting a startup
/// also unlinks it from past rounds.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

/// Error text used when a previous panic poisoned the store.
const POISONED: &str = "in-memory store lock poisoned";

fn newest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> DateTime<Utc>) {
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
}

impl InMemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, &'static str> {
        self.tables.lock().map_err(|_| POISONED)
    }
}

#[async_trait]
impl IdentityRepository for InMemoryStore {
    async fn create(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Identity, IdentityRepositoryError> {
        let password_hash = hash_password_blocking(password.to_owned())
            .await
            .map_err(|e| IdentityRepositoryError::query(e.to_string()))?;
        let mut tables = self.tables().map_err(IdentityRepositoryError::query)?;
        if tables
            .identities
            .values()
            .any(|stored| stored.identity.email == *email)
        {
            return Err(IdentityRepositoryError::duplicate_email(email.as_str()));
        }
        let identity = Identity {
            id: ProfileId::random(),
            email: email.clone(),
            created_at: Utc::now(),
        };
        tables.identities.insert(
            identity.id,
            StoredIdentity {
                identity: identity.clone(),
                password_hash,
            },
        );
        debug!(identity_id = %identity.id, "identity created");
        Ok(identity)
    }

    async fn verify(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<Identity>, IdentityRepositoryError> {
        let found = {
            let tables = self.tables().map_err(IdentityRepositoryError::query)?;
            tables
                .identities
                .values()
                .find(|stored| stored.identity.email == *credentials.email())
                .map(|stored| (stored.identity.clone(), stored.password_hash.clone()))
        };
        let Some((identity, hash)) = found else {
            return Ok(None);
        };
        let password = credentials.password().to_owned();
        let matches = verify_password_blocking(password, hash)
            .await
            .map_err(|e| IdentityRepositoryError::query(e.to_string()))?;
        Ok(matches.then_some(identity))
    }

    async fn find_by_id(
        &self,
        id: &ProfileId,
    ) -> Result<Option<Identity>, IdentityRepositoryError> {
        let tables = self.tables().map_err(IdentityRepositoryError::query)?;
        Ok(tables.identities.get(id).map(|s| s.identity.clone()))
    }

    async fn delete(&self, id: &ProfileId) -> Result<bool, IdentityRepositoryError> {
        let mut tables = self.tables().map_err(IdentityRepositoryError::query)?;
        Ok(tables.identities.remove(id).is_some())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn find_by_id(&self, id: &ProfileId) -> Result<Option<Profile>, ProfileRepositoryError> {
        let tables = self.tables().map_err(ProfileRepositoryError::query)?;
        Ok(tables.profiles.get(id).cloned())
    }

    async fn insert(&self, profile: &Profile) -> Result<(), ProfileRepositoryError> {
        let mut tables = self.tables().map_err(ProfileRepositoryError::query)?;
        if tables.profiles.contains_key(&profile.id) {
            return Err(ProfileRepositoryError::duplicate(profile.id.to_string()));
        }
        tables.profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<Profile>, ProfileRepositoryError> {
        let tables = self.tables().map_err(ProfileRepositoryError::query)?;
        let mut profiles: Vec<Profile> = tables
            .profiles
            .values()
            .filter(|p| p.role == role)
            .cloned()
            .collect();
        newest_first(&mut profiles, |p| p.created_at);
        Ok(profiles)
    }

    async fn delete(&self, id: &ProfileId) -> Result<bool, ProfileRepositoryError> {
        let mut tables = self.tables().map_err(ProfileRepositoryError::query)?;
        let removed = tables.profiles.remove(id).is_some();
        tables
            .selections
            .retain(|(investor_id, _), _| investor_id != id);
        Ok(removed)
    }
}

#[async_trait]
impl StartupRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Startup>, StartupRepositoryError> {
        let tables = self.tables().map_err(StartupRepositoryError::query)?;
        let mut startups: Vec<Startup> = tables.startups.values().cloned().collect();
        newest_first(&mut startups, |s| s.created_at);
        Ok(startups)
    }

    async fn find_by_id(&self, id: &StartupId) -> Result<Option<Startup>, StartupRepositoryError> {
        let tables = self.tables().map_err(StartupRepositoryError::query)?;
        Ok(tables.startups.get(id).cloned())
    }

    async fn insert(&self, startup: &Startup) -> Result<(), StartupRepositoryError> {
        let mut tables = self.tables().map_err(StartupRepositoryError::query)?;
        tables.startups.insert(startup.id, startup.clone());
        Ok(())
    }

    async fn update(&self, startup: &Startup) -> Result<bool, StartupRepositoryError> {
        let mut tables = self.tables().map_err(StartupRepositoryError::query)?;
        match tables.startups.get_mut(&startup.id) {
            Some(existing) => {
                *existing = startup.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &StartupId) -> Result<bool, StartupRepositoryError> {
        let mut tables = self.tables().map_err(StartupRepositoryError::query)?;
        if tables.startups.remove(id).is_none() {
            return Ok(false);
        }
        tables
            .selections
            .retain(|(_, startup_id), _| startup_id != id);
        for round in tables
            .rounds
            .iter_mut()
            .filter(|round| round.startup_id.as_ref() == Some(id))
        {
            round.startup_id = None;
        }
        Ok(true)
    }
}

#[async_trait]
impl RoundRepository for InMemoryStore {
    async fn start_round(&self, round: &NewRound) -> Result<Round, RoundRepositoryError> {
        let mut tables = self.tables().map_err(RoundRepositoryError::query)?;
        if !tables.startups.contains_key(&round.startup_id) {
            return Err(RoundRepositoryError::missing_startup(
                round.startup_id.to_string(),
            ));
        }
        let next_number = tables
            .rounds
            .iter()
            .map(|r| r.current_round_number)
            .max()
            .unwrap_or(0)
            + 1;
        for existing in tables.rounds.iter_mut().filter(|r| r.is_active) {
            existing.is_active = false;
            existing.updated_at = round.starts_at;
        }
        let created = Round {
            id: RoundId::random(),
            current_round_number: next_number,
            duration_minutes: round.duration.minutes(),
            starts_at: round.starts_at,
            is_active: true,
            startup_id: Some(round.startup_id),
            created_at: round.starts_at,
            updated_at: round.starts_at,
        };
        tables.rounds.push(created.clone());
        Ok(created)
    }

    async fn stop_round(
        &self,
        id: &RoundId,
        at: DateTime<Utc>,
    ) -> Result<Option<Round>, RoundRepositoryError> {
        let mut tables = self.tables().map_err(RoundRepositoryError::query)?;
        Ok(tables.rounds.iter_mut().find(|r| r.id == *id).map(|round| {
            round.is_active = false;
            round.updated_at = at;
            round.clone()
        }))
    }

    async fn find_active(&self) -> Result<Option<Round>, RoundRepositoryError> {
        let tables = self.tables().map_err(RoundRepositoryError::query)?;
        Ok(tables
            .rounds
            .iter()
            .filter(|r| r.is_active)
            .max_by_key(|r| (r.created_at, r.current_round_number))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Round>, RoundRepositoryError> {
        let tables = self.tables().map_err(RoundRepositoryError::query)?;
        let mut rounds = tables.rounds.clone();
        rounds.sort_by_key(|r| std::cmp::Reverse((r.created_at, r.current_round_number)));
        Ok(rounds)
    }
}

#[async_trait]
impl SelectionRepository for InMemoryStore {
    async fn find(
        &self,
        investor_id: &ProfileId,
        startup_id: &StartupId,
    ) -> Result<Option<Selection>, SelectionRepositoryError> {
        let tables = self.tables().map_err(SelectionRepositoryError::query)?;
        Ok(tables.selections.get(&(*investor_id, *startup_id)).cloned())
    }

    async fn upsert(&self, selection: &Selection) -> Result<(), SelectionRepositoryError> {
        let mut tables = self.tables().map_err(SelectionRepositoryError::query)?;
        tables.selections.insert(
            (selection.investor_id, selection.startup_id),
            selection.clone(),
        );
        Ok(())
    }

    async fn delete(
        &self,
        investor_id: &ProfileId,
        startup_id: &StartupId,
    ) -> Result<bool, SelectionRepositoryError> {
        let mut tables = self.tables().map_err(SelectionRepositoryError::query)?;
        Ok(tables
            .selections
            .remove(&(*investor_id, *startup_id))
            .is_some())
    }

    async fn list_for_investor(
        &self,
        investor_id: &ProfileId,
    ) -> Result<Vec<Selection>, SelectionRepositoryError> {
        let tables = self.tables().map_err(SelectionRepositoryError::query)?;
        let mut selections: Vec<Selection> = tables
            .selections
            .values()
            .filter(|s| s.investor_id == *investor_id)
            .cloned()
            .collect();
        newest_first(&mut selections, |s| s.created_at);
        Ok(selections)
    }

    async fn list_all(&self) -> Result<Vec<Selection>, SelectionRepositoryError> {
        let tables = self.tables().map_err(SelectionRepositoryError::query)?;
        let mut selections: Vec<Selection> = tables.selections.values().cloned().collect();
        newest_first(&mut selections, |s| s.created_at);
        Ok(selections)
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
