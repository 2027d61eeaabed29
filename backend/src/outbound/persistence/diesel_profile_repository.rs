//! PostgreSQL-backed `ProfileRepository` using Diesel ORM.
//!
//! Deleting a profile relies on `ON DELETE CASCADE` to remove its matches.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};
use crate::domain::{Profile, ProfileId, Role};

use super::diesel_error_mapping::{DieselFailure, classify, map_decode_error, map_pool_error};
use super::models::ProfileRow;
use super::pool::{DbPool, PoolError};
use super::schema::profiles;

/// Diesel-backed profile store.
#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
}

impl DieselProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ProfileRepositoryError {
    map_pool_error(error, ProfileRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error, id: &ProfileId) -> ProfileRepositoryError {
    match classify(&error) {
        DieselFailure::Connection(message) => ProfileRepositoryError::connection(message),
        DieselFailure::UniqueViolation { .. } => ProfileRepositoryError::duplicate(id.to_string()),
        DieselFailure::Query(message) => ProfileRepositoryError::query(message),
    }
}

fn decode(row: ProfileRow) -> Result<Profile, ProfileRepositoryError> {
    Profile::try_from(row).map_err(|err| map_decode_error(err, ProfileRepositoryError::query))
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn find_by_id(&self, id: &ProfileId) -> Result<Option<Profile>, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        profiles::table
            .find(id.as_uuid())
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, id))?
            .map(decode)
            .transpose()
    }

    async fn insert(&self, profile: &Profile) -> Result<(), ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(profiles::table)
            .values(ProfileRow::from(profile))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, &profile.id))
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<Profile>, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<ProfileRow> = profiles::table
            .filter(profiles::role.eq(role.as_str()))
            .order(profiles::created_at.desc())
            .select(ProfileRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| match classify(&err) {
                DieselFailure::Connection(message) => ProfileRepositoryError::connection(message),
                _ => ProfileRepositoryError::query("database error"),
            })?;
        rows.into_iter().map(decode).collect()
    }

    async fn delete(&self, id: &ProfileId) -> Result<bool, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let removed = diesel::delete(profiles::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, id))?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn duplicate_ids_map_to_duplicate() {
        let id = ProfileId::random();
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("profiles_pkey".to_owned()),
        );
        assert_eq!(
            map_diesel_error(error, &id),
            ProfileRepositoryError::duplicate(id.to_string())
        );
    }

    #[rstest]
    fn pool_errors_are_connection_errors() {
        assert!(matches!(
            pool_error(PoolError::checkout("timed out")),
            ProfileRepositoryError::Connection { .. }
        ));
    }
}
