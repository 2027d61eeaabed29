//! PostgreSQL-backed `IdentityRepository` using Diesel ORM.
//!
//! Password hashes never leave this adapter: `verify` compares on the
//! blocking pool and returns only the identity.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{IdentityRepository, IdentityRepositoryError};
use crate::domain::{Email, Identity, LoginCredentials, ProfileId};
use crate::outbound::password::{hash_password_blocking, verify_password_blocking};

use super::diesel_error_mapping::{DieselFailure, classify, map_decode_error, map_pool_error};
use super::models::{IdentityRow, NewIdentityRow};
use super::pool::DbPool;
use super::schema::identities;

/// Diesel-backed identity store.
#[derive(Clone)]
pub struct DieselIdentityRepository {
    pool: DbPool,
}

impl DieselIdentityRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error, email: &Email) -> IdentityRepositoryError {
    match classify(&error) {
        DieselFailure::Connection(message) => IdentityRepositoryError::connection(message),
        DieselFailure::UniqueViolation { .. } => {
            IdentityRepositoryError::duplicate_email(email.as_str())
        }
        DieselFailure::Query(message) => IdentityRepositoryError::query(message),
    }
}

fn map_read_error(error: diesel::result::Error) -> IdentityRepositoryError {
    match classify(&error) {
        DieselFailure::Connection(message) => IdentityRepositoryError::connection(message),
        DieselFailure::UniqueViolation { .. } | DieselFailure::Query(_) => {
            IdentityRepositoryError::query("database error")
        }
    }
}

fn decode(row: IdentityRow) -> Result<Identity, IdentityRepositoryError> {
    row.into_identity()
        .map_err(|err| map_decode_error(err, IdentityRepositoryError::query))
}

#[async_trait]
impl IdentityRepository for DieselIdentityRepository {
    async fn create(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Identity, IdentityRepositoryError> {
        let password_hash = hash_password_blocking(password.to_owned())
            .await
            .map_err(|err| IdentityRepositoryError::query(err.to_string()))?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, IdentityRepositoryError::connection))?;

        let new_row = NewIdentityRow {
            id: *ProfileId::random().as_uuid(),
            email: email.as_str(),
            password_hash: &password_hash,
            created_at: Utc::now(),
        };
        let row = diesel::insert_into(identities::table)
            .values(&new_row)
            .returning(IdentityRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, email))?;
        decode(row)
    }

    async fn verify(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<Identity>, IdentityRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, IdentityRepositoryError::connection))?;
        let row = identities::table
            .filter(identities::email.eq(credentials.email().as_str()))
            .select(IdentityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        drop(conn);

        let Some(row) = row else {
            return Ok(None);
        };
        let matches =
            verify_password_blocking(credentials.password().to_owned(), row.password_hash.clone())
                .await
                .map_err(|err| IdentityRepositoryError::query(err.to_string()))?;
        if matches {
            decode(row).map(Some)
        } else {
            Ok(None)
        }
    }

    async fn find_by_id(
        &self,
        id: &ProfileId,
    ) -> Result<Option<Identity>, IdentityRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, IdentityRepositoryError::connection))?;
        identities::table
            .find(id.as_uuid())
            .select(IdentityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?
            .map(decode)
            .transpose()
    }

    async fn delete(&self, id: &ProfileId) -> Result<bool, IdentityRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, IdentityRepositoryError::connection))?;
        let removed = diesel::delete(identities::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Error mapping coverage; no database required.
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn unique_violations_name_the_email() {
        let email = Email::new("ada@fund.vc").expect("valid");
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_owned()),
        );
        assert_eq!(
            map_diesel_error(error, &email),
            IdentityRepositoryError::duplicate_email("ada@fund.vc")
        );
    }

    #[rstest]
    fn closed_connections_stay_retryable() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("terminating connection".to_owned()),
        );
        assert!(matches!(
            map_read_error(error),
            IdentityRepositoryError::Connection { .. }
        ));
    }
}
