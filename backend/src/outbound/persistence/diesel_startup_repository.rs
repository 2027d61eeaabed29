//! PostgreSQL-backed `StartupRepository` using Diesel ORM.
//!
//! Foreign keys carry the delete semantics: matches cascade and rounds keep
//! their history with `startup_id` set to null.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StartupRepository, StartupRepositoryError};
use crate::domain::{Startup, StartupId};

use super::diesel_error_mapping::{map_basic_diesel_error, map_pool_error};
use super::models::StartupRow;
use super::pool::{DbPool, PoolError};
use super::schema::startups;

/// Diesel-backed startup store.
#[derive(Clone)]
pub struct DieselStartupRepository {
    pool: DbPool,
}

impl DieselStartupRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> StartupRepositoryError {
    map_pool_error(error, StartupRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> StartupRepositoryError {
    map_basic_diesel_error(
        error,
        StartupRepositoryError::query,
        StartupRepositoryError::connection,
    )
}

#[async_trait]
impl StartupRepository for DieselStartupRepository {
    async fn list(&self) -> Result<Vec<Startup>, StartupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<StartupRow> = startups::table
            .order(startups::created_at.desc())
            .select(StartupRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Startup::from).collect())
    }

    async fn find_by_id(&self, id: &StartupId) -> Result<Option<Startup>, StartupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = startups::table
            .find(id.as_uuid())
            .select(StartupRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Startup::from))
    }

    async fn insert(&self, startup: &Startup) -> Result<(), StartupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(startups::table)
            .values(StartupRow::from(startup))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, startup: &Startup) -> Result<bool, StartupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(startups::table.find(startup.id.as_uuid()))
            .set(StartupRow::from(startup))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &StartupId) -> Result<bool, StartupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let removed = diesel::delete(startups::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
