//! PostgreSQL-backed `SelectionRepository` over the `matches` table.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SelectionRepository, SelectionRepositoryError};
use crate::domain::{ProfileId, Selection, StartupId};

use super::diesel_error_mapping::{map_basic_diesel_error, map_pool_error};
use super::models::MatchRow;
use super::pool::{DbPool, PoolError};
use super::schema::matches;

/// Diesel-backed selection store.
#[derive(Clone)]
pub struct DieselSelectionRepository {
    pool: DbPool,
}

impl DieselSelectionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> SelectionRepositoryError {
    map_pool_error(error, SelectionRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> SelectionRepositoryError {
    map_basic_diesel_error(
        error,
        SelectionRepositoryError::query,
        SelectionRepositoryError::connection,
    )
}

#[async_trait]
impl SelectionRepository for DieselSelectionRepository {
    async fn find(
        &self,
        investor_id: &ProfileId,
        startup_id: &StartupId,
    ) -> Result<Option<Selection>, SelectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = matches::table
            .find((investor_id.as_uuid(), startup_id.as_uuid()))
            .select(MatchRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Selection::from))
    }

    async fn upsert(&self, selection: &Selection) -> Result<(), SelectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(matches::table)
            .values(MatchRow::from(selection))
            .on_conflict((matches::investor_id, matches::startup_id))
            .do_update()
            .set((
                matches::round_id.eq(excluded(matches::round_id)),
                matches::is_top_selected.eq(excluded(matches::is_top_selected)),
                matches::created_at.eq(excluded(matches::created_at)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(
        &self,
        investor_id: &ProfileId,
        startup_id: &StartupId,
    ) -> Result<bool, SelectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let removed =
            diesel::delete(matches::table.find((investor_id.as_uuid(), startup_id.as_uuid())))
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn list_for_investor(
        &self,
        investor_id: &ProfileId,
    ) -> Result<Vec<Selection>, SelectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<MatchRow> = matches::table
            .filter(matches::investor_id.eq(investor_id.as_uuid()))
            .order(matches::created_at.desc())
            .select(MatchRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Selection::from).collect())
    }

    async fn list_all(&self) -> Result<Vec<Selection>, SelectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<MatchRow> = matches::table
            .order(matches::created_at.desc())
            .select(MatchRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Selection::from).collect())
    }
}
