//! PostgreSQL-backed `RoundRepository` using Diesel ORM.
//!
//! `start_round` runs in one transaction that takes an exclusive lock on
//! `rounds` before reading the highest number, so concurrent starts from
//! several processes still serialise. The partial unique index on
//! `is_active` rejects any second live row that slips past.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::max;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{RoundRepository, RoundRepositoryError};
use crate::domain::{NewRound, Round, RoundId, StartupId};

use super::diesel_error_mapping::{
    is_foreign_key_violation, map_basic_diesel_error, map_decode_error, map_pool_error,
};
use super::models::{RoundRow, to_db_int};
use super::pool::{DbPool, PoolError};
use super::schema::rounds;

const LOCK_ROUNDS_SQL: &str = "LOCK TABLE rounds IN EXCLUSIVE MODE";

/// Diesel-backed round store.
#[derive(Clone)]
pub struct DieselRoundRepository {
    pool: DbPool,
}

impl DieselRoundRepository {
    /// Create a repository backed by the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> RoundRepositoryError {
    map_pool_error(error, RoundRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RoundRepositoryError {
    map_basic_diesel_error(
        error,
        RoundRepositoryError::query,
        RoundRepositoryError::connection,
    )
}

/// A foreign key failure on insert means the startup was deleted between the
/// service's existence check and this transaction.
fn map_start_error(error: diesel::result::Error, startup_id: &StartupId) -> RoundRepositoryError {
    if is_foreign_key_violation(&error) {
        return RoundRepositoryError::missing_startup(startup_id.to_string());
    }
    map_diesel_error(error)
}

fn decode(row: RoundRow) -> Result<Round, RoundRepositoryError> {
    Round::try_from(row).map_err(|err| map_decode_error(err, RoundRepositoryError::query))
}

fn next_round_number(highest: Option<i32>) -> i32 {
    highest.map_or(1, |n| n.saturating_add(1))
}

#[async_trait]
impl RoundRepository for DieselRoundRepository {
    async fn start_round(&self, round: &NewRound) -> Result<Round, RoundRepositoryError> {
        let duration = to_db_int(round.duration.minutes()).map_err(RoundRepositoryError::query)?;
        let startup_id = *round.startup_id.as_uuid();
        let starts_at = round.starts_at;
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = conn
            .transaction(|conn| {
                async move {
                    diesel::sql_query(LOCK_ROUNDS_SQL).execute(conn).await?;

                    let highest: Option<i32> = rounds::table
                        .select(max(rounds::current_round_number))
                        .first(conn)
                        .await?;

                    let deactivated = diesel::update(rounds::table.filter(rounds::is_active))
                        .set((
                            rounds::is_active.eq(false),
                            rounds::updated_at.eq(starts_at),
                        ))
                        .execute(conn)
                        .await?;
                    debug!(deactivated, "previous rounds deactivated");

                    let new_row = RoundRow {
                        id: *RoundId::random().as_uuid(),
                        current_round_number: next_round_number(highest),
                        duration_minutes: duration,
                        starts_at,
                        is_active: true,
                        startup_id: Some(startup_id),
                        created_at: starts_at,
                        updated_at: starts_at,
                    };
                    diesel::insert_into(rounds::table)
                        .values(&new_row)
                        .returning(RoundRow::as_returning())
                        .get_result(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_start_error(err, &round.startup_id))?;

        decode(row)
    }

    async fn stop_round(
        &self,
        id: &RoundId,
        at: DateTime<Utc>,
    ) -> Result<Option<Round>, RoundRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::update(rounds::table.find(id.as_uuid()))
            .set((rounds::is_active.eq(false), rounds::updated_at.eq(at)))
            .returning(RoundRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(decode)
            .transpose()
    }

    async fn find_active(&self) -> Result<Option<Round>, RoundRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        rounds::table
            .filter(rounds::is_active)
            .order((rounds::created_at.desc(), rounds::current_round_number.desc()))
            .select(RoundRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(decode)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<Round>, RoundRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<RoundRow> = rounds::table
            .order((rounds::created_at.desc(), rounds::current_round_number.desc()))
            .select(RoundRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(decode).collect()
    }
}
