//! Admin insights assembled from the repository ports.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::account_service::map_profile_error;
use crate::domain::ports::{
    InsightsQuery, ProfileRepository, RoundRepository, SelectionRepository, StartupRepository,
};
use crate::domain::round_service::map_round_error;
use crate::domain::selection_service::map_selection_error;
use crate::domain::startup_service::map_startup_error;
use crate::domain::{Dashboard, Error, InsightsSnapshot, InvestorMatches, Role};

/// Read-only service computing dashboard aggregates.
#[derive(Clone)]
pub struct InsightsService<P, S, Sel, R> {
    profiles: Arc<P>,
    startups: Arc<S>,
    selections: Arc<Sel>,
    rounds: Arc<R>,
}

impl<P, S, Sel, R> InsightsService<P, S, Sel, R> {
    /// Read-only view over every store the aggregates draw on.
    pub fn new(profiles: Arc<P>, startups: Arc<S>, selections: Arc<Sel>, rounds: Arc<R>) -> Self {
        Self {
            profiles,
            startups,
            selections,
            rounds,
        }
    }
}

impl<P, S, Sel, R> InsightsService<P, S, Sel, R>
where
    P: ProfileRepository,
    S: StartupRepository,
    Sel: SelectionRepository,
    R: RoundRepository,
{
    async fn snapshot(&self) -> Result<InsightsSnapshot, Error> {
        let (investors, startups, selections, rounds) = tokio::try_join!(
            async {
                self.profiles
                    .list_by_role(Role::Investor)
                    .await
                    .map_err(map_profile_error)
            },
            async { self.startups.list().await.map_err(map_startup_error) },
            async { self.selections.list_all().await.map_err(map_selection_error) },
            async { self.rounds.list().await.map_err(map_round_error) },
        )?;
        Ok(InsightsSnapshot {
            investors,
            startups,
            selections,
            rounds,
        })
    }
}

#[async_trait]
impl<P, S, Sel, R> InsightsQuery for InsightsService<P, S, Sel, R>
where
    P: ProfileRepository,
    S: StartupRepository,
    Sel: SelectionRepository,
    R: RoundRepository,
{
    async fn dashboard(&self) -> Result<Dashboard, Error> {
        Ok(Dashboard::compute(&self.snapshot().await?))
    }

    async fn matchmaking(&self) -> Result<Vec<InvestorMatches>, Error> {
        Ok(InvestorMatches::compute(&self.snapshot().await?))
    }
}
