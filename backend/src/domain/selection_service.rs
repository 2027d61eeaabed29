//! Investor selections.
//!
//! Selections are partitioned per investor, so no cross-investor locking is
//! needed. Each mark records the round live at the time, if any.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    ChangeFeed, RoundRepository, SelectionCommand, SelectionQuery, SelectionRepository,
    SelectionRepositoryError, StartupRepository,
};
use crate::domain::round_service::map_round_error;
use crate::domain::startup_service::map_startup_error;
use crate::domain::{
    ChangeEvent, ChangeKind, ChangeTable, Error, ProfileId, SelectedStartup, Selection,
    StartupId, ToggleOutcome,
};

pub(crate) fn map_selection_error(error: SelectionRepositoryError) -> Error {
    match error {
        SelectionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("selection store unavailable: {message}"))
        }
        SelectionRepositoryError::Query { message } => {
            Error::internal(format!("selection store error: {message}"))
        }
    }
}

/// Selection service implementing both selection driving ports.
#[derive(Clone)]
pub struct SelectionService<Sel, S, R> {
    selections: Arc<Sel>,
    startups: Arc<S>,
    rounds: Arc<R>,
    feed: Arc<dyn ChangeFeed>,
    clock: Arc<dyn Clock>,
}

impl<Sel, S, R> SelectionService<Sel, S, R> {
    /// Selections are validated against the startup and round stores.
    pub fn new(
        selections: Arc<Sel>,
        startups: Arc<S>,
        rounds: Arc<R>,
        feed: Arc<dyn ChangeFeed>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            selections,
            startups,
            rounds,
            feed,
            clock,
        }
    }

    fn publish(&self, kind: ChangeKind) {
        self.feed
            .publish(ChangeEvent::new(ChangeTable::Selections, kind));
    }
}

impl<Sel, S, R> SelectionService<Sel, S, R>
where
    Sel: SelectionRepository,
    S: StartupRepository,
    R: RoundRepository,
{
    async fn mark(
        &self,
        investor_id: &ProfileId,
        startup_id: &StartupId,
    ) -> Result<Selection, Error> {
        if self
            .startups
            .find_by_id(startup_id)
            .await
            .map_err(map_startup_error)?
            .is_none()
        {
            return Err(Error::not_found(format!("startup {startup_id} not found")));
        }
        let round_id = self
            .rounds
            .find_active()
            .await
            .map_err(map_round_error)?
            .map(|round| round.id);
        let selection = Selection::mark(*investor_id, *startup_id, round_id, self.clock.utc());
        self.selections
            .upsert(&selection)
            .await
            .map_err(map_selection_error)?;
        debug!(investor_id = %investor_id, startup_id = %startup_id, "startup selected");
        Ok(selection)
    }
}

#[async_trait]
impl<Sel, S, R> SelectionCommand for SelectionService<Sel, S, R>
where
    Sel: SelectionRepository,
    S: StartupRepository,
    R: RoundRepository,
{
    async fn toggle(
        &self,
        investor_id: &ProfileId,
        startup_id: &StartupId,
    ) -> Result<ToggleOutcome, Error> {
        let existing = self
            .selections
            .find(investor_id, startup_id)
            .await
            .map_err(map_selection_error)?;
        if existing.is_some() {
            self.selections
                .delete(investor_id, startup_id)
                .await
                .map_err(map_selection_error)?;
            self.publish(ChangeKind::Delete);
            return Ok(ToggleOutcome { selected: false });
        }
        self.mark(investor_id, startup_id).await?;
        self.publish(ChangeKind::Insert);
        Ok(ToggleOutcome { selected: true })
    }

    async fn select(
        &self,
        investor_id: &ProfileId,
        startup_id: &StartupId,
    ) -> Result<Selection, Error> {
        let selection = self.mark(investor_id, startup_id).await?;
        self.publish(ChangeKind::Insert);
        Ok(selection)
    }

    async fn deselect(
        &self,
        investor_id: &ProfileId,
        startup_id: &StartupId,
    ) -> Result<(), Error> {
        let removed = self
            .selections
            .delete(investor_id, startup_id)
            .await
            .map_err(map_selection_error)?;
        if removed {
            self.publish(ChangeKind::Delete);
        }
        Ok(())
    }
}

#[async_trait]
impl<Sel, S, R> SelectionQuery for SelectionService<Sel, S, R>
where
    Sel: SelectionRepository,
    S: StartupRepository,
    R: RoundRepository,
{
    async fn selected(&self, investor_id: &ProfileId) -> Result<Vec<SelectedStartup>, Error> {
        let selections = self
            .selections
            .list_for_investor(investor_id)
            .await
            .map_err(map_selection_error)?;
        let startups: HashMap<StartupId, _> = self
            .startups
            .list()
            .await
            .map_err(map_startup_error)?
            .into_iter()
            .map(|startup| (startup.id, startup))
            .collect();
        Ok(selections
            .into_iter()
            .filter(|selection| selection.is_top_selected)
            .filter_map(|selection| {
                startups
                    .get(&selection.startup_id)
                    .map(|startup| SelectedStartup {
                        startup: startup.clone(),
                        round_id: selection.round_id,
                        selected_at: selection.created_at,
                    })
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "selection_service_tests.rs"]
mod tests;
