//! Keeps a client's view of the active round current.
//!
//! The follower listens to the change feed and, on any round or startup
//! change, re-fetches the active round in full. Events are treated as "go
//! look" hints; row payloads are never applied incrementally, so missed or
//! coalesced events cannot leave the view inconsistent.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::ports::{ChangeFeed, RoundQuery};
use crate::domain::{ActiveRound, ChangeEvent, Error};

/// Latest active round together with the change that prompted the fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRoundUpdate {
    /// `None` for the initial fetch and for re-fetches after lagging.
    pub trigger: Option<ChangeEvent>,
    pub active: Option<ActiveRound>,
}

/// Background task mirroring the active round into a `watch` channel.
///
/// Dropping the follower stops the task.
pub struct ActiveRoundFollower {
    updates: watch::Receiver<ActiveRoundUpdate>,
    task: JoinHandle<()>,
}

impl ActiveRoundFollower {
    /// Subscribe to `feed`, fetch the current state, then follow changes.
    ///
    /// The subscription is taken before the first fetch so no change between
    /// the two is lost.
    pub async fn spawn(query: Arc<dyn RoundQuery>, feed: &dyn ChangeFeed) -> Result<Self, Error> {
        let mut events = feed.subscribe();
        let initial = query.active().await?;
        let (sender, updates) = watch::channel(ActiveRoundUpdate {
            trigger: None,
            active: initial,
        });

        let task = tokio::spawn(async move {
            loop {
                let trigger = match events.recv().await {
                    Ok(event) if event.affects_active_round() => Some(event),
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "change feed lagged; re-fetching active round");
                        None
                    }
                    Err(RecvError::Closed) => break,
                };
                match query.active().await {
                    Ok(active) => {
                        if sender.send(ActiveRoundUpdate { trigger, active }).is_err() {
                            break;
                        }
                    }
                    Err(error) => warn!(%error, "active round re-fetch failed"),
                }
            }
        });

        Ok(Self { updates, task })
    }

    /// A receiver that sees every subsequent snapshot.
    pub fn subscribe(&self) -> watch::Receiver<ActiveRoundUpdate> {
        self.updates.clone()
    }

    /// The most recent snapshot.
    pub fn current(&self) -> ActiveRoundUpdate {
        self.updates.borrow().clone()
    }
}

impl Drop for ActiveRoundFollower {
    fn drop(&mut self) {
        self.task.abort();
    }
}
