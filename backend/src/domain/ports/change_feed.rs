//! Port for the live change feed.
//!
//! Publishing never fails from the caller's point of view: a feed with no
//! subscribers simply drops the event.

use tokio::sync::broadcast;

use crate::domain::ChangeEvent;

/// Fan-out channel for row-change notifications.
#[cfg_attr(test, mockall::automock)]
pub trait ChangeFeed: Send + Sync {
    /// Notify current subscribers of a change.
    fn publish(&self, event: ChangeEvent);

    /// Receive every event published from now on.
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;
}
