//! In-process change feed on a Tokio broadcast channel.

use tokio::sync::broadcast;
use tracing::trace;

use crate::domain::ChangeEvent;
use crate::domain::ports::ChangeFeed;

/// Events buffered per subscriber before it starts lagging.
pub const DEFAULT_FEED_CAPACITY: usize = 256;

/// Broadcast-backed [`ChangeFeed`].
///
/// Slow subscribers observe `RecvError::Lagged` and are expected to re-fetch.
#[derive(Debug, Clone)]
pub struct BroadcastChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl BroadcastChangeFeed {
    /// `capacity` events are buffered per subscriber before it lags.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }
}

impl Default for BroadcastChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

impl ChangeFeed for BroadcastChangeFeed {
    fn publish(&self, event: ChangeEvent) {
        // Sending only fails when nobody is listening.
        let receivers = self.sender.send(event).unwrap_or(0);
        trace!(%event, receivers, "change published");
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChangeKind, ChangeTable};
    use rstest::rstest;
    use tokio::sync::broadcast::error::RecvError;

    #[rstest]
    #[tokio::test]
    async fn subscribers_receive_events_published_after_subscribing() {
        let feed = BroadcastChangeFeed::default();
        feed.publish(ChangeEvent::new(ChangeTable::Rounds, ChangeKind::Insert));
        let mut rx = feed.subscribe();
        let event = ChangeEvent::new(ChangeTable::Startups, ChangeKind::Delete);
        feed.publish(event);
        assert_eq!(rx.recv().await.expect("event"), event);
    }

    #[rstest]
    #[tokio::test]
    async fn slow_subscribers_lag() {
        let feed = BroadcastChangeFeed::new(2);
        let mut rx = feed.subscribe();
        for _ in 0..4 {
            feed.publish(ChangeEvent::new(ChangeTable::Selections, ChangeKind::Insert));
        }
        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(2))));
    }

    #[rstest]
    fn publishing_without_subscribers_is_silent() {
        BroadcastChangeFeed::default()
            .publish(ChangeEvent::new(ChangeTable::Rounds, ChangeKind::Update));
    }
}
