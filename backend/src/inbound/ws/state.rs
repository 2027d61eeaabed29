//! Shared WebSocket adapter state.
//!
//! The adapter depends on driving ports only, so sockets can be exercised
//! against the in-memory world as easily as against Postgres.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{AccountQuery, ChangeFeed, RoundQuery};
use crate::inbound::ws::origin::AllowedOrigins;

/// Dependency bundle for the `/ws` entry point and its sessions.
#[derive(Clone)]
pub struct WsState {
    pub account: Arc<dyn AccountQuery>,
    pub rounds: Arc<dyn RoundQuery>,
    pub feed: Arc<dyn ChangeFeed>,
    pub clock: Arc<dyn Clock>,
    pub origins: AllowedOrigins,
}

impl WsState {
    pub fn new(
        account: Arc<dyn AccountQuery>,
        rounds: Arc<dyn RoundQuery>,
        feed: Arc<dyn ChangeFeed>,
        clock: Arc<dyn Clock>,
        origins: AllowedOrigins,
    ) -> Self {
        Self {
            account,
            rounds,
            feed,
            clock,
            origins,
        }
    }
}
