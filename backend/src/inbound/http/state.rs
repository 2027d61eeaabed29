//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AccountCommand, AccountQuery, AssetLibrary, InsightsQuery, InvestorDirectory, LoginService,
    RoundCommand, RoundQuery, SelectionCommand, SelectionQuery, StartupCommand, StartupQuery,
};

/// Parameter object bundling every port implementation used by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub account: Arc<dyn AccountQuery>,
    pub account_command: Arc<dyn AccountCommand>,
    pub investors: Arc<dyn InvestorDirectory>,
    pub startups: Arc<dyn StartupCommand>,
    pub startups_query: Arc<dyn StartupQuery>,
    pub rounds: Arc<dyn RoundCommand>,
    pub rounds_query: Arc<dyn RoundQuery>,
    pub selections: Arc<dyn SelectionCommand>,
    pub selections_query: Arc<dyn SelectionQuery>,
    pub insights: Arc<dyn InsightsQuery>,
    pub assets: Arc<dyn AssetLibrary>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub account: Arc<dyn AccountQuery>,
    pub account_command: Arc<dyn AccountCommand>,
    pub investors: Arc<dyn InvestorDirectory>,
    pub startups: Arc<dyn StartupCommand>,
    pub startups_query: Arc<dyn StartupQuery>,
    pub rounds: Arc<dyn RoundCommand>,
    pub rounds_query: Arc<dyn RoundQuery>,
    pub selections: Arc<dyn SelectionCommand>,
    pub selections_query: Arc<dyn SelectionQuery>,
    pub insights: Arc<dyn InsightsQuery>,
    pub assets: Arc<dyn AssetLibrary>,
    /// Reference time for countdown fields in responses.
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Construct state from a ports bundle and the clock used for countdowns.
    pub fn new(ports: HttpStatePorts, clock: Arc<dyn Clock>) -> Self {
        let HttpStatePorts {
            login,
            account,
            account_command,
            investors,
            startups,
            startups_query,
            rounds,
            rounds_query,
            selections,
            selections_query,
            insights,
            assets,
        } = ports;
        Self {
            login,
            account,
            account_command,
            investors,
            startups,
            startups_query,
            rounds,
            rounds_query,
            selections,
            selections_query,
            insights,
            assets,
            clock,
        }
    }
}
