//! Driving port for admin insights.

use async_trait::async_trait;

use crate::domain::{Dashboard, Error, InvestorMatches};

/// Aggregated views for the admin dashboard pages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InsightsQuery: Send + Sync {
    async fn dashboard(&self) -> Result<Dashboard, Error>;

    /// Every investor with their selected startups.
    async fn matchmaking(&self) -> Result<Vec<InvestorMatches>, Error>;
}
