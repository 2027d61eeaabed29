//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`AssetStorage`], [`ChangeFeed`]) are
//! implemented by outbound adapters. Driving ports are implemented by the
//! domain services and called by the HTTP and WebSocket adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account;
mod asset_library;
mod asset_storage;
mod change_feed;
mod identity_repository;
mod insights_query;
mod investor_directory;
mod login_service;
mod profile_repository;
mod round_repository;
mod rounds;
mod selection_repository;
mod selections;
mod startup_repository;
mod startups;

#[cfg(test)]
pub use account::{MockAccountCommand, MockAccountQuery};
pub use account::{AccountCommand, AccountQuery};
#[cfg(test)]
pub use asset_library::MockAssetLibrary;
pub use asset_library::AssetLibrary;
#[cfg(test)]
pub use asset_storage::MockAssetStorage;
pub use asset_storage::{AssetStorage, AssetStorageError};
#[cfg(test)]
pub use change_feed::MockChangeFeed;
pub use change_feed::ChangeFeed;
#[cfg(test)]
pub use identity_repository::MockIdentityRepository;
pub use identity_repository::{IdentityRepository, IdentityRepositoryError};
#[cfg(test)]
pub use insights_query::MockInsightsQuery;
pub use insights_query::InsightsQuery;
#[cfg(test)]
pub use investor_directory::MockInvestorDirectory;
pub use investor_directory::InvestorDirectory;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{ProfileRepository, ProfileRepositoryError};
#[cfg(test)]
pub use round_repository::MockRoundRepository;
pub use round_repository::{RoundRepository, RoundRepositoryError};
#[cfg(test)]
pub use rounds::{MockRoundCommand, MockRoundQuery};
pub use rounds::{RoundCommand, RoundQuery};
#[cfg(test)]
pub use selection_repository::MockSelectionRepository;
pub use selection_repository::{SelectionRepository, SelectionRepositoryError};
#[cfg(test)]
pub use selections::{MockSelectionCommand, MockSelectionQuery};
pub use selections::{SelectionCommand, SelectionQuery};
#[cfg(test)]
pub use startup_repository::MockStartupRepository;
pub use startup_repository::{StartupRepository, StartupRepositoryError};
#[cfg(test)]
pub use startups::{MockStartupCommand, MockStartupQuery};
pub use startups::{StartupCommand, StartupQuery};
