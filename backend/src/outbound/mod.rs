//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: in-process repositories used without a database and in tests
//! - **storage**: capability-scoped local file store for uploaded assets
//! - **live**: in-process broadcast change feed
//! - **password**: Argon2id hashing shared by the identity adapters
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod live;
pub mod memory;
pub mod password;
pub mod persistence;
pub mod storage;
