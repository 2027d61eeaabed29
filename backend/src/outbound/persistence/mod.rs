//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the repository ports backed by PostgreSQL via
//! `diesel-async` with `bb8` pooling.
//!
//! - **Thin adapters**: repositories translate between Diesel rows and
//!   domain types. Relational rules (cascades, the single live round index)
//!   live in the migrations.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Typed errors**: every failure is mapped onto the owning port's error.
//!
//! # Example
//!
//! ```ignore
//! use pitchmatch::outbound::persistence::{DbPool, DieselRoundRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/pitchmatch")).await?;
//! let rounds = DieselRoundRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_identity_repository;
mod diesel_profile_repository;
mod diesel_round_repository;
mod diesel_selection_repository;
mod diesel_startup_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_identity_repository::DieselIdentityRepository;
pub use diesel_profile_repository::DieselProfileRepository;
pub use diesel_round_repository::DieselRoundRepository;
pub use diesel_selection_repository::DieselSelectionRepository;
pub use diesel_startup_repository::DieselStartupRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
