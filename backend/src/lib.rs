//! Backend for the startup pitch matchmaking dashboard.
//!
//! The crate follows a hexagonal layout: [`domain`] holds the entities,
//! ports and services; [`outbound`] implements the driven ports; [`inbound`]
//! exposes the REST and WebSocket surface; the binary wires them together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
