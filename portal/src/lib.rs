//! Catalog portal: a headless client for browsing the Rick and Morty
//! catalog behind email/password sign-in.
//!
//! The crate is organised hexagonally:
//!
//! - [`domain`]: validation, session state, the identity gate, the route
//!   guard, and the cached catalog client, plus the ports they depend on.
//! - [`outbound`]: reqwest-backed adapters for the catalog and the identity
//!   provider, an in-memory identity fixture, and the session-token stores.
//! - [`inbound`]: headless screens and the application shell a UI drives.
//! - [`config`] and [`telemetry`]: settings loading and log setup.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod telemetry;

pub use config::{ConfigError, PortalSettings};
pub use inbound::AppShell;
