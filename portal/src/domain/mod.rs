//! Domain primitives, services, and ports.
//!
//! Purpose: keep the portal's rules free of transport and rendering
//! concerns. Adapters live in `crate::outbound`, screens in
//! `crate::inbound`.
//!
//! Public surface:
//! - `validation`: email/password predicates and validated credentials.
//! - `session`: who is signed in and whether that is known yet.
//! - `identity_gate`: the observable auth state plus account operations.
//! - `routing`: route table and the guard that decides what renders.
//! - `catalog` / `catalog_client`: read-only catalog records and the cached
//!   client that fetches them.
//! - `query`: latest-wins bookkeeping for screen fetches.

pub mod catalog;
pub mod catalog_client;
pub mod error;
pub mod identity_gate;
pub mod ports;
pub mod query;
pub mod routing;
pub mod session;
pub mod validation;

pub use self::catalog_client::{CacheKey, CatalogClient};
pub use self::error::AuthError;
pub use self::identity_gate::{IdentityGate, SignUpOutcome};
pub use self::query::{LatestQuery, QueryTicket};
pub use self::routing::{GuardDecision, Route, RouteClass, guard, show_navigation};
pub use self::session::{AuthPhase, AuthSnapshot, AuthenticatedUser, Session, UserId};
pub use self::validation::{Credentials, EmailAddress, ValidationError};
