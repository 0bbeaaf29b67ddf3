//! Identity provider outbound adapters.
//!
//! `FirebaseIdentityProvider` talks to the hosted Identity Toolkit REST API;
//! `FixtureIdentityProvider` keeps accounts in memory for local runs and
//! tests. Both publish auth-state changes through `AuthStateBroadcaster`.

mod broadcaster;
mod dto;
mod firebase;
mod fixture;

pub use broadcaster::AuthStateBroadcaster;
pub use firebase::FirebaseIdentityProvider;
pub use fixture::{FixtureIdentityProvider, OutboxEntry, OutboxKind};
