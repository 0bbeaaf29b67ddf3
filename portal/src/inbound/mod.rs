//! Inbound side of the portal: what a UI layer drives.
//!
//! - **screens**: headless view models for every route plus the navigation
//!   chrome
//! - **shell**: the application shell that wires adapters, owns the identity
//!   gate subscription, and resolves navigation requests through the guard

pub mod screens;
pub mod shell;

pub use shell::AppShell;
