//! Token cache adapters.
//!
//! `FileTokenCache` keeps the session tokens in a JSON file so sessions
//! survive restarts; `InMemoryTokenCache` keeps them for the current process
//! only and backs the tests.

mod atomic_io;
mod file;
mod memory;

pub use file::{FileTokenCache, SessionFileError};
pub use memory::InMemoryTokenCache;
