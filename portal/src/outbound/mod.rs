//! Outbound adapters implementing domain ports for external services.
//!
//! - **catalog**: reqwest-backed reads against the catalog REST API
//! - **identity**: the hosted identity provider and an in-memory fixture
//! - **token_cache**: the session file and an in-memory stand-in
//!
//! Adapters are thin translators between domain types and wire formats.
//! They contain no business logic.

pub mod catalog;
pub mod identity;
pub mod token_cache;

/// Whitespace-compacted, length-capped preview of a response body for
/// error messages.
pub(crate) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
