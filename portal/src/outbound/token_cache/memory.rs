//! In-memory token cache.

use std::sync::{Mutex, PoisonError};

use crate::domain::ports::{CachedTokens, TokenCache};

/// Holds the most recent session tokens in process memory.
#[derive(Default)]
pub struct InMemoryTokenCache {
    tokens: Mutex<Option<CachedTokens>>,
}

impl InMemoryTokenCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenCache for InMemoryTokenCache {
    fn load(&self) -> Option<CachedTokens> {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store(&self, tokens: CachedTokens) {
        *self.tokens.lock().unwrap_or_else(PoisonError::into_inner) = Some(tokens);
    }

    fn clear(&self) {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    fn has_token(&self) -> bool {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
