//! Cached, de-duplicated reads against the catalog.
//!
//! Every successful response is kept for the lifetime of the client; the
//! catalog is read-only, so entries never expire. Concurrent requests for
//! the same [`CacheKey`] share one in-flight fetch. Failures are not cached:
//! the next request for the key fetches again.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use pagination::PageNumber;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::domain::catalog::{
    CatalogPage, CharacterSummary, DetailRecord, ResourceId, ResourceKind,
};
use crate::domain::ports::{CatalogSource, CharacterQuery, FetchError};

/// Identity of one cached response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// One page of the character listing for a normalised filter.
    CharacterPage(CharacterQuery),
    /// One detail record.
    Detail {
        /// Record kind.
        kind: ResourceKind,
        /// Record id.
        id: ResourceId,
    },
    /// A batched character lookup, keyed by the ids in request order.
    CharacterBatch(Vec<ResourceId>),
}

type Slot<T> = Arc<OnceCell<Arc<T>>>;

struct CacheTable<T> {
    slots: Mutex<HashMap<CacheKey, Slot<T>>>,
}

impl<T> Default for CacheTable<T> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> CacheTable<T> {
    fn slot(&self, key: &CacheKey) -> Result<Slot<T>, FetchError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| FetchError::other("catalog cache lock poisoned"))?;
        Ok(Arc::clone(slots.entry(key.clone()).or_default()))
    }

    fn holds(&self, key: &CacheKey) -> bool {
        self.slots
            .lock()
            .map(|slots| slots.get(key).is_some_and(|slot| slot.initialized()))
            .unwrap_or(false)
    }

    async fn get_or_fetch<F, Fut>(&self, key: CacheKey, fetch: F) -> Result<Arc<T>, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let slot = self.slot(&key)?;
        if let Some(value) = slot.get() {
            debug!(?key, "catalog cache hit");
            return Ok(Arc::clone(value));
        }
        let value = slot
            .get_or_try_init(|| async {
                debug!(?key, "catalog cache miss; fetching");
                fetch().await.map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(value))
    }
}

/// Read-through cache in front of a [`CatalogSource`].
pub struct CatalogClient {
    source: Arc<dyn CatalogSource>,
    pages: CacheTable<CatalogPage>,
    details: CacheTable<DetailRecord>,
    batches: CacheTable<Vec<CharacterSummary>>,
}

impl CatalogClient {
    /// Create a client with an empty cache.
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            pages: CacheTable::default(),
            details: CacheTable::default(),
            batches: CacheTable::default(),
        }
    }

    /// Fetch one page of characters, optionally filtered by name.
    ///
    /// Blank filters are ignored and filters are trimmed. A filter the
    /// catalog cannot match yields an empty page rather than an error.
    ///
    /// # Errors
    ///
    /// Returns the source's [`FetchError`] for anything other than "not
    /// found".
    pub async fn list_characters(
        &self,
        page: PageNumber,
        name_filter: Option<&str>,
    ) -> Result<Arc<CatalogPage>, FetchError> {
        let query = CharacterQuery::new(page, name_filter);
        let key = CacheKey::CharacterPage(query.clone());
        self.pages
            .get_or_fetch(key, || async move {
                match self.source.fetch_character_page(&query).await {
                    Err(error) if error.is_not_found() => {
                        debug!(page = query.page.get(), filter = ?query.name, "no characters matched");
                        Ok(CatalogPage::empty(query.page))
                    }
                    other => other,
                }
            })
            .await
    }

    /// Fetch one character, episode, or location.
    ///
    /// # Errors
    ///
    /// Returns the source's [`FetchError`], including "not found".
    pub async fn get_detail(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
    ) -> Result<Arc<DetailRecord>, FetchError> {
        let key = CacheKey::Detail {
            kind,
            id: id.clone(),
        };
        self.details
            .get_or_fetch(key, || async move {
                match kind {
                    ResourceKind::Character => self
                        .source
                        .fetch_character(id)
                        .await
                        .map(DetailRecord::Character),
                    ResourceKind::Episode => self
                        .source
                        .fetch_episode(id)
                        .await
                        .map(DetailRecord::Episode),
                    ResourceKind::Location => self
                        .source
                        .fetch_location(id)
                        .await
                        .map(DetailRecord::Location),
                }
            })
            .await
    }

    /// Resolve character references in one batched request.
    ///
    /// An empty `ids` slice returns an empty list without contacting the
    /// source.
    ///
    /// # Errors
    ///
    /// Returns the source's [`FetchError`].
    pub async fn resolve_references(
        &self,
        ids: &[ResourceId],
    ) -> Result<Arc<Vec<CharacterSummary>>, FetchError> {
        if ids.is_empty() {
            return Ok(Arc::new(Vec::new()));
        }
        let key = CacheKey::CharacterBatch(ids.to_vec());
        self.batches
            .get_or_fetch(key, || self.source.fetch_characters(ids))
            .await
    }

    /// Return `true` when a successful response for `key` is cached.
    #[must_use]
    pub fn is_cached(&self, key: &CacheKey) -> bool {
        match key {
            CacheKey::CharacterPage(_) => self.pages.holds(key),
            CacheKey::Detail { .. } => self.details.holds(key),
            CacheKey::CharacterBatch(_) => self.batches.holds(key),
        }
    }
}

#[cfg(test)]
mod tests;
