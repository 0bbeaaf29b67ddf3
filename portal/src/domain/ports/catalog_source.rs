//! Driven port for reading the remote catalog.
//!
//! The domain owns the query shape and the record types so the cached client
//! and the screens stay adapter-agnostic.

use async_trait::async_trait;
use pagination::PageNumber;

use super::define_port_error;
use crate::domain::catalog::{
    CatalogPage, CharacterDetail, CharacterSummary, EpisodeDetail, LocationDetail, ResourceId,
};

/// Parameters for one page of the character listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharacterQuery {
    /// Requested page.
    pub page: PageNumber,
    /// Optional name filter, already trimmed and never blank.
    pub name: Option<String>,
}

impl CharacterQuery {
    /// Build a query, normalising blank filters to `None`.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageNumber;
    /// use portal::domain::ports::CharacterQuery;
    ///
    /// let query = CharacterQuery::new(PageNumber::FIRST, Some("  "));
    /// assert_eq!(query.name, None);
    /// ```
    #[must_use]
    pub fn new(page: PageNumber, name: Option<&str>) -> Self {
        let filter = name
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);
        Self { page, name: filter }
    }
}

define_port_error! {
    /// Errors surfaced while reading the catalog.
    pub enum FetchError {
        /// The catalog has no resource (or no matches) for the request.
        NotFound { message: String } =>
            "catalog resource not found: {message}",
        /// The request never produced a response.
        Network { message: String } =>
            "catalog unreachable: {message}",
        /// Any other failure: unexpected status, undecodable body, or a
        /// broken local invariant.
        Other { message: String } =>
            "catalog request failed: {message}",
    }
}

impl FetchError {
    /// Return `true` for [`FetchError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Port for reading characters, episodes, and locations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch one page of characters.
    ///
    /// Remote "no results" responses surface as [`FetchError::NotFound`];
    /// mapping them to an empty page is the caller's decision.
    async fn fetch_character_page(&self, query: &CharacterQuery)
    -> Result<CatalogPage, FetchError>;

    /// Fetch one character.
    async fn fetch_character(&self, id: &ResourceId) -> Result<CharacterDetail, FetchError>;

    /// Fetch one episode.
    async fn fetch_episode(&self, id: &ResourceId) -> Result<EpisodeDetail, FetchError>;

    /// Fetch one location.
    async fn fetch_location(&self, id: &ResourceId) -> Result<LocationDetail, FetchError>;

    /// Fetch several characters in one request.
    ///
    /// Implementations return one summary per id the catalog knows, whether
    /// the remote answered with a single object or an array.
    async fn fetch_characters(
        &self,
        ids: &[ResourceId],
    ) -> Result<Vec<CharacterSummary>, FetchError>;
}
