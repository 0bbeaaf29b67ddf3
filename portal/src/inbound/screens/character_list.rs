//! Searchable, paginated character listing.
//!
//! Each fetch takes a ticket from a [`LatestQuery`]; a completion whose
//! ticket has been superseded is dropped, so the state always reflects the
//! most recent page/filter request. [`CharacterListScreen::unmount`] drops
//! every pending completion.

use std::sync::{Arc, Mutex};

use pagination::{PageMarker, PageNumber, compute_range};
use tracing::warn;

use super::{lock, messages};
use crate::domain::catalog::{CatalogPage, ResourceId};
use crate::domain::{CatalogClient, LatestQuery, Route};

/// Everything the listing renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterListState {
    /// Search box contents as typed.
    pub search_input: String,
    /// Filter of the listing being shown; `None` lists everyone.
    pub applied_filter: Option<String>,
    /// Page being shown or requested.
    pub page: PageNumber,
    /// Most recent listing received.
    pub listing: Option<Arc<CatalogPage>>,
    /// Message for the most recent failure.
    pub error: Option<String>,
    /// A request for the current page/filter is in flight.
    pub is_fetching: bool,
}

impl Default for CharacterListState {
    fn default() -> Self {
        Self {
            search_input: String::new(),
            applied_filter: None,
            page: PageNumber::FIRST,
            listing: None,
            error: None,
            is_fetching: false,
        }
    }
}

impl CharacterListState {
    /// Total pages of the listing shown, zero before the first response.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.listing.as_ref().map_or(0, |listing| listing.total_pages)
    }

    /// Message for an empty result, if the listing is empty.
    #[must_use]
    pub fn empty_notice(&self) -> Option<&'static str> {
        self.listing
            .as_ref()
            .filter(|listing| listing.is_empty())
            .map(|_| messages::NO_CHARACTERS)
    }
}

/// View model for `/characters`.
pub struct CharacterListScreen {
    client: Arc<CatalogClient>,
    radius: u32,
    latest: LatestQuery,
    state: Mutex<CharacterListState>,
}

impl CharacterListScreen {
    /// Screen on page 1 with no filter; call [`Self::load`] to fetch.
    pub fn new(client: Arc<CatalogClient>, radius: u32) -> Self {
        Self {
            client,
            radius,
            latest: LatestQuery::default(),
            state: Mutex::new(CharacterListState::default()),
        }
    }

    /// Current screen state.
    #[must_use]
    pub fn state(&self) -> CharacterListState {
        lock(&self.state).clone()
    }

    /// Replace the search box contents without searching.
    pub fn set_search_input(&self, input: impl Into<String>) {
        lock(&self.state).search_input = input.into();
    }

    /// Pager markers for the listing shown.
    #[must_use]
    pub fn markers(&self) -> Vec<PageMarker> {
        let state = lock(&self.state);
        compute_range(state.page.get(), state.total_pages(), self.radius)
    }

    /// Route for a character card.
    #[must_use]
    pub fn character_route(&self, id: &ResourceId) -> Route {
        Route::CharacterDetail(id.clone())
    }

    /// Fetch the current page and filter.
    pub async fn load(&self) {
        let (page, filter) = {
            let state = lock(&self.state);
            (state.page, state.applied_filter.clone())
        };
        self.fetch(page, filter).await;
    }

    /// Apply the trimmed search box contents and return to page 1.
    pub async fn submit_search(&self) {
        let filter = {
            let mut state = lock(&self.state);
            let trimmed = state.search_input.trim();
            let filter = (!trimmed.is_empty()).then(|| trimmed.to_owned());
            state.applied_filter.clone_from(&filter);
            state.page = PageNumber::FIRST;
            filter
        };
        self.fetch(PageNumber::FIRST, filter).await;
    }

    /// Jump to `page`, clamped to the known page count.
    pub async fn go_to_page(&self, page: PageNumber) {
        let (page, filter) = {
            let mut state = lock(&self.state);
            let total = state.total_pages();
            let target = if total == 0 { page } else { page.clamp_to(total) };
            state.page = target;
            (target, state.applied_filter.clone())
        };
        self.fetch(page, filter).await;
    }

    /// Advance one page; no-op on the last page.
    pub async fn next_page(&self) {
        let next = {
            let state = lock(&self.state);
            state.page.next_within(state.total_pages())
        };
        if let Some(page) = next {
            self.go_to_page(page).await;
        }
    }

    /// Go back one page; no-op on the first page.
    pub async fn previous_page(&self) {
        let previous = lock(&self.state).page.previous();
        if let Some(page) = previous {
            self.go_to_page(page).await;
        }
    }

    /// Drop every pending completion.
    pub fn unmount(&self) {
        self.latest.cancel();
        lock(&self.state).is_fetching = false;
    }

    async fn fetch(&self, page: PageNumber, filter: Option<String>) {
        let ticket = self.latest.issue();
        {
            let mut state = lock(&self.state);
            state.is_fetching = true;
            state.error = None;
        }

        let result = self.client.list_characters(page, filter.as_deref()).await;

        let mut state = lock(&self.state);
        if !self.latest.is_current(ticket) {
            return;
        }
        state.is_fetching = false;
        match result {
            Ok(listing) => state.listing = Some(listing),
            Err(error) => {
                warn!(%error, page = page.get(), "character listing failed");
                state.listing = None;
                state.error = Some(messages::LIST_FAILED.to_owned());
            }
        }
    }
}
