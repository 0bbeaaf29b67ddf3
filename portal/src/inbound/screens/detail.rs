//! Character, episode, and location detail screens.
//!
//! Episode and location screens resolve their cross references (cast and
//! residents) with one batched request once the record itself has loaded.
//! Any failure along the way turns the whole screen into its error state.

use std::sync::{Arc, Mutex};

use tracing::warn;

use super::{lock, messages};
use crate::domain::catalog::{
    CharacterDetail, CharacterSummary, DetailRecord, EpisodeDetail, LocationDetail, ResourceId,
    ResourceKind,
};
use crate::domain::ports::FetchError;
use crate::domain::{CatalogClient, LatestQuery, Route};

/// Lifecycle of a detail screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DetailState<T> {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The record (and its references) arrived.
    Loaded(T),
    /// Something failed; carries the message to render.
    Failed(String),
}

impl<T> DetailState<T> {
    /// Loaded view, if any.
    #[must_use]
    pub const fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(view) => Some(view),
            _ => None,
        }
    }
}

/// Latest-wins slot shared by the three detail screens.
struct DetailSlot<T> {
    latest: LatestQuery,
    state: Mutex<DetailState<T>>,
}

impl<T: Clone> DetailSlot<T> {
    fn new() -> Self {
        Self {
            latest: LatestQuery::default(),
            state: Mutex::new(DetailState::Idle),
        }
    }

    fn state(&self) -> DetailState<T> {
        lock(&self.state).clone()
    }

    async fn run<F>(&self, failure: &'static str, id: &ResourceId, load: F)
    where
        F: Future<Output = Result<T, FetchError>>,
    {
        let ticket = self.latest.issue();
        *lock(&self.state) = DetailState::Loading;

        let result = load.await;

        let mut state = lock(&self.state);
        if !self.latest.is_current(ticket) {
            return;
        }
        *state = match result {
            Ok(view) => DetailState::Loaded(view),
            Err(error) => {
                warn!(%error, %id, "detail screen failed to load");
                DetailState::Failed(failure.to_owned())
            }
        };
    }

    fn unmount(&self) {
        self.latest.cancel();
    }
}

fn unexpected(kind: ResourceKind, record: &DetailRecord) -> FetchError {
    FetchError::other(format!(
        "expected a {kind} record, received a {}",
        record.kind()
    ))
}

/// What the character screen renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterView {
    /// The character.
    pub character: CharacterDetail,
    /// Link to the last known location, when the catalog has one.
    pub location_route: Option<Route>,
    /// Links to the character's episodes, in catalog order.
    pub episode_routes: Vec<Route>,
}

impl CharacterView {
    fn from_detail(character: CharacterDetail) -> Self {
        let location_route = character.location.id.clone().map(Route::LocationDetail);
        let episode_routes = character
            .episode_ids
            .iter()
            .cloned()
            .map(Route::EpisodeDetail)
            .collect();
        Self {
            character,
            location_route,
            episode_routes,
        }
    }
}

/// View model for `/characters/:id`.
pub struct CharacterDetailScreen {
    client: Arc<CatalogClient>,
    slot: DetailSlot<CharacterView>,
}

impl CharacterDetailScreen {
    /// Idle screen.
    pub fn new(client: Arc<CatalogClient>) -> Self {
        Self {
            client,
            slot: DetailSlot::new(),
        }
    }

    /// Current screen state.
    #[must_use]
    pub fn state(&self) -> DetailState<CharacterView> {
        self.slot.state()
    }

    /// Fetch character `id`.
    pub async fn load(&self, id: &ResourceId) {
        self.slot
            .run(messages::CHARACTER_FAILED, id, async {
                let record = self.client.get_detail(ResourceKind::Character, id).await?;
                match &*record {
                    DetailRecord::Character(character) => {
                        Ok(CharacterView::from_detail(character.clone()))
                    }
                    other => Err(unexpected(ResourceKind::Character, other)),
                }
            })
            .await;
    }

    /// Drop any pending completion.
    pub fn unmount(&self) {
        self.slot.unmount();
    }
}

/// What the episode screen renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeView {
    /// The episode.
    pub episode: EpisodeDetail,
    /// Resolved cast.
    pub characters: Arc<Vec<CharacterSummary>>,
}

/// View model for `/episode/:id`.
pub struct EpisodeDetailScreen {
    client: Arc<CatalogClient>,
    slot: DetailSlot<EpisodeView>,
}

impl EpisodeDetailScreen {
    /// Idle screen.
    pub fn new(client: Arc<CatalogClient>) -> Self {
        Self {
            client,
            slot: DetailSlot::new(),
        }
    }

    /// Current screen state.
    #[must_use]
    pub fn state(&self) -> DetailState<EpisodeView> {
        self.slot.state()
    }

    /// Fetch episode `id`, then its cast.
    pub async fn load(&self, id: &ResourceId) {
        self.slot
            .run(messages::EPISODE_FAILED, id, async {
                let record = self.client.get_detail(ResourceKind::Episode, id).await?;
                let DetailRecord::Episode(episode) = &*record else {
                    return Err(unexpected(ResourceKind::Episode, &record));
                };
                let characters = self
                    .client
                    .resolve_references(&episode.character_ids)
                    .await?;
                Ok(EpisodeView {
                    episode: episode.clone(),
                    characters,
                })
            })
            .await;
    }

    /// Drop any pending completion.
    pub fn unmount(&self) {
        self.slot.unmount();
    }
}

/// What the location screen renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationView {
    /// The location.
    pub location: LocationDetail,
    /// Resolved residents.
    pub residents: Arc<Vec<CharacterSummary>>,
}

/// View model for `/location/:id`.
pub struct LocationDetailScreen {
    client: Arc<CatalogClient>,
    slot: DetailSlot<LocationView>,
}

impl LocationDetailScreen {
    /// Idle screen.
    pub fn new(client: Arc<CatalogClient>) -> Self {
        Self {
            client,
            slot: DetailSlot::new(),
        }
    }

    /// Current screen state.
    #[must_use]
    pub fn state(&self) -> DetailState<LocationView> {
        self.slot.state()
    }

    /// Fetch location `id`, then its residents.
    pub async fn load(&self, id: &ResourceId) {
        self.slot
            .run(messages::LOCATION_FAILED, id, async {
                let record = self.client.get_detail(ResourceKind::Location, id).await?;
                let DetailRecord::Location(location) = &*record else {
                    return Err(unexpected(ResourceKind::Location, &record));
                };
                let residents = self
                    .client
                    .resolve_references(&location.resident_ids)
                    .await?;
                Ok(LocationView {
                    location: location.clone(),
                    residents,
                })
            })
            .await;
    }

    /// Drop any pending completion.
    pub fn unmount(&self) {
        self.slot.unmount();
    }
}
