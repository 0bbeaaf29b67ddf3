//! Catalog record types.

use pagination::PageNumber;

use super::{ResourceId, ResourceKind};

/// Abbreviated character record used by list views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSummary {
    /// Catalog identifier.
    pub id: ResourceId,
    /// Display name.
    pub name: String,
    /// Portrait URL.
    pub image: String,
    /// Species, e.g. `Human`.
    pub species: String,
    /// Life status, e.g. `Alive`.
    pub status: String,
}

/// One page of the character listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage {
    /// Characters on this page.
    pub items: Vec<CharacterSummary>,
    /// Number of pages for the current filter; zero when nothing matched.
    pub total_pages: u32,
    /// Number of characters across all pages.
    pub total_count: u32,
    /// Page these items belong to.
    pub current_page: PageNumber,
}

impl CatalogPage {
    /// Listing with no matches.
    #[must_use]
    pub const fn empty(current_page: PageNumber) -> Self {
        Self {
            items: Vec::new(),
            total_pages: 0,
            total_count: 0,
            current_page,
        }
    }

    /// Return `true` when the page carries no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Where a character was last seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRef {
    /// Location name as reported by the catalog (may be `unknown`).
    pub name: String,
    /// Location id when the catalog links to a location record.
    pub id: Option<ResourceId>,
}

/// Full character record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterDetail {
    /// Identifying fields shared with list views.
    pub summary: CharacterSummary,
    /// Gender.
    pub gender: String,
    /// Last known location.
    pub location: LocationRef,
    /// Episodes the character appears in.
    pub episode_ids: Vec<ResourceId>,
}

/// Full episode record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeDetail {
    /// Catalog identifier.
    pub id: ResourceId,
    /// Episode title.
    pub name: String,
    /// Original air date as printed by the catalog.
    pub air_date: String,
    /// Season/episode code such as `S01E01`.
    pub code: String,
    /// Characters appearing in the episode.
    pub character_ids: Vec<ResourceId>,
}

/// Full location record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationDetail {
    /// Catalog identifier.
    pub id: ResourceId,
    /// Location name.
    pub name: String,
    /// Location type, e.g. `Planet`.
    pub location_type: String,
    /// Dimension the location belongs to.
    pub dimension: String,
    /// Characters last seen here.
    pub resident_ids: Vec<ResourceId>,
}

/// Any record with a detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailRecord {
    /// A character.
    Character(CharacterDetail),
    /// An episode.
    Episode(EpisodeDetail),
    /// A location.
    Location(LocationDetail),
}

impl DetailRecord {
    /// Kind of the wrapped record.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::Character(_) => ResourceKind::Character,
            Self::Episode(_) => ResourceKind::Episode,
            Self::Location(_) => ResourceKind::Location,
        }
    }

    /// Identifier of the wrapped record.
    #[must_use]
    pub const fn id(&self) -> &ResourceId {
        match self {
            Self::Character(character) => &character.summary.id,
            Self::Episode(episode) => &episode.id,
            Self::Location(location) => &location.id,
        }
    }

    /// Unresolved references carried by the record.
    ///
    /// Episodes for a character, cast for an episode, residents for a
    /// location.
    #[must_use]
    pub fn cross_reference_ids(&self) -> &[ResourceId] {
        match self {
            Self::Character(character) => &character.episode_ids,
            Self::Episode(episode) => &episode.character_ids,
            Self::Location(location) => &location.resident_ids,
        }
    }
}
