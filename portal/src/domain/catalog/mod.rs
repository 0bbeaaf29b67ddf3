//! Read-only catalog records.
//!
//! Records are immutable snapshots of the remote catalog. Cross references
//! (a character's episodes, an episode's cast, a location's residents) are
//! kept as unresolved [`ResourceId`]s; resolving them takes a second fetch.

mod records;
mod resource_id;

pub use records::{
    CatalogPage, CharacterDetail, CharacterSummary, DetailRecord, EpisodeDetail, LocationDetail,
    LocationRef,
};
pub use resource_id::{ResourceId, ResourceIdValidationError, ResourceKind};
