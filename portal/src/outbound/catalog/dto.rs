//! DTOs for decoding catalog JSON responses.
//!
//! The adapter decodes into these transport DTOs first, then maps them into
//! domain records in one pass. Numeric ids become [`ResourceId`]s and
//! reference URLs are reduced to the ids they end in.

use pagination::{PageInfo, PageNumber};
use serde::Deserialize;

use crate::domain::catalog::{
    CatalogPage, CharacterDetail, CharacterSummary, EpisodeDetail, LocationDetail, LocationRef,
    ResourceId,
};

#[derive(Debug, Deserialize)]
pub(super) struct CharacterListDto {
    pub(super) info: PageInfo,
    #[serde(default)]
    pub(super) results: Vec<CharacterDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct NamedLinkDto {
    #[serde(default)]
    pub(super) name: String,
    #[serde(default)]
    pub(super) url: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CharacterDto {
    pub(super) id: u64,
    pub(super) name: String,
    #[serde(default)]
    pub(super) status: String,
    #[serde(default)]
    pub(super) species: String,
    #[serde(default)]
    pub(super) gender: String,
    #[serde(default)]
    pub(super) image: String,
    pub(super) location: Option<NamedLinkDto>,
    #[serde(default)]
    pub(super) episode: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct EpisodeDto {
    pub(super) id: u64,
    pub(super) name: String,
    #[serde(default)]
    pub(super) air_date: String,
    #[serde(default)]
    pub(super) episode: String,
    #[serde(default)]
    pub(super) characters: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LocationDto {
    pub(super) id: u64,
    pub(super) name: String,
    #[serde(rename = "type", default)]
    pub(super) location_type: String,
    #[serde(default)]
    pub(super) dimension: String,
    #[serde(default)]
    pub(super) residents: Vec<String>,
}

/// Batched lookups answer with an object for one id and an array otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub(super) fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(item) => vec![item],
            Self::Many(items) => items,
        }
    }
}

fn resource_id(raw: u64) -> Result<ResourceId, String> {
    ResourceId::new(raw.to_string()).map_err(|error| format!("invalid catalog id {raw}: {error}"))
}

fn reference_ids(urls: &[String]) -> Result<Vec<ResourceId>, String> {
    urls.iter()
        .map(|url| {
            ResourceId::from_reference_url(url)
                .ok_or_else(|| format!("reference URL without an id: {url:?}"))
        })
        .collect()
}

impl CharacterListDto {
    pub(super) fn into_domain_page(self, current_page: PageNumber) -> Result<CatalogPage, String> {
        let items = self
            .results
            .into_iter()
            .map(CharacterDto::into_domain_summary)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CatalogPage {
            items,
            total_pages: self.info.pages,
            total_count: self.info.count,
            current_page,
        })
    }
}

impl CharacterDto {
    pub(super) fn into_domain_summary(self) -> Result<CharacterSummary, String> {
        Ok(CharacterSummary {
            id: resource_id(self.id)?,
            name: self.name,
            image: self.image,
            species: self.species,
            status: self.status,
        })
    }

    pub(super) fn into_domain_detail(mut self) -> Result<CharacterDetail, String> {
        let episode_ids = reference_ids(&self.episode)?;
        let gender = std::mem::take(&mut self.gender);
        let location = self
            .location
            .take()
            .map(|link| LocationRef {
                id: ResourceId::from_reference_url(&link.url),
                name: link.name,
            })
            .unwrap_or_else(|| LocationRef {
                name: "unknown".to_owned(),
                id: None,
            });
        Ok(CharacterDetail {
            summary: self.into_domain_summary()?,
            gender,
            location,
            episode_ids,
        })
    }
}

impl EpisodeDto {
    pub(super) fn into_domain_episode(self) -> Result<EpisodeDetail, String> {
        Ok(EpisodeDetail {
            id: resource_id(self.id)?,
            character_ids: reference_ids(&self.characters)?,
            name: self.name,
            air_date: self.air_date,
            code: self.episode,
        })
    }
}

impl LocationDto {
    pub(super) fn into_domain_location(self) -> Result<LocationDetail, String> {
        Ok(LocationDetail {
            id: resource_id(self.id)?,
            resident_ids: reference_ids(&self.residents)?,
            name: self.name,
            location_type: self.location_type,
            dimension: self.dimension,
        })
    }
}
