//! Reqwest-backed catalog source adapter.
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP error mapping, and JSON decoding into domain records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{CharacterDto, CharacterListDto, EpisodeDto, LocationDto, OneOrMany};
use crate::domain::catalog::{
    CatalogPage, CharacterDetail, CharacterSummary, EpisodeDetail, LocationDetail, ResourceId,
    ResourceKind,
};
use crate::domain::ports::{CatalogSource, CharacterQuery, FetchError};
use crate::outbound::body_preview;

const DEFAULT_USER_AGENT: &str = "catalog-portal/0.1";

/// Catalog source that issues HTTP GET requests below one base URL.
pub struct CatalogHttpSource {
    client: Client,
    base_url: Url,
}

impl CatalogHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// A missing trailing slash on `base_url` is added so relative paths
    /// resolve below it.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path)
            .map_err(|error| FetchError::other(format!("invalid catalog path {path:?}: {error}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!(%url, "catalog request");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        decode(body.as_ref())
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn detail_path(kind: ResourceKind, id: &ResourceId) -> String {
    format!("{}/{id}", kind.path_segment())
}

fn batch_path(ids: &[ResourceId]) -> String {
    let joined = ids
        .iter()
        .map(ResourceId::as_str)
        .collect::<Vec<_>>()
        .join(",");
    format!("{}/{joined}", ResourceKind::Character.path_segment())
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, FetchError> {
    serde_json::from_slice(body)
        .map_err(|error| FetchError::other(format!("invalid catalog JSON payload: {error}")))
}

#[async_trait]
impl CatalogSource for CatalogHttpSource {
    async fn fetch_character_page(
        &self,
        query: &CharacterQuery,
    ) -> Result<CatalogPage, FetchError> {
        let mut url = self.endpoint(ResourceKind::Character.path_segment())?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &query.page.get().to_string());
            if let Some(name) = &query.name {
                pairs.append_pair("name", name);
            }
        }
        let listing: CharacterListDto = self.get_json(url).await?;
        listing
            .into_domain_page(query.page)
            .map_err(FetchError::other)
    }

    async fn fetch_character(&self, id: &ResourceId) -> Result<CharacterDetail, FetchError> {
        let url = self.endpoint(&detail_path(ResourceKind::Character, id))?;
        let character: CharacterDto = self.get_json(url).await?;
        character.into_domain_detail().map_err(FetchError::other)
    }

    async fn fetch_episode(&self, id: &ResourceId) -> Result<EpisodeDetail, FetchError> {
        let url = self.endpoint(&detail_path(ResourceKind::Episode, id))?;
        let episode: EpisodeDto = self.get_json(url).await?;
        episode.into_domain_episode().map_err(FetchError::other)
    }

    async fn fetch_location(&self, id: &ResourceId) -> Result<LocationDetail, FetchError> {
        let url = self.endpoint(&detail_path(ResourceKind::Location, id))?;
        let location: LocationDto = self.get_json(url).await?;
        location.into_domain_location().map_err(FetchError::other)
    }

    async fn fetch_characters(
        &self,
        ids: &[ResourceId],
    ) -> Result<Vec<CharacterSummary>, FetchError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.endpoint(&batch_path(ids))?;
        let characters: OneOrMany<CharacterDto> = self.get_json(url).await?;
        characters
            .into_vec()
            .into_iter()
            .map(CharacterDto::into_domain_summary)
            .collect::<Result<Vec<_>, _>>()
            .map_err(FetchError::other)
    }
}

fn map_transport_error(error: reqwest::Error) -> FetchError {
    FetchError::network(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> FetchError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::NOT_FOUND => FetchError::not_found(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT | StatusCode::BAD_GATEWAY => {
            FetchError::network(message)
        }
        _ => FetchError::other(message),
    }
}
