//! Behaviour coverage for the cached catalog client.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rstest::rstest;

use super::*;
use crate::domain::catalog::{CharacterDetail, EpisodeDetail, LocationDetail, LocationRef};
use crate::domain::ports::MockCatalogSource;

fn id(value: &str) -> ResourceId {
    ResourceId::new(value).expect("valid id")
}

fn page(value: u32) -> PageNumber {
    PageNumber::new(value).expect("non-zero page")
}

fn summary(raw_id: &str, name: &str) -> CharacterSummary {
    CharacterSummary {
        id: id(raw_id),
        name: name.to_owned(),
        image: format!("https://img.test/{raw_id}.jpeg"),
        species: "Human".to_owned(),
        status: "Alive".to_owned(),
    }
}

fn listing(current: u32) -> CatalogPage {
    CatalogPage {
        items: vec![summary("1", "Rick Sanchez"), summary("2", "Morty Smith")],
        total_pages: 42,
        total_count: 826,
        current_page: page(current),
    }
}

fn client(source: MockCatalogSource) -> CatalogClient {
    CatalogClient::new(Arc::new(source))
}

#[rstest]
#[tokio::test]
async fn repeated_page_requests_hit_the_source_once() {
    let mut source = MockCatalogSource::new();
    source
        .expect_fetch_character_page()
        .times(1)
        .returning(|query| Ok(listing(query.page.get())));
    let client = client(source);

    let first = client.list_characters(page(3), None).await.expect("page");
    let second = client.list_characters(page(3), None).await.expect("page");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.current_page, page(3));
}

#[rstest]
#[tokio::test]
async fn filters_are_trimmed_and_blank_filters_dropped() {
    let mut source = MockCatalogSource::new();
    source
        .expect_fetch_character_page()
        .withf(|query| query.name.as_deref() == Some("rick"))
        .times(1)
        .returning(|_| Ok(listing(1)));
    source
        .expect_fetch_character_page()
        .withf(|query| query.name.is_none())
        .times(1)
        .returning(|_| Ok(listing(1)));
    let client = client(source);

    client.list_characters(PageNumber::FIRST, Some("  rick ")).await.expect("filtered");
    client.list_characters(PageNumber::FIRST, Some("rick")).await.expect("cached");
    client.list_characters(PageNumber::FIRST, Some("   ")).await.expect("unfiltered");
    client.list_characters(PageNumber::FIRST, None).await.expect("cached");
}

#[rstest]
#[tokio::test]
async fn unmatched_filter_yields_empty_page() {
    let mut source = MockCatalogSource::new();
    source
        .expect_fetch_character_page()
        .returning(|_| Err(FetchError::not_found("There is nothing here")));
    let client = client(source);

    let result = client
        .list_characters(page(2), Some("zzzz"))
        .await
        .expect("not found maps to empty");

    assert_eq!(*result, CatalogPage::empty(page(2)));
    assert!(result.is_empty());
}

#[rstest]
#[tokio::test]
async fn failures_propagate_and_are_not_cached() {
    let mut source = MockCatalogSource::new();
    let mut attempts = 0_u32;
    source
        .expect_fetch_character_page()
        .times(2)
        .returning(move |_| {
            attempts += 1;
            if attempts == 1 {
                Err(FetchError::network("connection refused"))
            } else {
                Ok(listing(1))
            }
        });
    let client = client(source);
    let key = CacheKey::CharacterPage(CharacterQuery::new(PageNumber::FIRST, None));

    let err = client
        .list_characters(PageNumber::FIRST, None)
        .await
        .expect_err("first attempt fails");
    assert!(matches!(err, FetchError::Network { .. }));
    assert!(!client.is_cached(&key));

    client
        .list_characters(PageNumber::FIRST, None)
        .await
        .expect("second attempt refetches");
    assert!(client.is_cached(&key));
}

#[rstest]
#[tokio::test]
async fn detail_requests_dispatch_by_kind() {
    let mut source = MockCatalogSource::new();
    source.expect_fetch_character().times(1).returning(|id| {
        Ok(CharacterDetail {
            summary: summary(id.as_str(), "Rick Sanchez"),
            gender: "Male".to_owned(),
            location: LocationRef {
                name: "Citadel of Ricks".to_owned(),
                id: Some(ResourceId::new("3").expect("valid id")),
            },
            episode_ids: vec![ResourceId::new("1").expect("valid id")],
        })
    });
    source.expect_fetch_episode().times(1).returning(|id| {
        Ok(EpisodeDetail {
            id: id.clone(),
            name: "Pilot".to_owned(),
            air_date: "December 2, 2013".to_owned(),
            code: "S01E01".to_owned(),
            character_ids: Vec::new(),
        })
    });
    source.expect_fetch_location().times(1).returning(|id| {
        Ok(LocationDetail {
            id: id.clone(),
            name: "Earth (C-137)".to_owned(),
            location_type: "Planet".to_owned(),
            dimension: "Dimension C-137".to_owned(),
            resident_ids: Vec::new(),
        })
    });
    let client = client(source);

    for kind in [
        ResourceKind::Character,
        ResourceKind::Episode,
        ResourceKind::Location,
    ] {
        let record = client.get_detail(kind, &id("1")).await.expect("detail");
        assert_eq!(record.kind(), kind);
        assert_eq!(record.id(), &id("1"));
        let again = client.get_detail(kind, &id("1")).await.expect("cached");
        assert!(Arc::ptr_eq(&record, &again));
    }
}

#[rstest]
#[tokio::test]
async fn empty_reference_lists_skip_the_source() {
    let mut source = MockCatalogSource::new();
    source.expect_fetch_characters().never();
    let client = client(source);

    let resolved = client.resolve_references(&[]).await.expect("empty");
    assert!(resolved.is_empty());
}

#[rstest]
#[tokio::test]
async fn references_resolve_in_one_batched_call() {
    let mut source = MockCatalogSource::new();
    source
        .expect_fetch_characters()
        .withf(|ids| ids.len() == 2)
        .times(1)
        .returning(|ids| {
            Ok(ids
                .iter()
                .map(|id| summary(id.as_str(), "Resident"))
                .collect())
        });
    let client = client(source);
    let ids = [id("38"), id("45")];

    let resolved = client.resolve_references(&ids).await.expect("batch");
    let again = client.resolve_references(&ids).await.expect("cached batch");

    assert_eq!(resolved.len(), 2);
    assert!(Arc::ptr_eq(&resolved, &again));
}

/// Source whose page fetch takes a while, so overlapping requests overlap.
#[derive(Default)]
struct SlowSource {
    page_calls: AtomicUsize,
}

#[async_trait]
impl CatalogSource for SlowSource {
    async fn fetch_character_page(
        &self,
        query: &CharacterQuery,
    ) -> Result<CatalogPage, FetchError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(listing(query.page.get()))
    }

    async fn fetch_character(&self, _id: &ResourceId) -> Result<CharacterDetail, FetchError> {
        Err(FetchError::other("unused"))
    }

    async fn fetch_episode(&self, _id: &ResourceId) -> Result<EpisodeDetail, FetchError> {
        Err(FetchError::other("unused"))
    }

    async fn fetch_location(&self, _id: &ResourceId) -> Result<LocationDetail, FetchError> {
        Err(FetchError::other("unused"))
    }

    async fn fetch_characters(
        &self,
        _ids: &[ResourceId],
    ) -> Result<Vec<CharacterSummary>, FetchError> {
        Err(FetchError::other("unused"))
    }
}

#[rstest]
#[tokio::test]
async fn concurrent_requests_share_one_fetch() {
    let source = Arc::new(SlowSource::default());
    let client = CatalogClient::new(Arc::clone(&source) as Arc<dyn CatalogSource>);

    let (first, second, third) = tokio::join!(
        client.list_characters(page(5), Some("morty")),
        client.list_characters(page(5), Some("morty")),
        client.list_characters(page(5), Some(" morty ")),
    );

    assert_eq!(source.page_calls.load(Ordering::SeqCst), 1);
    let first = first.expect("first");
    assert!(Arc::ptr_eq(&first, &second.expect("second")));
    assert!(Arc::ptr_eq(&first, &third.expect("third")));
}

#[rstest]
#[tokio::test]
async fn distinct_keys_fetch_independently() {
    let source = Arc::new(SlowSource::default());
    let client = CatalogClient::new(Arc::clone(&source) as Arc<dyn CatalogSource>);

    let (first, second) = tokio::join!(
        client.list_characters(page(1), None),
        client.list_characters(page(2), None),
    );

    assert_eq!(source.page_calls.load(Ordering::SeqCst), 2);
    assert_eq!(first.expect("page 1").current_page, page(1));
    assert_eq!(second.expect("page 2").current_page, page(2));
}
