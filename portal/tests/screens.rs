//! Screen-level tests wired through the application shell.
//!
//! The catalog is an in-memory stand-in that serves a fixed cast of
//! characters twenty to a page and counts every request it receives.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pagination::{PageMarker, PageNumber};
use portal::AppShell;
use portal::domain::catalog::{
    CatalogPage, CharacterDetail, CharacterSummary, EpisodeDetail, LocationDetail, LocationRef,
    ResourceId,
};
use portal::domain::ports::{CatalogSource, CharacterQuery, FetchError, IdentityProvider};
use portal::domain::{Credentials, Route};
use portal::inbound::screens::{DetailState, messages};
use portal::outbound::identity::{FixtureIdentityProvider, OutboxKind};
use portal::outbound::token_cache::InMemoryTokenCache;
use rstest::{fixture, rstest};

const PAGE_SIZE: usize = 20;
const SLOW_PAGE: u32 = 3;
const OFFLINE_FILTER: &str = "glitch";

fn id(value: &str) -> ResourceId {
    ResourceId::new(value).expect("valid id")
}

fn page(value: u32) -> PageNumber {
    PageNumber::new(value).expect("valid page")
}

fn summary(index: usize, name: &str) -> CharacterSummary {
    CharacterSummary {
        id: id(&index.to_string()),
        name: name.to_owned(),
        image: format!("https://cdn.test/avatar/{index}.jpeg"),
        species: "Human".to_owned(),
        status: "Alive".to_owned(),
    }
}

/// Catalog of 45 characters; page 3 answers slowly and searches for
/// `OFFLINE_FILTER` fail.
struct StubCatalog {
    cast: Vec<CharacterSummary>,
    page_requests: AtomicUsize,
    batch_requests: AtomicUsize,
}

impl StubCatalog {
    fn new() -> Self {
        let mut cast = vec![summary(1, "Rick Sanchez"), summary(2, "Morty Smith")];
        cast.extend((3..=45).map(|index| summary(index, &format!("Extra {index}"))));
        Self {
            cast,
            page_requests: AtomicUsize::new(0),
            batch_requests: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CatalogSource for StubCatalog {
    async fn fetch_character_page(
        &self,
        query: &CharacterQuery,
    ) -> Result<CatalogPage, FetchError> {
        self.page_requests.fetch_add(1, Ordering::SeqCst);
        if query.name.as_deref() == Some(OFFLINE_FILTER) {
            return Err(FetchError::network("catalog offline"));
        }
        if query.page.get() == SLOW_PAGE {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        let matching: Vec<_> = self
            .cast
            .iter()
            .filter(|character| {
                query.name.as_deref().is_none_or(|name| {
                    character.name.to_lowercase().contains(&name.to_lowercase())
                })
            })
            .cloned()
            .collect();
        if matching.is_empty() {
            return Err(FetchError::not_found("There is nothing here"));
        }
        let total = matching.len();
        let skip = (query.page.get() as usize - 1) * PAGE_SIZE;
        let items: Vec<_> = matching.into_iter().skip(skip).take(PAGE_SIZE).collect();
        if items.is_empty() {
            return Err(FetchError::not_found("There is nothing here"));
        }
        Ok(CatalogPage {
            items,
            total_pages: u32::try_from(total.div_ceil(PAGE_SIZE)).expect("small page count"),
            total_count: u32::try_from(total).expect("small cast"),
            current_page: query.page,
        })
    }

    async fn fetch_character(&self, id: &ResourceId) -> Result<CharacterDetail, FetchError> {
        let summary = self
            .cast
            .iter()
            .find(|character| &character.id == id)
            .cloned()
            .ok_or_else(|| FetchError::not_found(format!("character {id}")))?;
        Ok(CharacterDetail {
            summary,
            gender: "Male".to_owned(),
            location: LocationRef {
                name: "Earth (C-137)".to_owned(),
                id: Some(ResourceId::new("1").expect("valid id")),
            },
            episode_ids: vec![
                ResourceId::new("1").expect("valid id"),
                ResourceId::new("2").expect("valid id"),
            ],
        })
    }

    async fn fetch_episode(&self, id: &ResourceId) -> Result<EpisodeDetail, FetchError> {
        Ok(EpisodeDetail {
            id: id.clone(),
            name: "Pilot".to_owned(),
            air_date: "December 2, 2013".to_owned(),
            code: "S01E01".to_owned(),
            character_ids: vec![
                ResourceId::new("1").expect("valid id"),
                ResourceId::new("2").expect("valid id"),
            ],
        })
    }

    async fn fetch_location(&self, id: &ResourceId) -> Result<LocationDetail, FetchError> {
        if id.as_str() == "404" {
            return Err(FetchError::not_found("location 404"));
        }
        Ok(LocationDetail {
            id: id.clone(),
            name: "Purge Planet".to_owned(),
            location_type: "Planet".to_owned(),
            dimension: "Replacement Dimension".to_owned(),
            resident_ids: Vec::new(),
        })
    }

    async fn fetch_characters(
        &self,
        ids: &[ResourceId],
    ) -> Result<Vec<CharacterSummary>, FetchError> {
        self.batch_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .cast
            .iter()
            .filter(|character| ids.contains(&character.id))
            .cloned()
            .collect())
    }
}

struct Harness {
    shell: AppShell,
    provider: Arc<FixtureIdentityProvider>,
    catalog: Arc<StubCatalog>,
}

#[fixture]
fn harness() -> Harness {
    let provider = Arc::new(FixtureIdentityProvider::new());
    let catalog = Arc::new(StubCatalog::new());
    let shell = AppShell::new(
        Arc::clone(&provider) as Arc<dyn IdentityProvider>,
        Arc::clone(&catalog) as Arc<dyn CatalogSource>,
        Arc::new(InMemoryTokenCache::new()),
        2,
    );
    Harness {
        shell,
        provider,
        catalog,
    }
}

fn numbers(markers: &[PageMarker]) -> Vec<Option<u32>> {
    markers.iter().map(|marker| marker.page()).collect()
}

#[rstest]
#[tokio::test]
async fn sign_up_shows_the_verification_notice(harness: Harness) {
    let screen = harness.shell.sign_up_screen();
    screen.set_email("summer@smith.test");
    screen.set_password("Summer12!");

    let outcome = screen.submit().await.expect("account created");

    assert!(outcome.verification_sent);
    assert_eq!(screen.state().notice(), Some(messages::CHECK_YOUR_EMAIL));
    let outbox = harness.provider.outbox();
    assert_eq!(outbox.len(), 1);
    assert!(
        outbox
            .iter()
            .all(|entry| entry.kind == OutboxKind::Verification
                && entry.email == "summer@smith.test")
    );
}

#[rstest]
#[tokio::test]
async fn sign_up_reports_taken_addresses(harness: Harness) {
    let credentials =
        Credentials::try_from_parts("summer@smith.test", "Summer12!").expect("valid credentials");
    harness
        .provider
        .create_account(&credentials)
        .await
        .expect("first account");

    let screen = harness.shell.sign_up_screen();
    screen.set_email("summer@smith.test");
    screen.set_password("Summer12!");

    assert_eq!(screen.submit().await, None);
    let state = screen.state();
    assert_eq!(state.error.as_deref(), Some(messages::EMAIL_IN_USE));
    assert_eq!(state.notice(), None);
}

#[rstest]
#[tokio::test]
async fn weak_passwords_never_reach_the_provider(harness: Harness) {
    let screen = harness.shell.sign_up_screen();
    screen.set_email("summer@smith.test");
    screen.set_password("password");

    assert_eq!(screen.submit().await, None);
    let error = screen.state().error.expect("validation message");
    assert!(error.starts_with("Password must be at least 8 characters"));
    assert!(harness.provider.outbox().is_empty());
}

#[rstest]
#[tokio::test]
async fn reset_requests_record_an_email_for_known_accounts(harness: Harness) {
    let credentials =
        Credentials::try_from_parts("beth@smith.test", "Horses4!").expect("valid credentials");
    harness
        .provider
        .create_account(&credentials)
        .await
        .expect("account");

    let screen = harness.shell.reset_password_screen();
    screen.set_email(" beth@smith.test ");

    assert!(screen.submit().await);
    assert_eq!(screen.state().notice(), Some(messages::RESET_SENT));
    assert!(
        harness
            .provider
            .outbox()
            .iter()
            .any(|entry| entry.kind == OutboxKind::PasswordReset)
    );
}

#[rstest]
#[tokio::test]
async fn listing_loads_the_first_page(harness: Harness) {
    let screen = harness.shell.character_list_screen();
    screen.load().await;

    let state = screen.state();
    assert!(!state.is_fetching);
    assert_eq!(state.total_pages(), 3);
    let listing = state.listing.expect("listing loaded");
    assert_eq!(listing.items.len(), PAGE_SIZE);
    assert_eq!(
        numbers(&screen.markers()),
        [Some(1), Some(2), Some(3)]
    );
}

#[rstest]
#[tokio::test]
async fn searching_trims_the_filter_and_returns_to_page_one(harness: Harness) {
    let screen = harness.shell.character_list_screen();
    screen.load().await;
    screen.go_to_page(page(2)).await;
    assert_eq!(screen.state().page, page(2));

    screen.set_search_input("  morty ");
    screen.submit_search().await;

    let state = screen.state();
    assert_eq!(state.page, PageNumber::FIRST);
    assert_eq!(state.applied_filter.as_deref(), Some("morty"));
    let names: Vec<_> = state
        .listing
        .as_ref()
        .expect("listing")
        .items
        .iter()
        .map(|character| character.name.clone())
        .collect();
    assert_eq!(names, ["Morty Smith"]);
    assert_eq!(numbers(&screen.markers()), [Some(1)]);
}

#[rstest]
#[tokio::test]
async fn unmatched_searches_show_the_empty_notice(harness: Harness) {
    let screen = harness.shell.character_list_screen();
    screen.set_search_input("Birdperson");
    screen.submit_search().await;

    let state = screen.state();
    assert_eq!(state.error, None);
    assert_eq!(state.empty_notice(), Some(messages::NO_CHARACTERS));
    assert!(screen.markers().is_empty());
}

#[rstest]
#[tokio::test]
async fn failed_searches_replace_the_previous_listing(harness: Harness) {
    let screen = harness.shell.character_list_screen();
    screen.load().await;
    assert!(screen.state().listing.is_some());

    screen.set_search_input(OFFLINE_FILTER);
    screen.submit_search().await;

    let state = screen.state();
    assert_eq!(state.error.as_deref(), Some(messages::LIST_FAILED));
    assert!(state.listing.is_none());
    assert_eq!(state.total_pages(), 0);
    assert!(screen.markers().is_empty());
}

#[rstest]
#[tokio::test]
async fn paging_is_clamped_to_the_known_range(harness: Harness) {
    let screen = harness.shell.character_list_screen();
    screen.load().await;

    screen.previous_page().await;
    assert_eq!(screen.state().page, PageNumber::FIRST);

    screen.go_to_page(page(99)).await;
    assert_eq!(screen.state().page, page(3));

    screen.next_page().await;
    assert_eq!(screen.state().page, page(3));
}

#[rstest]
#[tokio::test]
async fn revisiting_a_page_uses_the_cache(harness: Harness) {
    let screen = harness.shell.character_list_screen();
    screen.load().await;
    screen.next_page().await;
    screen.previous_page().await;

    assert_eq!(screen.state().page, PageNumber::FIRST);
    assert_eq!(harness.catalog.page_requests.load(Ordering::SeqCst), 2);
}

#[rstest]
#[tokio::test]
async fn the_latest_page_request_wins(harness: Harness) {
    let screen = harness.shell.character_list_screen();
    screen.load().await;

    tokio::join!(screen.go_to_page(page(SLOW_PAGE)), screen.go_to_page(page(2)));

    let state = screen.state();
    assert_eq!(state.page, page(2));
    assert_eq!(state.listing.expect("listing").current_page, page(2));
    assert!(!state.is_fetching);
}

#[rstest]
#[tokio::test]
async fn unmounting_drops_pending_listings(harness: Harness) {
    let screen = harness.shell.character_list_screen();

    tokio::join!(screen.go_to_page(page(SLOW_PAGE)), async {
        tokio::task::yield_now().await;
        screen.unmount();
    });

    let state = screen.state();
    assert_eq!(state.listing, None);
    assert!(!state.is_fetching);
}

#[rstest]
#[tokio::test]
async fn character_details_link_to_location_and_episodes(harness: Harness) {
    let screen = harness.shell.character_detail_screen();
    screen.load(&id("1")).await;

    let state = screen.state();
    let view = state.loaded().expect("character loaded");
    assert_eq!(view.character.summary.name, "Rick Sanchez");
    assert_eq!(view.location_route, Some(Route::LocationDetail(id("1"))));
    assert_eq!(
        view.episode_routes,
        [Route::EpisodeDetail(id("1")), Route::EpisodeDetail(id("2"))]
    );
}

#[rstest]
#[tokio::test]
async fn unknown_characters_show_the_error_state(harness: Harness) {
    let screen = harness.shell.character_detail_screen();
    screen.load(&id("999")).await;

    assert_eq!(
        screen.state(),
        DetailState::Failed(messages::CHARACTER_FAILED.to_owned())
    );
}

#[rstest]
#[tokio::test]
async fn episodes_resolve_their_cast_once(harness: Harness) {
    let screen = harness.shell.episode_detail_screen();
    screen.load(&id("1")).await;
    screen.load(&id("1")).await;

    let state = screen.state();
    let view = state.loaded().expect("episode loaded");
    let names: Vec<_> = view.characters.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Rick Sanchez", "Morty Smith"]);
    assert_eq!(harness.catalog.batch_requests.load(Ordering::SeqCst), 1);
}

#[rstest]
#[tokio::test]
async fn locations_without_residents_skip_the_batch(harness: Harness) {
    let screen = harness.shell.location_detail_screen();
    screen.load(&id("20")).await;

    let state = screen.state();
    let view = state.loaded().expect("location loaded");
    assert!(view.residents.is_empty());
    assert_eq!(harness.catalog.batch_requests.load(Ordering::SeqCst), 0);
}

#[rstest]
#[tokio::test]
async fn failed_locations_show_the_error_state(harness: Harness) {
    let screen = harness.shell.location_detail_screen();
    screen.load(&id("404")).await;

    assert_eq!(
        screen.state(),
        DetailState::Failed(messages::LOCATION_FAILED.to_owned())
    );
}

#[rstest]
#[tokio::test]
async fn logout_closes_the_menu_and_hides_the_bar(harness: Harness) {
    let credentials =
        Credentials::try_from_parts("rick@citadel.test", "Portal9!").expect("valid credentials");
    harness
        .provider
        .create_account(&credentials)
        .await
        .expect("account");

    let navigation = harness.shell.navigation();
    assert!(navigation.is_visible(&Route::Characters));
    navigation.toggle_menu();
    assert!(navigation.is_menu_open());

    assert_eq!(navigation.logout().await, Route::Login);
    assert!(!navigation.is_menu_open());
    assert!(!navigation.is_visible(&Route::Characters));
    assert_eq!(
        harness.shell.wait_until_ready().await.session.user(),
        None
    );
}
