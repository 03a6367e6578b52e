//! Integration tests for the crawler
//!
//! These tests use wiremock to serve listing and detail pages and run full
//! crawls through the HTTP renderer against a JSON store on disk.

use rentscraper::config::{CrawlerConfig, RendererConfig};
use rentscraper::crawler::{Coordinator, CrawlReport, LogObserver};
use rentscraper::render::HttpPageLoader;
use rentscraper::sources::OlxExtractor;
use rentscraper::storage::{JsonStore, RecordStore, RentalKind};
use rentscraper::StoreError;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A listing feed page linking to `slugs`, optionally advertising a last page
fn feed_page(slugs: &[&str], last_page: Option<u32>) -> String {
    let offers: String = slugs
        .iter()
        .map(|slug| {
            format!(
                r#"<tr class="wrap"><td>
                    <div class="title-cell"><a class="linkWithHash" href="/d/obyavlenie/{slug}.html?reason=feed#top">Сдам {slug}</a></div>
                    <div class="price"><strong>12 000 грн.</strong></div>
                    <div class="bottom-cell"><small>Киев, Печерский</small><small>Сегодня 09:40</small></div>
                </td></tr>"#
            )
        })
        .collect();
    let last = last_page
        .map(|n| format!(r#"<a data-cy="page-link-last">{}</a>"#, n))
        .unwrap_or_default();

    format!(
        r#"<html><body><table class="offers"><tbody>{}</tbody></table>
        <div class="pager"><span data-cy="page-link-current">1</span>{}</div></body></html>"#,
        offers, last
    )
}

/// A detail page whose phone is behind a login prompt
fn detail_page(rooms: &str) -> String {
    format!(
        r#"<html><body>
        <div data-cy="ad_description"><div>Светлая квартира, рядом метро</div></div>
        <ul>
            <li><p>Тип дома: Квартира</p></li>
            <li><p>Количество комнат: {}</p></li>
            <li><p>Этажность: 16</p></li>
        </ul>
        <div data-testid="prompt-message">Войдите, чтобы увидеть номер</div>
        </body></html>"#,
        rooms
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_feed(server: &MockServer, page: u32, body: String, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/nedvizhimost/kiev/"))
        .and(query_param("page", page.to_string()))
        .respond_with(html(body))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, slug: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/d/obyavlenie/{}.html", slug)))
        .respond_with(html(detail_page("2")))
        .expect(expected)
        .mount(server)
        .await;
}

fn test_config() -> CrawlerConfig {
    CrawlerConfig {
        page_query_interval_ms: 0,
        wait_selector_timeout_ms: 200,
        wait_poll_interval_ms: 10,
        ..CrawlerConfig::default()
    }
}

async fn crawl(server: &MockServer, config: CrawlerConfig, store: &mut JsonStore) -> CrawlReport {
    let loader = HttpPageLoader::new(&RendererConfig::default()).unwrap();
    let extractor = OlxExtractor::with_base_url(format!("{}/nedvizhimost", server.uri()));

    let mut coordinator = Coordinator::new(
        config,
        Box::new(extractor),
        Box::new(loader),
        Box::new(LogObserver::new()),
        "kiev",
    );
    coordinator.run(store).await.unwrap()
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_pagination_stops_at_reported_total() {
    let server = MockServer::start().await;
    mount_feed(&server, 1, feed_page(&["flat-IDa1"], Some(3)), 1).await;
    mount_feed(&server, 2, feed_page(&["flat-IDb2"], Some(3)), 1).await;
    mount_feed(&server, 3, feed_page(&["flat-IDc3"], None), 1).await;
    mount_feed(&server, 4, feed_page(&["flat-IDd4"], Some(4)), 0).await;
    for slug in ["flat-IDa1", "flat-IDb2", "flat-IDc3"] {
        mount_detail(&server, slug, 1).await;
    }

    let dir = TempDir::new().unwrap();
    let mut store = JsonStore::open(dir.path().join("db.json")).unwrap();
    let report = crawl(&server, test_config(), &mut store).await;

    assert_eq!(report.listing_pages, 3);
    assert_eq!(report.records_written, 3);

    let record = store.get("olx:flat-IDb2").unwrap();
    assert_eq!(record.source, "olx");
    assert_eq!(
        record.url,
        format!("{}/d/obyavlenie/flat-IDb2.html", server.uri())
    );
    assert_eq!(record.title, "Сдам flat-IDb2");
    assert_eq!(record.price, "12 000 грн.");
    assert_eq!(record.posted_at.as_deref(), Some("Сегодня 09:40"));
    assert_eq!(record.kind, Some(RentalKind::Apartment));
    assert_eq!(record.room_count, Some(2));
    assert_eq!(record.floor_count, Some(16));
    assert_eq!(record.phone, None);
    assert_eq!(
        record.description.as_deref(),
        Some("Светлая квартира, рядом метро")
    );
}

#[tokio::test]
async fn test_existing_identity_is_not_fetched_again() {
    let server = MockServer::start().await;
    mount_feed(&server, 1, feed_page(&["old-ID1", "new-ID2"], Some(1)), 1).await;
    mount_detail(&server, "old-ID1", 0).await;
    mount_detail(&server, "new-ID2", 1).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("db.json");

    // seed the store through a first crawl of a single-listing feed
    {
        let seed_server = MockServer::start().await;
        mount_feed(&seed_server, 1, feed_page(&["old-ID1"], Some(1)), 1).await;
        mount_detail(&seed_server, "old-ID1", 1).await;
        let mut store = JsonStore::open(&db_path).unwrap();
        crawl(&seed_server, test_config(), &mut store).await;
        store.save().unwrap();
    }
    let before = read_json(&db_path)["olx:old-ID1"].clone();

    let mut store = JsonStore::open(&db_path).unwrap();
    let report = crawl(&server, test_config(), &mut store).await;
    store.save().unwrap();

    assert_eq!(report.skipped_existing, 1);
    assert_eq!(report.records_written, 1);
    assert_eq!(read_json(&db_path)["olx:old-ID1"], before);
    assert!(store.contains("olx:new-ID2"));
}

#[tokio::test]
async fn test_quick_check_skips_unchanged_source() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("db.json");

    // first run stores everything on page 1
    {
        let seed_server = MockServer::start().await;
        mount_feed(&seed_server, 1, feed_page(&["a-ID1", "b-ID2"], Some(1)), 1).await;
        mount_detail(&seed_server, "a-ID1", 1).await;
        mount_detail(&seed_server, "b-ID2", 1).await;
        let mut store = JsonStore::open(&db_path).unwrap();
        crawl(&seed_server, test_config(), &mut store).await;
        store.save().unwrap();
    }

    // page 1 unchanged: the probe is the only request made
    let server = MockServer::start().await;
    mount_feed(&server, 1, feed_page(&["a-ID1", "b-ID2"], Some(3)), 1).await;
    mount_feed(&server, 2, feed_page(&["c-ID3"], Some(3)), 0).await;
    mount_detail(&server, "a-ID1", 0).await;
    mount_detail(&server, "b-ID2", 0).await;

    let mut store = JsonStore::open(&db_path).unwrap();
    let report = crawl(
        &server,
        CrawlerConfig {
            quick_check: true,
            ..test_config()
        },
        &mut store,
    )
    .await;

    assert_eq!(report.quick_check, Some(false));
    assert_eq!(report.listing_pages, 0);
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_quick_check_proceeds_on_new_listing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("db.json");

    let server = MockServer::start().await;
    // once for the probe, once for the crawl
    mount_feed(&server, 1, feed_page(&["a-ID1"], Some(1)), 2).await;
    mount_detail(&server, "a-ID1", 1).await;

    let mut store = JsonStore::open(&db_path).unwrap();
    let report = crawl(
        &server,
        CrawlerConfig {
            quick_check: true,
            ..test_config()
        },
        &mut store,
    )
    .await;

    assert_eq!(report.quick_check, Some(true));
    assert_eq!(report.listing_pages, 1);
    assert!(store.contains("olx:a-ID1"));
}

#[tokio::test]
async fn test_repeated_crawl_only_moves_last_scraped() {
    let server = MockServer::start().await;
    mount_feed(&server, 1, feed_page(&["a-ID1", "b-ID2"], Some(1)), 2).await;
    mount_detail(&server, "a-ID1", 2).await;
    mount_detail(&server, "b-ID2", 2).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("db.json");
    let refresh = CrawlerConfig {
        skip_existing_records: false,
        ..test_config()
    };

    let mut store = JsonStore::open(&db_path).unwrap();
    crawl(&server, refresh.clone(), &mut store).await;
    store.save().unwrap();
    let mut first = read_json(&db_path);

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let mut store = JsonStore::open(&db_path).unwrap();
    let report = crawl(&server, refresh, &mut store).await;
    store.save().unwrap();
    let mut second = read_json(&db_path);

    assert_eq!(report.records_written, 2);
    for identity in ["olx:a-ID1", "olx:b-ID2"] {
        assert_eq!(
            first[identity]["firstScrapedAt"],
            second[identity]["firstScrapedAt"]
        );
        assert_ne!(
            first[identity]["lastScrapedAt"],
            second[identity]["lastScrapedAt"]
        );
        first[identity].as_object_mut().unwrap().remove("lastScrapedAt");
        second[identity].as_object_mut().unwrap().remove("lastScrapedAt");
    }
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_checkpoints_reach_disk_before_the_final_save() {
    let server = MockServer::start().await;
    mount_feed(&server, 1, feed_page(&["a-ID1", "b-ID2", "c-ID3"], Some(1)), 1).await;
    for slug in ["a-ID1", "b-ID2", "c-ID3"] {
        mount_detail(&server, slug, 1).await;
    }

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("db.json");
    let config = CrawlerConfig {
        checkpoint_every: 2,
        ..test_config()
    };

    let mut store = JsonStore::open(&db_path).unwrap();
    let report = crawl(&server, config, &mut store).await;

    // no final save yet: only the checkpoint after the second record is on disk
    assert_eq!(report.checkpoints, 1);
    let on_disk = read_json(&db_path);
    assert_eq!(on_disk.as_object().unwrap().len(), 2);
    assert_eq!(store.len(), 3);
}

#[test]
fn test_corrupt_store_is_fatal_and_untouched() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("db.json");
    std::fs::write(&db_path, r#"{"olx:a-ID1": {"title": "#).unwrap();

    let result = JsonStore::open(&db_path);

    assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    assert_eq!(
        std::fs::read_to_string(&db_path).unwrap(),
        r#"{"olx:a-ID1": {"title": "#
    );
}
