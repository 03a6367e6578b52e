//! Markup fixtures and an in-memory store for crawler tests

use crate::storage::{RecordStore, RentalRecord};
use crate::StoreResult;
use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;

pub const FEED_BASE: &str = "http://olx.test/nedvizhimost";

pub const SHOW_PHONE_BUTTON: &str =
    r#"<button data-testid="show-phone">Показать телефон</button>"#;
pub const AUTH_PROMPT: &str = r#"<div data-testid="prompt-message">Войдите, чтобы увидеть номер</div>"#;

/// URL of listing page `page` for the query "kiev"
pub fn feed_url(page: u32) -> String {
    format!("{}/kiev/?page={}", FEED_BASE, page)
}

/// URL the feed links to for a listing slug
pub fn detail_url(slug: &str) -> String {
    format!("http://olx.test/d/obyavlenie/{}.html", slug)
}

/// An OLX feed page listing `slugs`, with an optional last-page link
pub fn olx_feed(slugs: &[&str], last_page: Option<u32>) -> String {
    let offers: String = slugs
        .iter()
        .map(|slug| {
            format!(
                r#"<tr class="wrap"><td>
                    <div class="title-cell"><a class="linkWithHash" href="/d/obyavlenie/{slug}.html?sd=1">Дом {slug}</a></div>
                    <div class="price">9 000 грн.</div>
                    <div class="bottom-cell"><small>Киев</small><small>Сегодня 10:15</small></div>
                </td></tr>"#
            )
        })
        .collect();
    let last = last_page
        .map(|n| format!(r#"<a data-cy="page-link-last">{}</a>"#, n))
        .unwrap_or_default();

    format!(
        r#"<html><body><table class="offers">{}</table><span data-cy="page-link-current">1</span>{}</body></html>"#,
        offers, last
    )
}

/// A detail page assembled from body fragments
pub fn olx_detail(parts: &[&str]) -> String {
    format!("<html><body>{}</body></html>", parts.concat())
}

pub fn phones(text: &str) -> String {
    format!(r#"<div data-testid="phones-container">{}</div>"#, text)
}

pub fn properties(items: &[&str]) -> String {
    let items: String = items
        .iter()
        .map(|item| format!("<li><p>{}</p></li>", item))
        .collect();
    format!("<ul>{}</ul>", items)
}

pub fn description(text: &str) -> String {
    format!(r#"<div data-cy="ad_description">{}</div>"#, text)
}

/// A previously stored record for an OLX slug
pub fn stored_record(slug: &str) -> RentalRecord {
    let seen = Utc.with_ymd_and_hms(2024, 1, 10, 8, 30, 0).unwrap();
    RentalRecord {
        source: "olx".to_string(),
        url: detail_url(slug),
        title: format!("Дом {}", slug),
        price: "9 000 грн.".to_string(),
        kind: None,
        room_count: None,
        floor_count: None,
        guest_count: None,
        bed_count: None,
        bath_count: None,
        phone: None,
        description: None,
        posted_at: Some("Вчера".to_string()),
        first_scraped_at: seen,
        last_scraped_at: seen,
    }
}

/// Store kept entirely in memory that counts its flushes
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub records: BTreeMap<String, RentalRecord>,
    /// Record count at each `save`
    pub saves: Vec<usize>,
}

impl MemoryStore {
    pub fn insert(&mut self, identity: &str, record: RentalRecord) {
        self.records.insert(identity.to_string(), record);
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, identity: &str) -> Option<&RentalRecord> {
        self.records.get(identity)
    }

    fn set(&mut self, identity: &str, record: RentalRecord) {
        self.records.insert(identity.to_string(), record);
    }

    fn save(&mut self) -> StoreResult<()> {
        self.saves.push(self.records.len());
        Ok(())
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
