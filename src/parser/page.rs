use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use super::card::extract_fields;
use crate::record::PageRecords;

static WITH_ID: LazyLock<Selector> = LazyLock::new(|| Selector::parse("[id]").unwrap());
static CARD_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^RealtorCard-\d+$").unwrap());

#[derive(Debug, Error)]
pub enum ExtractError {
    /// A rendered page is expected to hold at least one listing card.
    #[error("no listing cards found on page")]
    NoListings,
}

/// Every listing card on the page, in document order.
pub fn find_cards(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document
        .select(&WITH_ID)
        .filter(|el| el.value().id().is_some_and(|id| CARD_ID_RE.is_match(id)))
}

pub fn has_listings(document: &Html) -> bool {
    find_cards(document).next().is_some()
}

/// Map every listing card on the page to a record.
pub fn extract_page(document: &Html) -> Result<PageRecords, ExtractError> {
    let records: PageRecords = find_cards(document).map(extract_fields).collect();
    if records.is_empty() {
        return Err(ExtractError::NoListings);
    }
    Ok(records)
}
