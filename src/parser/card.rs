use std::sync::LazyLock;

use scraper::{ElementRef, Selector};
use tracing::warn;

use super::text::normalize;
use crate::record::Record;

static NAME_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".realtorCardName").unwrap());
static ROLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".realtorCardTitle").unwrap());
static COMPANY_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".realtorCardOfficeName").unwrap());
static ADDRESS_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".realtorCardOfficeAddress").unwrap());
static NUMBER_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".realtorCardContactNumber.TelephoneNumber").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Role,
    Company,
    Address,
    Number,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Role => "role",
            Field::Company => "company",
            Field::Address => "address",
            Field::Number => "number",
        }
    }

    fn selector(self) -> &'static Selector {
        match self {
            Field::Name => &NAME_SEL,
            Field::Role => &ROLE_SEL,
            Field::Company => &COMPANY_SEL,
            Field::Address => &ADDRESS_SEL,
            Field::Number => &NUMBER_SEL,
        }
    }
}

/// Pull the five contact fields out of one listing card.
///
/// A field whose element is missing comes back empty and is logged; it never
/// affects the other fields.
pub fn extract_fields(card: ElementRef<'_>) -> Record {
    let get = |field: Field| -> String {
        match card.select(field.selector()).next() {
            Some(el) => normalize(&el.text().collect::<String>()),
            None => {
                warn!(
                    "Could not get {} for card {}",
                    field.as_str(),
                    card_label(card)
                );
                String::new()
            }
        }
    };

    Record {
        name: get(Field::Name),
        role: get(Field::Role),
        company: get(Field::Company),
        address: get(Field::Address),
        number: get(Field::Number),
    }
}

/// Identify a card in log lines: its id when present, else its markup.
fn card_label(card: ElementRef<'_>) -> String {
    match card.value().id() {
        Some(id) => id.to_string(),
        None => card.html(),
    }
}
