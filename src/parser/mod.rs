pub mod card;
pub mod page;
pub mod text;

pub use page::{extract_page, has_listings, ExtractError};
