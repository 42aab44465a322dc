pub mod catalog_finder;
pub mod message_match;

pub use catalog_finder::{looks_like_catalog, CatalogFinder};
pub use message_match::{MatchScope, MatchedField, MessageMatch, MessageMatcher};
