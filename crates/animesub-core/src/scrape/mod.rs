//! Streaming, tolerant tag-event scrapers over the catalog's legacy HTML.
//!
//! Neither scraper builds a DOM tree; both scan accumulated text for literal
//! anchor substrings and assemble records with small explicit state
//! machines, tolerating malformed or truncated markup the way a hand-rolled
//! tag scanner must.
//!
//! Callers are expected to decode ISO-8859-2 bytes to `String` via
//! `encoding_rs` before feeding either scraper — these modules only ever see
//! already-decoded text.

pub mod catalog;
pub mod search;

pub use catalog::CatalogScraper;
pub use search::SearchScraper;
