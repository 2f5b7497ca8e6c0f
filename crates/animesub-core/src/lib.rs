//! Pure domain logic shared by every caller: string normalization, the data
//! model, the fitness scorer, and the streaming HTML scrapers. Nothing in
//! this crate performs network I/O — scrapers consume bytes/`str` they are
//! handed; `animesub-client` owns the `reqwest::Client` that feeds them.

pub mod model;
pub mod normalize;
pub mod scorer;
pub mod scrape;
pub mod similarity;

pub use model::{ExtractedSubtitle, SessionToken, SubtitleRecord, SubtitlesRating};
pub use normalize::normalize;
pub use scorer::score;
pub use scrape::{CatalogScraper, SearchScraper};
