//! The networked half of the system: everything that owns a
//! `reqwest::Client`. `animesub-core`'s scrapers and scorer are pure and
//! never touch the network; this crate drives the HTTP requests that feed
//! them and the download/extract pipeline built on top.

pub mod archive;
pub mod config;
pub mod driver;
pub mod error;
pub mod input;
pub mod pipeline;

pub use config::AppConfig;
pub use driver::SearchDriver;
pub use error::{ArchiveError, ClientError};
pub use input::FileOrDecomposed;
pub use pipeline::{DownloadHandle, DownloadPipeline, PipelineState};
