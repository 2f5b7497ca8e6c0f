use thiserror::Error;

/// Errors raised by the networked half of the system: `SearchDriver`,
/// `DownloadPipeline`, and `ArchiveSelector`. One enum per crate boundary,
/// `#[from]` for wrapped causes, one `#[error]` message per operation. No
/// variant here is automatically retried.
///
/// There is no `Decompose` variant: `animesub-parse::parse` never fails — an
/// unparseable file name just yields a `DecomposedFileName` with its fields
/// absent, and that degrades to "no match" (a `None` result or a `0` fitness
/// score) the same way the streaming scrapers tolerate missing cells instead
/// of raising a malformed-page error. See `DESIGN.md`.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not obtain session data for subtitle {subtitle_id}")]
    SessionData { subtitle_id: u64 },

    #[error("download rejected by site security check for subtitle {subtitle_id}")]
    Security {
        subtitle_id: u64,
        sh: String,
        cookie: String,
    },

    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive is empty")]
    EmptyArchive,

    #[error("malformed archive: {0}")]
    Malformed(#[from] zip::result::ZipError),

    #[error("failed to read archive entry: {0}")]
    Read(#[from] std::io::Error),
}
