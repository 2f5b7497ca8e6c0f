//! `DownloadPipeline` — resolves a session token for a subtitle id, POSTs
//! the download, detects the site's anti-bot security rejection, and
//! streams the archive. `download_and_extract` additionally hands the
//! archive to `ArchiveSelector`.
//!
//! State machine: **Resolving → Authorizing → Streaming → Closed**.
//! `SecurityError` is only raised from `Authorizing`; `SessionDataError`
//! only from `Resolving`; a transport error is fatal from any non-`Closed`
//! state and always moves the handle to `Closed`.

use std::sync::Arc;

use animesub_core::SessionToken;
use reqwest::Response;
use tokio::sync::Semaphore;

use crate::archive::select_and_read;
use crate::driver::SearchDriver;
use crate::error::ClientError;
use crate::input::FileOrDecomposed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Resolving,
    Authorizing,
    Streaming,
    Closed,
}

/// A single download in flight. `content_length`/`filename` are populated
/// once `Authorizing` succeeds; the byte stream is consumed via
/// `next_chunk` and releases the underlying response on every exit path.
pub struct DownloadHandle {
    state: PipelineState,
    filename: String,
    content_length: Option<u64>,
    response: Option<Response>,
    pending_first_chunk: Option<bytes::Bytes>,
}

impl DownloadHandle {
    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Reads the next chunk of the archive body, or `None` at end of
    /// stream. Moves to `Closed` once the body is exhausted or on error.
    /// The chunk already sniffed during `Authorizing` (to detect a
    /// `SecurityError` rejection) is drained first.
    pub async fn next_chunk(&mut self) -> Result<Option<bytes::Bytes>, ClientError> {
        if let Some(chunk) = self.pending_first_chunk.take() {
            return Ok(Some(chunk));
        }
        let Some(response) = self.response.as_mut() else {
            return Ok(None);
        };
        let url = response.url().to_string();
        match response.chunk().await {
            Ok(Some(chunk)) => Ok(Some(chunk)),
            Ok(None) => {
                self.close();
                Ok(None)
            }
            Err(source) => {
                self.close();
                Err(ClientError::Transport { url, source })
            }
        }
    }

    /// Reads the entire remaining body into memory.
    pub async fn read_to_end(mut self) -> Result<Vec<u8>, ClientError> {
        let mut buf = Vec::new();
        while let Some(chunk) = self.next_chunk().await? {
            buf.extend_from_slice(&chunk);
        }
        Ok(buf)
    }

    fn close(&mut self) {
        self.state = PipelineState::Closed;
        self.response = None;
    }
}

impl Drop for DownloadHandle {
    fn drop(&mut self) {
        // Response/socket are released regardless of how the handle goes
        // out of scope: success, early abandonment, or error.
        self.response = None;
    }
}

pub struct DownloadPipeline<'a> {
    driver: &'a SearchDriver,
    semaphore: Option<Arc<Semaphore>>,
}

impl<'a> DownloadPipeline<'a> {
    pub fn new(driver: &'a SearchDriver) -> Self {
        DownloadPipeline {
            driver,
            semaphore: None,
        }
    }

    /// Bounds concurrent `download`/`download_and_extract` calls across
    /// every pipeline sharing this semaphore.
    pub fn with_semaphore(driver: &'a SearchDriver, semaphore: Arc<Semaphore>) -> Self {
        DownloadPipeline {
            driver,
            semaphore: Some(semaphore),
        }
    }

    /// Drives `Resolving → Authorizing → Streaming`, returning a handle the
    /// caller reads the archive body from.
    pub async fn download(
        &self,
        decomposed: &animesub_parse::DecomposedFileName,
        subtitle_id: u64,
    ) -> Result<DownloadHandle, ClientError> {
        // Resolving
        let token = self
            .driver
            .find_session_token(decomposed, subtitle_id)
            .await?
            .ok_or(ClientError::SessionData { subtitle_id })?;

        let _permit = match &self.semaphore {
            Some(sem) => Some(sem.clone().acquire_owned().await.expect("semaphore never closed")),
            None => None,
        };

        // Authorizing
        self.post_download(token).await
    }

    /// Drives `Resolving → Authorizing → Streaming` for a bare subtitle id,
    /// with no file name or title to search by — used by the CLI's
    /// standalone `download <id>` command. Resolves the session token via
    /// the per-record detail page instead of re-driving a title search.
    pub async fn download_by_id(&self, subtitle_id: u64) -> Result<DownloadHandle, ClientError> {
        let token = self
            .driver
            .session_token_by_id(subtitle_id)
            .await?
            .ok_or(ClientError::SessionData { subtitle_id })?;

        let _permit = match &self.semaphore {
            Some(sem) => Some(sem.clone().acquire_owned().await.expect("semaphore never closed")),
            None => None,
        };

        self.post_download(token).await
    }

    async fn post_download(&self, token: SessionToken) -> Result<DownloadHandle, ClientError> {
        let url = format!("{}/sciagnij.php", self.driver.config().general.base_url);
        tracing::debug!(subtitle_id = token.subtitle_id, "authorizing download");
        let response = self
            .driver
            .client()
            .post(&url)
            .header(reqwest::header::COOKIE, format!("ansi_sciagnij={}", token.cookie))
            .form(&[("id", token.subtitle_id.to_string()), ("sh", token.sh.clone())])
            .send()
            .await
            .map_err(|source| ClientError::Transport { url: url.clone(), source })?
            .error_for_status()
            .map_err(|source| ClientError::Transport { url: url.clone(), source })?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if content_type.contains("text/html") {
            tracing::warn!(subtitle_id = token.subtitle_id, "security check rejected token");
            return Err(ClientError::Security {
                subtitle_id: token.subtitle_id,
                sh: token.sh,
                cookie: token.cookie,
            });
        }

        let filename = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_disposition_filename)
            .unwrap_or_default();

        let content_length = response.content_length();

        // A handful of sites still omit a useful content-type and only
        // signal rejection via a body that starts with `<html`; peek at the
        // first bytes before committing to Streaming.
        let mut response = response;
        let first_chunk = response
            .chunk()
            .await
            .map_err(|source| ClientError::Transport { url: url.clone(), source })?;

        if let Some(chunk) = &first_chunk {
            if chunk.len() >= 5 && chunk[..5].eq_ignore_ascii_case(b"<html") {
                return Err(ClientError::Security {
                    subtitle_id: token.subtitle_id,
                    sh: token.sh,
                    cookie: token.cookie,
                });
            }
        }

        let handle = DownloadHandle {
            state: PipelineState::Streaming,
            filename,
            content_length,
            response: Some(response),
            pending_first_chunk: first_chunk,
        };

        Ok(handle)
    }

    /// `download_and_extract(file_or_decomposed, subtitle_id)`: downloads
    /// the archive, lists entries, and picks the one that best matches the
    /// request via `ArchiveSelector`.
    pub async fn download_and_extract(
        &self,
        input: impl Into<FileOrDecomposed>,
        subtitle_id: u64,
    ) -> Result<animesub_core::ExtractedSubtitle, ClientError> {
        let decomposed = input.into().into_decomposed();
        let handle = self.download(&decomposed, subtitle_id).await?;
        let bytes = handle.read_to_end().await?;
        let (name, contents) = select_and_read(&bytes, &decomposed)?;
        Ok(animesub_core::ExtractedSubtitle {
            archive_entry_name: name,
            contents,
        })
    }
}

fn parse_content_disposition_filename(header: &str) -> Option<String> {
    for part in header.split(';') {
        let part = part.trim();
        if let Some(rest) = part.strip_prefix("filename=") {
            let unquoted = rest.trim_matches('"');
            return Some(unquoted.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quoted_filename() {
        let header = r#"attachment; filename="test_subtitle.zip""#;
        assert_eq!(
            parse_content_disposition_filename(header).as_deref(),
            Some("test_subtitle.zip")
        );
    }

    #[test]
    fn parses_filename_with_spaces() {
        let header = r#"attachment; filename="my file.zip""#;
        assert_eq!(
            parse_content_disposition_filename(header).as_deref(),
            Some("my file.zip")
        );
    }

    #[test]
    fn parses_unquoted_filename() {
        let header = "attachment; filename=plain.zip";
        assert_eq!(
            parse_content_disposition_filename(header).as_deref(),
            Some("plain.zip")
        );
    }

    #[test]
    fn missing_filename_is_none() {
        assert_eq!(parse_content_disposition_filename("attachment"), None);
    }

    mod end_to_end {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        use super::super::*;
        use crate::config::{AppConfig, DownloadConfig, GeneralConfig, SearchConfig};

        fn config_for(base_url: String) -> AppConfig {
            AppConfig {
                general: GeneralConfig {
                    base_url,
                    request_timeout_secs: 5,
                },
                search: SearchConfig {
                    sort_by: "traf".to_string(),
                    title_type: "org".to_string(),
                    page_limit: 0,
                },
                download: DownloadConfig {
                    max_concurrent_downloads: 0,
                },
            }
        }

        #[tokio::test]
        async fn download_by_id_streams_the_archive_body() {
            let server = MockServer::start().await;
            let row = r#"<!--WYNIK_START id=12345 sh=abc123--><td>1</td><td>2024-01-15</td><td>Test Anime</td><!--WYNIK_END-->"#;
            Mock::given(method("GET"))
                .and(path("/pokaz.php"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_string(row)
                        .insert_header("Set-Cookie", "ansi_sciagnij=cookievalue; Path=/"),
                )
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/sciagnij.php"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_bytes(b"PK\x03\x04fake archive bytes".to_vec())
                        .insert_header("Content-Type", "application/zip")
                        .insert_header(
                            "Content-Disposition",
                            r#"attachment; filename="test_subtitle.zip""#,
                        ),
                )
                .mount(&server)
                .await;

            let driver = SearchDriver::new(config_for(server.uri())).unwrap();
            let pipeline = DownloadPipeline::new(&driver);
            let mut handle = pipeline.download_by_id(12345).await.unwrap();

            assert_eq!(handle.filename(), "test_subtitle.zip");
            assert_eq!(handle.state(), PipelineState::Streaming);

            let bytes = handle.next_chunk().await.unwrap().unwrap();
            assert!(bytes.starts_with(b"PK\x03\x04"));
        }

        #[tokio::test]
        async fn download_by_id_fails_without_a_captured_token() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/pokaz.php"))
                .respond_with(ResponseTemplate::new(200).set_body_string("no row here"))
                .mount(&server)
                .await;

            let driver = SearchDriver::new(config_for(server.uri())).unwrap();
            let pipeline = DownloadPipeline::new(&driver);
            let err = pipeline.download_by_id(99999).await.unwrap_err();

            assert!(matches!(err, ClientError::SessionData { subtitle_id: 99999 }));
        }

        #[tokio::test]
        async fn html_response_body_raises_security_error() {
            let server = MockServer::start().await;
            let row = r#"<!--WYNIK_START id=777 sh=deadbeef--><td>1</td><td>2024-01-15</td><td>Test Anime</td><!--WYNIK_END-->"#;
            Mock::given(method("GET"))
                .and(path("/pokaz.php"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_string(row)
                        .insert_header("Set-Cookie", "ansi_sciagnij=cookievalue; Path=/"),
                )
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/sciagnij.php"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_string("<html><body>blocked, bot detected</body></html>"),
                )
                .mount(&server)
                .await;

            let driver = SearchDriver::new(config_for(server.uri())).unwrap();
            let pipeline = DownloadPipeline::new(&driver);
            let err = pipeline.download_by_id(777).await.unwrap_err();

            match err {
                ClientError::Security { subtitle_id, sh, cookie } => {
                    assert_eq!(subtitle_id, 777);
                    assert_eq!(sh, "deadbeef");
                    assert_eq!(cookie, "cookievalue");
                }
                other => panic!("expected ClientError::Security, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn download_server_error_surfaces_as_transport_error() {
            let server = MockServer::start().await;
            let row = r#"<!--WYNIK_START id=555 sh=abcabc--><td>1</td><td>2024-01-15</td><td>Test Anime</td><!--WYNIK_END-->"#;
            Mock::given(method("GET"))
                .and(path("/pokaz.php"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_string(row)
                        .insert_header("Set-Cookie", "ansi_sciagnij=cookievalue; Path=/"),
                )
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/sciagnij.php"))
                .respond_with(ResponseTemplate::new(500))
                .mount(&server)
                .await;

            let driver = SearchDriver::new(config_for(server.uri())).unwrap();
            let pipeline = DownloadPipeline::new(&driver);
            let err = pipeline.download_by_id(555).await.unwrap_err();

            assert!(matches!(err, ClientError::Transport { .. }));
        }
    }
}
