//! `SearchDriver` — issues the paginated HTTP requests against the catalog
//! and search endpoints and feeds their (ISO-8859-2-decoded) bodies into
//! `animesub_core`'s pure scrapers.

use std::collections::VecDeque;
use std::time::Duration;

use animesub_core::model::SubtitleRecord;
use animesub_core::scrape::{CatalogScraper, SearchScraper};
use animesub_core::{scorer, SessionToken};
use animesub_parse::DecomposedFileName;
use futures::stream::{self, Stream};
use reqwest::Client;

use crate::config::AppConfig;
use crate::error::ClientError;
use crate::input::FileOrDecomposed;

struct SearchPage {
    records: Vec<SubtitleRecord>,
    tokens: Vec<(u64, String)>,
    cookie: Option<String>,
    total_pages: u32,
}

pub struct SearchDriver {
    client: Client,
    config: AppConfig,
}

impl SearchDriver {
    pub fn new(config: AppConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.general.request_timeout_secs))
            .build()
            .map_err(|source| ClientError::Transport {
                url: config.general.base_url.clone(),
                source,
            })?;
        Ok(SearchDriver { client, config })
    }

    pub fn with_client(client: Client, config: AppConfig) -> Self {
        SearchDriver { client, config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The shared `reqwest::Client`, reused by `DownloadPipeline` so the
    /// download POST honors the same per-attempt timeout as every other
    /// request this driver issues.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Resolves `title` (with optional `season`/`year` hints) to a search
    /// URL via the catalog page. Returns `None` when the catalog has no
    /// matching entry.
    pub async fn resolve_catalog_url(
        &self,
        title: &str,
        season: Option<&str>,
        year: Option<&str>,
    ) -> Result<Option<String>, ClientError> {
        let letter = first_letter(title);
        let url = format!("{}/katalog.php", self.config.general.base_url);
        tracing::debug!(title, letter = %letter, "resolving catalog url");
        let body = self
            .get_decoded(&url, &[("S", letter.as_str())])
            .await?;

        let mut scraper = CatalogScraper::new(title, season, year);
        scraper.feed(&body);
        Ok(scraper.finish())
    }

    /// Issues paginated search requests and yields records as they are
    /// parsed, honoring `page_limit` (`None`/`0` means no cap — drain every
    /// page the site reports). `sort_by`/`title_type` default to the
    /// configured values when omitted.
    pub fn search<'a>(
        &'a self,
        title: &str,
        sort_by: Option<&str>,
        title_type: Option<&str>,
        page_limit: Option<u32>,
    ) -> impl Stream<Item = Result<SubtitleRecord, ClientError>> + 'a {
        let query_url = self.build_search_url(
            title,
            sort_by.unwrap_or(&self.config.search.sort_by),
            title_type.unwrap_or(&self.config.search.title_type),
        );
        self.search_url(query_url, page_limit)
    }

    fn build_search_url(&self, title: &str, sort_by: &str, title_type: &str) -> String {
        format!(
            "szukaj.php?szukane={}&pTitle={}&pSortuj={}",
            urlencoding::encode(title),
            title_type,
            sort_by,
        )
    }

    /// Drains every page of an already-resolved search URL (as produced by
    /// `resolve_catalog_url` or `build_search_url`).
    fn search_url<'a>(
        &'a self,
        query_url: String,
        page_limit: Option<u32>,
    ) -> impl Stream<Item = Result<SubtitleRecord, ClientError>> + 'a {
        struct State<'a> {
            driver: &'a SearchDriver,
            query_url: String,
            page: u32,
            page_limit: Option<u32>,
            pending: VecDeque<SubtitleRecord>,
            total_pages: Option<u32>,
            finished: bool,
        }

        let initial = State {
            driver: self,
            query_url,
            page: 1,
            page_limit,
            pending: VecDeque::new(),
            total_pages: None,
            finished: false,
        };

        stream::try_unfold(initial, |mut state| async move {
            loop {
                if let Some(record) = state.pending.pop_front() {
                    return Ok(Some((record, state)));
                }
                if state.finished {
                    return Ok(None);
                }
                if let Some(total) = state.total_pages {
                    let capped = state.page_limit.map(|l| l > 0 && state.page > l).unwrap_or(false);
                    if state.page > total || capped {
                        state.finished = true;
                        return Ok(None);
                    }
                }
                let fetched = state
                    .driver
                    .fetch_search_page(&state.query_url, state.page)
                    .await?;
                state.total_pages = Some(fetched.total_pages);
                let got_any = !fetched.records.is_empty();
                state.pending.extend(fetched.records);
                state.page += 1;
                if !got_any {
                    state.finished = true;
                    if state.pending.is_empty() {
                        return Ok(None);
                    }
                }
            }
        })
    }

    /// `find_best(file_or_decomposed)`: resolves the catalog entry for the
    /// decomposed title, scores every record across every result page with
    /// `sort_by = FITNESS` semantics (fitness-sorted is just "every page,
    /// pick the max score" since the scorer is deterministic), and returns
    /// the single highest-scoring record.
    pub async fn find_best(
        &self,
        input: impl Into<FileOrDecomposed>,
    ) -> Result<Option<SubtitleRecord>, ClientError> {
        let decomposed = input.into().into_decomposed();
        let Some(title) = decomposed.anime_title.clone() else {
            return Ok(None);
        };

        let Some(url) = self
            .resolve_catalog_url(&title, decomposed.anime_season.as_deref(), decomposed.anime_year.as_deref())
            .await?
        else {
            return Ok(None);
        };

        let mut best: Option<(u32, SubtitleRecord)> = None;
        let mut page = 1;
        let mut total_pages = 1;
        while page <= total_pages {
            let fetched = self.fetch_search_page(&url, page).await?;
            total_pages = fetched.total_pages.max(1);
            for record in fetched.records {
                let s = scorer::score(&record, &decomposed);
                if s > 0 && best.as_ref().map(|(bs, _)| s > *bs).unwrap_or(true) {
                    best = Some((s, record));
                }
            }
            page += 1;
        }

        Ok(best.map(|(_, record)| record))
    }

    /// Re-drives the search for `decomposed`'s title, capturing the
    /// `(sh, cookie)` pair for `subtitle_id` the first time it is observed.
    /// Tokens are session-scoped to the page that delivered them and are
    /// never cached or reused across a different page's response.
    pub async fn find_session_token(
        &self,
        decomposed: &DecomposedFileName,
        subtitle_id: u64,
    ) -> Result<Option<SessionToken>, ClientError> {
        let Some(title) = decomposed.anime_title.as_deref() else {
            return Ok(None);
        };
        let Some(url) = self
            .resolve_catalog_url(title, decomposed.anime_season.as_deref(), decomposed.anime_year.as_deref())
            .await?
        else {
            return Ok(None);
        };

        let mut page = 1;
        let mut total_pages = 1;
        while page <= total_pages {
            let fetched = self.fetch_search_page(&url, page).await?;
            total_pages = fetched.total_pages.max(1);
            if let Some((_, sh)) = fetched.tokens.iter().find(|(id, _)| *id == subtitle_id) {
                if let Some(cookie) = fetched.cookie {
                    return Ok(Some(SessionToken {
                        subtitle_id,
                        sh: sh.clone(),
                        cookie,
                    }));
                }
            }
            page += 1;
        }
        Ok(None)
    }

    /// Resolves a `SessionToken` for `subtitle_id` directly, without a
    /// known title — used by the CLI's standalone `download <id>` command,
    /// which has no file name to search by. Hits the per-record detail page
    /// (`pokaz.php?id=`), which carries the same row markup as a
    /// single-result search page, including its own `sh` token and
    /// `ansi_sciagnij` cookie. See `DESIGN.md` for the assumptions behind
    /// this endpoint.
    pub async fn session_token_by_id(&self, subtitle_id: u64) -> Result<Option<SessionToken>, ClientError> {
        let url = format!("{}/pokaz.php", self.config.general.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("id", subtitle_id.to_string())])
            .send()
            .await
            .map_err(|source| ClientError::Transport { url: url.clone(), source })?
            .error_for_status()
            .map_err(|source| ClientError::Transport { url: url.clone(), source })?;

        let cookie = response
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|v| {
                v.strip_prefix("ansi_sciagnij=")
                    .map(|rest| rest.split(';').next().unwrap_or(rest).to_string())
            });

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport { url: url.clone(), source })?;
        let body = decode_iso_8859_2(&bytes);

        let mut scraper = SearchScraper::new();
        scraper.feed(&body);

        let Some((_, sh)) = scraper.tokens().iter().find(|(id, _)| *id == subtitle_id) else {
            return Ok(None);
        };
        let Some(cookie) = cookie else {
            return Ok(None);
        };
        Ok(Some(SessionToken {
            subtitle_id,
            sh: sh.clone(),
            cookie,
        }))
    }

    async fn fetch_search_page(&self, query_url: &str, page: u32) -> Result<SearchPage, ClientError> {
        let url = format!("{}/{query_url}", self.config.general.base_url);
        tracing::debug!(url = %url, page, "fetching search page");
        let response = self
            .client
            .get(&url)
            .query(&[("strona", page.to_string())])
            .send()
            .await
            .map_err(|source| ClientError::Transport { url: url.clone(), source })?
            .error_for_status()
            .map_err(|source| ClientError::Transport { url: url.clone(), source })?;

        let cookie = response
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|v| v.strip_prefix("ansi_sciagnij=").map(|rest| {
                rest.split(';').next().unwrap_or(rest).to_string()
            }));

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport { url: url.clone(), source })?;
        let body = decode_iso_8859_2(&bytes);

        let mut scraper = SearchScraper::new();
        scraper.feed(&body);

        Ok(SearchPage {
            records: scraper.records().to_vec(),
            tokens: scraper.tokens().to_vec(),
            cookie,
            total_pages: scraper.total_pages(),
        })
    }

    async fn get_decoded(&self, url: &str, query: &[(&str, &str)]) -> Result<String, ClientError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| ClientError::Transport { url: url.to_string(), source })?
            .error_for_status()
            .map_err(|source| ClientError::Transport { url: url.to_string(), source })?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport { url: url.to_string(), source })?;
        Ok(decode_iso_8859_2(&bytes))
    }
}

fn decode_iso_8859_2(bytes: &[u8]) -> String {
    let (text, _, _) = encoding_rs::ISO_8859_2.decode(bytes);
    text.into_owned()
}

/// The first letter of the normalized title, folded to a plain Latin
/// uppercase letter — the catalog is keyed by `katalog.php?S={letter}`.
fn first_letter(title: &str) -> String {
    animesub_core::normalize(title)
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase().to_string())
        .unwrap_or_else(|| "A".to_string())
}
