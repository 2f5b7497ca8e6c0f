//! `SearchScraper` — parses one search-results page into `SubtitleRecord`s
//! plus the per-row `sh` download token, and reports the total page count.
//!
//! Row markup assumption (the real site's exact markup is not present in
//! this crate's reference corpus, only behavioral test fixtures, so this is
//! a documented, internally-consistent stand-in — see `DESIGN.md`): each row
//! is delimited by HTML comments carrying the row's id and `sh` token,
//! `<!--WYNIK_START id=.. sh=..--> ... <!--WYNIK_END-->`, with fields as an
//! ordered run of `<td>...</td>` cells in between. The page reports its
//! total page count as Polish "Strona X z Y" ("page X of Y") text, or a
//! "no results" marker when the query had no hits.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{SubtitleRecord, SubtitlesRating};

static ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<!--WYNIK_START\s+id=(\d+)\s+sh=([A-Za-z0-9]+)-->(.*?)<!--WYNIK_END-->"#)
        .unwrap()
});
static CELL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?is)<td>(.*?)</td>"#).unwrap());
static PAGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)Strona\s+\d+\s+z\s+(\d+)"#).unwrap());
static NO_RESULTS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?i)Brak\s+wynik"#).unwrap());
static EPISODE_RANGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)-(\d+)$").unwrap());

const MOVIE_MARKER: &str = "FILM";

/// Parses search-results pages into records and per-row session tokens.
#[derive(Debug, Default)]
pub struct SearchScraper {
    buffer: String,
    records: Vec<SubtitleRecord>,
    tokens: Vec<(u64, String)>,
    total_pages: u32,
    seen_row_starts: usize,
}

impl SearchScraper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the next chunk of the page. `records()` grows monotonically as
    /// more complete rows become available.
    pub fn feed(&mut self, chunk: &str) {
        self.buffer.push_str(chunk);
        self.rescan();
    }

    pub fn records(&self) -> &[SubtitleRecord] {
        &self.records
    }

    /// `sh` tokens captured so far, keyed by record id.
    pub fn tokens(&self) -> &[(u64, String)] {
        &self.tokens
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    fn rescan(&mut self) {
        let row_count = ROW.find_iter(&self.buffer).count();
        if row_count > self.seen_row_starts {
            self.records.clear();
            self.tokens.clear();
            for caps in ROW.captures_iter(&self.buffer) {
                let id: u64 = match caps[1].parse() {
                    Ok(id) => id,
                    Err(_) => continue,
                };
                let sh = caps[2].to_string();
                let body = &caps[3];
                if let Some(record) = parse_row(id, body) {
                    self.records.push(record);
                    self.tokens.push((id, sh));
                }
            }
            self.seen_row_starts = row_count;
        }

        if NO_RESULTS.is_match(&self.buffer) {
            self.total_pages = 0;
        } else if let Some(caps) = PAGER.captures(&self.buffer) {
            if let Ok(n) = caps[1].parse() {
                self.total_pages = n;
            }
        }
    }
}

fn parse_row(id: u64, body: &str) -> Option<SubtitleRecord> {
    let cells: Vec<String> = CELL
        .captures_iter(body)
        .map(|c| c[1].trim().to_string())
        .collect();

    // episode, date, original_title, english_title, alt_title, format,
    // author, added_by, size, description, comment_count, downloaded_times,
    // rating_bad, rating_average, rating_very_good
    let get = |i: usize| cells.get(i).map(String::as_str).unwrap_or("");

    let (episode, to_episode) = parse_episode_cell(get(0));
    let date = parse_date(get(1));

    Some(SubtitleRecord {
        id,
        episode,
        to_episode,
        original_title: get(2).to_string(),
        english_title: get(3).to_string(),
        alt_title: get(4).to_string(),
        date,
        format: get(5).to_string(),
        author: get(6).to_string(),
        added_by: get(7).to_string(),
        size: get(8).to_string(),
        description: get(9).to_string(),
        comment_count: get(10).parse().unwrap_or(0),
        downloaded_times: get(11).parse().unwrap_or(0),
        rating: SubtitlesRating {
            bad: get(12).parse().unwrap_or(0),
            average: get(13).parse().unwrap_or(0),
            very_good: get(14).parse().unwrap_or(0),
        },
    })
}

fn parse_episode_cell(cell: &str) -> (u32, u32) {
    let trimmed = cell.trim();
    if trimmed.eq_ignore_ascii_case(MOVIE_MARKER) || trimmed.is_empty() {
        return (0, 0);
    }
    if let Some(caps) = EPISODE_RANGE.captures(trimmed) {
        let from: u32 = caps[1].parse().unwrap_or(0);
        let to: u32 = caps[2].parse().unwrap_or(from);
        return (from, to);
    }
    match trimmed.parse::<u32>() {
        Ok(n) => (n, n),
        Err(_) => (0, 0),
    }
}

/// Parses either `YYYY-MM-DD` or `DD.MM.YYYY` into canonical `YYYY-MM-DD`.
fn parse_date(cell: &str) -> String {
    let trimmed = cell.trim();
    if trimmed.len() == 10 && trimmed.as_bytes().get(4) == Some(&b'-') {
        return trimmed.to_string();
    }
    let parts: Vec<&str> = trimmed.split('.').collect();
    if parts.len() == 3 {
        if let (Ok(d), Ok(m), Ok(y)) = (
            parts[0].parse::<u32>(),
            parts[1].parse::<u32>(),
            parts[2].parse::<u32>(),
        ) {
            return format!("{y:04}-{m:02}-{d:02}");
        }
    }
    trimmed.to_string()
}
