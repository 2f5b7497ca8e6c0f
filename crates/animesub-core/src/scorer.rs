//! `FitnessScorer` — the tiered, bit-packed ranking function that picks the
//! single best subtitle record for a decomposed file name out of a noisy
//! catalog. See the module docs on `score` for the exact bit layout.

use std::collections::HashSet;

use animesub_parse::DecomposedFileName;

use crate::model::SubtitleRecord;
use crate::normalize::normalize;
use crate::similarity::ratio;

const TITLE_SIMILARITY_THRESHOLD: f64 = 0.60;

/// Something that can be scored against a `SubtitleRecord`: either an
/// already-decomposed file name, or a raw file name string (decomposed on
/// the fly via `animesub_parse::parse`).
pub enum FileOrDecomposed<'a> {
    Decomposed(&'a DecomposedFileName),
    RawFileName(&'a str),
}

impl<'a> From<&'a DecomposedFileName> for FileOrDecomposed<'a> {
    fn from(d: &'a DecomposedFileName) -> Self {
        FileOrDecomposed::Decomposed(d)
    }
}

impl<'a> From<&'a str> for FileOrDecomposed<'a> {
    fn from(s: &'a str) -> Self {
        FileOrDecomposed::RawFileName(s)
    }
}

/// Computes the total-ordered fitness score of `record` against `input`.
/// Returns `0` when any hard filter fails.
pub fn score<'a>(record: &SubtitleRecord, input: impl Into<FileOrDecomposed<'a>>) -> u32 {
    let owned;
    let decomposed: &DecomposedFileName = match input.into() {
        FileOrDecomposed::Decomposed(d) => d,
        FileOrDecomposed::RawFileName(s) => {
            owned = animesub_parse::parse(s);
            &owned
        }
    };

    let Some(title_percent) = title_percent(record, decomposed) else {
        return 0;
    };

    if !hard_filters_pass(record, decomposed) {
        return 0;
    }

    let haystack = tokenize_for_matching(&record.searchable_text());

    let c = tier2_count(decomposed, &haystack);
    let b = tier3_bit(decomposed, &haystack);
    let a = tier4_count(decomposed, &haystack);

    ((title_percent + 1) << 8) | (c << 5) | (b << 4) | a
}

/// Best title similarity percent (integer-rounded, 60-100) across
/// `{original_title, english_title, alt_title}`, or `None` when it fails to
/// clear the threshold or `anime_title` is absent.
fn title_percent(record: &SubtitleRecord, decomposed: &DecomposedFileName) -> Option<u32> {
    let anime_title = decomposed.anime_title.as_deref()?;
    if anime_title.trim().is_empty() {
        return None;
    }
    let normalized_query = normalize(anime_title);

    let candidates = [
        &record.original_title,
        &record.english_title,
        &record.alt_title,
    ];
    if candidates.iter().all(|c| c.trim().is_empty()) {
        return None;
    }

    let best = candidates
        .iter()
        .map(|c| ratio(&normalized_query, &normalize(c)))
        .fold(0.0_f64, f64::max);

    if best < TITLE_SIMILARITY_THRESHOLD {
        return None;
    }
    Some((best * 100.0).round() as u32)
}

fn hard_filters_pass(record: &SubtitleRecord, decomposed: &DecomposedFileName) -> bool {
    if record.is_movie() {
        return decomposed.episode_number.is_none();
    }
    match decomposed
        .episode_number
        .as_deref()
        .and_then(|e| e.parse::<u32>().ok())
    {
        Some(e) => record.episode <= e && e <= record.to_episode,
        None => false,
    }
}

/// Splits `s` into maximal alphanumeric runs, normalizing each run the same
/// way `normalize` does per word (roman fold, leading-zero strip, lowercase,
/// ASCII-alnum only).
fn tokenize_for_matching(s: &str) -> HashSet<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(normalize)
        .filter(|t| !t.is_empty())
        .collect()
}

fn value_matches(value: &str, haystack: &HashSet<String>) -> bool {
    tokenize_for_matching(value)
        .iter()
        .any(|tok| haystack.contains(tok))
}

fn list_matches(values: &[String], haystack: &HashSet<String>) -> bool {
    values.iter().any(|v| value_matches(v, haystack))
}

fn tier2_count(decomposed: &DecomposedFileName, haystack: &HashSet<String>) -> u32 {
    let mut count = 0;
    if let Some(v) = &decomposed.file_checksum {
        if value_matches(v, haystack) {
            count += 1;
        }
    }
    if let Some(v) = &decomposed.file_name {
        if value_matches(v, haystack) {
            count += 1;
        }
    }
    if let Some(v) = &decomposed.source {
        if value_matches(v, haystack) {
            count += 1;
        }
    }
    count.min(3)
}

fn tier3_bit(decomposed: &DecomposedFileName, haystack: &HashSet<String>) -> u32 {
    match &decomposed.release_group {
        Some(v) if value_matches(v, haystack) => 1,
        _ => 0,
    }
}

fn tier4_count(decomposed: &DecomposedFileName, haystack: &HashSet<String>) -> u32 {
    let mut count = 0;
    if let Some(v) = &decomposed.anime_year {
        if value_matches(v, haystack) {
            count += 1;
        }
    }
    if let Some(v) = &decomposed.anime_season {
        if value_matches(v, haystack) {
            count += 1;
        }
    }
    if let Some(v) = &decomposed.anime_type {
        if value_matches(v, haystack) {
            count += 1;
        }
    }
    if list_matches(&decomposed.video_term, haystack) {
        count += 1;
    }
    if let Some(v) = &decomposed.video_resolution {
        if value_matches(v, haystack) {
            count += 1;
        }
    }
    if list_matches(&decomposed.audio_term, haystack) {
        count += 1;
    }
    count.min(6)
}
