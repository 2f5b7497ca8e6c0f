//! The data types shared by every component: what a catalog/search row looks
//! like once parsed, what a download session token looks like, and what
//! comes out of a downloaded archive.

use serde::{Deserialize, Serialize};

/// A single subtitle listing, as scraped from either the catalog page or the
/// per-anime search results page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubtitleRecord {
    pub id: u64,
    /// First episode this listing covers. `0` for movies/specials that are
    /// not episode-numbered.
    pub episode: u32,
    /// Last episode this listing covers — equal to `episode` for a
    /// single-episode release, greater for a pack.
    pub to_episode: u32,
    pub original_title: String,
    pub english_title: String,
    pub alt_title: String,
    /// ISO `YYYY-MM-DD`, kept as a string since the site never exposes a
    /// time component and nothing here needs date arithmetic.
    pub date: String,
    pub format: String,
    pub author: String,
    pub added_by: String,
    pub size: String,
    pub description: String,
    pub comment_count: u32,
    pub downloaded_times: u32,
    pub rating: SubtitlesRating,
}

impl SubtitleRecord {
    /// `true` when this record's episode range covers episode 0 only —
    /// movies and specials are not split into episodes.
    pub fn is_movie(&self) -> bool {
        self.episode == 0 && self.to_episode == 0
    }

    /// `true` when the record covers more than a single episode.
    pub fn is_pack(&self) -> bool {
        self.to_episode > self.episode
    }

    /// The normalized concatenation of every text field a fitness check can
    /// match against: both titles plus the free-text description.
    pub fn searchable_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.original_title, self.english_title, self.alt_title, self.description
        )
    }
}

/// Rating percentages, decoded from the catalog's three-bucket bar — not
/// raw vote counts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SubtitlesRating {
    pub bad: u32,
    pub average: u32,
    pub very_good: u32,
}

/// The `(sh, cookie)` pair that authorizes a single subtitle download.
/// Scoped to the record it was parsed alongside — see the module docs on
/// `DownloadPipeline` for why these are never cached or reused across
/// records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub subtitle_id: u64,
    pub sh: String,
    pub cookie: String,
}

/// A single subtitle file recovered from a downloaded archive.
#[derive(Debug, Clone)]
pub struct ExtractedSubtitle {
    pub archive_entry_name: String,
    pub contents: Vec<u8>,
}

impl ExtractedSubtitle {
    /// The file extension of the archive entry (`.ass`, `.srt`, ...),
    /// lowercased, without the leading dot.
    pub fn suffix(&self) -> Option<String> {
        self.archive_entry_name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.archive_entry_name)
            .map(|ext| ext.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SubtitleRecord {
        SubtitleRecord {
            id: 12345,
            episode: 1,
            to_episode: 1,
            original_title: "Test Anime".to_string(),
            english_title: "Test Anime English".to_string(),
            alt_title: String::new(),
            date: "2024-01-15".to_string(),
            format: "ass".to_string(),
            author: "Someone".to_string(),
            added_by: "User".to_string(),
            size: "10 KB".to_string(),
            description: "1080p".to_string(),
            comment_count: 2,
            downloaded_times: 100,
            rating: SubtitlesRating {
                bad: 0,
                average: 0,
                very_good: 10,
            },
        }
    }

    #[test]
    fn movie_detection() {
        let mut r = sample();
        r.episode = 0;
        r.to_episode = 0;
        assert!(r.is_movie());
        assert!(!r.is_pack());
    }

    #[test]
    fn pack_detection() {
        let mut r = sample();
        r.episode = 1;
        r.to_episode = 12;
        assert!(r.is_pack());
        assert!(!r.is_movie());
    }

    #[test]
    fn suffix_strips_extension() {
        let sub = ExtractedSubtitle {
            archive_entry_name: "GTO - 05.ass".to_string(),
            contents: vec![],
        };
        assert_eq!(sub.suffix().as_deref(), Some("ass"));
    }

    #[test]
    fn suffix_none_without_extension() {
        let sub = ExtractedSubtitle {
            archive_entry_name: "README".to_string(),
            contents: vec![],
        };
        assert_eq!(sub.suffix(), None);
    }

    #[test]
    fn record_round_trips_through_json() {
        let r = sample();
        let json = serde_json::to_string(&r).unwrap();
        let back: SubtitleRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }
}
