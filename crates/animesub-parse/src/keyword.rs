//! Keyword lookup table: a `KeywordEntry` per recognized token, backed by a
//! compile-time `phf::Map` and a `bitflags` set of per-entry flags, targeting
//! the attribute set `DecomposedFileName` exposes.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KeywordFlags: u8 {
        /// Only trusted when the token appeared inside a bracketed group —
        /// too common as ordinary English outside of one (e.g. "VERSION").
        const AMBIGUOUS = 0b0000_0001;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordKind {
    VideoTerm,
    VideoResolution,
    AudioTerm,
    Source,
    AnimeType,
    ReleaseVersionPrefix,
}

#[derive(Debug, Clone, Copy)]
pub struct KeywordEntry {
    pub kind: KeywordKind,
    pub flags: KeywordFlags,
}

impl KeywordEntry {
    const fn new(kind: KeywordKind) -> Self {
        KeywordEntry {
            kind,
            flags: KeywordFlags::empty(),
        }
    }

    const fn ambiguous(kind: KeywordKind) -> Self {
        KeywordEntry {
            kind,
            flags: KeywordFlags::AMBIGUOUS,
        }
    }
}

static KEYWORDS: phf::Map<&'static str, KeywordEntry> = phf::phf_map! {
    // Video terms
    "H264" => KeywordEntry::new(KeywordKind::VideoTerm),
    "H.264" => KeywordEntry::new(KeywordKind::VideoTerm),
    "X264" => KeywordEntry::new(KeywordKind::VideoTerm),
    "X265" => KeywordEntry::new(KeywordKind::VideoTerm),
    "HEVC" => KeywordEntry::new(KeywordKind::VideoTerm),
    "AVC" => KeywordEntry::new(KeywordKind::VideoTerm),
    "10BIT" => KeywordEntry::new(KeywordKind::VideoTerm),
    "8BIT" => KeywordEntry::new(KeywordKind::VideoTerm),
    "HDR" => KeywordEntry::new(KeywordKind::VideoTerm),

    // Resolutions
    "480P" => KeywordEntry::new(KeywordKind::VideoResolution),
    "720P" => KeywordEntry::new(KeywordKind::VideoResolution),
    "1080P" => KeywordEntry::new(KeywordKind::VideoResolution),
    "1440P" => KeywordEntry::new(KeywordKind::VideoResolution),
    "2160P" => KeywordEntry::new(KeywordKind::VideoResolution),
    "4K" => KeywordEntry::new(KeywordKind::VideoResolution),

    // Audio terms
    "AAC" => KeywordEntry::new(KeywordKind::AudioTerm),
    "AC3" => KeywordEntry::new(KeywordKind::AudioTerm),
    "FLAC" => KeywordEntry::new(KeywordKind::AudioTerm),
    "DTS" => KeywordEntry::new(KeywordKind::AudioTerm),
    "MP3" => KeywordEntry::new(KeywordKind::AudioTerm),
    "OPUS" => KeywordEntry::new(KeywordKind::AudioTerm),

    // Source
    "BD" => KeywordEntry::ambiguous(KeywordKind::Source),
    "BDRIP" => KeywordEntry::new(KeywordKind::Source),
    "BLURAY" => KeywordEntry::new(KeywordKind::Source),
    "DVD" => KeywordEntry::new(KeywordKind::Source),
    "DVDRIP" => KeywordEntry::new(KeywordKind::Source),
    "TV" => KeywordEntry::ambiguous(KeywordKind::Source),
    "WEB" => KeywordEntry::ambiguous(KeywordKind::Source),
    "WEBRIP" => KeywordEntry::new(KeywordKind::Source),
    "WEBDL" => KeywordEntry::new(KeywordKind::Source),

    // Anime type
    "OVA" => KeywordEntry::new(KeywordKind::AnimeType),
    "OAD" => KeywordEntry::new(KeywordKind::AnimeType),
    "ONA" => KeywordEntry::new(KeywordKind::AnimeType),
    "MOVIE" => KeywordEntry::ambiguous(KeywordKind::AnimeType),
    "SPECIAL" => KeywordEntry::ambiguous(KeywordKind::AnimeType),
    "TVSERIES" => KeywordEntry::new(KeywordKind::AnimeType),

    // Release version prefixes ("v2" in "05v2")
    "V" => KeywordEntry::ambiguous(KeywordKind::ReleaseVersionPrefix),
};

/// Lookup that skips `AMBIGUOUS` keywords unless the token came from a
/// bracketed group.
pub fn lookup_contextual(token: &str, is_enclosed: bool) -> Option<&'static KeywordEntry> {
    let entry = KEYWORDS.get(token.to_ascii_uppercase().as_str())?;
    if entry.flags.contains(KeywordFlags::AMBIGUOUS) && !is_enclosed {
        return None;
    }
    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_known_video_term() {
        let entry = lookup_contextual("x264", false).unwrap();
        assert_eq!(entry.kind, KeywordKind::VideoTerm);
    }

    #[test]
    fn ambiguous_keyword_rejected_outside_brackets() {
        assert!(lookup_contextual("tv", false).is_none());
        assert!(lookup_contextual("tv", true).is_some());
    }

    #[test]
    fn unknown_token_is_none() {
        assert!(lookup_contextual("definitely-not-a-keyword", false).is_none());
    }
}
