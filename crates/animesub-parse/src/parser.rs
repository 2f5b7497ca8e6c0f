//! Multi-pass filename parser: each pass claims tokens it recognizes and
//! marks them identified so later, looser passes (title extraction) never
//! reclaim them.

pub mod episode;
pub mod season;
pub mod title;

use std::sync::LazyLock;

use regex::Regex;

use crate::elements::DecomposedFileName;
use crate::keyword::{lookup_contextual, KeywordKind};
use crate::tokenizer::{tokenize, Token, TokenKind};

static CHECKSUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f]{8}$").unwrap());
static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(19|20)\d{2}$").unwrap());
static RESOLUTION_WH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3,4}[xX]\d{3,4}$").unwrap());

/// Decomposes a file name into its recognized attributes.
pub fn parse(filename: &str) -> DecomposedFileName {
    let (tokens, extension) = tokenize(filename);
    let mut identified = vec![false; tokens.len()];
    let mut out = DecomposedFileName {
        file_name: Some(strip_known_extension(filename)),
        ..Default::default()
    };
    let _ = extension;

    extract_release_group(&tokens, &mut identified, &mut out);
    extract_checksum(&tokens, &mut identified, &mut out);
    identify_keywords(&tokens, &mut identified, &mut out);
    extract_resolution(&tokens, &mut identified, &mut out);
    extract_year(&tokens, &mut identified, &mut out);
    extract_season(&tokens, &mut identified, &mut out);
    let episode_index = extract_episode(&tokens, &mut identified, &mut out);

    out.anime_title = title::extract_title(&tokens, &identified, episode_index);

    out
}

/// The file's base name with any *known* extension removed, for the Tier-2
/// `file_name` match — distinct from `anime_title`. Reuses `tokenize`'s
/// extension detection so an unrecognized suffix (`.xyz`) is kept as part of
/// the name rather than silently dropped.
fn strip_known_extension(filename: &str) -> String {
    let (_, extension) = tokenize(filename);
    match extension {
        Some(_) => filename[..filename.rfind('.').expect("extension implies a dot")].to_string(),
        None => filename.to_string(),
    }
}

fn extract_release_group(tokens: &[Token], identified: &mut [bool], out: &mut DecomposedFileName) {
    // The first bracketed token, when present, is conventionally the release
    // group tag (`[SubGroup] Anime - 05.mkv`).
    if let Some((i, token)) = tokens
        .iter()
        .enumerate()
        .find(|(_, t)| t.kind == TokenKind::Bracketed)
    {
        if !CHECKSUM.is_match(token.text.trim()) && lookup_contextual(token.text.trim(), true).is_none()
        {
            out.release_group = Some(token.text.trim().to_string());
            identified[i] = true;
        }
    }
}

fn extract_checksum(tokens: &[Token], identified: &mut [bool], out: &mut DecomposedFileName) {
    for (i, token) in tokens.iter().enumerate() {
        if identified[i] || token.kind != TokenKind::Bracketed {
            continue;
        }
        let trimmed = token.text.trim();
        if CHECKSUM.is_match(trimmed) {
            out.file_checksum = Some(trimmed.to_uppercase());
            identified[i] = true;
        }
    }
}

fn identify_keywords(tokens: &[Token], identified: &mut [bool], out: &mut DecomposedFileName) {
    for (i, token) in tokens.iter().enumerate() {
        if identified[i] {
            continue;
        }
        let is_enclosed = token.kind == TokenKind::Bracketed;
        for word in token.text.split(|c: char| c.is_whitespace() || c == ',') {
            let word = word.trim();
            if word.is_empty() {
                continue;
            }
            if let Some(entry) = lookup_contextual(word, is_enclosed) {
                match entry.kind {
                    KeywordKind::VideoTerm => out.video_term.push(word.to_string()),
                    KeywordKind::VideoResolution => out.video_resolution = Some(word.to_string()),
                    KeywordKind::AudioTerm => out.audio_term.push(word.to_string()),
                    KeywordKind::Source => out.source = Some(word.to_string()),
                    KeywordKind::AnimeType => out.anime_type = Some(word.to_string()),
                    KeywordKind::ReleaseVersionPrefix => {}
                }
                identified[i] = true;
            }
        }
    }
}

fn extract_resolution(tokens: &[Token], identified: &mut [bool], out: &mut DecomposedFileName) {
    if out.video_resolution.is_some() {
        return;
    }
    for (i, token) in tokens.iter().enumerate() {
        if identified[i] {
            continue;
        }
        let trimmed = token.text.trim();
        if RESOLUTION_WH.is_match(trimmed) {
            out.video_resolution = Some(trimmed.to_string());
            identified[i] = true;
            return;
        }
    }
}

fn extract_year(tokens: &[Token], identified: &mut [bool], out: &mut DecomposedFileName) {
    for (i, token) in tokens.iter().enumerate() {
        if identified[i] || token.kind != TokenKind::FreeText {
            continue;
        }
        for word in token.text.split_whitespace() {
            if YEAR.is_match(word) {
                out.anime_year = Some(word.to_string());
                identified[i] = true;
                return;
            }
        }
    }
}

/// Tokens are single words (the tokenizer splits on spaces), but a season
/// marker can span two of them ("Season 3", "3rd Season"): try each token on
/// its own first, then join it with its unidentified neighbor before giving
/// up on that position.
fn extract_season(tokens: &[Token], identified: &mut [bool], out: &mut DecomposedFileName) {
    let n = tokens.len();
    for i in 0..n {
        if identified[i] || tokens[i].kind != TokenKind::FreeText || tokens[i].text == "-" {
            continue;
        }
        let word = tokens[i].text.trim();
        if let Some(m) = season::try_extract(word) {
            out.anime_season = Some(m.number);
            identified[i] = true;
            return;
        }
        if i + 1 < n && !identified[i + 1] && tokens[i + 1].kind == TokenKind::FreeText {
            let joined = format!("{word} {}", tokens[i + 1].text.trim());
            if let Some(m) = season::try_extract(&joined) {
                out.anime_season = Some(m.number);
                identified[i] = true;
                identified[i + 1] = true;
                return;
            }
        }
    }
}

/// Returns the index of the token the episode number was found in, so the
/// title extractor knows where to stop.
fn extract_episode(
    tokens: &[Token],
    identified: &mut [bool],
    out: &mut DecomposedFileName,
) -> Option<usize> {
    for (i, token) in tokens.iter().enumerate() {
        if identified[i] || token.kind != TokenKind::FreeText || token.text == "-" {
            continue;
        }
        for word in token.text.split_whitespace() {
            if let Some(m) = episode::try_extract(word) {
                out.episode_number = Some(m.number);
                if out.anime_season.is_none() {
                    out.anime_season = m.season;
                }
                identified[i] = true;
                return Some(i);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_filename() {
        let d = parse("[SubGroup] Anime Title - 05 [1080p].mkv");
        assert_eq!(d.release_group.as_deref(), Some("SubGroup"));
        assert_eq!(d.episode_number.as_deref(), Some("5"));
        assert_eq!(d.video_resolution.as_deref(), Some("1080p"));
        assert_eq!(d.anime_title.as_deref(), Some("Anime Title"));
    }

    #[test]
    fn parses_season_and_episode_combined() {
        let d = parse("[Group] Anime.Name.S02E07.1080p.mkv");
        assert_eq!(d.anime_season.as_deref(), Some("2"));
        assert_eq!(d.episode_number.as_deref(), Some("7"));
    }

    #[test]
    fn extracts_checksum_and_video_terms() {
        let d = parse("[Group] Anime - 10 [1080p HEVC x265 10bit][FLAC][B5E8A2C1].mkv");
        assert_eq!(d.file_checksum.as_deref(), Some("B5E8A2C1"));
        assert!(d.video_term.iter().any(|t| t.eq_ignore_ascii_case("HEVC")));
        assert!(d.audio_term.iter().any(|t| t.eq_ignore_ascii_case("FLAC")));
    }

    #[test]
    fn parses_yuru_camp_season_3() {
        let d = parse("[SubGroup] Yuru Camp Season 3 - 05 [1080p].mkv");
        assert_eq!(d.anime_season.as_deref(), Some("3"));
        assert_eq!(d.episode_number.as_deref(), Some("5"));
        assert!(d.anime_title.as_deref().unwrap().contains("Yuru Camp"));
    }

    #[test]
    fn parses_ordinal_season_form() {
        let d = parse("[Group] Some Anime 3rd Season - 01.mkv");
        assert_eq!(d.anime_season.as_deref(), Some("3"));
    }

    #[test]
    fn file_name_attribute_strips_extension() {
        let d = parse("my_file.mkv");
        assert_eq!(d.file_name.as_deref(), Some("my_file"));
    }

    #[test]
    fn does_not_mistake_year_for_episode() {
        let d = parse("[SubsPlease] Anime Title (2019) - BluRay.mkv");
        assert_eq!(d.anime_year.as_deref(), Some("2019"));
    }
}
