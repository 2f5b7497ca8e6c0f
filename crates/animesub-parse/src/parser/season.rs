//! Season extraction strategies.

use std::sync::LazyLock;

use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonMatch {
    pub raw: String,
    pub number: String,
}

static S_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^S(\d{1,2})$").unwrap());
static SEASON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:Season|Saison)\s*(\d{1,2})$").unwrap());
static NTH_SEASON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d{1,2})(?:st|nd|rd|th)\s*Season$").unwrap());
static JAPANESE_SEASON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^第(\d{1,2})期$").unwrap());

fn roman_to_u32(s: &str) -> Option<u32> {
    match s.to_uppercase().as_str() {
        "I" => Some(1),
        "II" => Some(2),
        "III" => Some(3),
        "IV" => Some(4),
        "V" => Some(5),
        "VI" => Some(6),
        "VII" => Some(7),
        "VIII" => Some(8),
        "IX" => Some(9),
        "X" => Some(10),
        _ => None,
    }
}

pub fn try_extract(token: &str) -> Option<SeasonMatch> {
    if let Some(caps) = S_PREFIX.captures(token) {
        return Some(SeasonMatch {
            raw: token.to_string(),
            number: caps[1].trim_start_matches('0').to_string(),
        });
    }
    if let Some(caps) = SEASON_WORD.captures(token) {
        return Some(SeasonMatch {
            raw: token.to_string(),
            number: caps[1].trim_start_matches('0').to_string(),
        });
    }
    if let Some(caps) = NTH_SEASON.captures(token) {
        return Some(SeasonMatch {
            raw: token.to_string(),
            number: caps[1].trim_start_matches('0').to_string(),
        });
    }
    if let Some(caps) = JAPANESE_SEASON.captures(token) {
        return Some(SeasonMatch {
            raw: token.to_string(),
            number: caps[1].trim_start_matches('0').to_string(),
        });
    }
    if let Some(n) = roman_to_u32(token) {
        return Some(SeasonMatch {
            raw: token.to_string(),
            number: n.to_string(),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s_prefix() {
        assert_eq!(try_extract("S03").unwrap().number, "3");
    }

    #[test]
    fn season_word() {
        assert_eq!(try_extract("Season 3").unwrap().number, "3");
    }

    #[test]
    fn nth_season() {
        assert_eq!(try_extract("3rd Season").unwrap().number, "3");
    }

    #[test]
    fn roman_numeral_season() {
        assert_eq!(try_extract("III").unwrap().number, "3");
    }

    #[test]
    fn not_a_season() {
        assert!(try_extract("1080p").is_none());
    }
}
