//! Episode-number extraction strategies, trimmed to the strategies this
//! system's fixtures actually require.

use std::sync::LazyLock;

use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeMatch {
    pub raw: String,
    pub number: String,
    pub season: Option<String>,
}

static COMBINED_SEASON_EPISODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^S(\d{1,2})E(\d{1,4})$").unwrap());
static ALT_SEASON_EPISODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d{1,2})x(\d{1,4})$").unwrap());
static KEYWORD_PREFIXED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:EP|EPS|EPISODE|E|#)\.?(\d{1,4})$").unwrap());
static VERSIONED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d{1,4})[Vv](\d)$").unwrap());
static FRACTIONAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{1,4}\.5)$").unwrap());
static RANGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{1,4})-(\d{1,4})$").unwrap());
static JAPANESE_COUNTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^第(\d{1,4})(?:話|集)$").unwrap());
static PARTIAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{1,4})([a-zA-Z])$").unwrap());

fn is_year_like(n: u32) -> bool {
    (1950..=2050).contains(&n)
}

fn plain_number(token: &str) -> Option<u32> {
    if token.chars().all(|c| c.is_ascii_digit()) {
        token.parse().ok()
    } else {
        None
    }
}

/// Tries every episode-extraction strategy against a single free-text token.
/// Returns `None` when the token looks like a bare year (1950-2050), since a
/// bare 4-digit year is far more likely to be a release year than an episode
/// number.
pub fn try_extract(token: &str) -> Option<EpisodeMatch> {
    if let Some(caps) = COMBINED_SEASON_EPISODE.captures(token) {
        return Some(EpisodeMatch {
            raw: token.to_string(),
            number: caps[2].trim_start_matches('0').to_string(),
            season: Some(caps[1].trim_start_matches('0').to_string()),
        });
    }
    if let Some(caps) = ALT_SEASON_EPISODE.captures(token) {
        return Some(EpisodeMatch {
            raw: token.to_string(),
            number: strip_leading_zeros(&caps[2]),
            season: Some(strip_leading_zeros(&caps[1])),
        });
    }
    if let Some(caps) = KEYWORD_PREFIXED.captures(token) {
        return Some(EpisodeMatch {
            raw: token.to_string(),
            number: strip_leading_zeros(&caps[1]),
            season: None,
        });
    }
    if let Some(caps) = VERSIONED.captures(token) {
        return Some(EpisodeMatch {
            raw: token.to_string(),
            number: strip_leading_zeros(&caps[1]),
            season: None,
        });
    }
    if let Some(caps) = FRACTIONAL.captures(token) {
        return Some(EpisodeMatch {
            raw: token.to_string(),
            number: caps[1].to_string(),
            season: None,
        });
    }
    if let Some(caps) = RANGE.captures(token) {
        return Some(EpisodeMatch {
            raw: token.to_string(),
            number: strip_leading_zeros(&caps[1]),
            season: None,
        });
    }
    if let Some(caps) = JAPANESE_COUNTER.captures(token) {
        return Some(EpisodeMatch {
            raw: token.to_string(),
            number: strip_leading_zeros(&caps[1]),
            season: None,
        });
    }
    if let Some(caps) = PARTIAL.captures(token) {
        return Some(EpisodeMatch {
            raw: token.to_string(),
            number: format!("{}{}", strip_leading_zeros(&caps[1]), &caps[2]),
            season: None,
        });
    }
    if let Some(n) = plain_number(token) {
        if !is_year_like(n) {
            return Some(EpisodeMatch {
                raw: token.to_string(),
                number: n.to_string(),
                season: None,
            });
        }
    }
    None
}

fn strip_leading_zeros(s: &str) -> String {
    let trimmed = s.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_season_episode() {
        let m = try_extract("S01E05").unwrap();
        assert_eq!(m.number, "5");
        assert_eq!(m.season.as_deref(), Some("1"));
    }

    #[test]
    fn alt_season_episode() {
        let m = try_extract("01x05").unwrap();
        assert_eq!(m.number, "5");
        assert_eq!(m.season.as_deref(), Some("1"));
    }

    #[test]
    fn fractional_episode() {
        let m = try_extract("07.5").unwrap();
        assert_eq!(m.number, "07.5");
    }

    #[test]
    fn japanese_counter() {
        let m = try_extract("第05話").unwrap();
        assert_eq!(m.number, "5");
    }

    #[test]
    fn rejects_bare_year() {
        assert!(try_extract("2019").is_none());
        assert!(try_extract("1999").is_none());
    }

    #[test]
    fn partial_episode() {
        let m = try_extract("4a").unwrap();
        assert_eq!(m.number, "4a");
    }

    #[test]
    fn plain_number_outside_year_range() {
        let m = try_extract("05").unwrap();
        assert_eq!(m.number, "5");
    }
}
