//! `CatalogScraper` — resolves a query title (with optional season/year
//! hints) to the search URL the alphabetical catalog page lists for it.
//!
//! The catalog page is a flat list of anchors, one per known title:
//! `<a href="szukaj.php?...">Visible Title</a>` sometimes carrying a
//! `title="tooltip text"` attribute with an alternate spelling. Anchors may
//! arrive split across chunks, so the scraper keeps the whole fed text and
//! re-scans it on every `feed` call — wasteful per byte, but it makes the
//! "same chunking, same result" streaming-idempotence property trivially
//! true, which matters more here than marginal CPU.

use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::normalize;
use crate::similarity::ratio;

const FUZZY_THRESHOLD: f64 = 0.60;

static ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s+href="([^"]+)"(?:\s+title="([^"]*)")?[^>]*>([^<]*)</a>"#).unwrap()
});

#[derive(Debug, Clone, PartialEq)]
enum Result_ {
    None,
    Fuzzy { url: String, similarity: f64 },
    Exact { url: String },
}

/// Resolves a query title to a catalog search URL as the page is fed in.
pub struct CatalogScraper {
    variants: Vec<String>,
    buffer: String,
    result: Result_,
}

impl CatalogScraper {
    /// Builds the candidate-title variant set: `{title}` plus
    /// `title + " " + season_form` for each normalized season spelling, plus
    /// `title + " (" + year + ")"` when a year hint is given.
    pub fn new(title: &str, season: Option<&str>, year: Option<&str>) -> Self {
        let mut variants = vec![title.to_string()];
        if let Some(season) = season {
            for form in season_forms(season) {
                variants.push(format!("{title} {form}"));
            }
        }
        if let Some(year) = year {
            variants.push(format!("{title} ({year})"));
        }
        CatalogScraper {
            variants,
            buffer: String::new(),
            result: Result_::None,
        }
    }

    /// Feeds the next chunk of the catalog page. After each call, `result()`
    /// reflects the scraper's current best understanding.
    pub fn feed(&mut self, chunk: &str) {
        self.buffer.push_str(chunk);
        if matches!(self.result, Result_::Exact { .. }) {
            return;
        }
        self.rescan();
    }

    /// The resolved URL, if any. Only an exact match is stable mid-feed; a
    /// fuzzy match may still improve as more of the page arrives and is only
    /// authoritative once the caller has finished feeding (`finish`).
    pub fn result(&self) -> Option<&str> {
        match &self.result {
            Result_::None => None,
            Result_::Fuzzy { url, .. } => Some(url),
            Result_::Exact { url } => Some(url),
        }
    }

    /// Call once the whole page has been fed; returns the final result,
    /// finalizing any fuzzy match found.
    pub fn finish(mut self) -> Option<String> {
        self.rescan();
        match self.result {
            Result_::None => None,
            Result_::Fuzzy { url, .. } => Some(url),
            Result_::Exact { url } => Some(url),
        }
    }

    fn rescan(&mut self) {
        let normalized_variants: Vec<String> = self.variants.iter().map(|v| normalize(v)).collect();

        for caps in ANCHOR.captures_iter(&self.buffer) {
            let url = caps[1].to_string();
            let visible = caps.get(3).map(|m| m.as_str()).unwrap_or("");
            let tooltip = caps.get(2).map(|m| m.as_str()).unwrap_or("");

            for candidate in [visible, tooltip] {
                if candidate.is_empty() {
                    continue;
                }
                let normalized_candidate = normalize(candidate);

                for nv in &normalized_variants {
                    if *nv == normalized_candidate {
                        self.result = Result_::Exact { url: url.clone() };
                        return;
                    }
                    let sim = ratio(nv, &normalized_candidate);
                    let is_better = match &self.result {
                        Result_::Fuzzy { similarity, .. } => sim > *similarity,
                        _ => true,
                    };
                    if sim >= FUZZY_THRESHOLD && is_better {
                        self.result = Result_::Fuzzy {
                            url: url.clone(),
                            similarity: sim,
                        };
                    }
                }
            }
        }
    }
}

fn season_forms(season: &str) -> Vec<String> {
    let mut forms = vec![
        season.to_string(),
        format!("Season {season}"),
        format!("S{season}"),
    ];
    if let Some(roman) = decimal_to_roman(season) {
        forms.push(roman);
    }
    forms
}

fn decimal_to_roman(s: &str) -> Option<String> {
    let n: u32 = s.parse().ok()?;
    let table = [
        (1, "I"),
        (2, "II"),
        (3, "III"),
        (4, "IV"),
        (5, "V"),
        (6, "VI"),
        (7, "VII"),
        (8, "VIII"),
        (9, "IX"),
        (10, "X"),
    ];
    table
        .iter()
        .find(|(v, _)| *v == n)
        .map(|(_, r)| r.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_wins_over_fuzzy() {
        let page = r#"
            <a href="szukaj.php?pTitle=en&szukane=Yuru+Camp">Yuru Camp</a>
            <a href="szukaj.php?pTitle=en&szukane=Yuru+Camp+Season+2">Yuru Camp Season 2</a>
            <a href="szukaj.php?pTitle=en&szukane=Yuru+Camp+Season+3">Yuru Camp Season 3</a>
            <a href="szukaj.php?pTitle=en&szukane=Yuru+Camp+The+Movie">Yuru Camp The Movie</a>
        "#;
        let mut scraper = CatalogScraper::new("Yuru Camp", Some("3"), None);
        scraper.feed(page);
        assert_eq!(
            scraper.result(),
            Some("szukaj.php?pTitle=en&szukane=Yuru+Camp+Season+3")
        );
    }

    #[test]
    fn fuzzy_match_falls_back_when_no_exact_hit() {
        let page = r#"<a href="szukaj.php?pTitle=en&szukane=Elf+Princess+Rane">Elf Princess Rane</a>"#;
        let mut scraper = CatalogScraper::new("Elf Princess Ren", None, None);
        scraper.feed(page);
        assert_eq!(
            scraper.finish(),
            Some("szukaj.php?pTitle=en&szukane=Elf+Princess+Rane".to_string())
        );
    }

    #[test]
    fn no_match_returns_none() {
        let page = r#"<a href="szukaj.php?szukane=Something+Else">Something Else</a>"#;
        let mut scraper = CatalogScraper::new("Totally Unrelated Title", None, None);
        scraper.feed(page);
        assert_eq!(scraper.result(), None);
    }

    #[test]
    fn chunked_feed_matches_whole_feed() {
        let page = r#"<a href="szukaj.php?szukane=Yuru+Camp">Yuru Camp</a>"#;
        let mut whole = CatalogScraper::new("Yuru Camp", None, None);
        whole.feed(page);

        let mut chunked = CatalogScraper::new("Yuru Camp", None, None);
        for chunk in page.as_bytes().chunks(7) {
            chunked.feed(std::str::from_utf8(chunk).unwrap());
        }
        assert_eq!(whole.result(), chunked.result());
    }

    #[test]
    fn exact_result_does_not_change_once_set() {
        let mut scraper = CatalogScraper::new("Yuru Camp", None, None);
        scraper.feed(r#"<a href="szukaj.php?szukane=Yuru+Camp">Yuru Camp</a>"#);
        let first = scraper.result().map(str::to_string);
        scraper.feed(r#"<a href="szukaj.php?szukane=Other">Some Other Exact Unrelated Title</a>"#);
        assert_eq!(scraper.result().map(str::to_string), first);
    }
}
