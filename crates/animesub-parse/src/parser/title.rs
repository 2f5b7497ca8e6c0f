//! Title extraction: the anime title is the longest run of consecutive
//! free-text tokens that were not identified as anything else, taken from
//! before the episode position.

use crate::tokenizer::{Token, TokenKind};

/// `identified[i]` is `true` when `tokens[i]` was claimed by an earlier pass
/// (a keyword, the release group, the checksum, resolution, year, season, or
/// the episode number itself).
pub fn extract_title(tokens: &[Token], identified: &[bool], episode_index: Option<usize>) -> Option<String> {
    let limit = episode_index.unwrap_or(tokens.len());
    longest_unidentified_run(tokens, identified, 0, limit)
}

fn longest_unidentified_run(
    tokens: &[Token],
    identified: &[bool],
    start: usize,
    end: usize,
) -> Option<String> {
    let mut best: Option<(usize, usize)> = None;
    let mut run_start: Option<usize> = None;

    for i in start..end.min(tokens.len()) {
        let usable = tokens[i].kind == TokenKind::FreeText
            && !identified[i]
            && tokens[i].text != "-";
        if usable {
            if run_start.is_none() {
                run_start = Some(i);
            }
        } else if let Some(rs) = run_start.take() {
            consider(&mut best, rs, i);
        }
    }
    if let Some(rs) = run_start {
        consider(&mut best, rs, end.min(tokens.len()));
    }

    best.map(|(s, e)| {
        tokens[s..e]
            .iter()
            .map(|t| t.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    })
}

fn consider(best: &mut Option<(usize, usize)>, start: usize, end: usize) {
    let len = end - start;
    let better = match best {
        Some((bs, be)) => len > be.saturating_sub(*bs),
        None => true,
    };
    if better {
        *best = Some((start, end));
    }
}
