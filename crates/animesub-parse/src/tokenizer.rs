//! Splits a file name into bracketed groups, free-text runs, and delimiters,
//! the way an anitomy-style tokenizer does it, tracking the extension list
//! this system needs to recognize.

const BRACKETS: &[(char, char)] = &[
    ('(', ')'),
    ('[', ']'),
    ('{', '}'),
    ('「', '」'),
    ('『', '』'),
    ('【', '】'),
];

const KNOWN_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "ogm", "wmv", "mpg", "flv", "webm", "m4v", "ts", "mov", "3gp", "rm",
    "rmvb", "m2ts", "srt", "ass", "ssa", "sub", "zip", "rar",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Bracketed,
    FreeText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

fn is_soft_delimiter(c: char) -> bool {
    matches!(c, ' ' | '_' | '.' | ',' | '&' | '+')
}

fn is_dash(c: char) -> bool {
    matches!(c, '-' | '\u{2010}'..='\u{2015}')
}

fn opening_bracket(c: char) -> Option<char> {
    BRACKETS
        .iter()
        .find(|(open, _)| *open == c)
        .map(|(_, close)| *close)
}

/// Strips a trailing known extension (preceded by `.`) and returns
/// `(stem, extension)`.
fn split_extension(input: &str) -> (&str, Option<String>) {
    if let Some(dot) = input.rfind('.') {
        let candidate = &input[dot + 1..];
        if KNOWN_EXTENSIONS
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(candidate))
        {
            return (&input[..dot], Some(candidate.to_lowercase()));
        }
    }
    (input, None)
}

/// Tokenizes `input`, returning the token stream and the stripped file
/// extension (if any known extension was found).
pub fn tokenize(input: &str) -> (Vec<Token>, Option<String>) {
    let (stem, extension) = split_extension(input);
    let mut tokens = Vec::new();
    let chars: Vec<char> = stem.chars().collect();
    let mut i = 0;
    let mut free_text = String::new();

    macro_rules! flush_free_text {
        () => {
            if !free_text.is_empty() {
                tokens.push(Token {
                    kind: TokenKind::FreeText,
                    text: std::mem::take(&mut free_text),
                });
            }
        };
    }

    while i < chars.len() {
        let c = chars[i];

        if let Some(close) = opening_bracket(c) {
            flush_free_text!();
            let mut depth = 1;
            let mut content = String::new();
            i += 1;
            while i < chars.len() && depth > 0 {
                if chars[i] == close {
                    depth -= 1;
                    if depth == 0 {
                        i += 1;
                        break;
                    }
                } else if opening_bracket(chars[i]) == Some(close) {
                    depth += 1;
                }
                content.push(chars[i]);
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Bracketed,
                text: content,
            });
            continue;
        }

        if is_dash(c) {
            flush_free_text!();
            tokens.push(Token {
                kind: TokenKind::FreeText,
                text: "-".to_string(),
            });
            i += 1;
            continue;
        }

        if is_soft_delimiter(c) {
            // A dot between two digits is part of a number (e.g. "07.5"),
            // not a delimiter.
            if c == '.'
                && i > 0
                && i + 1 < chars.len()
                && chars[i - 1].is_ascii_digit()
                && chars[i + 1].is_ascii_digit()
            {
                free_text.push(c);
                i += 1;
                continue;
            }
            flush_free_text!();
            i += 1;
            continue;
        }

        free_text.push(c);
        i += 1;
    }
    flush_free_text!();

    (tokens, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_brackets_and_free_text() {
        let (tokens, ext) = tokenize("[SubGroup] Anime Title - 05 [1080p].mkv");
        assert_eq!(ext.as_deref(), Some("mkv"));
        assert_eq!(tokens[0].kind, TokenKind::Bracketed);
        assert_eq!(tokens[0].text, "SubGroup");
        // Space is a word boundary like any other soft delimiter — a
        // multi-word title is a run of consecutive single-word tokens, not
        // one token; `parser::title` re-joins the run with spaces.
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::FreeText && t.text == "Anime"));
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::FreeText && t.text == "Title"));
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::FreeText && t.text == "-"));
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::Bracketed && t.text == "1080p"));
    }

    #[test]
    fn keeps_dot_between_digits() {
        let (tokens, _) = tokenize("Anime - 07.5.mkv");
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::FreeText && t.text.contains("07.5")));
    }

    #[test]
    fn handles_nested_cjk_brackets() {
        let (tokens, _) = tokenize("【字幕组】Anime - 05.mkv");
        assert_eq!(tokens[0].kind, TokenKind::Bracketed);
        assert_eq!(tokens[0].text, "字幕组");
    }

    #[test]
    fn unknown_extension_is_kept_as_text() {
        let (_, ext) = tokenize("Anime.Title.Without.Known.Suffix.xyz");
        assert_eq!(ext, None);
    }
}
