//! `ArchiveSelector` — opens a downloaded subtitle archive and picks the
//! member that best matches the original request.
//!
//! Unzips with `::zip::ZipArchive` and does not implement a second matcher:
//! each entry is wrapped as a synthetic `SubtitleRecord` and fed through
//! `animesub_core::scorer::score`, the same fitness scoring search results
//! use.

use std::io::{Cursor, Read};

use animesub_core::model::{SubtitleRecord, SubtitlesRating};
use animesub_core::scorer::score;
use animesub_parse::DecomposedFileName;

use crate::error::ArchiveError;

/// One file inside a downloaded archive, not yet read into memory.
struct ArchiveMember {
    name: String,
    synthetic_record: SubtitleRecord,
}

/// Picks the archive entry that best matches `request`, reads it fully, and
/// returns `(entry_name, bytes)`. Falls back to the first entry (in archive
/// order) when every entry scores 0.
pub fn select_and_read(
    archive_bytes: &[u8],
    request: &DecomposedFileName,
) -> Result<(String, Vec<u8>), ArchiveError> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive_bytes))?;
    if zip.is_empty() {
        return Err(ArchiveError::EmptyArchive);
    }

    let mut members = Vec::with_capacity(zip.len());
    for i in 0..zip.len() {
        let entry = zip.by_index(i)?;
        let name = entry.name().to_string();
        members.push(ArchiveMember {
            synthetic_record: synthesize_record(&name),
            name,
        });
    }

    let best_index = members
        .iter()
        .enumerate()
        .map(|(i, member)| (i, score(&member.synthetic_record, request)))
        .max_by_key(|(i, s)| (*s, std::cmp::Reverse(*i)))
        .filter(|(_, s)| *s > 0)
        .map(|(i, _)| i)
        .unwrap_or(0);

    let name = members[best_index].name.clone();
    let mut entry = zip.by_index(best_index)?;
    let mut contents = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut contents)?;
    Ok((name, contents))
}

fn synthesize_record(entry_name: &str) -> SubtitleRecord {
    let decomposed = animesub_parse::parse(entry_name);
    let episode: u32 = decomposed
        .episode_number
        .as_deref()
        .and_then(|e| e.parse().ok())
        .unwrap_or(0);

    SubtitleRecord {
        id: 0,
        episode,
        to_episode: episode,
        original_title: decomposed.anime_title.clone().unwrap_or_else(|| entry_name.to_string()),
        english_title: String::new(),
        alt_title: String::new(),
        date: String::new(),
        format: String::new(),
        author: String::new(),
        added_by: String::new(),
        size: String::new(),
        description: entry_name.to_string(),
        comment_count: 0,
        downloaded_times: 0,
        rating: SubtitlesRating::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = zip::write::SimpleFileOptions::default();
            for (name, contents) in entries {
                writer.start_file(*name, options).unwrap();
                writer.write_all(contents).unwrap();
            }
            writer.finish().unwrap();
        }
        buf
    }

    #[test]
    fn selects_matching_episode_from_pack() {
        let zip_bytes = build_zip(&[
            ("GTO - 01.ass", b"one"),
            ("GTO - 05.ass", b"five"),
            ("GTO - 10.ass", b"ten"),
        ]);
        let request = animesub_parse::parse("[SubGroup] GTO - 05 [1080p].mkv");
        let (name, contents) = select_and_read(&zip_bytes, &request).unwrap();
        assert_eq!(name, "GTO - 05.ass");
        assert_eq!(contents, b"five");
    }

    #[test]
    fn empty_archive_errors() {
        let zip_bytes = build_zip(&[]);
        let request = animesub_parse::parse("Anime - 01.mkv");
        let err = select_and_read(&zip_bytes, &request).unwrap_err();
        assert!(matches!(err, ArchiveError::EmptyArchive));
    }

    #[test]
    fn falls_back_to_first_entry_when_nothing_scores() {
        let zip_bytes = build_zip(&[("unrelated_a.srt", b"a"), ("unrelated_b.srt", b"b")]);
        let request = animesub_parse::parse("Totally Different Show - 01.mkv");
        let (name, _) = select_and_read(&zip_bytes, &request).unwrap();
        assert_eq!(name, "unrelated_a.srt");
    }
}
