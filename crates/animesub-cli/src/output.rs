//! Plain-text rendering for subtitle records: labeled `println!` lines, no
//! table-widget crate.

use animesub_core::model::SubtitleRecord;

/// One labeled row per field, used by `find`/`best` for a single record.
pub fn print_record(record: &SubtitleRecord) {
    println!("Title:      {}", display_title(record));
    println!("Episode:    {}", episode_label(record));
    println!("Date:       {}", record.date);
    println!("Format:     {}", record.format);
    println!("Author:     {}", record.author);
    println!("Size:       {}", record.size);
    println!(
        "Rating:     bad {} / average {} / very good {}",
        record.rating.bad, record.rating.average, record.rating.very_good
    );
    println!("Downloads:  {}", record.downloaded_times);
    println!("Id:         {}", record.id);
}

/// A compact multi-row listing, used by `search`.
pub fn print_search_results(records: &[SubtitleRecord]) {
    if records.is_empty() {
        println!("No matching subtitle found");
        return;
    }
    println!("{} result(s):", records.len());
    println!("{:-<70}", "");
    for record in records {
        println!(
            "#{:<8} {} [{}] — {} ({})",
            record.id,
            display_title(record),
            episode_label(record),
            record.format,
            record.date,
        );
    }
}

fn display_title(record: &SubtitleRecord) -> &str {
    if !record.original_title.is_empty() {
        &record.original_title
    } else if !record.english_title.is_empty() {
        &record.english_title
    } else if !record.alt_title.is_empty() {
        &record.alt_title
    } else {
        "(untitled)"
    }
}

fn episode_label(record: &SubtitleRecord) -> String {
    if record.is_movie() {
        "movie".to_string()
    } else if record.is_pack() {
        format!("{}-{}", record.episode, record.to_episode)
    } else {
        record.episode.to_string()
    }
}
