//! Argument parsing — `clap` derive: a top-level `#[command(name = ...)]`
//! parser, one `Subcommand` variant per operation, short aliases on the
//! flags users type most.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// animesub — find, rank, and download subtitles from a legacy anime
/// subtitle catalog.
#[derive(Parser)]
#[command(name = "animesub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv). Overrides `RUST_LOG` when given.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Search the catalog for a title and list matching subtitle records.
    Search {
        /// Anime title to search for.
        title: String,
        /// Sort order: traf (fitness), datad (date), pobrn (downloads), ...
        #[arg(long, default_value = "traf")]
        sort: String,
        /// Title field to match against: org, en, pl, jp.
        #[arg(long = "type", default_value = "org")]
        title_type: String,
        /// Maximum number of result pages to fetch (0 = no cap).
        #[arg(long, default_value_t = 0)]
        limit: u32,
        /// Print results as JSON instead of a plain-text list.
        #[arg(short = 'j', long)]
        json: bool,
    },

    /// Find the single best-matching subtitle record for a video file name.
    Find {
        /// Video file name (not read from disk — only its name is parsed).
        filename: String,
        /// Print the result as JSON instead of a plain-text row.
        #[arg(short = 'j', long)]
        json: bool,
    },

    /// Download a subtitle archive by its catalog id.
    Download {
        /// Subtitle record id.
        subtitle_id: u64,
        /// Output path. Defaults to the archive's own filename in the
        /// current directory.
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// End to end: find the best subtitle for a video file, download its
    /// archive, and extract the matching member next to the video.
    Best {
        /// Path to the video file on disk.
        video_path: PathBuf,
        /// Output path for the extracted subtitle. Defaults to the video's
        /// stem plus the extracted member's own suffix.
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}
