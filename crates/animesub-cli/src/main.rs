mod cli;
mod commands;
mod output;

use std::process::ExitCode;

use animesub_client::{AppConfig, SearchDriver};
use clap::Parser;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AppConfig::load();
    let driver = match SearchDriver::new(config) {
        Ok(driver) => driver,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run(&driver, cli.command).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Runs the selected subcommand. Returns `Ok(false)` for the documented
/// "no match"/"file not found" exit-1 cases that are not themselves errors.
async fn run(driver: &SearchDriver, command: Command) -> anyhow::Result<bool> {
    match command {
        Command::Search {
            title,
            sort,
            title_type,
            limit,
            json,
        } => {
            commands::search::run(driver, &title, &sort, &title_type, limit, json).await?;
            Ok(true)
        }
        Command::Find { filename, json } => {
            commands::find::run(driver, &filename, json).await?;
            // `find` always exits 0 — a miss is reported in its own output,
            // not as process failure.
            Ok(true)
        }
        Command::Download {
            subtitle_id,
            output,
        } => {
            commands::download::run(driver, subtitle_id, output).await?;
            Ok(true)
        }
        Command::Best {
            video_path,
            output,
        } => commands::best::run(driver, &video_path, output).await,
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "animesub_client=warn",
        1 => "animesub_client=info",
        _ => "animesub_client=debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
