//! `best` command handler: find + download + extract, end to end.

use std::path::{Path, PathBuf};

use animesub_client::{DownloadPipeline, SearchDriver};

/// Returns `Ok(true)` on success, `Ok(false)` on "no match" or "file not
/// found" (both map to exit code `1`, per the CLI's exit-code contract;
/// transport/archive errors propagate as `Err` instead).
pub async fn run(
    driver: &SearchDriver,
    video_path: &Path,
    output: Option<PathBuf>,
) -> anyhow::Result<bool> {
    if !video_path.is_file() {
        eprintln!("File not found: {}", video_path.display());
        return Ok(false);
    }

    let Some(filename) = video_path.file_name().and_then(|n| n.to_str()) else {
        eprintln!("File not found: {}", video_path.display());
        return Ok(false);
    };

    let Some(record) = driver.find_best(filename).await? else {
        println!("No matching subtitle found");
        return Ok(false);
    };

    let pipeline = DownloadPipeline::new(driver);
    let extracted = pipeline
        .download_and_extract(filename, record.id)
        .await?;

    let out_path = output.unwrap_or_else(|| default_output_path(video_path, &extracted));
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&out_path, &extracted.contents)?;

    println!("Extracted: {}", out_path.display());
    Ok(true)
}

fn default_output_path(video_path: &Path, extracted: &animesub_core::ExtractedSubtitle) -> PathBuf {
    let stem = video_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("subtitle");
    let suffix = extracted.suffix().unwrap_or_else(|| "srt".to_string());
    video_path.with_file_name(format!("{stem}.{suffix}"))
}

#[cfg(test)]
mod tests {
    use animesub_core::ExtractedSubtitle;

    use super::*;

    #[test]
    fn default_output_path_swaps_extension_for_archive_entry_suffix() {
        let video_path = Path::new("/videos/Show - 05 [1080p].mkv");
        let extracted = ExtractedSubtitle {
            archive_entry_name: "Show - 05.ass".to_string(),
            contents: vec![],
        };
        assert_eq!(
            default_output_path(video_path, &extracted),
            PathBuf::from("/videos/Show - 05 [1080p].ass")
        );
    }

    #[test]
    fn default_output_path_falls_back_to_srt_without_a_suffix() {
        let video_path = Path::new("/videos/Show - 05.mkv");
        let extracted = ExtractedSubtitle {
            archive_entry_name: "README".to_string(),
            contents: vec![],
        };
        assert_eq!(
            default_output_path(video_path, &extracted),
            PathBuf::from("/videos/Show - 05.srt")
        );
    }

    #[tokio::test]
    async fn run_reports_missing_file_without_querying_the_driver() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist.mkv");

        let config = animesub_client::AppConfig::defaults();
        let driver = SearchDriver::new(config).unwrap();

        let result = run(&driver, &missing, None).await.unwrap();
        assert!(!result);
    }
}
