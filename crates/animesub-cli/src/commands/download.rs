//! `download` command handler.

use std::path::{Path, PathBuf};

use animesub_client::{DownloadPipeline, SearchDriver};

pub async fn run(
    driver: &SearchDriver,
    subtitle_id: u64,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let pipeline = DownloadPipeline::new(driver);
    let handle = pipeline.download_by_id(subtitle_id).await?;
    let out_path = output.unwrap_or_else(|| PathBuf::from(handle.filename()));
    let bytes = handle.read_to_end().await?;

    write_output(&out_path, &bytes)?;
    println!("Downloaded: {}", out_path.display());
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_output_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("subtitles").join("episode.ass");

        write_output(&nested, b"dialogue").unwrap();

        assert_eq!(std::fs::read(&nested).unwrap(), b"dialogue");
    }

    #[test]
    fn write_output_overwrites_an_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episode.ass");
        std::fs::write(&path, b"old").unwrap();

        write_output(&path, b"new").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }
}
