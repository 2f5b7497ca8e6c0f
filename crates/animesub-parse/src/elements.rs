use serde::{Deserialize, Serialize};

/// A video file name broken down into the attribute set the rest of the
/// system reasons about.
///
/// Every attribute is optional except `video_term`/`audio_term`, which are
/// ordered lists — a single release can carry more than one codec/HDR/audio
/// tag and the fitness scorer considers a list matched when any element
/// matches (see `animesub_core::scorer`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecomposedFileName {
    pub anime_title: Option<String>,
    /// Kept as a string (not parsed) so callers can decide how to interpret
    /// "12.5", "01-13", etc; the scorer parses it as a plain integer.
    pub episode_number: Option<String>,
    pub anime_year: Option<String>,
    pub anime_season: Option<String>,
    pub anime_type: Option<String>,
    pub video_term: Vec<String>,
    pub video_resolution: Option<String>,
    pub audio_term: Vec<String>,
    pub file_checksum: Option<String>,
    /// The file's base name (extension stripped), used by the scorer's
    /// Tier-2 check — distinct from `anime_title`.
    pub file_name: Option<String>,
    pub release_group: Option<String>,
    pub source: Option<String>,
}

impl DecomposedFileName {
    /// True when no attribute carries usable information.
    pub fn is_empty(&self) -> bool {
        self.anime_title.is_none()
            && self.episode_number.is_none()
            && self.anime_year.is_none()
            && self.anime_season.is_none()
            && self.anime_type.is_none()
            && self.video_term.is_empty()
            && self.video_resolution.is_none()
            && self.audio_term.is_empty()
            && self.file_checksum.is_none()
            && self.file_name.is_none()
            && self.release_group.is_none()
            && self.source.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(DecomposedFileName::default().is_empty());
    }

    #[test]
    fn round_trips_through_json() {
        let d = DecomposedFileName {
            anime_title: Some("Kimetsu no Yaiba".to_string()),
            episode_number: Some("5".to_string()),
            video_term: vec!["H264".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_string(&d).unwrap();
        let back: DecomposedFileName = serde_json::from_str(&json).unwrap();
        assert_eq!(back.anime_title.as_deref(), Some("Kimetsu no Yaiba"));
        assert_eq!(back.video_term, vec!["H264".to_string()]);
    }
}
