use crate::organizer_core::error::{OrganizerError, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Image file extensions recognized by default (lowercase, no dot).
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "heic", "heif", "dng", "cr2", "png"];

/// Video file extensions recognized by default (lowercase, no dot).
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &["mov", "avi", "mp4", "3gp", "3gpp", "mpg"];

/// Exiftool tag names tried for images, most preferred first.
/// `CreateDate` is EXIF DateTimeDigitized and `ModifyDate` is EXIF DateTime.
pub const DEFAULT_IMAGE_DATE_TAGS: &[&str] = &["DateTimeOriginal", "CreateDate", "ModifyDate"];

/// Exiftool tag names tried for video containers, most preferred first.
pub const DEFAULT_VIDEO_DATE_TAGS: &[&str] = &["CreateDate", "MediaCreateDate"];

/// What to do when a different file already occupies the target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Leave the source where it is
    Skip,
    /// Move under the first free `name_N.ext`, unless the contents are identical
    #[default]
    Rename,
    /// Replace the existing file
    Overwrite,
}

impl ConflictPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictPolicy::Skip => "skip",
            ConflictPolicy::Rename => "rename",
            ConflictPolicy::Overwrite => "overwrite",
        }
    }
}

impl std::fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Run configuration. Loaded once at startup and never mutated afterwards.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct OrganizerConfig {
    pub image_extensions: Vec<String>,
    pub video_extensions: Vec<String>,
    pub image_date_tags: Vec<String>,
    pub video_date_tags: Vec<String>,
    pub on_conflict: ConflictPolicy,
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            image_extensions: to_owned_list(DEFAULT_IMAGE_EXTENSIONS),
            video_extensions: to_owned_list(DEFAULT_VIDEO_EXTENSIONS),
            image_date_tags: to_owned_list(DEFAULT_IMAGE_DATE_TAGS),
            video_date_tags: to_owned_list(DEFAULT_VIDEO_DATE_TAGS),
            on_conflict: ConflictPolicy::default(),
        }
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl OrganizerConfig {
    /// Load a JSON configuration file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| OrganizerError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config: OrganizerConfig =
            serde_json::from_str(&raw).map_err(|e| OrganizerError::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(config.normalized())
    }

    /// Lowercase extensions and strip any leading dot so `.JPG` matches `jpg`.
    pub fn normalized(mut self) -> Self {
        self.image_extensions = normalize_extensions(self.image_extensions);
        self.video_extensions = normalize_extensions(self.video_extensions);
        self
    }
}

fn normalize_extensions(extensions: Vec<String>) -> Vec<String> {
    extensions
        .into_iter()
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}
