use crate::organizer_core::error::{OrganizerError, Result};
use exiftool::ExifTool;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Embedded tag values keyed by exiftool tag name.
pub type TagMap = HashMap<String, String>;

/// Source of embedded metadata for media files.
pub trait MetadataReader {
    /// Read still-image tags (EXIF and friends).
    fn read_image_tags(&mut self, path: &Path) -> Result<TagMap>;

    /// Read video container tags. Date values come back as `YYYY-MM-DD HH:MM:SS`.
    fn read_container_metadata(&mut self, path: &Path) -> Result<TagMap>;
}

/// Container dates are requested with hyphenated dates.
const CONTAINER_DATE_ARGS: &[&str] = &["-d", "%Y-%m-%d %H:%M:%S"];

/// Reads tags through a long-running exiftool process.
///
/// When exiftool cannot be started every read fails, which the resolver
/// treats like a file without metadata.
pub struct ExifToolReader {
    exiftool: Option<ExifTool>,
}

impl ExifToolReader {
    pub fn new() -> Self {
        let exiftool = match ExifTool::new() {
            Ok(tool) => Some(tool),
            Err(e) => {
                log::warn!(
                    "exiftool is not available ({}); embedded dates will not be read",
                    e
                );
                None
            }
        };
        Self { exiftool }
    }

    #[cfg(test)]
    fn is_available(&self) -> bool {
        self.exiftool.is_some()
    }

    fn read(&mut self, path: &Path, extra_args: &[&str]) -> Result<TagMap> {
        let Some(exiftool) = self.exiftool.as_mut() else {
            return Err(OrganizerError::MetadataUnavailable {
                path: path.to_path_buf(),
                reason: "exiftool not available".to_string(),
            });
        };

        let raw: HashMap<String, Value> =
            exiftool
                .read_metadata(path, extra_args)
                .map_err(|e| OrganizerError::MetadataUnavailable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;

        if let Some(Value::String(error)) = raw.get("Error") {
            return Err(OrganizerError::MetadataUnavailable {
                path: path.to_path_buf(),
                reason: error.clone(),
            });
        }

        Ok(into_tag_map(raw))
    }
}

impl Default for ExifToolReader {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataReader for ExifToolReader {
    fn read_image_tags(&mut self, path: &Path) -> Result<TagMap> {
        self.read(path, &[])
    }

    fn read_container_metadata(&mut self, path: &Path) -> Result<TagMap> {
        self.read(path, CONTAINER_DATE_ARGS)
    }
}

/// Keep scalar tags as strings; nested structures carry no dates we use.
fn into_tag_map(raw: HashMap<String, Value>) -> TagMap {
    raw.into_iter()
        .filter_map(|(tag, value)| value_to_string(&value).map(|v| (tag, v)))
        .collect()
}

fn value_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Check if exiftool is available on the system.
#[cfg(test)]
fn exiftool_available() -> bool {
    std::process::Command::new("exiftool")
        .arg("-ver")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_tag_map_keeps_scalars() {
        let raw: HashMap<String, Value> = serde_json::from_value(json!({
            "SourceFile": "/tmp/a.jpg",
            "DateTimeOriginal": "2021:06:01 08:30:00",
            "ISO": 200,
            "Flash": { "Fired": false },
            "Keywords": ["a", "b"]
        }))
        .unwrap();

        let tags = into_tag_map(raw);
        assert_eq!(tags.get("DateTimeOriginal").unwrap(), "2021:06:01 08:30:00");
        assert_eq!(tags.get("ISO").unwrap(), "200");
        assert!(!tags.contains_key("Flash"));
        assert!(!tags.contains_key("Keywords"));
    }

    #[test]
    fn test_reader_without_exiftool_fails_softly() {
        let mut reader = ExifToolReader { exiftool: None };
        assert!(!reader.is_available());
        let err = reader.read_image_tags(Path::new("photo.jpg")).unwrap_err();
        assert!(matches!(err, OrganizerError::MetadataUnavailable { .. }));
    }

    #[test]
    fn test_reader_on_non_image_content() {
        if !exiftool_available() {
            return;
        }
        let temp = assert_fs::TempDir::new().unwrap();
        let path = temp.path().join("fake.jpg");
        std::fs::write(&path, b"not really a jpeg").unwrap();

        let mut reader = ExifToolReader::new();
        // Either exiftool rejects the file or it reports no date tags
        if let Ok(tags) = reader.read_image_tags(&path) {
            assert!(!tags.contains_key("DateTimeOriginal"));
        }
    }
}
