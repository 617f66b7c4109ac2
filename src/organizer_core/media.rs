use crate::organizer_core::config::OrganizerConfig;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Other => "other",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A file discovered in the source folder, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    pub kind: MediaKind,
}

impl MediaFile {
    pub fn new(path: impl Into<PathBuf>, kind: MediaKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// The file name without any directory components.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// Discovered paths partitioned by kind, each in traversal order.
#[derive(Debug, Default)]
pub struct Classified {
    pub images: Vec<MediaFile>,
    pub videos: Vec<MediaFile>,
    pub others: Vec<MediaFile>,
}

impl Classified {
    /// Images followed by videos, the order files are processed in.
    pub fn media(&self) -> impl Iterator<Item = &MediaFile> {
        self.images.iter().chain(self.videos.iter())
    }

    pub fn media_count(&self) -> usize {
        self.images.len() + self.videos.len()
    }
}

/// Detect the kind of a path from its extension, ignoring case.
pub fn detect_media_kind(path: &Path, config: &OrganizerConfig) -> MediaKind {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return MediaKind::Other;
    };
    let ext_lower = ext.to_lowercase();

    if config.image_extensions.iter().any(|e| *e == ext_lower) {
        MediaKind::Image
    } else if config.video_extensions.iter().any(|e| *e == ext_lower) {
        MediaKind::Video
    } else {
        MediaKind::Other
    }
}

/// Split candidate paths into images, videos and others. Directories are dropped.
pub fn classify<I>(paths: I, config: &OrganizerConfig) -> Classified
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut classified = Classified::default();

    for path in paths {
        if path.is_dir() {
            continue;
        }
        let kind = detect_media_kind(&path, config);
        let file = MediaFile::new(path, kind);
        match kind {
            MediaKind::Image => classified.images.push(file),
            MediaKind::Video => classified.videos.push(file),
            MediaKind::Other => classified.others.push(file),
        }
    }

    classified
}

/// List the entries below `root`: files and directories interleaved, sorted by
/// name within each directory. Only direct children unless `recursive`.
pub fn list_candidates(root: &Path, recursive: bool) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e.into_path()),
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_detect_image_extensions() {
        let config = OrganizerConfig::default();
        assert_eq!(detect_media_kind(Path::new("photo.jpg"), &config), MediaKind::Image);
        assert_eq!(detect_media_kind(Path::new("photo.HEIC"), &config), MediaKind::Image);
        assert_eq!(detect_media_kind(Path::new("photo.Cr2"), &config), MediaKind::Image);
    }

    #[test]
    fn test_detect_video_extensions() {
        let config = OrganizerConfig::default();
        assert_eq!(detect_media_kind(Path::new("clip.MOV"), &config), MediaKind::Video);
        assert_eq!(detect_media_kind(Path::new("clip.3gpp"), &config), MediaKind::Video);
    }

    #[test]
    fn test_detect_unknown_extension() {
        let config = OrganizerConfig::default();
        assert_eq!(detect_media_kind(Path::new("notes.txt"), &config), MediaKind::Other);
        assert_eq!(detect_media_kind(Path::new("Makefile"), &config), MediaKind::Other);
        assert_eq!(detect_media_kind(Path::new("photo.jpg.bak"), &config), MediaKind::Other);
    }

    #[test]
    fn test_classify_excludes_directories_and_keeps_order() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("b.jpg").touch().unwrap();
        temp.child("a.png").touch().unwrap();
        temp.child("clip.mp4").touch().unwrap();
        temp.child("readme.txt").touch().unwrap();
        temp.child("album.jpg").create_dir_all().unwrap();

        let paths = vec![
            temp.path().join("b.jpg"),
            temp.path().join("album.jpg"),
            temp.path().join("clip.mp4"),
            temp.path().join("a.png"),
            temp.path().join("readme.txt"),
        ];
        let classified = classify(paths, &OrganizerConfig::default());

        let images: Vec<String> = classified.images.iter().map(|f| f.file_name()).collect();
        assert_eq!(images, vec!["b.jpg", "a.png"]);
        assert_eq!(classified.videos.len(), 1);
        assert_eq!(classified.others.len(), 1);
        assert_eq!(classified.media_count(), 3);
        assert_eq!(classified.media().last().unwrap().kind, MediaKind::Video);
    }

    #[test]
    fn test_list_candidates_recursive() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("top.jpg").touch().unwrap();
        temp.child("nested/deep/inner.jpg").touch().unwrap();

        let flat = list_candidates(temp.path(), false);
        assert!(flat.contains(&temp.path().join("top.jpg")));
        assert!(flat.contains(&temp.path().join("nested")));
        assert!(!flat.contains(&temp.path().join("nested/deep/inner.jpg")));

        let deep = list_candidates(temp.path(), true);
        assert!(deep.contains(&temp.path().join("nested/deep/inner.jpg")));
        assert!(deep.contains(&temp.path().join("nested/deep")));
    }
}
