use crate::organizer_core::config::OrganizerConfig;
use crate::organizer_core::date::{
    CaptureDate, from_system_time, guess_date_from_filename, parse_container_date, parse_exif_date,
};
use crate::organizer_core::error::{OrganizerError, Result};
use crate::organizer_core::exif::{MetadataReader, TagMap};
use crate::organizer_core::media::{MediaFile, MediaKind};
use std::fs;
use std::path::Path;
use time::UtcOffset;

/// A way of finding a capture date, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStrategy {
    Metadata,
    Filename,
    FileTimestamp,
}

impl DateStrategy {
    /// Strategies whose failure falls through to the next one. The file
    /// timestamp comes last and its failure ends the chain.
    pub const FALL_THROUGH: [DateStrategy; 2] = [DateStrategy::Metadata, DateStrategy::Filename];

    pub fn as_str(&self) -> &'static str {
        match self {
            DateStrategy::Metadata => "metadata",
            DateStrategy::Filename => "file name",
            DateStrategy::FileTimestamp => "file timestamp",
        }
    }
}

/// Which strategy produced the date, or why none did.
#[derive(Debug)]
pub enum ResolutionOutcome {
    FromMetadata(CaptureDate),
    FromFilename(CaptureDate),
    FromFileTimestamp(CaptureDate),
    Unresolvable(OrganizerError),
}

impl ResolutionOutcome {
    fn from_strategy(strategy: DateStrategy, date: CaptureDate) -> Self {
        match strategy {
            DateStrategy::Metadata => ResolutionOutcome::FromMetadata(date),
            DateStrategy::Filename => ResolutionOutcome::FromFilename(date),
            DateStrategy::FileTimestamp => ResolutionOutcome::FromFileTimestamp(date),
        }
    }

    pub fn date(&self) -> Option<CaptureDate> {
        match self {
            ResolutionOutcome::FromMetadata(d)
            | ResolutionOutcome::FromFilename(d)
            | ResolutionOutcome::FromFileTimestamp(d) => Some(*d),
            ResolutionOutcome::Unresolvable(_) => None,
        }
    }

    pub fn strategy(&self) -> Option<DateStrategy> {
        match self {
            ResolutionOutcome::FromMetadata(_) => Some(DateStrategy::Metadata),
            ResolutionOutcome::FromFilename(_) => Some(DateStrategy::Filename),
            ResolutionOutcome::FromFileTimestamp(_) => Some(DateStrategy::FileTimestamp),
            ResolutionOutcome::Unresolvable(_) => None,
        }
    }

    /// The resolved date, or the error that ended the chain.
    pub fn into_result(self) -> Result<CaptureDate> {
        match self {
            ResolutionOutcome::FromMetadata(d)
            | ResolutionOutcome::FromFilename(d)
            | ResolutionOutcome::FromFileTimestamp(d) => Ok(d),
            ResolutionOutcome::Unresolvable(e) => Err(e),
        }
    }
}

/// Resolves capture dates by walking [`DateStrategy::FALL_THROUGH`], then the
/// file timestamp.
pub struct DateResolver<'a, R: MetadataReader> {
    reader: R,
    config: &'a OrganizerConfig,
    offset: UtcOffset,
}

impl<'a, R: MetadataReader> DateResolver<'a, R> {
    /// `offset` is the local offset filesystem times are converted to.
    pub fn new(reader: R, config: &'a OrganizerConfig, offset: UtcOffset) -> Self {
        Self {
            reader,
            config,
            offset,
        }
    }

    pub fn resolve(&mut self, file: &MediaFile) -> ResolutionOutcome {
        for strategy in DateStrategy::FALL_THROUGH {
            match self.try_strategy(strategy, file) {
                Ok(date) => return ResolutionOutcome::from_strategy(strategy, date),
                Err(e) => log::debug!(
                    "No date from {} for {}: {}",
                    strategy.as_str(),
                    file.path.display(),
                    e
                ),
            }
        }

        match date_from_file_timestamp(&file.path, self.offset) {
            Ok(date) => ResolutionOutcome::FromFileTimestamp(date),
            Err(e) => ResolutionOutcome::Unresolvable(e),
        }
    }

    fn try_strategy(&mut self, strategy: DateStrategy, file: &MediaFile) -> Result<CaptureDate> {
        match strategy {
            DateStrategy::Metadata => self.date_from_metadata(file),
            DateStrategy::Filename => guess_date_from_filename(&file.file_name()),
            DateStrategy::FileTimestamp => date_from_file_timestamp(&file.path, self.offset),
        }
    }

    fn date_from_metadata(&mut self, file: &MediaFile) -> Result<CaptureDate> {
        match file.kind {
            MediaKind::Image => {
                let tags = self.reader.read_image_tags(&file.path)?;
                let value = first_present_tag(&tags, &self.config.image_date_tags, &file.path)?;
                parse_exif_date(value)
            }
            MediaKind::Video => {
                let tags = self.reader.read_container_metadata(&file.path)?;
                let value = first_present_tag(&tags, &self.config.video_date_tags, &file.path)?;
                // Raw exiftool output keeps the EXIF-style colons
                parse_container_date(value).or_else(|_| parse_exif_date(value))
            }
            MediaKind::Other => Err(OrganizerError::MetadataUnavailable {
                path: file.path.clone(),
                reason: "not a media file".to_string(),
            }),
        }
    }
}

/// The value of the first non-empty tag in preference order.
fn first_present_tag<'t>(tags: &'t TagMap, preference: &[String], path: &Path) -> Result<&'t str> {
    preference
        .iter()
        .find_map(|tag| tags.get(tag).map(|v| v.trim()).filter(|v| !v.is_empty()))
        .ok_or_else(|| OrganizerError::MetadataUnavailable {
            path: path.to_path_buf(),
            reason: format!("none of {:?} present", preference),
        })
}

/// Creation time of the file; change time on Unix or modification time when
/// the filesystem has no birth time.
pub fn date_from_file_timestamp(path: &Path, offset: UtcOffset) -> Result<CaptureDate> {
    let metadata = fs::metadata(path).map_err(|e| OrganizerError::FilesystemTimestamp {
        path: path.to_path_buf(),
        source: e,
    })?;

    let time = match metadata.created() {
        Ok(created) => created,
        Err(_) => change_time(&metadata)
            .map(Ok)
            .unwrap_or_else(|| metadata.modified())
            .map_err(|e| OrganizerError::FilesystemTimestamp {
                path: path.to_path_buf(),
                source: e,
            })?,
    };

    Ok(from_system_time(time, offset))
}

#[cfg(unix)]
fn change_time(metadata: &fs::Metadata) -> Option<std::time::SystemTime> {
    use std::os::unix::fs::MetadataExt;
    use std::time::{Duration, UNIX_EPOCH};

    let secs = u64::try_from(metadata.ctime()).ok()?;
    let nanos = u32::try_from(metadata.ctime_nsec()).ok()?;
    UNIX_EPOCH.checked_add(Duration::new(secs, nanos))
}

#[cfg(not(unix))]
fn change_time(_metadata: &fs::Metadata) -> Option<std::time::SystemTime> {
    None
}
