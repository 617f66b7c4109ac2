use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrganizerError {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Filesystem errors
    #[error("Directory walker error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    // Configuration errors
    #[error("Invalid configuration in {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    // Date resolution errors
    #[error("Date parsing error: {0}")]
    InvalidDateFormat(String),

    #[error("Metadata unavailable for {path}: {reason}")]
    MetadataUnavailable { path: PathBuf, reason: String },

    #[error("No date pattern found in file name {0}")]
    FilenamePatternMismatch(String),

    #[error("Could not read filesystem timestamp of {path}: {source}")]
    FilesystemTimestamp {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Placement errors
    #[error("Failed to move {} -> {}: {source}", source_path.display(), target.display())]
    Placement {
        source_path: PathBuf,
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Files that could not be organized during a run.
#[derive(Debug, Default)]
pub struct FileFailures {
    pub failures: Vec<FileFailure>,
}

#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: OrganizerError,
}

impl std::fmt::Display for FileFailures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for failure in &self.failures {
            writeln!(f, "  {}: {}", failure.path.display(), failure.error)?;
        }
        Ok(())
    }
}

impl FileFailures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: PathBuf, error: OrganizerError) {
        self.failures.push(FileFailure { path, error });
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }
}

/// Result type for organizer operations.
pub type Result<T> = std::result::Result<T, OrganizerError>;
