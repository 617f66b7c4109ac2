pub mod cli;
pub mod config;
pub mod date;
pub mod error;
pub mod exif;
pub mod media;
pub mod organize;
pub mod place;
pub mod resolve;

pub use cli::Cli;
pub use config::{ConflictPolicy, OrganizerConfig};
pub use date::{CaptureDate, get_local_offset};
pub use error::{FileFailures, OrganizerError};
pub use exif::{ExifToolReader, MetadataReader, TagMap};
pub use media::{Classified, MediaFile, MediaKind, classify, list_candidates};
pub use organize::{Organizer, RunOptions, RunSummary};
pub use place::{Placement, Placer};
pub use resolve::{DateResolver, DateStrategy, ResolutionOutcome};
