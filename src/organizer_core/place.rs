use crate::organizer_core::config::ConflictPolicy;
use crate::organizer_core::date::CaptureDate;
use crate::organizer_core::error::{OrganizerError, Result};
use crate::organizer_core::media::MediaFile;
use base64::{Engine, engine::general_purpose};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Moved(PathBuf),
    /// Dry run: where the file would have gone.
    WouldMove(PathBuf),
    /// The file already sits at its target.
    AlreadyInPlace(PathBuf),
    /// Another file occupies the target and the policy is `skip`.
    SkippedExisting(PathBuf),
    /// An identical copy already occupies the target.
    Duplicate(PathBuf),
}

impl Placement {
    #[cfg(test)]
    pub fn target(&self) -> &Path {
        match self {
            Placement::Moved(p)
            | Placement::WouldMove(p)
            | Placement::AlreadyInPlace(p)
            | Placement::SkippedExisting(p)
            | Placement::Duplicate(p) => p,
        }
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Placement::Moved(p) => write!(f, "moved to {}", p.display()),
            Placement::WouldMove(p) => write!(f, "would move to {}", p.display()),
            Placement::AlreadyInPlace(p) => write!(f, "already in place at {}", p.display()),
            Placement::SkippedExisting(p) => {
                write!(f, "skipped, {} already exists", p.display())
            }
            Placement::Duplicate(p) => write!(f, "skipped, identical to {}", p.display()),
        }
    }
}

/// Moves files into `base/YYYY/MM/DD`.
#[derive(Debug, Clone, Copy)]
pub struct Placer {
    policy: ConflictPolicy,
    dry_run: bool,
}

impl Placer {
    pub fn new(policy: ConflictPolicy, dry_run: bool) -> Self {
        Self { policy, dry_run }
    }

    /// Place `file` under `base` by `date`. In dry-run mode the filesystem is
    /// only read, never changed.
    pub fn place(&self, file: &MediaFile, date: CaptureDate, base: &Path) -> Result<Placement> {
        let target_dir = date.folder_under(base);
        let mut target = target_dir.join(file.path.file_name().unwrap_or_default());

        if same_location(&file.path, &target) {
            return Ok(Placement::AlreadyInPlace(target));
        }

        if target.exists() {
            match self.policy {
                ConflictPolicy::Skip => return Ok(Placement::SkippedExisting(target)),
                ConflictPolicy::Overwrite => {
                    log::debug!("Overwriting existing {}", target.display());
                }
                ConflictPolicy::Rename => {
                    let identical = files_identical(&file.path, &target)
                        .map_err(|e| placement_error(file, &target, e))?;
                    if identical {
                        return Ok(Placement::Duplicate(target));
                    }
                    target = next_free_name(&target);
                    log::debug!("Target taken, renaming to {}", target.display());
                }
            }
        }

        if self.dry_run {
            return Ok(Placement::WouldMove(target));
        }

        fs::create_dir_all(&target_dir).map_err(|e| placement_error(file, &target, e))?;
        move_file(&file.path, &target).map_err(|e| placement_error(file, &target, e))?;

        Ok(Placement::Moved(target))
    }
}

fn placement_error(file: &MediaFile, target: &Path, source: io::Error) -> OrganizerError {
    OrganizerError::Placement {
        source_path: file.path.clone(),
        target: target.to_path_buf(),
        source,
    }
}

/// The folder `YYYY/MM/DD` is built under. With an output folder that is the
/// output folder; otherwise the file's own folder, unless that folder already
/// is `YYYY/MM/DD` for `date`, in which case its base is reused.
pub fn base_directory(file: &MediaFile, date: CaptureDate, output: Option<&Path>) -> PathBuf {
    if let Some(output) = output {
        return output.to_path_buf();
    }

    let parent = file
        .path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let [year, month, day] = date.folder_components();
    let mut ancestors = parent.ancestors();
    let tail: Vec<_> = ancestors
        .by_ref()
        .take(3)
        .map(|p| p.file_name().and_then(|n| n.to_str()))
        .collect();

    if tail == [Some(day.as_str()), Some(month.as_str()), Some(year.as_str())] {
        if let Some(organized_base) = ancestors.next() {
            return organized_base.to_path_buf();
        }
    }

    parent
}

fn same_location(source: &Path, target: &Path) -> bool {
    if source == target {
        return true;
    }
    match (fs::canonicalize(source), fs::canonicalize(target)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// `name_1.ext`, `name_2.ext`, ... next to `taken`.
fn next_free_name(taken: &Path) -> PathBuf {
    let dir = taken.parent().unwrap_or_else(|| Path::new(""));
    let stem = taken
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let ext = taken.extension().map(|e| e.to_string_lossy().to_string());

    (1u32..)
        .map(|n| match &ext {
            Some(ext) => dir.join(format!("{}_{}.{}", stem, n, ext)),
            None => dir.join(format!("{}_{}", stem, n)),
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| taken.to_path_buf())
}

fn files_identical(a: &Path, b: &Path) -> io::Result<bool> {
    let (meta_a, meta_b) = (fs::metadata(a)?, fs::metadata(b)?);
    if meta_a.len() != meta_b.len() {
        return Ok(false);
    }
    Ok(hash_file(a)? == hash_file(b)?)
}

/// Calculate SHA256 hash of a file, returned as base64.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    let hash = hasher.finalize();
    Ok(general_purpose::STANDARD.encode(hash))
}

/// Rename, or copy and delete when source and target are on different devices.
fn move_file(source: &Path, target: &Path) -> io::Result<()> {
    match fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            log::debug!("Cross-device move, copying {}", source.display());
            copy_then_remove(source, target)
        }
        Err(e) => Err(e),
    }
}

/// Copy through `.<name>.partial` next to `target` so a failed copy never
/// leaves a truncated target behind, then delete the source.
fn copy_then_remove(source: &Path, target: &Path) -> io::Result<()> {
    let partial = partial_path(target);

    let copied = fs::copy(source, &partial).and_then(|_| fs::rename(&partial, target));
    if let Err(e) = copied {
        if partial.exists() {
            if let Err(cleanup) = fs::remove_file(&partial) {
                log::warn!("Could not remove {}: {}", partial.display(), cleanup);
            }
        }
        return Err(e);
    }

    fs::remove_file(source)
}

fn partial_path(target: &Path) -> PathBuf {
    let name = target.file_name().unwrap_or_default().to_string_lossy();
    target.with_file_name(format!(".{}.partial", name))
}
