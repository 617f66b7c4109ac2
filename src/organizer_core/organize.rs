use crate::organizer_core::config::OrganizerConfig;
use crate::organizer_core::error::{FileFailures, OrganizerError, Result};
use crate::organizer_core::exif::MetadataReader;
use crate::organizer_core::media::{MediaFile, classify, list_candidates};
use crate::organizer_core::place::{Placement, Placer, base_directory};
use crate::organizer_core::resolve::DateResolver;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::{Path, PathBuf};
use time::UtcOffset;

/// Per-run switches chosen on the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Base folder for `YYYY/MM/DD`; each file's own folder when `None`.
    pub output: Option<PathBuf>,
    pub recursive: bool,
    pub dry_run: bool,
    pub verbose: bool,
    pub show_progress: bool,
}

/// Counts and failures from one run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub images_found: usize,
    pub videos_found: usize,
    pub others_found: usize,
    pub moved: usize,
    pub would_move: usize,
    pub already_in_place: usize,
    pub skipped_existing: usize,
    pub duplicates: usize,
    pub failures: FileFailures,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, placement: &Placement) {
        match placement {
            Placement::Moved(_) => self.moved += 1,
            Placement::WouldMove(_) => self.would_move += 1,
            Placement::AlreadyInPlace(_) => self.already_in_place += 1,
            Placement::SkippedExisting(_) => self.skipped_existing += 1,
            Placement::Duplicate(_) => self.duplicates += 1,
        }
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "  {} images, {} videos, {} other files found",
            self.images_found, self.videos_found, self.others_found
        )?;
        if self.would_move > 0 {
            writeln!(f, "  {} files would be moved", self.would_move)?;
        }
        writeln!(f, "  {} files moved", self.moved)?;
        if self.already_in_place > 0 {
            writeln!(f, "  {} already in place", self.already_in_place)?;
        }
        if self.skipped_existing > 0 {
            writeln!(f, "  {} skipped (target exists)", self.skipped_existing)?;
        }
        if self.duplicates > 0 {
            writeln!(f, "  {} duplicates skipped", self.duplicates)?;
        }
        write!(f, "  {} failed", self.failed())
    }
}

/// Sorts the media of one source folder into dated subfolders.
pub struct Organizer<'a, R: MetadataReader> {
    config: &'a OrganizerConfig,
    options: RunOptions,
    resolver: DateResolver<'a, R>,
    placer: Placer,
}

impl<'a, R: MetadataReader> Organizer<'a, R> {
    pub fn new(config: &'a OrganizerConfig, options: RunOptions, reader: R, offset: UtcOffset) -> Self {
        let placer = Placer::new(config.on_conflict, options.dry_run);
        Self {
            config,
            resolver: DateResolver::new(reader, config, offset),
            options,
            placer,
        }
    }

    /// Organize every image and video found in `source`. Only an invalid
    /// source folder stops the run; per-file errors are collected.
    pub fn run(&mut self, source: &Path) -> Result<RunSummary> {
        if !source.is_dir() {
            return Err(OrganizerError::NotADirectory(source.to_path_buf()));
        }

        log::info!(
            "Organizing {} (output: {}, recursive: {}, dry run: {}, on conflict: {})",
            source.display(),
            self.options
                .output
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "in place".to_string()),
            self.options.recursive,
            self.options.dry_run,
            self.config.on_conflict
        );
        log::debug!("Image extensions: {:?}", self.config.image_extensions);
        log::debug!("Video extensions: {:?}", self.config.video_extensions);

        let classified = classify(list_candidates(source, self.options.recursive), self.config);
        log::info!(
            "Found {} image(s), {} video(s), {} other file(s)",
            classified.images.len(),
            classified.videos.len(),
            classified.others.len()
        );

        let mut summary = RunSummary {
            images_found: classified.images.len(),
            videos_found: classified.videos.len(),
            others_found: classified.others.len(),
            ..Default::default()
        };

        let bar = self.progress_bar(classified.media_count() as u64);
        bar.set_message("Organizing");

        for file in classified.media() {
            match self.process_file(file) {
                Ok(placement) => summary.record(&placement),
                Err(e) => {
                    log::error!("Failed {}: {}", file.path.display(), e);
                    summary.failures.add(file.path.clone(), e);
                }
            }
            bar.inc(1);
        }

        bar.finish_with_message("Done");

        log::info!(
            "Finished: {} moved, {} would move, {} in place, {} skipped, {} duplicates, {} failed",
            summary.moved,
            summary.would_move,
            summary.already_in_place,
            summary.skipped_existing,
            summary.duplicates,
            summary.failed()
        );

        Ok(summary)
    }

    /// Resolve and place a single file.
    pub fn process_file(&mut self, file: &MediaFile) -> Result<Placement> {
        let outcome = self.resolver.resolve(file);
        if let Some(strategy) = outcome.strategy() {
            log::debug!(
                "{} {}: date {} from {}",
                file.kind,
                file.path.display(),
                outcome.date().map(|d| d.to_string()).unwrap_or_default(),
                strategy.as_str()
            );
        }
        let date = outcome.into_result()?;

        let base = base_directory(file, date, self.options.output.as_deref());
        let placement = self.placer.place(file, date, &base)?;
        log::info!("{}: {}", file.path.display(), placement);

        Ok(placement)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.options.show_progress || self.options.verbose {
            return ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::hidden());
        }
        let bar_style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        ProgressBar::new(len).with_style(bar_style)
    }
}
