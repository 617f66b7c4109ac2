use crate::organizer_core::config::ConflictPolicy;
use clap::Parser;
use simplelog::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Move photos and videos into YYYY/MM/DD folders by capture date"
)]
pub struct Cli {
    /// Folder containing the photos and videos to organize
    #[arg(required = true)]
    pub source_dir: PathBuf,

    /// Folder to build YYYY/MM/DD under (defaults to each file's own folder)
    #[arg(short, long, visible_alias = "output-folder")]
    pub output: Option<PathBuf>,

    /// Also organize files in subfolders
    #[arg(short, long)]
    pub recursive: bool,

    /// Show where files would go without making changes
    #[arg(short = 'n', long, visible_alias = "test-mode")]
    pub dry_run: bool,

    /// Print debug diagnostics, including the recognized extensions
    #[arg(short, long, visible_alias = "debug")]
    pub verbose: bool,

    /// What to do when the target file already exists (overrides the config file)
    #[arg(long, value_enum)]
    pub on_conflict: Option<ConflictPolicy>,

    /// JSON file with extension lists, date tag preference and conflict policy
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Show a progress bar; per-file lines then only go to the log file
    #[arg(long)]
    pub progress: bool,

    /// Enable file logging to photo-organizer.log
    #[arg(long = "log")]
    pub log: bool,

    /// Log level for file logging (debug, info, warn, error)
    #[arg(long, default_value_t = LevelFilter::Debug)]
    pub log_level: LevelFilter,
}

impl Cli {
    /// Level for console logging.
    pub fn terminal_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.progress {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }
}
