use anyhow::Result;
use clap::Parser;
use photo_organizer::organizer_core::{
    Cli, ExifToolReader, Organizer, OrganizerConfig, OrganizerError, RunOptions, get_local_offset,
};
use simplelog::{CombinedLogger, Config, SharedLogger, TermLogger, WriteLogger};
use std::fs::File;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    // Read before anything else may start a thread
    let offset = get_local_offset();

    let cli = Cli::parse();

    // Initialize loggers
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        cli.terminal_level(),
        Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )];

    if cli.log {
        loggers.push(WriteLogger::new(
            cli.log_level,
            Config::default(),
            File::create("photo-organizer.log")?,
        ));
    }

    CombinedLogger::init(loggers)?;

    let mut config = match &cli.config {
        Some(path) => OrganizerConfig::load(path)?,
        None => OrganizerConfig::default(),
    };
    if let Some(policy) = cli.on_conflict {
        config.on_conflict = policy;
    }

    let options = RunOptions {
        output: cli.output.clone(),
        recursive: cli.recursive,
        dry_run: cli.dry_run,
        verbose: cli.verbose,
        show_progress: cli.progress,
    };

    let reader = ExifToolReader::new();
    let mut organizer = Organizer::new(&config, options, reader, offset);

    let summary = match organizer.run(&cli.source_dir) {
        Ok(summary) => summary,
        Err(OrganizerError::NotADirectory(path)) => {
            eprintln!("You specified an invalid folder: {}", path.display());
            return Ok(ExitCode::from(1));
        }
        Err(e) => return Err(e.into()),
    };

    if cli.dry_run {
        println!("\n[DRY RUN] No files were changed.");
    }
    println!("\nSummary for {}:", cli.source_dir.display());
    println!("{}", summary);

    if summary.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        println!("\nFailed files:\n{}", summary.failures);
        Ok(ExitCode::from(2))
    }
}
