use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use exif_orient::config;
use exif_orient::pipeline::{self, Action, ProcessResult};

#[derive(Parser, Debug)]
#[command(
    name = "exif-orient",
    version,
    about = "Show or clear the Exif orientation tag of JPEG files, in place"
)]
struct Cli {
    /// JPEG files or directories to process
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Reset the orientation tag to "Normal"
    #[arg(short = 'c', long)]
    clear: bool,

    /// Path to config file (default: config.json next to binary)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initialize a default config.json and exit
    #[arg(long)]
    init: bool,

    /// Report what would be cleared without writing to files
    #[arg(long)]
    dry_run: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let config = config::Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => config::Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    if cli.paths.is_empty() {
        anyhow::bail!("No input files or directories specified. Use --help for usage.");
    }

    // Load config
    let mut config = config::Config::load(cli.config.as_deref())?;

    // Override dry_run from CLI flag
    if cli.dry_run {
        config.output.dry_run = true;
    }

    let images = pipeline::collect_images(&cli.paths, &config);
    if images.is_empty() {
        anyhow::bail!("No JPEG files found in the specified paths.");
    }

    let action = if cli.clear { Action::Clear } else { Action::Show };
    log::debug!("Found {} image(s), action {action:?}", images.len());
    if action == Action::Clear && config.output.dry_run {
        log::info!("DRY RUN: no files will be modified");
    }

    let total = images.len();
    let results: Vec<ProcessResult> = images
        .iter()
        .map(|path| pipeline::process_image(path, action, &config))
        .collect();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            print_result(result, action, config.output.dry_run, total > 1);
        }
    }

    let failed = results.iter().filter(|r| r.error.is_some()).count();
    if action == Action::Clear {
        let cleared = results.iter().filter(|r| r.cleared).count();
        log::info!("Done: {cleared} cleared, {failed} failed out of {total} images");
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {total} image(s) could not be processed");
    }

    Ok(())
}

/// Print one line per image, prefixed with its path when there are several.
fn print_result(result: &ProcessResult, action: Action, dry_run: bool, show_path: bool) {
    if let Some(ref err) = result.error {
        log::error!("{}: {err}", result.path.display());
        return;
    }

    let line = match action {
        Action::Show => result
            .description
            .unwrap_or("Invalid orientation")
            .to_string(),
        Action::Clear if result.cleared && dry_run => "Would clear orientation".to_string(),
        Action::Clear if result.cleared => match result.backup_path {
            Some(ref backup) => format!("Orientation cleared (backup: {})", backup.display()),
            None => "Orientation cleared".to_string(),
        },
        Action::Clear => "Nothing to clear".to_string(),
    };

    if show_path {
        println!("{}: {line}", result.path.display());
    } else {
        println!("{line}");
    }
}
