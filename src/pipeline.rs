use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::exif::{self, Orientation};

/// What to do with each collected image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Report the orientation only.
    Show,
    /// Reset a non-normal orientation tag to 1.
    Clear,
}

/// Result of processing a single image.
///
/// Contains the orientation that was found, whether it was cleared,
/// and any error that occurred. Serializes to the `--json` output.
#[derive(Debug, Default, Serialize)]
pub struct ProcessResult {
    /// Path to the image that was processed.
    pub path: PathBuf,
    /// Raw orientation value, if the file has an orientation entry.
    pub orientation: Option<u16>,
    /// Description of the orientation, for values 1-8.
    pub description: Option<&'static str>,
    /// Clockwise rotation a lossless transform would apply, in degrees.
    pub rotation: Option<u16>,
    /// Whether the tag was reset (or would be, in dry-run mode).
    pub cleared: bool,
    /// Backup written before modifying the file.
    pub backup_path: Option<PathBuf>,
    /// Error message if processing failed.
    pub error: Option<String>,
}

/// Collect JPEG files from a list of paths (files or directories).
///
/// Directories are walked recursively. Files whose extension is not one of
/// the configured JPEG extensions are skipped.
///
/// # Example
///
/// ```rust,no_run
/// use exif_orient::config::Config;
/// use exif_orient::pipeline::collect_images;
/// use std::path::PathBuf;
///
/// let images = collect_images(
///     &[PathBuf::from("photo.jpg"), PathBuf::from("./photos/")],
///     &Config::default(),
/// );
/// println!("Found {} images", images.len());
/// ```
pub fn collect_images(paths: &[PathBuf], config: &Config) -> Vec<PathBuf> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_jpeg(path, config) {
                images.push(path.clone());
            } else {
                log::warn!("Skipping non-JPEG file: {}", path.display());
            }
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(config.scan.follow_links)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let p = entry.path();
                if p.is_file() && is_jpeg(p, config) {
                    images.push(p.to_path_buf());
                }
            }
        } else {
            log::warn!("Path does not exist: {}", path.display());
        }
    }

    images
}

fn is_jpeg(path: &Path, config: &Config) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| config.is_jpeg_extension(ext))
        .unwrap_or(false)
}

/// Create a backup of the original file, once.
fn backup_file(path: &Path) -> Result<PathBuf> {
    let backup_path = path.with_extension(format!(
        "{}.bak",
        path.extension().unwrap_or_default().to_string_lossy()
    ));

    if !backup_path.exists() {
        std::fs::copy(path, &backup_path).context("Failed to create backup")?;
        log::debug!("Backup created: {}", backup_path.display());
    }

    Ok(backup_path)
}

/// Read (and for [`Action::Clear`], reset) the orientation of one image.
///
/// Errors are recorded in [`ProcessResult::error`] rather than returned, so
/// a batch keeps going after a bad file.
pub fn process_image(path: &Path, action: Action, config: &Config) -> ProcessResult {
    let mut result = ProcessResult {
        path: path.to_path_buf(),
        ..Default::default()
    };

    if let Err(e) = run(path, action, config, &mut result) {
        result.error = Some(format!("{e:#}"));
    }

    result
}

fn run(path: &Path, action: Action, config: &Config, result: &mut ProcessResult) -> Result<()> {
    let orientation = exif::get_orientation(path)?;
    result.orientation = orientation.value();
    result.description = orientation.description();
    result.rotation = orientation.lossless_rotation();

    if action == Action::Show {
        return Ok(());
    }

    match orientation {
        Orientation::Value(v) if v != 1 => {
            if config.output.dry_run {
                log::info!("Would clear orientation {v}: {}", path.display());
                result.cleared = true;
                return Ok(());
            }
            if config.output.backup_originals {
                result.backup_path = Some(backup_file(path)?);
            }
            exif::clear_orientation(path)?;
            result.cleared = true;
        }
        Orientation::Value(_) => log::debug!("Already normal: {}", path.display()),
        Orientation::TagMissing | Orientation::Absent => {
            log::debug!("No orientation to clear: {}", path.display())
        }
    }

    Ok(())
}
