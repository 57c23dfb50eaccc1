//! # exif-orient
//!
//! Read and clear the Exif orientation tag of JPEG files, in place.
//!
//! Uploading a photo usually involves a lossless JPEG transform (such as
//! `jpegtran -rotate 90`) that physically rotates the pixels. The Exif
//! orientation tag then has to be reset to "Normal", or viewers that honor
//! it will rotate the image a second time. This crate patches the 12-byte
//! IFD entry directly, without re-encoding the image or rewriting any other
//! metadata.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use exif_orient::exif::{clear_orientation, get_orientation};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let path = Path::new("photo.jpg");
//!
//!     let orientation = get_orientation(path)?;
//!     println!("{}", orientation.description().unwrap_or("Invalid orientation"));
//!
//!     if let Some(degrees) = orientation.lossless_rotation() {
//!         // ... run `jpegtran -rotate {degrees}` on the file, then:
//!         println!("rotated {degrees} degrees");
//!         clear_orientation(path)?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Batch Usage
//!
//! ```rust,no_run
//! use exif_orient::config::Config;
//! use exif_orient::pipeline::{collect_images, process_image, Action};
//! use std::path::PathBuf;
//!
//! let config = Config::default();
//! for path in collect_images(&[PathBuf::from("./photos")], &config) {
//!     let result = process_image(&path, Action::Clear, &config);
//!     if result.cleared {
//!         println!("Cleared: {}", path.display());
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`exif`] - Orientation tag reader and in-place writer
//! - [`config`] - Configuration types and loading/saving
//! - [`pipeline`] - File collection and per-file show/clear processing

pub mod config;
pub mod exif;
pub mod pipeline;
