//! Exif orientation reading and in-place rewriting for JPEG files.
//!
//! - [`get_orientation`] - Report the orientation tag (0x0112) of a JPEG
//! - [`set_orientation`] / [`clear_orientation`] - Overwrite it without
//!   changing the file length
//!
//! Only a JPEG whose first segment is an Exif APP1 block is inspected.
//! Anything else reports [`Orientation::Absent`], which callers treat as
//! "Normal".

mod endian;
mod orientation;

pub use endian::ByteOrder;
pub use orientation::{
    clear_orientation, get_orientation, set_orientation, Orientation, TAG_ORIENTATION,
};
