use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use super::endian::ByteOrder;

/// JPEG SOI immediately followed by an APP1 marker.
const JPEG_EXIF_MAGIC: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE1];
const EXIF_IDENTIFIER: &[u8; 6] = b"Exif\0\0";
const TIFF_MAGIC: u16 = 0x002A;

/// Orientation tag ID (IFD0).
pub const TAG_ORIENTATION: u16 = 0x0112;
const TYPE_SHORT: u16 = 3;
const IFD_ENTRY_SIZE: usize = 12;

// APP1 lengths at or below this cannot hold a usable TIFF header.
const MIN_SEGMENT_LEN: usize = 20;

// File offset of the TIFF header: magic 4B + length 2B + Exif\0\0 6B
const TIFF_HEADER_START: u64 = 4 + 2 + 6;

/// Orientation found in a JPEG file.
///
/// `Absent` and `TagMissing` are kept apart even though callers normally
/// treat both as "Normal": the first means there is no usable Exif block
/// at the start of the file, the second means the Exif block exists but
/// IFD0 carries no orientation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// No Exif APP1 block, or the block is malformed.
    Absent,
    /// Exif present, but IFD0 has no orientation entry.
    TagMissing,
    /// Raw value of the orientation entry. Not range-checked.
    Value(u16),
}

impl Orientation {
    /// The raw tag value, if an orientation entry was found.
    pub fn value(self) -> Option<u16> {
        match self {
            Orientation::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Concrete orientation code, defaulting to 1 (normal) when unknown.
    pub fn code(self) -> u16 {
        match self {
            Orientation::Value(v) if v != 0 => v,
            _ => 1,
        }
    }

    /// Human-readable description for codes 1-8.
    pub fn description(self) -> Option<&'static str> {
        let desc = match self.value()? {
            1 => "Normal",
            2 => "Mirrored left-to-right",
            3 => "Rotated 180 degrees",
            4 => "Mirrored top-to-bottom",
            5 => "Mirrored along top-left diagonal",
            6 => "Rotated 90 degrees",
            7 => "Mirrored along top-right diagonal",
            8 => "Rotated 270 degrees",
            _ => return None,
        };
        Some(desc)
    }

    /// Clockwise rotation a lossless JPEG transform must apply to make the
    /// pixels upright, for the orientations the upload optimizer handles.
    ///
    /// After rotating, the tag should be reset with [`clear_orientation`].
    pub fn lossless_rotation(self) -> Option<u16> {
        match self.code() {
            6 => Some(90),
            8 => Some(270),
            _ => None,
        }
    }
}

/// Result of walking IFD0 for the orientation entry.
#[derive(Debug, PartialEq, Eq)]
enum Scan {
    /// `entry` is the entry's offset within the TIFF header.
    Found {
        order: ByteOrder,
        entry: usize,
        value: u16,
    },
    TagMissing,
    Rejected(&'static str),
}

/// Read the Exif orientation of a JPEG file.
///
/// Only files starting with `FF D8 FF E1` are inspected. Anything else, or
/// any structural problem in the Exif block, yields [`Orientation::Absent`].
/// Errors are returned only when the file cannot be opened or read.
pub fn get_orientation(path: &Path) -> Result<Orientation> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let scan = scan(&mut file).with_context(|| format!("Failed to read {}", path.display()))?;

    Ok(match scan {
        Scan::Found { value, .. } => Orientation::Value(value),
        Scan::TagMissing => Orientation::TagMissing,
        Scan::Rejected(reason) => {
            log::debug!("No orientation in {}: {reason}", path.display());
            Orientation::Absent
        }
    })
}

/// Overwrite the orientation entry of a JPEG file in place.
///
/// The 12-byte IFD entry is rewritten as a single SHORT holding `value`;
/// the file length never changes. A file without a usable orientation entry
/// is left untouched and is not an error.
pub fn set_orientation(path: &Path, value: u8) -> Result<()> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;

    let (order, entry) =
        match scan(&mut file).with_context(|| format!("Failed to read {}", path.display()))? {
            Scan::Found { order, entry, .. } => (order, entry),
            Scan::TagMissing => {
                log::debug!("No orientation entry to rewrite in {}", path.display());
                return Ok(());
            }
            Scan::Rejected(reason) => {
                log::debug!("No orientation in {}: {reason}", path.display());
                return Ok(());
            }
        };

    file.seek(SeekFrom::Start(TIFF_HEADER_START + entry as u64))
        .and_then(|_| file.write_all(&orientation_entry(order, value)))
        .and_then(|_| file.seek(SeekFrom::End(0)))
        .with_context(|| format!("Failed to write orientation to {}", path.display()))?;

    log::debug!("Orientation of {} set to {value}", path.display());
    Ok(())
}

/// Reset the orientation tag to 1 (normal).
pub fn clear_orientation(path: &Path) -> Result<()> {
    set_orientation(path, 1)
}

/// Build a SHORT, count-1 orientation entry holding `value`.
fn orientation_entry(order: ByteOrder, value: u8) -> [u8; IFD_ENTRY_SIZE] {
    let mut entry = [0u8; IFD_ENTRY_SIZE];
    entry[0..2].copy_from_slice(&order.encode_u16(TAG_ORIENTATION));
    entry[2..4].copy_from_slice(&order.encode_u16(TYPE_SHORT));
    entry[4..8].copy_from_slice(&order.encode_u32(1));
    entry[8..10].copy_from_slice(&order.encode_u16(value.into()));
    entry
}

/// Read the APP1 header and TIFF block from the start of `r`.
///
/// A short read is a structural rejection, not an I/O error.
fn scan<R: Read>(r: &mut R) -> io::Result<Scan> {
    let mut magic = [0u8; 4];
    if !read_full(r, &mut magic)? || magic != JPEG_EXIF_MAGIC {
        return Ok(Scan::Rejected("not a JPEG starting with an APP1 segment"));
    }

    let mut len = [0u8; 2];
    if !read_full(r, &mut len)? {
        return Ok(Scan::Rejected("truncated APP1 length"));
    }
    let seg_len = usize::from(u16::from_be_bytes(len));
    if seg_len <= MIN_SEGMENT_LEN {
        return Ok(Scan::Rejected("APP1 segment too short"));
    }

    let mut ident = [0u8; 6];
    if !read_full(r, &mut ident)? || &ident != EXIF_IDENTIFIER {
        return Ok(Scan::Rejected("APP1 segment is not Exif"));
    }

    let mut tiff = vec![0u8; seg_len - 8];
    if !read_full(r, &mut tiff)? {
        return Ok(Scan::Rejected("truncated TIFF header"));
    }

    Ok(scan_tiff(&tiff, seg_len))
}

/// Walk IFD0 of a TIFF block looking for the orientation entry.
///
/// `seg_len` is the declared APP1 length; the range guards are measured
/// against it, and every access is also bounds-checked against `tiff`.
fn scan_tiff(tiff: &[u8], seg_len: usize) -> Scan {
    let Some(order) = tiff.get(..2).and_then(ByteOrder::from_marker) else {
        return Scan::Rejected("unknown TIFF byte order");
    };
    if order.load_u16(tiff, 2) != Some(TIFF_MAGIC) {
        return Scan::Rejected("bad TIFF magic");
    }

    let Some(offset) = order.load_u32(tiff, 4) else {
        return Scan::Rejected("truncated TIFF header");
    };
    let offset = offset as usize;
    if offset > seg_len.saturating_sub(2) {
        return Scan::Rejected("IFD offset out of range");
    }

    let Some(count) = order.load_u16(tiff, offset) else {
        return Scan::Rejected("truncated IFD");
    };

    let mut cursor = offset + 2;
    for _ in 0..count {
        if cursor > seg_len.saturating_sub(IFD_ENTRY_SIZE) {
            return Scan::Rejected("IFD entry out of range");
        }
        let Some(tag) = order.load_u16(tiff, cursor) else {
            return Scan::Rejected("truncated IFD entry");
        };
        if tag == TAG_ORIENTATION {
            // The write path rewrites all 12 bytes, so the whole entry must
            // lie inside the segment.
            if tiff.len() < cursor + IFD_ENTRY_SIZE {
                return Scan::Rejected("truncated IFD entry");
            }
            return match order.load_u16(tiff, cursor + 8) {
                Some(value) => Scan::Found {
                    order,
                    entry: cursor,
                    value,
                },
                None => Scan::Rejected("truncated IFD entry"),
            };
        }
        cursor += IFD_ENTRY_SIZE;
    }

    Scan::TagMissing
}

/// `read_exact` that reports EOF as `Ok(false)`.
fn read_full<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<bool> {
    match r.read_exact(buf) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}
