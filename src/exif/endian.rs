use std::mem;

/// Byte order of a TIFF block, taken from its first two bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// `"II"` (Intel).
    Little,
    /// `"MM"` (Motorola).
    Big,
}

// Loads return `None` instead of panicking when the read would run past
// the end of `buf`.
macro_rules! generate_load {
    ($name:ident, $int_type:ident) => {
        pub fn $name(self, buf: &[u8], offset: usize) -> Option<$int_type> {
            let end = offset.checked_add(mem::size_of::<$int_type>())?;
            let bytes: [u8; mem::size_of::<$int_type>()] =
                buf.get(offset..end)?.try_into().ok()?;
            Some(match self {
                ByteOrder::Little => $int_type::from_le_bytes(bytes),
                ByteOrder::Big => $int_type::from_be_bytes(bytes),
            })
        }
    };
}

macro_rules! generate_encode {
    ($name:ident, $int_type:ident) => {
        pub fn $name(self, num: $int_type) -> [u8; mem::size_of::<$int_type>()] {
            match self {
                ByteOrder::Little => num.to_le_bytes(),
                ByteOrder::Big => num.to_be_bytes(),
            }
        }
    };
}

impl ByteOrder {
    /// Parse the byte-order marker at the start of a TIFF header.
    pub fn from_marker(marker: &[u8]) -> Option<Self> {
        match marker {
            b"II" => Some(ByteOrder::Little),
            b"MM" => Some(ByteOrder::Big),
            _ => None,
        }
    }

    generate_load!(load_u16, u16);
    generate_load!(load_u32, u32);
    generate_encode!(encode_u16, u16);
    generate_encode!(encode_u32, u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker() {
        assert_eq!(ByteOrder::from_marker(b"II"), Some(ByteOrder::Little));
        assert_eq!(ByteOrder::from_marker(b"MM"), Some(ByteOrder::Big));
        assert_eq!(ByteOrder::from_marker(b"IM"), None);
        assert_eq!(ByteOrder::from_marker(b"I"), None);
        assert_eq!(ByteOrder::from_marker(b""), None);
    }

    #[test]
    fn load_u16() {
        assert_eq!(ByteOrder::Big.load_u16(&[0x01, 0x02], 0), Some(0x0102));
        assert_eq!(ByteOrder::Big.load_u16(&[0x01, 0x02, 0x03], 1), Some(0x0203));
        assert_eq!(ByteOrder::Little.load_u16(&[0x01, 0x02], 0), Some(0x0201));
        assert_eq!(ByteOrder::Little.load_u16(&[0x01, 0x02, 0x03], 1), Some(0x0302));
    }

    #[test]
    fn load_u32() {
        let buf = [0x01, 0x02, 0x03, 0x04, 0x05];
        assert_eq!(ByteOrder::Big.load_u32(&buf, 0), Some(0x01020304));
        assert_eq!(ByteOrder::Big.load_u32(&buf, 1), Some(0x02030405));
        assert_eq!(ByteOrder::Little.load_u32(&buf, 0), Some(0x04030201));
        assert_eq!(ByteOrder::Little.load_u32(&buf, 1), Some(0x05040302));
    }

    #[test]
    fn load_out_of_bounds() {
        assert_eq!(ByteOrder::Big.load_u16(&[0x01, 0x02], 1), None);
        assert_eq!(ByteOrder::Little.load_u16(&[], 0), None);
        assert_eq!(ByteOrder::Big.load_u32(&[0x01, 0x02, 0x03], 0), None);
        assert_eq!(ByteOrder::Little.load_u32(&[0; 8], usize::MAX), None);
    }

    #[test]
    fn encode() {
        assert_eq!(ByteOrder::Big.encode_u16(3), [0x00, 0x03]);
        assert_eq!(ByteOrder::Little.encode_u16(3), [0x03, 0x00]);
        assert_eq!(ByteOrder::Big.encode_u32(1), [0x00, 0x00, 0x00, 0x01]);
        assert_eq!(ByteOrder::Little.encode_u32(1), [0x01, 0x00, 0x00, 0x00]);
    }
}
