use super::chunk::FourCC;
use crate::{
    binaries::{BinaryData, ByteCursor},
    error::Result,
};

pub const J3D2: FourCC = FourCC(*b"J3D2");
// Model types
pub const BMD3: FourCC = FourCC(*b"bmd3");
pub const BDL4: FourCC = FourCC(*b"bdl4");

/// The 32 byte container header. Only the first 16 bytes carry data; the reserved tag
/// is usually `SVR3` followed by 0xFF padding.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ModelHeader {
    pub magic: FourCC,
    pub kind: FourCC,
    pub file_size: u32,
    pub chunk_count: u32,
    pub reserved_tag: FourCC,
}

impl ModelHeader {
    pub fn is_known_kind(&self) -> bool {
        self.magic == J3D2 && (self.kind == BMD3 || self.kind == BDL4)
    }
}

impl BinaryData for ModelHeader {
    const SIZE: usize = 32;

    fn read(c: &mut ByteCursor) -> Result<Self> {
        Ok(Self {
            magic: FourCC(c.read_tag()?),
            kind: FourCC(c.read_tag()?),
            file_size: c.read_u32()?,
            chunk_count: c.read_u32()?,
            reserved_tag: FourCC(c.read_tag()?),
        })
    }
}

#[cfg(test)]
mod header_tests {
    use super::*;
    use crate::{error::DecodeError, j3d::fixture::container};

    #[test]
    fn test_read_header() {
        let bytes = container(&[]);
        let header: ModelHeader = ByteCursor::new(&bytes).read().unwrap();

        assert_eq!(header.magic, J3D2);
        assert_eq!(header.kind, BMD3);
        assert_eq!(header.file_size, 32);
        assert_eq!(header.chunk_count, 0);
        assert_eq!(header.reserved_tag, FourCC(*b"SVR3"));
        assert!(header.is_known_kind());
    }

    #[test]
    fn test_short_header() {
        let bytes = container(&[]);
        assert!(matches!(
            ByteCursor::new(&bytes[..20]).read::<ModelHeader>(),
            Err(DecodeError::TruncatedInput { needed: 32, .. })
        ));
    }
}
