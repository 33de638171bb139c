use common::vfile::VFile;

use crate::{binaries::ByteCursor, error::Result};

/// What a shape's matrix slot resolves to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DrawMatrix {
    /// Rigidly bound to one joint.
    Joint(u16),
    /// Skinned through an EVP1 envelope.
    Envelope(u16),
}

#[derive(Clone, Debug, Default)]
pub struct Drw1 {
    pub matrices: Vec<DrawMatrix>,
}

impl Drw1 {
    pub fn parse(raw: &VFile) -> Result<Self> {
        let data = raw.data();
        let mut c = ByteCursor::at(data, 8);
        let count = c.read_u16()? as usize;
        c.skip(2);
        let flags_offset = c.read_u32()? as usize;
        let data_offset = c.read_u32()? as usize;

        let flags = ByteCursor::at(data, flags_offset).read_bytes(count)?;
        let mut indices = ByteCursor::at(data, data_offset);
        let matrices = flags
            .iter()
            .map(|&weighted| {
                let index = indices.read_u16()?;
                Ok(if weighted != 0 {
                    DrawMatrix::Envelope(index)
                } else {
                    DrawMatrix::Joint(index)
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { matrices })
    }
}

#[cfg(test)]
mod drw1_tests {
    use super::*;
    use crate::{error::DecodeError, j3d::fixture::chunk};

    #[test]
    fn test_parse() {
        let bytes = chunk(b"DRW1", |w| {
            w.u16(3).u16(0xFFFF).u32(0x14).u32(0x18);
            w.u8(0).u8(1).u8(0).u8(0);
            w.u16(4).u16(0).u16(7);
        });
        let drw = Drw1::parse(&VFile::new(bytes)).unwrap();
        assert_eq!(
            drw.matrices,
            vec![
                DrawMatrix::Joint(4),
                DrawMatrix::Envelope(0),
                DrawMatrix::Joint(7)
            ]
        );
    }

    #[test]
    fn test_data_past_chunk() {
        let bytes = chunk(b"DRW1", |w| {
            w.u16(3).u16(0xFFFF).u32(0x14).u32(0x1E);
            w.u8(0).u8(1).u8(0).u8(0);
        });
        assert!(matches!(
            Drw1::parse(&VFile::new(bytes)),
            Err(DecodeError::TruncatedInput { .. })
        ));
    }
}
