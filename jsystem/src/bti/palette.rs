use byteorder::{BigEndian, ByteOrder};

use super::{consts::PaletteFormat, pixel::palette_entry_to_rgba8};
use crate::{
    binaries::ByteCursor,
    error::{DecodeError, Result},
};

/// Raw palette table of 2 byte entries. Files without a palette have an entry count of zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    data: Box<[u8]>,
}

impl Palette {
    pub fn load(bytes: &[u8], entry_count: u16, offset: usize) -> Result<Self> {
        if entry_count == 0 {
            return Ok(Self::default());
        }
        let data = ByteCursor::at(bytes, offset).read_bytes(entry_count as usize * 2)?;
        Ok(Self { data: data.into() })
    }

    pub fn len(&self) -> usize {
        self.data.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn entry(&self, index: usize) -> Option<u16> {
        self.data
            .get(index * 2..index * 2 + 2)
            .map(BigEndian::read_u16)
    }

    pub fn resolve(&self, index: usize, format: PaletteFormat) -> Result<[u8; 4]> {
        let entry = self.entry(index).ok_or(DecodeError::IndexOutOfRange {
            index,
            len: self.len(),
        })?;
        Ok(palette_entry_to_rgba8(entry, format))
    }
}
