use common::vfile::VFile;

use super::strings::StringTable;
use crate::{binaries::ByteCursor, bti::Bti, error::Result};

/// Textures embedded in a model. Each header's offsets are relative to that header.
#[derive(Debug, Default)]
pub struct Tex1 {
    pub textures: Vec<Bti>,
    pub names: StringTable,
}

impl Tex1 {
    pub fn parse(raw: &VFile) -> Result<Self> {
        let mut c = ByteCursor::at(raw.data(), 8);
        let count = c.read_u16()? as usize;
        c.skip(2);
        let header_offset = c.read_u32()? as usize;
        let string_offset = c.read_u32()? as usize;

        let names = StringTable::parse(raw.data(), string_offset)?;
        if names.len() != count {
            log::warn!("{} textures but {} texture names", count, names.len());
        }

        let textures = (0..count)
            .map(|i| Bti::load_embedded(raw.clone(), header_offset + i * 32))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { textures, names })
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.name(index)
    }

    pub fn texture(&self, name: &str) -> Option<&Bti> {
        self.names.position(name).and_then(|i| self.textures.get(i))
    }
}
