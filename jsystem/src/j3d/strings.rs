use crate::{binaries::ByteCursor, error::Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringEntry {
    pub hash: u16,
    pub name: String,
}

/// Name table shared by the joint and texture chunks. Offsets inside it are relative
/// to the start of the table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StringTable {
    pub entries: Vec<StringEntry>,
}

/// Hash stored beside each name: `h = h * 3 + byte`, wrapping at 16 bits.
pub fn name_hash(name: &str) -> u16 {
    name.bytes()
        .fold(0u16, |h, b| h.wrapping_mul(3).wrapping_add(b as u16))
}

impl StringTable {
    pub fn parse(data: &[u8], offset: usize) -> Result<Self> {
        let mut c = ByteCursor::at(data, offset);
        let count = c.read_u16()?;
        c.skip(2);

        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let hash = c.read_u16()?;
            let name_offset = c.read_u16()? as usize;
            let name = ByteCursor::at(data, offset + name_offset).read_cstr()?;

            if name_hash(&name) != hash {
                log::debug!("Name {:?} does not match its hash {:#06x}", name, hash);
            }
            entries.push(StringEntry { hash, name });
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.name.as_str())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }
}
