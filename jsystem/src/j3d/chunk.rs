use std::fmt;

use common::vfile::VFile;

use super::{drw1::Drw1, evp1::Evp1, inf1::Inf1, jnt1::Jnt1, shp1::Shp1, tex1::Tex1, vtx1::Vtx1};
use crate::{
    binaries::{BinaryData, ByteCursor},
    error::{DecodeError, Result},
};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct FourCC(pub [u8; 4]);

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC({})", self)
    }
}

// Scene hierarchy
pub const K_CHUNK_INF1: FourCC = FourCC(*b"INF1");
// Vertex attribute arrays
pub const K_CHUNK_VTX1: FourCC = FourCC(*b"VTX1");
// Skinning envelopes
pub const K_CHUNK_EVP1: FourCC = FourCC(*b"EVP1");
// Draw matrix table
pub const K_CHUNK_DRW1: FourCC = FourCC(*b"DRW1");
// Joints
pub const K_CHUNK_JNT1: FourCC = FourCC(*b"JNT1");
// Shapes and primitives
pub const K_CHUNK_SHP1: FourCC = FourCC(*b"SHP1");
// Embedded textures
pub const K_CHUNK_TEX1: FourCC = FourCC(*b"TEX1");

/// Tag and size shared by every chunk. The size includes these 8 bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChunkHeader {
    pub tag: FourCC,
    pub size: u32,
}

impl BinaryData for ChunkHeader {
    const SIZE: usize = 8;

    fn read(c: &mut ByteCursor) -> Result<Self> {
        Ok(Self {
            tag: FourCC(c.read_tag()?),
            size: c.read_u32()?,
        })
    }
}

/// A chunk type with a dedicated parser. Each parses from the chunk's own bytes, tag
/// included, with offsets relative to the tag.
pub trait ChunkKind
where
    Self: Sized,
{
    const TAG: FourCC;

    fn from_data(data: &ChunkData) -> Option<&Self>;
}

#[derive(Debug)]
pub enum ChunkData {
    Inf1(Inf1),
    Vtx1(Vtx1),
    Evp1(Evp1),
    Drw1(Drw1),
    Jnt1(Jnt1),
    Shp1(Shp1),
    Tex1(Tex1),
    /// Any other tag, kept only as raw bytes.
    Generic,
}

#[derive(Debug)]
pub struct Chunk {
    pub header: ChunkHeader,
    /// Absolute offset of the tag in the container.
    pub offset: usize,
    pub raw: VFile,
    pub data: ChunkData,
}

impl Chunk {
    /// Parse the chunk starting at `offset` in `file`.
    pub fn parse(file: &VFile, offset: usize) -> Result<Self> {
        let header: ChunkHeader = ByteCursor::at(file.data(), offset).read().map_err(|_| {
            DecodeError::MalformedContainer(format!(
                "chunk header at {:#x} runs past the end of the file ({:#x})",
                offset,
                file.len()
            ))
        })?;

        let size = header.size as usize;
        if size < ChunkHeader::SIZE {
            return Err(DecodeError::MalformedContainer(format!(
                "{} chunk at {:#x} declares size {}",
                header.tag, offset, size
            )));
        }
        let raw = file.slice(offset..offset + size).ok_or_else(|| {
            DecodeError::MalformedContainer(format!(
                "{} chunk at {:#x} of size {:#x} runs past the end of the file ({:#x})",
                header.tag,
                offset,
                size,
                file.len()
            ))
        })?;

        log::debug!("{} chunk at {:#x}, {} bytes", header.tag, offset, size);

        let parsed = match header.tag {
            K_CHUNK_INF1 => Inf1::parse(&raw).map(ChunkData::Inf1),
            K_CHUNK_VTX1 => Vtx1::parse(&raw).map(ChunkData::Vtx1),
            K_CHUNK_EVP1 => Evp1::parse(&raw).map(ChunkData::Evp1),
            K_CHUNK_DRW1 => Drw1::parse(&raw).map(ChunkData::Drw1),
            K_CHUNK_JNT1 => Jnt1::parse(&raw).map(ChunkData::Jnt1),
            K_CHUNK_SHP1 => Shp1::parse(&raw).map(ChunkData::Shp1),
            K_CHUNK_TEX1 => Tex1::parse(&raw).map(ChunkData::Tex1),
            tag => {
                log::warn!("Unknown chunk {}, keeping raw bytes", tag);
                Ok(ChunkData::Generic)
            }
        };
        // the chunk list stays walkable by size even when one body is inconsistent
        let data = parsed.unwrap_or_else(|e| {
            log::warn!(
                "{} chunk at {:#x} does not parse ({}), keeping raw bytes",
                header.tag,
                offset,
                e
            );
            ChunkData::Generic
        });

        Ok(Self {
            header,
            offset,
            raw,
            data,
        })
    }

    pub fn tag(&self) -> FourCC {
        self.header.tag
    }

    pub fn size(&self) -> usize {
        self.header.size as usize
    }

    pub fn end(&self) -> usize {
        self.offset + self.size()
    }

    pub fn is_generic(&self) -> bool {
        matches!(self.data, ChunkData::Generic)
    }

    pub fn get<T: ChunkKind>(&self) -> Option<&T> {
        T::from_data(&self.data)
    }
}

macro_rules! chunk_kind {
    ($ty:ident, $variant:ident, $tag:expr) => {
        impl ChunkKind for $ty {
            const TAG: FourCC = $tag;

            fn from_data(data: &ChunkData) -> Option<&Self> {
                match data {
                    ChunkData::$variant(c) => Some(c),
                    _ => None,
                }
            }
        }
    };
}

chunk_kind!(Inf1, Inf1, K_CHUNK_INF1);
chunk_kind!(Vtx1, Vtx1, K_CHUNK_VTX1);
chunk_kind!(Evp1, Evp1, K_CHUNK_EVP1);
chunk_kind!(Drw1, Drw1, K_CHUNK_DRW1);
chunk_kind!(Jnt1, Jnt1, K_CHUNK_JNT1);
chunk_kind!(Shp1, Shp1, K_CHUNK_SHP1);
chunk_kind!(Tex1, Tex1, K_CHUNK_TEX1);
