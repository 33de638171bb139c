// J3D model containers (.bmd / .bdl)

pub mod assemble;
pub mod attributes;
pub mod chunk;
pub mod drw1;
pub mod evp1;
pub mod header;
pub mod inf1;
pub mod jnt1;
pub mod shp1;
pub mod strings;
pub mod tex1;
pub mod vtx1;

#[cfg(test)]
mod fixture;

use std::io::{self, Write};

use ahash::AHashMap;
use common::{vertex::MeshData, vfile::VFile};

use self::{
    attributes::VertexArrays,
    chunk::{Chunk, ChunkHeader, ChunkKind, FourCC},
    header::ModelHeader,
    shp1::Shp1,
    tex1::Tex1,
    vtx1::Vtx1,
};
use crate::{
    binaries::{BinaryData, ByteCursor},
    error::{DecodeError, Result},
};

/// A parsed model container. Every chunk keeps a view of its raw bytes, so the file can
/// be written back out untouched.
#[derive(Debug)]
pub struct J3DModel {
    header: ModelHeader,
    chunks: Vec<Chunk>,
    /// First chunk with each tag.
    tags: AHashMap<FourCC, usize>,
    file: VFile,
}

impl J3DModel {
    pub fn parse(file: impl Into<VFile>) -> Result<Self> {
        let file = file.into();
        let header: ModelHeader = ByteCursor::new(file.data()).read()?;

        if !header.is_known_kind() {
            log::warn!(
                "Unrecognised container {}{}, parsing anyway",
                header.magic,
                header.kind
            );
        }
        if header.file_size as usize != file.len() {
            log::warn!(
                "Header declares {:#x} bytes but the file has {:#x}",
                header.file_size,
                file.len()
            );
        }

        let chunk_count = header.chunk_count as usize;
        let remaining = file.len().saturating_sub(ModelHeader::SIZE);
        if chunk_count > remaining / ChunkHeader::SIZE {
            return Err(DecodeError::MalformedContainer(format!(
                "{} chunks declared but only {:#x} bytes follow the header",
                chunk_count, remaining
            )));
        }

        let mut chunks = Vec::with_capacity(chunk_count);
        let mut tags = AHashMap::new();
        let mut offset = ModelHeader::SIZE;

        for i in 0..chunk_count {
            let chunk = Chunk::parse(&file, offset)?;
            offset = chunk.end();
            tags.entry(chunk.tag()).or_insert(i);
            chunks.push(chunk);
        }

        log::debug!(
            "Parsed {}{} with {} chunks",
            header.magic,
            header.kind,
            chunks.len()
        );

        Ok(Self {
            header,
            chunks,
            tags,
            file,
        })
    }

    pub fn header(&self) -> &ModelHeader {
        &self.header
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn chunk(&self, tag: FourCC) -> Option<&Chunk> {
        self.tags.get(&tag).map(|&i| &self.chunks[i])
    }

    pub fn get<T: ChunkKind>(&self) -> Option<&T> {
        self.chunk(T::TAG).and_then(|c| c.get::<T>())
    }

    fn require<T: ChunkKind>(&self) -> Result<&T> {
        self.get::<T>().ok_or_else(|| {
            DecodeError::MalformedContainer(format!("model has no {} chunk", T::TAG))
        })
    }

    pub fn vertex_arrays(&self) -> Result<VertexArrays> {
        Ok(attributes::extract(self.require::<Vtx1>()?))
    }

    /// Every shape flattened into one vertex list.
    pub fn mesh(&self) -> Result<MeshData> {
        let arrays = self.vertex_arrays()?;
        let shp1 = self.require::<Shp1>()?;
        Ok(assemble::assemble(shp1, &arrays))
    }

    /// Embedded textures, if the model carries any.
    pub fn textures(&self) -> Option<&Tex1> {
        self.get::<Tex1>()
    }

    pub fn save<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.file.save(writer)
    }
}
