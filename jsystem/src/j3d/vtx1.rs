use common::vfile::VFile;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::{
    binaries::{BinaryData, ByteCursor},
    error::Result,
};

/// GX vertex attribute ids.
#[derive(Copy, Clone, FromPrimitive, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum VertexAttribute {
    PositionMatrixIndex = 0,
    Tex0MatrixIndex = 1,
    Tex1MatrixIndex = 2,
    Tex2MatrixIndex = 3,
    Tex3MatrixIndex = 4,
    Tex4MatrixIndex = 5,
    Tex5MatrixIndex = 6,
    Tex6MatrixIndex = 7,
    Tex7MatrixIndex = 8,
    Position = 9,
    Normal = 10,
    Color0 = 11,
    Color1 = 12,
    Tex0 = 13,
    Tex1 = 14,
    Tex2 = 15,
    Tex3 = 16,
    Tex4 = 17,
    Tex5 = 18,
    Tex6 = 19,
    Tex7 = 20,
    PositionMatrixArray = 21,
    NormalMatrixArray = 22,
    TextureMatrixArray = 23,
    LitMatrixArray = 24,
    NormalBinormalTangent = 25,
    NullAttr = 0xFF,
}

impl VertexAttribute {
    /// Index into [`Vtx1::data_offsets`] for attributes that have an array in this chunk.
    pub fn slot(&self) -> Option<usize> {
        use VertexAttribute::*;
        match self {
            Position => Some(0),
            Normal => Some(1),
            NormalBinormalTangent => Some(2),
            Color0 => Some(3),
            Color1 => Some(4),
            Tex0 | Tex1 | Tex2 | Tex3 | Tex4 | Tex5 | Tex6 | Tex7 => {
                Some(5 + (*self as usize - Tex0 as usize))
            }
            _ => None,
        }
    }

    pub fn is_color(&self) -> bool {
        matches!(self, VertexAttribute::Color0 | VertexAttribute::Color1)
    }
}

/// Component encoding for position, normal and texcoord arrays.
#[derive(Copy, Clone, FromPrimitive, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum ComponentType {
    U8 = 0,
    S8 = 1,
    U16 = 2,
    S16 = 3,
    F32 = 4,
}

impl ComponentType {
    pub fn size(&self) -> usize {
        match self {
            ComponentType::U8 | ComponentType::S8 => 1,
            ComponentType::U16 | ComponentType::S16 => 2,
            ComponentType::F32 => 4,
        }
    }
}

/// Component encoding for colour arrays.
#[derive(Copy, Clone, FromPrimitive, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum ColorFormat {
    RGB565 = 0,
    RGB888 = 1,
    RGBX8 = 2,
    RGBA4 = 3,
    RGBA6 = 4,
    RGBA8 = 5,
}

impl ColorFormat {
    pub fn size(&self) -> usize {
        match self {
            ColorFormat::RGB565 | ColorFormat::RGBA4 => 2,
            ColorFormat::RGB888 | ColorFormat::RGBA6 => 3,
            ColorFormat::RGBX8 | ColorFormat::RGBA8 => 4,
        }
    }
}

/// Describes one attribute array: what it holds and how its components are stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VertexFormat {
    pub attribute: u32,
    pub component_count: u32,
    pub component_type: u32,
    /// Fixed point shift for integer components.
    pub shift: u8,
}

impl VertexFormat {
    pub fn attribute(&self) -> Option<VertexAttribute> {
        VertexAttribute::from_u32(self.attribute)
    }

    pub fn component_type(&self) -> Option<ComponentType> {
        ComponentType::from_u32(self.component_type)
    }

    pub fn color_format(&self) -> Option<ColorFormat> {
        ColorFormat::from_u32(self.component_type)
    }

    pub fn is_null(&self) -> bool {
        self.attribute == VertexAttribute::NullAttr as u32
    }
}

impl BinaryData for VertexFormat {
    const SIZE: usize = 16;

    fn read(c: &mut ByteCursor) -> Result<Self> {
        Ok(Self {
            attribute: c.read_u32()?,
            component_count: c.read_u32()?,
            component_type: c.read_u32()?,
            shift: c.read_u8()?,
        })
    }
}

pub const DATA_SLOTS: usize = 13;

#[derive(Clone, Debug)]
pub struct Vtx1 {
    pub format_offset: u32,
    /// Chunk relative start of each array: position, normal, NBT, colour 0/1, texcoord 0-7.
    /// Zero when the array is absent.
    pub data_offsets: [u32; DATA_SLOTS],
    /// Declared formats, without the terminating `NullAttr` record.
    pub formats: Vec<VertexFormat>,
    raw: VFile,
}

impl Vtx1 {
    pub fn parse(raw: &VFile) -> Result<Self> {
        let data = raw.data();
        let mut c = ByteCursor::at(data, 8);
        let format_offset = c.read_u32()?;
        let mut data_offsets = [0; DATA_SLOTS];
        for offset in data_offsets.iter_mut() {
            *offset = c.read_u32()?;
        }

        let mut formats = Vec::new();
        let mut c = ByteCursor::at(data, format_offset as usize);
        loop {
            let format: VertexFormat = c.read()?;
            if format.is_null() {
                break;
            }
            if format.attribute().is_none() {
                log::warn!("Unknown vertex attribute {:#x}", format.attribute);
            }
            formats.push(format);
        }

        Ok(Self {
            format_offset,
            data_offsets,
            formats,
            raw: raw.clone(),
        })
    }

    pub fn raw(&self) -> &VFile {
        &self.raw
    }

    pub fn format(&self, attribute: VertexAttribute) -> Option<&VertexFormat> {
        self.formats
            .iter()
            .find(|f| f.attribute() == Some(attribute))
    }

    /// The bytes of an attribute's array. It runs from its own offset to the next larger
    /// non-zero offset of any slot, or to the end of the chunk.
    pub fn section(&self, attribute: VertexAttribute) -> Option<&[u8]> {
        let start = self.data_offsets[attribute.slot()?];
        if start == 0 {
            return None;
        }
        let end = self
            .data_offsets
            .iter()
            .copied()
            .filter(|&o| o > start)
            .min()
            .map_or(self.raw.len(), |o| o as usize);

        self.raw.data().get(start as usize..end.min(self.raw.len()))
    }
}
