use common::vfile::VFile;
use glam::Vec3;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::vtx1::VertexAttribute;
use crate::{
    binaries::{BinaryData, ByteCursor},
    error::Result,
};

/// How a primitive vertex refers to an attribute.
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive)]
pub enum IndexType {
    None = 0,
    /// Stored inline. Only matrix indices are stored this way, as a single byte.
    Direct = 1,
    Index8 = 2,
    Index16 = 3,
}

/// Which of a batch's attributes are present, and how they are indexed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BatchAttribute {
    pub attribute: u32,
    pub index_type: u32,
}

impl BatchAttribute {
    pub fn attribute(&self) -> Option<VertexAttribute> {
        VertexAttribute::from_u32(self.attribute)
    }

    pub fn index_type(&self) -> Option<IndexType> {
        IndexType::from_u32(self.index_type)
    }
}

impl BinaryData for BatchAttribute {
    const SIZE: usize = 8;

    fn read(c: &mut ByteCursor) -> Result<Self> {
        Ok(Self {
            attribute: c.read_u32()?,
            index_type: c.read_u32()?,
        })
    }
}

/// A group of primitives sharing one vertex description. Each of its packets is a run of
/// primitives drawn with one set of matrices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Batch {
    pub matrix_type: u8,
    pub packet_count: u16,
    /// Relative to the attribute table.
    pub attribute_offset: u16,
    pub first_matrix_data: u16,
    pub first_packet: u16,
    pub bounding_radius: f32,
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
    pub attributes: Vec<BatchAttribute>,
}

impl BinaryData for Batch {
    const SIZE: usize = 40;

    fn read(c: &mut ByteCursor) -> Result<Self> {
        let matrix_type = c.read_u8()?;
        c.skip(1);
        let packet_count = c.read_u16()?;
        let attribute_offset = c.read_u16()?;
        let first_matrix_data = c.read_u16()?;
        let first_packet = c.read_u16()?;
        c.skip(2);
        let bounding_radius = c.read_f32()?;
        let bounds_min = c.read_vec3()?;
        let bounds_max = c.read_vec3()?;

        Ok(Self {
            matrix_type,
            packet_count,
            attribute_offset,
            first_matrix_data,
            first_packet,
            bounding_radius,
            bounds_min,
            bounds_max,
            attributes: Vec::new(),
        })
    }
}

/// Where a packet's primitives live, relative to the primitive data region.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PacketLocation {
    pub size: u32,
    pub offset: u32,
}

impl BinaryData for PacketLocation {
    const SIZE: usize = 8;

    fn read(c: &mut ByteCursor) -> Result<Self> {
        Ok(Self {
            size: c.read_u32()?,
            offset: c.read_u32()?,
        })
    }
}

/// The slice of the matrix table a packet draws with.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MatrixGroup {
    pub count: u16,
    pub first_index: u32,
}

impl BinaryData for MatrixGroup {
    const SIZE: usize = 8;

    fn read(c: &mut ByteCursor) -> Result<Self> {
        c.skip(2);
        Ok(Self {
            count: c.read_u16()?,
            first_index: c.read_u32()?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct Shp1 {
    pub batch_offset: u32,
    pub remap_offset: u32,
    pub name_offset: u32,
    pub attribute_table_offset: u32,
    pub matrix_table_offset: u32,
    pub primitive_data_offset: u32,
    pub matrix_data_offset: u32,
    pub packet_location_offset: u32,

    pub batches: Vec<Batch>,
    pub remap: Vec<u16>,
    pub packet_locations: Vec<PacketLocation>,
    pub matrix_groups: Vec<MatrixGroup>,
    raw: VFile,
}

impl Shp1 {
    pub fn parse(raw: &VFile) -> Result<Self> {
        let data = raw.data();
        let mut c = ByteCursor::at(data, 8);
        let count = c.read_u16()? as usize;
        c.skip(2);
        let batch_offset = c.read_u32()?;
        let remap_offset = c.read_u32()?;
        let name_offset = c.read_u32()?;
        let attribute_table_offset = c.read_u32()?;
        let matrix_table_offset = c.read_u32()?;
        let primitive_data_offset = c.read_u32()?;
        let matrix_data_offset = c.read_u32()?;
        let packet_location_offset = c.read_u32()?;

        let mut batches: Vec<Batch> = ByteCursor::at(data, batch_offset as usize).read_array(count)?;
        for batch in batches.iter_mut() {
            let mut c = ByteCursor::at(
                data,
                attribute_table_offset as usize + batch.attribute_offset as usize,
            );
            loop {
                let attribute: BatchAttribute = c.read()?;
                if attribute.attribute == VertexAttribute::NullAttr as u32 {
                    break;
                }
                batch.attributes.push(attribute);
            }
        }

        let remap = if remap_offset == 0 {
            Vec::new()
        } else {
            ByteCursor::at(data, remap_offset as usize).read_array(count)?
        };

        let packet_count = batches
            .iter()
            .map(|b| b.first_packet as usize + b.packet_count as usize)
            .max()
            .unwrap_or(0);
        let packet_locations = read_clipped(data, packet_location_offset as usize, packet_count)?;

        let group_count = batches
            .iter()
            .map(|b| b.first_matrix_data as usize + b.packet_count as usize)
            .max()
            .unwrap_or(0);
        let matrix_groups = read_clipped(data, matrix_data_offset as usize, group_count)?;

        Ok(Self {
            batch_offset,
            remap_offset,
            name_offset,
            attribute_table_offset,
            matrix_table_offset,
            primitive_data_offset,
            matrix_data_offset,
            packet_location_offset,
            batches,
            remap,
            packet_locations,
            matrix_groups,
            raw: raw.clone(),
        })
    }

    pub fn raw(&self) -> &VFile {
        &self.raw
    }

    /// The location of packet `packet` of batch `batch`, if it was readable.
    pub fn packet_location(&self, batch: &Batch, packet: usize) -> Option<&PacketLocation> {
        self.packet_locations
            .get(batch.first_packet as usize + packet)
    }

    /// Draw matrix indices used by one packet of a batch.
    pub fn packet_matrices(&self, batch: &Batch, packet: usize) -> Result<Vec<u16>> {
        let Some(group) = self
            .matrix_groups
            .get(batch.first_matrix_data as usize + packet)
        else {
            return Ok(Vec::new());
        };
        let start = self.matrix_table_offset as usize + group.first_index as usize * 2;
        ByteCursor::at(self.raw.data(), start).read_array(group.count as usize)
    }
}

/// Up to `count` records at `offset`, fewer if the chunk ends first.
fn read_clipped<T: BinaryData>(data: &[u8], offset: usize, count: usize) -> Result<Vec<T>> {
    let fits = data.len().saturating_sub(offset) / T::SIZE;
    if fits < count {
        log::warn!(
            "Only {} of {} records fit at {:#x}, dropping the rest",
            fits,
            count,
            offset
        );
    }
    ByteCursor::at(data, offset).read_array(count.min(fits))
}
