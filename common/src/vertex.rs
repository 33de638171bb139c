use glam::{Vec2, Vec3, Vec4};

/// One fully resolved vertex, laid out for direct upload as an interleaved buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AssembledVertex {
    pub position: Vec3,
    // `Vec4` is 16 byte aligned on SIMD targets, which would pad the struct
    pub color: [f32; 4],
    pub uv: Vec2,
}

impl Default for AssembledVertex {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            // missing vertex colour renders as unlit white
            color: Vec4::ONE.to_array(),
            uv: Vec2::ZERO,
        }
    }
}

/// GX primitive topology, as stored in the leading byte of a primitive record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Topology {
    Quads,
    Triangles,
    TriangleStrip,
    TriangleFan,
    Lines,
    LineStrip,
    Points,
}

impl Topology {
    /// Decode the command byte of a GX draw primitive. The low three bits carry the
    /// vertex format index and are ignored.
    pub fn from_gx(command: u8) -> Option<Self> {
        match command & 0xF8 {
            0x80 => Some(Self::Quads),
            0x90 => Some(Self::Triangles),
            0x98 => Some(Self::TriangleStrip),
            0xA0 => Some(Self::TriangleFan),
            0xA8 => Some(Self::Lines),
            0xB0 => Some(Self::LineStrip),
            0xB8 => Some(Self::Points),
            _ => None,
        }
    }
}

/// A run of vertices inside a [`MeshData`] vertex list, drawn with one call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DrawRange {
    pub start: u32,
    pub count: u32,
    pub topology: Topology,
}

impl DrawRange {
    pub fn end(&self) -> u32 {
        self.start + self.count
    }
}

#[derive(Default, Debug, Clone)]
pub struct MeshData {
    pub vertices: Vec<AssembledVertex>,
    pub draw_ranges: Vec<DrawRange>,
}

impl MeshData {
    pub fn vertices(&self) -> &[AssembledVertex] {
        &self.vertices
    }

    pub fn draw_ranges(&self) -> &[DrawRange] {
        &self.draw_ranges
    }

    /// The vertex list as raw bytes, ready for a vertex buffer upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
