//! Big-endian builders for synthesising model containers in tests.

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use glam::Vec3;

use super::vtx1::DATA_SLOTS;

#[derive(Default)]
pub struct Writer {
    pub bytes: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.bytes.push(v);
        self
    }

    pub fn u16(&mut self, v: u16) -> &mut Self {
        self.bytes.write_u16::<BigEndian>(v).unwrap();
        self
    }

    pub fn i16(&mut self, v: i16) -> &mut Self {
        self.bytes.write_i16::<BigEndian>(v).unwrap();
        self
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.bytes.write_u32::<BigEndian>(v).unwrap();
        self
    }

    pub fn f32(&mut self, v: f32) -> &mut Self {
        self.bytes.write_f32::<BigEndian>(v).unwrap();
        self
    }

    pub fn vec3(&mut self, v: Vec3) -> &mut Self {
        self.f32(v.x).f32(v.y).f32(v.z)
    }

    pub fn tag(&mut self, tag: &[u8; 4]) -> &mut Self {
        self.bytes.extend_from_slice(tag);
        self
    }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn pad_to(&mut self, alignment: usize) -> &mut Self {
        while self.bytes.len() % alignment != 0 {
            self.bytes.push(0);
        }
        self
    }

    /// Overwrite a u32 written earlier, for offsets only known after the fact.
    pub fn patch_u32(&mut self, at: usize, v: u32) -> &mut Self {
        BigEndian::write_u32(&mut self.bytes[at..at + 4], v);
        self
    }
}

/// A chunk with its tag and size filled in, padded to 32 bytes.
pub fn chunk(tag: &[u8; 4], body: impl FnOnce(&mut Writer)) -> Vec<u8> {
    let mut w = Writer::new();
    w.tag(tag).u32(0);
    body(&mut w);
    w.pad_to(32);
    let size = w.len() as u32;
    w.patch_u32(4, size);
    w.bytes
}

/// A `J3D2bmd3` container holding `chunks` in order.
pub fn container(chunks: &[Vec<u8>]) -> Vec<u8> {
    let size: usize = 32 + chunks.iter().map(Vec::len).sum::<usize>();
    let mut w = Writer::new();
    w.tag(b"J3D2")
        .tag(b"bmd3")
        .u32(size as u32)
        .u32(chunks.len() as u32)
        .tag(b"SVR3")
        .raw(&[0xFF; 12]);
    for c in chunks {
        w.raw(c);
    }
    w.bytes
}

/// A string table holding `names`, as used by JNT1 and TEX1.
pub fn string_table(names: &[&str]) -> Vec<u8> {
    let mut w = Writer::new();
    w.u16(names.len() as u16).u16(0xFFFF);
    let mut offset = 4 + names.len() * 4;
    for name in names {
        w.u16(crate::j3d::strings::name_hash(name)).u16(offset as u16);
        offset += name.len() + 1;
    }
    for name in names {
        w.raw(name.as_bytes()).u8(0);
    }
    w.bytes
}

fn batch(w: &mut Writer, packet_count: u16, first_matrix: u16, first_packet: u16) {
    w.u8(1).u8(0xFF).u16(packet_count).u16(0).u16(first_matrix).u16(first_packet);
    w.u16(0xFFFF).f32(10.0).vec3(Vec3::splat(-1.0)).vec3(Vec3::splat(1.0));
}

/// A SHP1 chunk with two batches: the first draws packet 0, the second packets 1 and 2.
/// Both declare position, colour 0 and texcoord 0 as u16 indexed.
pub fn shp1_chunk(packets: &[(u32, u32)], primitives: &[u8]) -> Vec<u8> {
    shp1_chunk_with_attributes(packets, primitives, &[(9, 3), (11, 3), (13, 3)])
}

/// As [`shp1_chunk`], with both batches declaring `attributes` as (attribute, index type).
pub fn shp1_chunk_with_attributes(
    packets: &[(u32, u32)],
    primitives: &[u8],
    attributes: &[(u32, u32)],
) -> Vec<u8> {
    chunk(b"SHP1", |w| {
        w.u16(2).u16(0xFFFF);
        let table = w.len();
        for _ in 0..8 {
            w.u32(0);
        }
        w.pad_to(0x20);

        let batches = w.len();
        batch(w, 1, 0, 0);
        batch(w, 2, 1, 1);

        let remap = w.len();
        w.u16(0).u16(1).pad_to(0x20);

        let attribute_table = w.len();
        for &(attribute, index_type) in attributes {
            w.u32(attribute).u32(index_type);
        }
        w.u32(0xFF).u32(0);

        let matrix_table = w.len();
        w.u16(0).u16(3).u16(5).pad_to(0x20);

        let prims = w.len();
        w.raw(primitives).pad_to(0x20);

        let matrix_data = w.len();
        w.u16(0xFFFF).u16(1).u32(0);
        w.u16(0xFFFF).u16(2).u32(1);
        w.u16(0xFFFF).u16(0).u32(0);

        let locations = w.len();
        for &(size, offset) in packets {
            w.u32(size).u32(offset);
        }

        let offsets = [
            batches, remap, 0, attribute_table, matrix_table, prims, matrix_data, locations,
        ];
        for (i, o) in offsets.into_iter().enumerate() {
            w.patch_u32(table + i * 4, o as u32);
        }
    })
}

/// A TEX1 chunk holding two 8x4 I8 textures named "floor" and "sky", filled with
/// 0x10 and 0x80.
pub fn tex1_chunk() -> Vec<u8> {
    chunk(b"TEX1", |w| {
        w.u16(2).u16(0xFFFF).u32(0x20).u32(0xA0);
        w.pad_to(0x20);
        for _ in 0..2 {
            // I8, 8x4, clamp, no palette, one image 0x40 past its header
            w.u8(0x01).u8(0).u16(8).u16(4).u8(0).u8(0);
            w.u8(0).u8(0).u16(0).u32(0);
            w.u32(0).u8(1).u8(1).u8(0).u8(0);
            w.u8(1).u8(0).i16(0).u32(0x40);
        }
        w.raw(&[0x10; 32]).raw(&[0x80; 32]);
        w.raw(&string_table(&["floor", "sky"]));
    })
}

/// A VTX1 chunk with s16 positions (shift 8), RGBA8 colours and f32 texcoords.
pub fn vtx1_chunk() -> Vec<u8> {
    chunk(b"VTX1", |w| {
        w.u32(0x40);
        let mut offsets = [0u32; DATA_SLOTS];
        offsets[0] = 0x80;
        offsets[3] = 0xA0;
        offsets[5] = 0xC0;
        for o in offsets {
            w.u32(o);
        }
        w.u32(9).u32(1).u32(3).u8(8).raw(&[0; 3]);
        w.u32(11).u32(1).u32(5).u8(0).raw(&[0; 3]);
        w.u32(13).u32(1).u32(4).u8(0).raw(&[0; 3]);
        w.u32(0xFF).u32(0).u32(0).u8(0).raw(&[0; 3]);
        w.i16(256).i16(-128).i16(512).i16(0).i16(0).i16(-256).i16(7);
        w.pad_to(0x20);
        w.raw(&[0xFF, 0x80, 0x00, 0xFF, 0x00, 0x00, 0x00, 0x00]);
        w.pad_to(0x20);
        w.f32(0.25).f32(0.75);
    })
}
