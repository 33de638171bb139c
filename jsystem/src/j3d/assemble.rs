//! Flattens SHP1 primitives into one vertex list. Every vertex is a (position, colour,
//! texcoord) triple of u16 indices into the arrays pulled out of VTX1.

use common::vertex::{AssembledVertex, DrawRange, MeshData, Topology};

use super::{attributes::VertexArrays, shp1::Shp1};
use crate::{
    binaries::ByteCursor,
    error::{DecodeError, Result},
};

pub fn assemble(shp1: &Shp1, arrays: &VertexArrays) -> MeshData {
    let mut mesh = MeshData::default();

    for (b, batch) in shp1.batches.iter().enumerate() {
        for p in 0..batch.packet_count as usize {
            let Some(location) = shp1.packet_location(batch, p) else {
                log::warn!("Batch {} packet {} has no location, skipping", b, p);
                continue;
            };
            let start = shp1.primitive_data_offset as usize + location.offset as usize;
            decode_packet(
                shp1.raw().data(),
                start,
                location.size as usize,
                arrays,
                &mut mesh,
            );
        }
    }

    log::debug!(
        "Assembled {} vertices in {} draw ranges",
        mesh.vertices.len(),
        mesh.draw_ranges.len()
    );
    mesh
}

/// Decode the primitives of one packet, appending to `mesh`. Stops at the first padding
/// byte, unknown command or read past the end of `data`.
fn decode_packet(
    data: &[u8],
    start: usize,
    size: usize,
    arrays: &VertexArrays,
    mesh: &mut MeshData,
) {
    let mut c = ByteCursor::at(data, start);

    while c.position() < start + size {
        let Ok(command) = c.read_u8() else {
            log::warn!("Packet at {:#x} runs past the end of the chunk", start);
            return;
        };
        // display lists are padded to 32 bytes with NOPs
        if command == 0 {
            return;
        }
        let Some(topology) = Topology::from_gx(command) else {
            log::warn!(
                "Unknown primitive {:#04x} at {:#x}, dropping the rest of the packet",
                command,
                c.position() - 1
            );
            return;
        };
        let Ok(count) = c.read_u16() else {
            log::warn!("Primitive header at {:#x} is cut off", c.position() - 1);
            return;
        };

        let first = mesh.vertices.len();
        let mut truncated = None;
        for _ in 0..count {
            match read_vertex(&mut c, arrays) {
                Ok(vertex) => mesh.vertices.push(vertex),
                Err(e) => {
                    truncated = Some(e);
                    break;
                }
            }
        }

        let emitted = mesh.vertices.len() - first;
        mesh.draw_ranges.push(DrawRange {
            start: first as u32,
            count: emitted as u32,
            topology,
        });

        if let Some(e) = truncated {
            log::warn!(
                "{:?} primitive cut short after {} of {} vertices: {}",
                topology,
                emitted,
                count,
                e
            );
            return;
        }
    }
}

fn read_vertex(c: &mut ByteCursor, arrays: &VertexArrays) -> Result<AssembledVertex> {
    let position = c.read_u16()? as usize;
    let color = c.read_u16()? as usize;
    let uv = c.read_u16()? as usize;

    let mut vertex = AssembledVertex::default();
    match lookup(&arrays.positions, position) {
        Ok(p) => vertex.position = p,
        Err(e) => log::trace!("Position {}, keeping the default", e),
    }
    match lookup(&arrays.colors, color) {
        Ok(col) => vertex.color = col.to_array(),
        Err(e) => log::trace!("Colour {}, keeping the default", e),
    }
    match lookup(&arrays.texcoords, uv) {
        Ok(t) => vertex.uv = t,
        Err(e) => log::trace!("Texcoord {}, keeping the default", e),
    }
    Ok(vertex)
}

fn lookup<T: Copy>(array: &[T], index: usize) -> Result<T> {
    array.get(index).copied().ok_or(DecodeError::IndexOutOfRange {
        index,
        len: array.len(),
    })
}

#[cfg(test)]
mod assemble_tests {
    use super::*;
    use crate::j3d::fixture::{shp1_chunk, shp1_chunk_with_attributes, Writer};
    use byteorder::{BigEndian, ByteOrder};
    use common::vfile::VFile;
    use glam::{Vec2, Vec3, Vec4};
    use proptest::prelude::*;

    fn arrays() -> VertexArrays {
        VertexArrays {
            positions: vec![Vec3::X, Vec3::Y],
            colors: vec![
                Vec4::new(1.0, 0.0, 0.0, 1.0),
                Vec4::new(0.0, 1.0, 0.0, 1.0),
                Vec4::new(0.0, 0.0, 1.0, 0.5),
            ],
            texcoords: vec![Vec2::ZERO, Vec2::new(0.5, 0.0), Vec2::ONE],
        }
    }

    fn primitive(w: &mut Writer, command: u8, triples: &[[u16; 3]]) {
        w.u8(command).u16(triples.len() as u16);
        for t in triples {
            w.u16(t[0]).u16(t[1]).u16(t[2]);
        }
    }

    /// A SHP1 whose first packet is `tail`, placed as the last bytes of the chunk.
    fn tail_packet(tail: &[u8]) -> Shp1 {
        let mut bytes = shp1_chunk(&[(0, 0); 3], &[]);
        let shp = Shp1::parse(&VFile::new(bytes.clone())).unwrap();
        let location = shp.packet_location_offset as usize;
        let offset = bytes.len() - shp.primitive_data_offset as usize;
        BigEndian::write_u32(&mut bytes[location..], tail.len() as u32);
        BigEndian::write_u32(&mut bytes[location + 4..], offset as u32);
        bytes.extend_from_slice(tail);
        Shp1::parse(&VFile::new(bytes)).unwrap()
    }

    #[test]
    fn test_out_of_range_position() {
        let mut w = Writer::new();
        primitive(&mut w, 0x90, &[[0, 0, 0], [2, 1, 1], [1, 2, 2]]);
        w.pad_to(0x20);
        let bytes = shp1_chunk(&[(0x20, 0), (0, 0x20), (0, 0x20)], &w.bytes);
        let shp = Shp1::parse(&VFile::new(bytes)).unwrap();

        let mesh = assemble(&shp, &arrays());
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(
            mesh.draw_ranges,
            vec![DrawRange {
                start: 0,
                count: 3,
                topology: Topology::Triangles
            }]
        );

        let v = mesh.vertices[1];
        assert_eq!(v.position, Vec3::ZERO);
        assert_eq!(v.color, [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(v.uv, Vec2::new(0.5, 0.0));
        assert_eq!(mesh.vertices[2].position, Vec3::Y);
    }

    #[test]
    fn test_triples_ignore_batch_attribute_list() {
        let mut w = Writer::new();
        primitive(&mut w, 0x98, &[[0, 0, 0], [1, 1, 1], [0, 1, 1]]);
        let attributes = [(9, 3)];
        let bytes =
            shp1_chunk_with_attributes(&[(0x20, 0), (0, 0), (0, 0)], &w.bytes, &attributes);
        let shp = Shp1::parse(&VFile::new(bytes)).unwrap();
        assert_eq!(shp.batches[0].attributes.len(), 1);

        let mesh = assemble(&shp, &arrays());
        let positions: Vec<_> = mesh.vertices.iter().map(|v| v.position).collect();
        let colors: Vec<_> = mesh.vertices.iter().map(|v| v.color).collect();
        let uvs: Vec<_> = mesh.vertices.iter().map(|v| v.uv).collect();
        assert_eq!(positions, vec![Vec3::X, Vec3::Y, Vec3::X]);
        assert_eq!(
            colors,
            vec![[1.0, 0.0, 0.0, 1.0], [0.0, 1.0, 0.0, 1.0], [0.0, 1.0, 0.0, 1.0]]
        );
        assert_eq!(uvs, vec![Vec2::ZERO, Vec2::new(0.5, 0.0), Vec2::new(0.5, 0.0)]);
    }

    #[test]
    fn test_missing_arrays_keep_defaults() {
        let mut w = Writer::new();
        primitive(&mut w, 0xB8, &[[0, 0, 0]]);
        let bytes = shp1_chunk(&[(0x20, 0), (0, 0), (0, 0)], &w.bytes);
        let shp = Shp1::parse(&VFile::new(bytes)).unwrap();

        let mesh = assemble(&shp, &VertexArrays::default());
        assert_eq!(mesh.vertices, vec![AssembledVertex::default()]);
    }

    #[test]
    fn test_packets_use_their_own_location() {
        let mut w = Writer::new();
        primitive(&mut w, 0x90, &[[0, 0, 0], [1, 1, 1], [0, 2, 2]]);
        w.pad_to(0x20);
        primitive(&mut w, 0x98, &[[1, 0, 0], [0, 0, 0], [1, 0, 0], [0, 0, 0]]);
        w.pad_to(0x20);
        primitive(&mut w, 0xB8, &[[1, 2, 2]]);
        w.pad_to(0x20);
        let bytes = shp1_chunk(&[(0x20, 0), (0x20, 0x20), (0x20, 0x40)], &w.bytes);
        let shp = Shp1::parse(&VFile::new(bytes)).unwrap();

        let mesh = assemble(&shp, &arrays());
        let ranges: Vec<_> = mesh
            .draw_ranges
            .iter()
            .map(|r| (r.start, r.count, r.topology))
            .collect();
        assert_eq!(
            ranges,
            vec![
                (0, 3, Topology::Triangles),
                (3, 4, Topology::TriangleStrip),
                (7, 1, Topology::Points),
            ]
        );
        assert_eq!(mesh.vertices[7].uv, Vec2::ONE);
    }

    #[test]
    fn test_padding_ends_packet() {
        let mut w = Writer::new();
        primitive(&mut w, 0x90, &[[0, 0, 0], [1, 1, 1], [0, 2, 2]]);
        w.u8(0);
        // a valid looking primitive after the padding must not be read
        primitive(&mut w, 0xB8, &[[1, 1, 1]]);
        w.pad_to(0x20);
        let bytes = shp1_chunk(&[(0x20, 0), (0, 0), (0, 0)], &w.bytes);
        let shp = Shp1::parse(&VFile::new(bytes)).unwrap();

        let mesh = assemble(&shp, &arrays());
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.draw_ranges.len(), 1);
    }

    #[test]
    fn test_unknown_command_ends_packet() {
        let mut w = Writer::new();
        primitive(&mut w, 0xB8, &[[0, 0, 0]]);
        w.u8(0x40).u16(1).u16(0).u16(0).u16(0);
        let bytes = shp1_chunk(&[(0x20, 0), (0, 0), (0, 0)], &w.bytes);
        let shp = Shp1::parse(&VFile::new(bytes)).unwrap();

        let mesh = assemble(&shp, &arrays());
        assert_eq!(mesh.vertices.len(), 1);
        assert_eq!(mesh.draw_ranges.len(), 1);
    }

    #[test]
    fn test_truncated_primitive() {
        let mut w = Writer::new();
        w.u8(0x90).u16(5);
        w.u16(0).u16(0).u16(0);
        w.u16(1).u16(1).u16(1);
        w.u8(0);
        let shp = tail_packet(&w.bytes);

        let mesh = assemble(&shp, &arrays());
        assert_eq!(mesh.vertices.len(), 2);
        assert_eq!(
            mesh.draw_ranges,
            vec![DrawRange {
                start: 0,
                count: 2,
                topology: Topology::Triangles
            }]
        );
    }

    fn primitives() -> impl Strategy<Value = Vec<(u8, Vec<[u16; 3]>)>> {
        let command = prop::sample::select(vec![0x80u8, 0x90, 0x98, 0xA0, 0xA8, 0xB0, 0xB8]);
        let triples = prop::collection::vec(prop::array::uniform3(0u16..4), 0..6);
        prop::collection::vec((command, triples), 0..6)
    }

    proptest! {
        #[test]
        fn test_vertex_count_bounded(prims in primitives(), cut in 0usize..256) {
            let mut w = Writer::new();
            for (command, triples) in &prims {
                primitive(&mut w, *command, triples);
            }
            let mut tail = w.bytes;
            tail.truncate(cut);
            let shp = tail_packet(&tail);

            let mesh = assemble(&shp, &arrays());
            let declared: usize = prims.iter().map(|(_, t)| t.len()).sum();
            let ranged: u32 = mesh.draw_ranges.iter().map(|r| r.count).sum();
            prop_assert!(mesh.vertices.len() <= declared);
            prop_assert_eq!(ranged as usize, mesh.vertices.len());
        }
    }
}
