//! Turns the raw VTX1 arrays into float vectors.

use byteorder::{BigEndian, ByteOrder};
use glam::{Vec2, Vec3, Vec4};

use super::vtx1::{ColorFormat, ComponentType, VertexAttribute, VertexFormat, Vtx1};

/// The arrays that primitive index triples point into.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexArrays {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Vec4>,
    pub texcoords: Vec<Vec2>,
}

/// Decode the position, first colour and first texcoord arrays.
pub fn extract(vtx1: &Vtx1) -> VertexArrays {
    let mut arrays = VertexArrays::default();

    for format in &vtx1.formats {
        let Some(attribute) = format.attribute() else {
            continue;
        };
        if !matches!(
            attribute,
            VertexAttribute::Position | VertexAttribute::Color0 | VertexAttribute::Tex0
        ) {
            continue;
        }
        let Some(section) = vtx1.section(attribute) else {
            log::warn!("{:?} is declared but has no data", attribute);
            continue;
        };

        match attribute {
            VertexAttribute::Position => {
                arrays.positions = read_scalars(section, format)
                    .chunks_exact(3)
                    .map(Vec3::from_slice)
                    .collect();
            }
            VertexAttribute::Tex0 => {
                arrays.texcoords = read_scalars(section, format)
                    .chunks_exact(2)
                    .map(Vec2::from_slice)
                    .collect();
            }
            _ => match format.color_format() {
                Some(color_format) => arrays.colors = read_colors(section, color_format),
                None => log::warn!("Unknown colour format {}", format.component_type),
            },
        }
    }

    log::debug!(
        "Extracted {} positions, {} colours, {} texcoords",
        arrays.positions.len(),
        arrays.colors.len(),
        arrays.texcoords.len()
    );
    arrays
}

/// Every whole component in `section`, integers scaled by `2^-shift`.
pub fn read_scalars(section: &[u8], format: &VertexFormat) -> Vec<f32> {
    let Some(component_type) = format.component_type() else {
        log::warn!("Unknown component type {}", format.component_type);
        return Vec::new();
    };
    let scale = 0.5f32.powi(format.shift as i32);

    section
        .chunks_exact(component_type.size())
        .map(|b| match component_type {
            ComponentType::U8 => b[0] as f32 * scale,
            ComponentType::S8 => b[0] as i8 as f32 * scale,
            ComponentType::U16 => BigEndian::read_u16(b) as f32 * scale,
            ComponentType::S16 => BigEndian::read_i16(b) as f32 * scale,
            ComponentType::F32 => BigEndian::read_f32(b),
        })
        .collect()
}

/// Every whole colour in `section`, normalised to 0..=1.
pub fn read_colors(section: &[u8], format: ColorFormat) -> Vec<Vec4> {
    section
        .chunks_exact(format.size())
        .map(|b| match format {
            ColorFormat::RGB565 => {
                let v = BigEndian::read_u16(b);
                Vec4::new(
                    (v >> 11) as f32 / 31.0,
                    ((v >> 5) & 0x3F) as f32 / 63.0,
                    (v & 0x1F) as f32 / 31.0,
                    1.0,
                )
            }
            ColorFormat::RGB888 | ColorFormat::RGBX8 => Vec4::new(
                b[0] as f32 / 255.0,
                b[1] as f32 / 255.0,
                b[2] as f32 / 255.0,
                1.0,
            ),
            ColorFormat::RGBA4 => {
                let v = BigEndian::read_u16(b);
                Vec4::new(
                    (v >> 12) as f32 / 15.0,
                    ((v >> 8) & 0xF) as f32 / 15.0,
                    ((v >> 4) & 0xF) as f32 / 15.0,
                    (v & 0xF) as f32 / 15.0,
                )
            }
            ColorFormat::RGBA6 => {
                let v = (b[0] as u32) << 16 | (b[1] as u32) << 8 | b[2] as u32;
                Vec4::new(
                    (v >> 18) as f32 / 63.0,
                    ((v >> 12) & 0x3F) as f32 / 63.0,
                    ((v >> 6) & 0x3F) as f32 / 63.0,
                    (v & 0x3F) as f32 / 63.0,
                )
            }
            ColorFormat::RGBA8 => Vec4::new(
                b[0] as f32 / 255.0,
                b[1] as f32 / 255.0,
                b[2] as f32 / 255.0,
                b[3] as f32 / 255.0,
            ),
        })
        .collect()
}
