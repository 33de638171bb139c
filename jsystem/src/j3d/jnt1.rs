use std::f32::consts::PI;

use common::vfile::VFile;
use glam::{EulerRot, Mat4, Quat, Vec3};

use super::strings::StringTable;
use crate::{
    binaries::{BinaryData, ByteCursor},
    error::Result,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Joint {
    pub name: String,
    pub flags: u16,
    pub calc_flags: u8,
    pub scale: Vec3,
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: Vec3,
    pub translation: Vec3,
    pub bounding_radius: f32,
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
}

impl Joint {
    /// Transform from this joint's space into its parent's.
    pub fn local_transform(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::ZYX,
            self.rotation.z,
            self.rotation.y,
            self.rotation.x,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.translation)
    }
}

/// Rotations are stored as s16 with 0x8000 being half a turn.
fn read_angle(c: &mut ByteCursor) -> Result<f32> {
    Ok(c.read_i16()? as f32 * PI / 32768.0)
}

impl BinaryData for Joint {
    const SIZE: usize = 64;

    fn read(c: &mut ByteCursor) -> Result<Self> {
        let flags = c.read_u16()?;
        let calc_flags = c.read_u8()?;
        c.skip(1);
        let scale = c.read_vec3()?;
        let rotation = Vec3::new(read_angle(c)?, read_angle(c)?, read_angle(c)?);
        c.skip(2);
        let translation = c.read_vec3()?;
        let bounding_radius = c.read_f32()?;
        let bounds_min = c.read_vec3()?;
        let bounds_max = c.read_vec3()?;

        Ok(Self {
            name: String::new(),
            flags,
            calc_flags,
            scale,
            rotation,
            translation,
            bounding_radius,
            bounds_min,
            bounds_max,
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct Jnt1 {
    pub joints: Vec<Joint>,
    /// Joint index for each entry slot.
    pub remap: Vec<u16>,
    pub names: StringTable,
}

impl Jnt1 {
    pub fn parse(raw: &VFile) -> Result<Self> {
        let data = raw.data();
        let mut c = ByteCursor::at(data, 8);
        let count = c.read_u16()? as usize;
        c.skip(2);
        let entry_offset = c.read_u32()? as usize;
        let remap_offset = c.read_u32()? as usize;
        let string_offset = c.read_u32()? as usize;

        let remap: Vec<u16> = ByteCursor::at(data, remap_offset).read_array(count)?;
        let names = StringTable::parse(data, string_offset)?;
        if names.len() != count {
            log::warn!("{} joints but {} joint names", count, names.len());
        }

        // several slots may share one entry, so entries are read once per distinct index
        let entry_count = remap.iter().max().map_or(0, |&m| m as usize + 1);
        let entries: Vec<Joint> = ByteCursor::at(data, entry_offset).read_array(entry_count)?;

        let joints = remap
            .iter()
            .enumerate()
            .map(|(i, &entry)| Joint {
                name: names.name(i).unwrap_or_default().to_owned(),
                ..entries[entry as usize].clone()
            })
            .collect();

        Ok(Self {
            joints,
            remap,
            names,
        })
    }

    pub fn joint(&self, name: &str) -> Option<&Joint> {
        self.joints.iter().find(|j| j.name == name)
    }
}
