use common::vfile::VFile;
use glam::{Mat4, Vec4};

use crate::{binaries::ByteCursor, error::Result};

/// A weighted blend of joints.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Envelope {
    pub joints: Vec<u16>,
    pub weights: Vec<f32>,
}

#[derive(Clone, Debug, Default)]
pub struct Evp1 {
    pub envelopes: Vec<Envelope>,
    /// Indexed by joint, covering every joint referenced by an envelope.
    pub inverse_binds: Vec<Mat4>,
}

impl Evp1 {
    pub fn parse(raw: &VFile) -> Result<Self> {
        let data = raw.data();
        let mut c = ByteCursor::at(data, 8);
        let count = c.read_u16()? as usize;
        c.skip(2);
        let counts_offset = c.read_u32()? as usize;
        let indices_offset = c.read_u32()? as usize;
        let weights_offset = c.read_u32()? as usize;
        let matrix_offset = c.read_u32()? as usize;

        if count == 0 {
            return Ok(Self::default());
        }

        let counts = ByteCursor::at(data, counts_offset).read_bytes(count)?;
        let mut indices = ByteCursor::at(data, indices_offset);
        let mut weights = ByteCursor::at(data, weights_offset);

        let mut envelopes = Vec::with_capacity(count);
        for &n in counts {
            let mut envelope = Envelope::default();
            for _ in 0..n {
                envelope.joints.push(indices.read_u16()?);
                envelope.weights.push(weights.read_f32()?);
            }
            envelopes.push(envelope);
        }

        let joint_count = envelopes
            .iter()
            .flat_map(|e| e.joints.iter())
            .max()
            .map_or(0, |&max| max as usize + 1);

        let mut c = ByteCursor::at(data, matrix_offset);
        let mut inverse_binds = Vec::with_capacity(joint_count);
        for _ in 0..joint_count {
            inverse_binds.push(read_mat3x4(&mut c)?);
        }

        Ok(Self {
            envelopes,
            inverse_binds,
        })
    }
}

/// A row-major 3x4 affine matrix.
pub fn read_mat3x4(c: &mut ByteCursor) -> Result<Mat4> {
    let mut rows = [Vec4::ZERO; 3];
    for row in rows.iter_mut() {
        *row = Vec4::new(c.read_f32()?, c.read_f32()?, c.read_f32()?, c.read_f32()?);
    }
    Ok(Mat4::from_cols(rows[0], rows[1], rows[2], Vec4::W).transpose())
}

#[cfg(test)]
mod evp1_tests {
    use super::*;
    use crate::{error::DecodeError, j3d::fixture::chunk};
    use glam::Vec3;

    fn evp1_bytes() -> Vec<u8> {
        chunk(b"EVP1", |w| {
            // envelopes: [j0 0.25, j2 0.75], [j1 1.0]
            w.u16(2).u16(0xFFFF).u32(0x1C).u32(0x20).u32(0x28).u32(0x40);
            w.u8(2).u8(1).raw(&[0; 2]);
            w.u16(0).u16(2).u16(1).u16(0);
            w.f32(0.25).f32(0.75).f32(1.0);
            w.pad_to(0x20);
            for joint in 0..3 {
                let t = joint as f32;
                w.f32(1.0).f32(0.0).f32(0.0).f32(t);
                w.f32(0.0).f32(1.0).f32(0.0).f32(-t);
                w.f32(0.0).f32(0.0).f32(1.0).f32(10.0);
            }
        })
    }

    #[test]
    fn test_parse_envelopes() {
        let evp = Evp1::parse(&VFile::new(evp1_bytes())).unwrap();
        assert_eq!(evp.envelopes.len(), 2);
        assert_eq!(evp.envelopes[0].joints, vec![0, 2]);
        assert_eq!(evp.envelopes[0].weights, vec![0.25, 0.75]);
        assert_eq!(evp.envelopes[1].joints, vec![1]);
        assert_eq!(evp.envelopes[1].weights, vec![1.0]);
    }

    #[test]
    fn test_inverse_binds_cover_max_joint() {
        let evp = Evp1::parse(&VFile::new(evp1_bytes())).unwrap();
        assert_eq!(evp.inverse_binds.len(), 3);
        let p = evp.inverse_binds[2].transform_point3(Vec3::ZERO);
        assert_eq!(p, Vec3::new(2.0, -2.0, 10.0));
    }

    #[test]
    fn test_empty() {
        let bytes = chunk(b"EVP1", |w| {
            w.u16(0).u16(0xFFFF).u32(0).u32(0).u32(0).u32(0);
        });
        let evp = Evp1::parse(&VFile::new(bytes)).unwrap();
        assert!(evp.envelopes.is_empty());
        assert!(evp.inverse_binds.is_empty());
    }

    #[test]
    fn test_truncated_matrices() {
        let mut bytes = evp1_bytes();
        bytes.truncate(0x40 + 48 * 2);
        assert!(matches!(
            Evp1::parse(&VFile::new(bytes)),
            Err(DecodeError::TruncatedInput { .. })
        ));
    }
}
