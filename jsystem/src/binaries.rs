use byteorder::{BigEndian, ByteOrder};
use glam::Vec3;

use crate::error::{DecodeError, Result};

/// A fixed-layout big-endian record that can be read straight out of a [`ByteCursor`].
pub trait BinaryData {
    /// Size of the record on disk, in bytes.
    const SIZE: usize;

    fn read(cursor: &mut ByteCursor) -> Result<Self>
    where
        Self: Sized;
}

/// Bounds checked big-endian reader over a borrowed byte buffer.
///
/// Every read checks the remaining length first and reports [`DecodeError::TruncatedInput`]
/// instead of panicking. Seeking is unchecked; the next read validates the position.
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn skip(&mut self, count: usize) {
        self.pos = self.pos.saturating_add(count);
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Fails unless `count` more bytes can be read from the current position.
    pub fn ensure(&self, count: usize) -> Result<()> {
        if self.pos > self.data.len() || count > self.remaining() {
            return Err(DecodeError::TruncatedInput {
                offset: self.pos,
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        self.ensure(count)?;
        let bytes = &self.data[self.pos..self.pos + count];
        self.pos += count;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(BigEndian::read_i16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(BigEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(BigEndian::read_f32(self.read_bytes(4)?))
    }

    pub fn read_vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    pub fn read_tag(&mut self) -> Result<[u8; 4]> {
        let mut tag = [0; 4];
        tag.copy_from_slice(self.read_bytes(4)?);
        Ok(tag)
    }

    /// Fixed length string, with any trailing NUL padding removed.
    pub fn read_str(&mut self, len: usize) -> Result<String> {
        let bytes = self.read_bytes(len)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }

    /// NUL terminated string. A missing terminator reads to the end of the buffer.
    pub fn read_cstr(&mut self) -> Result<String> {
        self.ensure(1)?;
        let rest = &self.data[self.pos..];
        let len = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
        let s = String::from_utf8_lossy(&rest[..len]).into_owned();
        self.pos += (len + 1).min(rest.len());
        Ok(s)
    }

    pub fn read<T: BinaryData>(&mut self) -> Result<T> {
        self.ensure(T::SIZE)?;
        let start = self.pos;
        let value = T::read(self)?;
        // keep the stride exact even if the record skipped trailing padding
        self.pos = start + T::SIZE;
        Ok(value)
    }

    pub fn read_array<T: BinaryData>(&mut self, count: usize) -> Result<Vec<T>> {
        self.ensure(count.saturating_mul(T::SIZE))?;
        (0..count).map(|_| self.read()).collect()
    }
}

/// Offset stored in a record, relative to the start of that record.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BinOffset {
    pub index: u32,
}

impl BinOffset {
    pub fn is_null(&self) -> bool {
        self.index == 0
    }

    /// Absolute position of the offset for a record beginning at `start`.
    pub fn resolve(&self, start: usize) -> usize {
        start + self.index as usize
    }

    pub fn cursor<'a>(&self, data: &'a [u8], start: usize) -> ByteCursor<'a> {
        ByteCursor::at(data, self.resolve(start))
    }

    pub fn read_array<T: BinaryData>(
        &self,
        data: &[u8],
        start: usize,
        count: usize,
    ) -> Result<Vec<T>> {
        self.cursor(data, start).read_array(count)
    }
}

impl BinaryData for BinOffset {
    const SIZE: usize = 4;

    fn read(cursor: &mut ByteCursor) -> Result<Self> {
        Ok(Self {
            index: cursor.read_u32()?,
        })
    }
}

impl BinaryData for u16 {
    const SIZE: usize = 2;

    fn read(cursor: &mut ByteCursor) -> Result<Self> {
        cursor.read_u16()
    }
}

impl BinaryData for f32 {
    const SIZE: usize = 4;

    fn read(cursor: &mut ByteCursor) -> Result<Self> {
        cursor.read_f32()
    }
}
