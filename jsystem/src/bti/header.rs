use num_traits::FromPrimitive;

use super::consts::{ImageFormat, PaletteFormat, WrapMode};
use crate::{
    binaries::{BinOffset, BinaryData, ByteCursor},
    error::{DecodeError, Result},
};

/// The 32 byte header in front of every BTI texture, standalone or embedded in a TEX1 chunk.
///
/// Enum fields are kept raw so that an unknown value only fails when it is actually needed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TextureHeader {
    pub format: u8,
    /// 0 for no alpha, anything else for alpha enabled
    pub alpha_enabled: u8,
    pub width: u16,
    pub height: u16,
    pub wrap_s: u8,
    pub wrap_t: u8,
    pub palette_format: u8,
    pub palette_entry_count: u16,
    /// Relative to the start of this header.
    pub palette_data_offset: BinOffset,
    pub border_color: u32,
    pub min_filter: u8,
    pub mag_filter: u8,
    pub min_lod: i8,
    pub max_lod: i8,
    /// Number of mip levels + 1.
    pub image_count: u8,
    pub lod_bias: i16,
    /// Relative to the start of this header.
    pub image_data_offset: BinOffset,
}

impl TextureHeader {
    /// Parse the header at `offset`.
    pub fn parse(bytes: &[u8], offset: usize) -> Result<Self> {
        ByteCursor::at(bytes, offset).read()
    }

    pub fn image_format(&self) -> Option<ImageFormat> {
        ImageFormat::from_u8(self.format)
    }

    pub fn palette_format(&self) -> Option<PaletteFormat> {
        PaletteFormat::from_u8(self.palette_format)
    }

    pub fn wrap_s(&self) -> Option<WrapMode> {
        WrapMode::from_u8(self.wrap_s)
    }

    pub fn wrap_t(&self) -> Option<WrapMode> {
        WrapMode::from_u8(self.wrap_t)
    }

    pub fn has_alpha(&self) -> bool {
        self.alpha_enabled != 0
    }

    pub fn mip_count(&self) -> u8 {
        self.image_count.saturating_sub(1)
    }

    /// Size of the top image level, if the format is known.
    pub fn image_byte_size(&self) -> Option<usize> {
        self.image_format()
            .map(|f| f.bytes_for_size(self.width as usize, self.height as usize))
    }

    /// The top level's image bytes, for a header positioned at `base_offset` in `bytes`.
    pub fn image_data<'a>(&self, bytes: &'a [u8], base_offset: usize) -> Result<&'a [u8]> {
        let size = self
            .image_byte_size()
            .ok_or(DecodeError::UnsupportedFormat(self.format))?;
        self.image_data_offset
            .cursor(bytes, base_offset)
            .read_bytes(size)
    }
}

impl BinaryData for TextureHeader {
    const SIZE: usize = 32;

    fn read(c: &mut ByteCursor) -> Result<Self> {
        let format = c.read_u8()?;
        let alpha_enabled = c.read_u8()?;
        let width = c.read_u16()?;
        let height = c.read_u16()?;
        let wrap_s = c.read_u8()?;
        let wrap_t = c.read_u8()?;
        let palette_format = c.read_u8()?;
        c.skip(1);
        let palette_entry_count = c.read_u16()?;
        let palette_data_offset = c.read()?;
        let border_color = c.read_u32()?;
        let min_filter = c.read_u8()?;
        let mag_filter = c.read_u8()?;
        let min_lod = c.read_i8()?;
        let max_lod = c.read_i8()?;
        let image_count = c.read_u8()?;
        c.skip(1);
        let lod_bias = c.read_i16()?;
        let image_data_offset = c.read()?;

        Ok(Self {
            format,
            alpha_enabled,
            width,
            height,
            wrap_s,
            wrap_t,
            palette_format,
            palette_entry_count,
            palette_data_offset,
            border_color,
            min_filter,
            mag_filter,
            min_lod,
            max_lod,
            image_count,
            lod_bias,
            image_data_offset,
        })
    }
}
