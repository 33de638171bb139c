// Binary Texture Image

pub mod cmpr;
pub mod consts;
pub mod decode;
pub mod header;
pub mod palette;
pub mod pixel;

use std::{
    fmt,
    io::{self, Write},
    sync::OnceLock,
};

use common::{vfile::VFile, vimage::DecodedImage};

use self::{consts::ImageFormat, header::TextureHeader, palette::Palette};
use crate::error::Result;

/// A texture with its palette, decoded to RGBA8 on first request.
pub struct Bti {
    header: TextureHeader,
    palette: Palette,
    file: VFile,
    base_offset: usize,
    image: OnceLock<Result<DecodedImage>>,
}

impl fmt::Debug for Bti {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, ".bti @ {:#x}: {:?}", self.base_offset, self.header)
    }
}

impl Bti {
    /// Load a standalone texture file.
    pub fn load(file: impl Into<VFile>) -> Result<Self> {
        Self::load_embedded(file.into(), 0)
    }

    /// Load a texture whose header sits at `offset` within `file`.
    pub fn load_embedded(file: VFile, offset: usize) -> Result<Self> {
        let header = TextureHeader::parse(file.data(), offset)?;
        let palette = Palette::load(
            file.data(),
            header.palette_entry_count,
            header.palette_data_offset.resolve(offset),
        )?;

        log::debug!(
            "Loaded texture {}x{} format {:#04x}, {} palette entries",
            header.width,
            header.height,
            header.format,
            palette.len()
        );

        Ok(Self {
            header,
            palette,
            file,
            base_offset: offset,
            image: OnceLock::new(),
        })
    }

    pub fn header(&self) -> &TextureHeader {
        &self.header
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn width(&self) -> u32 {
        self.header.width as u32
    }

    pub fn height(&self) -> u32 {
        self.header.height as u32
    }

    pub fn format(&self) -> Option<ImageFormat> {
        self.header.image_format()
    }

    pub fn base_offset(&self) -> usize {
        self.base_offset
    }

    /// Decode without caching the result.
    pub fn decode(&self) -> Result<DecodedImage> {
        decode::decode(
            &self.header,
            &self.palette,
            self.file.data(),
            self.base_offset,
        )
    }

    /// The decoded top level, decoding it the first time this is called.
    pub fn image(&self) -> Result<&DecodedImage> {
        self.image
            .get_or_init(|| self.decode())
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Write the bytes this texture was loaded from back out. For a texture embedded in a
    /// model that is the TEX1 chunk it was loaded from.
    pub fn save<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.file.save(writer)
    }
}
