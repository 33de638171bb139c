use byteorder::{BigEndian, ByteOrder};
use common::vimage::DecodedImage;

use super::{
    cmpr::decode_cmpr,
    consts::{ImageFormat, PaletteFormat},
    header::TextureHeader,
    palette::Palette,
    pixel::{expand_bits, ia8_to_rgba8, rgb565_to_rgba8, rgb5a3_to_rgba8},
};
use crate::error::{DecodeError, Result};

/// Pixel coordinates of every cell of a block tiled image, in storage order.
///
/// Edge blocks are walked in full, so coordinates past the image size do appear and
/// still account for their bytes in the source.
pub fn tiled_cells(
    width: usize,
    height: usize,
    block_width: usize,
    block_height: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let blocks_x = width.div_ceil(block_width);
    let blocks_y = height.div_ceil(block_height);
    (0..blocks_y).flat_map(move |by| {
        (0..blocks_x).flat_map(move |bx| {
            (0..block_height).flat_map(move |py| {
                (0..block_width).map(move |px| (bx * block_width + px, by * block_height + py))
            })
        })
    })
}

/// Decode the top image level of a texture.
///
/// `base_offset` is the position of the texture header within `bytes`; the header's image
/// and palette offsets are relative to it.
pub fn decode(
    header: &TextureHeader,
    palette: &Palette,
    bytes: &[u8],
    base_offset: usize,
) -> Result<DecodedImage> {
    let format = header
        .image_format()
        .ok_or(DecodeError::UnsupportedFormat(header.format))?;

    let width = header.width as usize;
    let height = header.height as usize;

    let src = header.image_data(bytes, base_offset)?;

    log::trace!("Decoding {:?} texture {}x{}", format, width, height);

    let mut image = DecodedImage::new(width as u32, height as u32);
    let cells = tiled_cells(width, height, format.block_width(), format.block_height());

    match format {
        ImageFormat::I4 => {
            for (i, (x, y)) in cells.enumerate() {
                let nibble = nibble(src, i);
                let v = expand_bits(nibble as u16, 4);
                put(&mut image, x, y, [v, v, v, 0xFF]);
            }
        }
        ImageFormat::I8 => {
            for ((x, y), &v) in cells.zip(src) {
                put(&mut image, x, y, [v, v, v, 0xFF]);
            }
        }
        ImageFormat::IA4 => {
            for ((x, y), &b) in cells.zip(src) {
                let a = expand_bits(b as u16 >> 4, 4);
                let v = expand_bits(b as u16, 4);
                put(&mut image, x, y, [v, v, v, a]);
            }
        }
        ImageFormat::IA8 => decode_u16_cells(&mut image, cells, src, ia8_to_rgba8),
        ImageFormat::RGB565 => decode_u16_cells(&mut image, cells, src, rgb565_to_rgba8),
        ImageFormat::RGB5A3 => decode_u16_cells(&mut image, cells, src, rgb5a3_to_rgba8),
        ImageFormat::RGBA32 => decode_rgba32(&mut image, src),
        ImageFormat::C4 | ImageFormat::C8 | ImageFormat::C14X2 => {
            let palette_format = header
                .palette_format()
                .ok_or(DecodeError::UnsupportedFormat(header.palette_format))?;
            let indices = index_plane(format, src, width, height);
            resolve_indices(&mut image, &indices, palette, palette_format);
        }
        ImageFormat::CMPR => image = decode_cmpr(src, width, height),
    }

    Ok(image)
}

/// Decode using the palette stored alongside the header, reading both from `bytes`.
pub fn decode_with_palette(
    header: &TextureHeader,
    bytes: &[u8],
    base_offset: usize,
) -> Result<DecodedImage> {
    let palette = Palette::load(
        bytes,
        header.palette_entry_count,
        header.palette_data_offset.resolve(base_offset),
    )?;
    decode(header, &palette, bytes, base_offset)
}

fn put(image: &mut DecodedImage, x: usize, y: usize, rgba: [u8; 4]) {
    image.set_pixel(x as u32, y as u32, rgba);
}

/// 4 bit value `i` of a packed buffer, high nibble first.
fn nibble(src: &[u8], i: usize) -> u8 {
    let b = src[i / 2];
    if i % 2 == 0 {
        b >> 4
    } else {
        b & 0xF
    }
}

fn decode_u16_cells(
    image: &mut DecodedImage,
    cells: impl Iterator<Item = (usize, usize)>,
    src: &[u8],
    convert: fn(u16) -> [u8; 4],
) {
    for ((x, y), pair) in cells.zip(src.chunks_exact(2)) {
        put(image, x, y, convert(BigEndian::read_u16(pair)));
    }
}

/// Each 4x4 block is 32 bytes of (alpha, red) pairs followed by 32 bytes of (green, blue).
fn decode_rgba32(image: &mut DecodedImage, src: &[u8]) {
    let width = image.width as usize;
    let blocks_x = width.div_ceil(4);

    for (b, block) in src.chunks_exact(64).enumerate() {
        let (ar, gb) = block.split_at(32);
        let x0 = (b % blocks_x) * 4;
        let y0 = (b / blocks_x) * 4;
        for cell in 0..16 {
            let rgba = [ar[cell * 2 + 1], gb[cell * 2], gb[cell * 2 + 1], ar[cell * 2]];
            put(image, x0 + cell % 4, y0 + cell / 4, rgba);
        }
    }
}

/// Raster order palette indices for an indexed format.
fn index_plane(format: ImageFormat, src: &[u8], width: usize, height: usize) -> Vec<u16> {
    let mut indices = vec![0u16; width * height];
    let cells = tiled_cells(width, height, format.block_width(), format.block_height());

    for (i, (x, y)) in cells.enumerate() {
        let index = match format {
            ImageFormat::C4 => nibble(src, i) as u16,
            ImageFormat::C8 => src[i] as u16,
            _ => BigEndian::read_u16(&src[i * 2..i * 2 + 2]) & 0x3FFF,
        };
        if x < width && y < height {
            indices[y * width + x] = index;
        }
    }
    indices
}

fn resolve_indices(
    image: &mut DecodedImage,
    indices: &[u16],
    palette: &Palette,
    format: PaletteFormat,
) {
    let width = image.width as usize;
    let mut misses = 0usize;

    for (i, &index) in indices.iter().enumerate() {
        let rgba = match palette.resolve(index as usize, format) {
            Ok(rgba) => rgba,
            Err(err) => {
                log::trace!("Pixel {}: {}", i, err);
                misses += 1;
                [0, 0, 0, 0]
            }
        };
        put(image, i % width, i / width, rgba);
    }

    if misses > 0 {
        log::warn!(
            "{} pixels index past the {} entry palette",
            misses,
            palette.len()
        );
    }
}
