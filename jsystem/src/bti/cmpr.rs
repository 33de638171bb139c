//! CMPR: GX flavoured S3TC1/DXT1.
//!
//! Each 8x8 macroblock on disk holds four 8 byte DXT1 blocks in 2x2 order. Colours are
//! big-endian and the selector bytes list pixels most significant pair first.

use byteorder::{BigEndian, ByteOrder};
use common::vimage::DecodedImage;

use super::pixel::rgb565_to_rgba8;

const BLOCK_BYTES: usize = 8;

fn block_dims(width: usize, height: usize) -> (usize, usize) {
    (width.div_ceil(4), height.div_ceil(4))
}

/// Reorder the 2x2 tiled blocks of `src` into a private buffer in raster block order.
///
/// Blocks past the image edge are dropped. Missing source bytes leave zeroed blocks.
pub fn detile_blocks(src: &[u8], width: usize, height: usize) -> Vec<u8> {
    let (blocks_x, blocks_y) = block_dims(width, height);
    let mut dst = vec![0; blocks_x * blocks_y * BLOCK_BYTES];

    let mut s = 0;
    for y in (0..blocks_y).step_by(2) {
        for x in (0..blocks_x).step_by(2) {
            for dy in 0..2 {
                for dx in 0..2 {
                    if x + dx < blocks_x && y + dy < blocks_y {
                        if let Some(block) = src.get(s..s + BLOCK_BYTES) {
                            let d = BLOCK_BYTES * ((y + dy) * blocks_x + x + dx);
                            dst[d..d + BLOCK_BYTES].copy_from_slice(block);
                        }
                    }
                    s += BLOCK_BYTES;
                }
            }
        }
    }
    dst
}

/// Inverse of [`detile_blocks`]: raster ordered blocks back into 2x2 tiled storage.
pub fn retile_blocks(linear: &[u8], width: usize, height: usize) -> Vec<u8> {
    let (blocks_x, blocks_y) = block_dims(width, height);
    let mut dst = vec![0; blocks_x.div_ceil(2) * blocks_y.div_ceil(2) * 4 * BLOCK_BYTES];

    let mut d = 0;
    for y in (0..blocks_y).step_by(2) {
        for x in (0..blocks_x).step_by(2) {
            for dy in 0..2 {
                for dx in 0..2 {
                    if x + dx < blocks_x && y + dy < blocks_y {
                        let s = BLOCK_BYTES * ((y + dy) * blocks_x + x + dx);
                        if let Some(block) = linear.get(s..s + BLOCK_BYTES) {
                            dst[d..d + BLOCK_BYTES].copy_from_slice(block);
                        }
                    }
                    d += BLOCK_BYTES;
                }
            }
        }
    }
    dst
}

/// Reverse the order of the four 2 bit selectors in a byte.
pub fn reverse_selector_byte(b: u8) -> u8 {
    ((b & 0x03) << 6) | ((b & 0x0C) << 2) | ((b & 0x30) >> 2) | ((b & 0xC0) >> 6)
}

/// The four colours a block can select from.
pub fn color_table(color0: u16, color1: u16) -> [[u8; 4]; 4] {
    let c0 = rgb565_to_rgba8(color0);
    let c1 = rgb565_to_rgba8(color1);
    let mix = |a_weight: u16, b_weight: u16| -> [u8; 4] {
        let total = a_weight + b_weight;
        let mut out = [0xFF; 4];
        for i in 0..3 {
            out[i] = ((a_weight * c0[i] as u16 + b_weight * c1[i] as u16 + 1) / total) as u8;
        }
        out
    };

    if color0 > color1 {
        [c0, c1, mix(2, 1), mix(1, 2)]
    } else {
        [c0, c1, mix(1, 1), [0, 0, 0, 0]]
    }
}

/// Decode tiled CMPR data into RGBA8.
pub fn decode_cmpr(src: &[u8], width: usize, height: usize) -> DecodedImage {
    let mut image = DecodedImage::new(width as u32, height as u32);
    let (blocks_x, _) = block_dims(width, height);

    let linear = detile_blocks(src, width, height);
    for (i, block) in linear.chunks_exact(BLOCK_BYTES).enumerate() {
        let color0 = BigEndian::read_u16(&block[0..2]);
        let color1 = BigEndian::read_u16(&block[2..4]);
        let colors = color_table(color0, color1);

        let mut bits = u32::from_le_bytes([
            reverse_selector_byte(block[4]),
            reverse_selector_byte(block[5]),
            reverse_selector_byte(block[6]),
            reverse_selector_byte(block[7]),
        ]);

        let x0 = (i % blocks_x) * 4;
        let y0 = (i / blocks_x) * 4;
        for iy in 0..4 {
            for ix in 0..4 {
                let (x, y) = (x0 + ix, y0 + iy);
                if x < width && y < height {
                    image.set_pixel(x as u32, y as u32, colors[(bits & 0x3) as usize]);
                }
                bits >>= 2;
            }
        }
    }
    image
}
