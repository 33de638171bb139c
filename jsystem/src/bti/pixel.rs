//! Conversions from the packed GX pixel encodings to RGBA8.

use super::consts::PaletteFormat;

/// Widen a `bits` wide channel to 8 bits by repeating its high bits into the low bits,
/// so that 0 maps to 0x00 and the channel maximum maps to 0xFF.
pub fn expand_bits(value: u16, bits: u32) -> u8 {
    debug_assert!((1..=8).contains(&bits));
    let v = value as u32 & ((1 << bits) - 1);
    let bits = bits as i32;

    let mut out = 0;
    let mut shift = 8 - bits;
    while shift > -bits {
        out |= if shift >= 0 { v << shift } else { v >> -shift };
        shift -= bits;
    }
    out as u8
}

pub fn rgb565_to_rgba8(pixel: u16) -> [u8; 4] {
    [
        expand_bits(pixel >> 11, 5),
        expand_bits(pixel >> 5, 6),
        expand_bits(pixel, 5),
        0xFF,
    ]
}

/// Top bit set: opaque RGB555. Clear: ARGB3444.
pub fn rgb5a3_to_rgba8(pixel: u16) -> [u8; 4] {
    if pixel & 0x8000 != 0 {
        [
            expand_bits(pixel >> 10, 5),
            expand_bits(pixel >> 5, 5),
            expand_bits(pixel, 5),
            0xFF,
        ]
    } else {
        [
            expand_bits(pixel >> 8, 4),
            expand_bits(pixel >> 4, 4),
            expand_bits(pixel, 4),
            expand_bits(pixel >> 12, 3),
        ]
    }
}

/// High byte alpha, low byte intensity.
pub fn ia8_to_rgba8(pixel: u16) -> [u8; 4] {
    let a = (pixel >> 8) as u8;
    let i = pixel as u8;
    [i, i, i, a]
}

pub fn palette_entry_to_rgba8(entry: u16, format: PaletteFormat) -> [u8; 4] {
    match format {
        PaletteFormat::IA8 => ia8_to_rgba8(entry),
        PaletteFormat::RGB565 => rgb565_to_rgba8(entry),
        PaletteFormat::RGB5A3 => rgb5a3_to_rgba8(entry),
    }
}

#[cfg(test)]
mod pixel_tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_expand_bits_endpoints() {
        for bits in 1..=8 {
            assert_eq!(expand_bits(0, bits), 0);
            assert_eq!(expand_bits((1 << bits) - 1, bits), 0xFF, "{bits} bits");
        }
        assert_eq!(expand_bits(0b10000, 5), 0b1000_0100);
        assert_eq!(expand_bits(0b100, 3), 0b1001_0010);
    }

    #[test]
    fn test_rgb565() {
        assert_eq!(rgb565_to_rgba8(0x0000), [0, 0, 0, 0xFF]);
        assert_eq!(rgb565_to_rgba8(0xF800), [0xFF, 0, 0, 0xFF]);
        assert_eq!(rgb565_to_rgba8(0x07E0), [0, 0xFF, 0, 0xFF]);
        assert_eq!(rgb565_to_rgba8(0x001F), [0, 0, 0xFF, 0xFF]);
    }

    #[test]
    fn test_rgb5a3_branches() {
        assert_eq!(rgb5a3_to_rgba8(0xFFFF), [0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(rgb5a3_to_rgba8(0x8000), [0, 0, 0, 0xFF]);
        // alpha 0b100, red 0xF, green 0x0, blue 0x8
        assert_eq!(rgb5a3_to_rgba8(0x4F08), [0xFF, 0x00, 0x88, 0x92]);
        assert_eq!(rgb5a3_to_rgba8(0x0000), [0, 0, 0, 0]);
    }

    #[test]
    fn test_ia8() {
        assert_eq!(ia8_to_rgba8(0x80FF), [0xFF, 0xFF, 0xFF, 0x80]);
    }

    proptest! {
        #[test]
        fn rgb565_replicates_high_bits(pixel in any::<u16>()) {
            let [r, g, b, a] = rgb565_to_rgba8(pixel);
            let r5 = (pixel >> 11) as u8;
            let g6 = ((pixel >> 5) & 0x3F) as u8;
            let b5 = (pixel & 0x1F) as u8;

            prop_assert_eq!(r >> 3, r5);
            prop_assert_eq!(g >> 2, g6);
            prop_assert_eq!(b >> 3, b5);
            prop_assert_eq!(r & 0x7, r5 >> 2);
            prop_assert_eq!(g & 0x3, g6 >> 4);
            prop_assert_eq!(b & 0x7, b5 >> 2);
            prop_assert_eq!(a, 0xFF);
        }

        #[test]
        fn rgb5a3_alpha_is_opaque_or_replicated(pixel in any::<u16>()) {
            let a = rgb5a3_to_rgba8(pixel)[3];
            if pixel & 0x8000 != 0 {
                prop_assert_eq!(a, 0xFF);
            } else {
                prop_assert_eq!(a, expand_bits(pixel >> 12, 3));
                prop_assert_eq!(a >> 5, ((pixel >> 12) & 0x7) as u8);
            }
        }
    }
}
