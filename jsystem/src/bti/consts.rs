use num_derive::FromPrimitive;

//Bits per Pixel | Block Width | Block Height | Block Size | Type / Description
#[derive(Copy, Clone, FromPrimitive, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ImageFormat {
    I4 = 0x00,     //  4 | 8 | 8 | 32 | grey
    I8 = 0x01,     //  8 | 8 | 4 | 32 | grey
    IA4 = 0x02,    //  8 | 8 | 4 | 32 | grey + alpha
    IA8 = 0x03,    // 16 | 4 | 4 | 32 | grey + alpha
    RGB565 = 0x04, // 16 | 4 | 4 | 32 | color
    RGB5A3 = 0x05, // 16 | 4 | 4 | 32 | color + alpha
    RGBA32 = 0x06, // 32 | 4 | 4 | 64 | color + alpha
    C4 = 0x08,     //  4 | 8 | 8 | 32 | palette (IA8, RGB565, RGB5A3)
    C8 = 0x09,     //  8 | 8 | 4 | 32 | palette (IA8, RGB565, RGB5A3)
    C14X2 = 0x0A,  // 16 | 4 | 4 | 32 | palette (IA8, RGB565, RGB5A3), 14 bits used
    CMPR = 0x0E,   //  4 | 8 | 8 | 32 | 4x4 sub-blocks with RGB565 endpoints
}

impl ImageFormat {
    pub fn bits_per_pixel(&self) -> usize {
        match self {
            ImageFormat::I4 | ImageFormat::C4 | ImageFormat::CMPR => 4,
            ImageFormat::I8 | ImageFormat::IA4 | ImageFormat::C8 => 8,
            ImageFormat::IA8
            | ImageFormat::RGB565
            | ImageFormat::RGB5A3
            | ImageFormat::C14X2 => 16,
            ImageFormat::RGBA32 => 32,
        }
    }

    pub fn block_width(&self) -> usize {
        match self.bits_per_pixel() {
            4 | 8 => 8,
            _ => 4,
        }
    }

    pub fn block_height(&self) -> usize {
        match self.bits_per_pixel() {
            4 => 8,
            _ => 4,
        }
    }

    /// Bytes in one tiled block. RGBA32 blocks are two 32 byte halves (AR then GB).
    pub fn block_size(&self) -> usize {
        match self {
            ImageFormat::RGBA32 => 64,
            _ => 32,
        }
    }

    /// Blocks covering an image, including partially filled edge blocks.
    pub fn block_count(&self, width: usize, height: usize) -> (usize, usize) {
        (
            width.div_ceil(self.block_width()),
            height.div_ceil(self.block_height()),
        )
    }

    /// Byte size of one image level, padded out to whole blocks.
    pub fn bytes_for_size(&self, width: usize, height: usize) -> usize {
        let (blocks_x, blocks_y) = self.block_count(width, height);
        blocks_x * blocks_y * self.block_size()
    }

    pub fn is_indexed(&self) -> bool {
        matches!(
            self,
            ImageFormat::C4 | ImageFormat::C8 | ImageFormat::C14X2
        )
    }
}

#[derive(Copy, Clone, FromPrimitive, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum WrapMode {
    ClampToEdge = 0,
    Repeat = 1,
    MirroredRepeat = 2,
}

#[derive(Copy, Clone, FromPrimitive, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PaletteFormat {
    IA8 = 0x00,
    RGB565 = 0x01,
    RGB5A3 = 0x02,
}
