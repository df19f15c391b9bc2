//! Final image storage and 8-bit conversion.

use crate::tile::TileResult;
use crate::Color;
use sable_math::Interval;

const INTENSITY: Interval = Interval::new(0.0, 0.999);

/// Scanline order for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrder {
    /// Top scanline first, as PPM and PNG expect.
    TopDown,
    /// `y = 0` first, matching the raster coordinates.
    BottomUp,
}

/// Gamma-corrected pixels, `y = 0` on the bottom scanline.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl ImageBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.offset(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let offset = self.offset(x, y);
        self.pixels[offset] = color;
    }

    /// Copy a rendered tile into place.
    pub fn write_tile(&mut self, result: &TileResult) {
        let tile = &result.tile;
        let width = tile.width() as usize;
        for (row, y) in (tile.start_y..tile.end_y).enumerate() {
            let src = &result.pixels[row * width..(row + 1) * width];
            let start = self.offset(tile.start_x, y);
            self.pixels[start..start + width].copy_from_slice(src);
        }
    }

    /// Iterate scanlines in the requested order.
    pub fn rows(&self, order: RowOrder) -> Box<dyn Iterator<Item = &[Color]> + '_> {
        let rows = self.pixels.chunks(self.width.max(1) as usize);
        match order {
            RowOrder::BottomUp => Box::new(rows),
            RowOrder::TopDown => Box::new(rows.rev()),
        }
    }

    /// Packed RGB bytes in the given scanline order.
    pub fn to_rgb8(&self, order: RowOrder) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for row in self.rows(order) {
            for color in row {
                bytes.extend_from_slice(&quantize(*color));
            }
        }
        bytes
    }
}

/// Map a gamma-corrected color to bytes, clamping each channel to [0, 0.999].
pub fn quantize(color: Color) -> [u8; 3] {
    let channel = |c: f32| (256.0 * INTENSITY.clamp(c)) as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}
