//! Glyph faces used to paint cells onto a raster.

use std::path::Path;

use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use font8x8::{UnicodeFonts, BASIC_FONTS, BLOCK_FONTS, LATIN_FONTS};
use image::{Rgb, RgbImage};

use super::ExportError;

/// Pixel rectangle occupied by one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Something that can draw a single glyph into a cell.
pub trait GlyphFace {
    /// Paint `ch` into `cell` with `color`. Pixels outside the canvas are
    /// skipped.
    fn draw(&self, canvas: &mut RgbImage, ch: char, cell: CellRect, color: Rgb<u8>);
}

/// Built-in 8x8 bitmap font, stretched to the cell.
///
/// Covers ASCII, Latin-1 (for `·`) and the block elements, which together
/// include every glyph of every ramp. Unknown glyphs are drawn as `?`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapFace;

impl BitmapFace {
    fn bitmap(ch: char) -> [u8; 8] {
        BASIC_FONTS
            .get(ch)
            .or_else(|| LATIN_FONTS.get(ch))
            .or_else(|| BLOCK_FONTS.get(ch))
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or([0; 8])
    }
}

impl GlyphFace for BitmapFace {
    fn draw(&self, canvas: &mut RgbImage, ch: char, cell: CellRect, color: Rgb<u8>) {
        if cell.width == 0 || cell.height == 0 {
            return;
        }
        let rows = Self::bitmap(ch);

        for dy in 0..cell.height {
            let y = cell.y + dy;
            if y >= canvas.height() {
                break;
            }
            let bits = rows[(dy * 8 / cell.height) as usize];
            for dx in 0..cell.width {
                let x = cell.x + dx;
                if x >= canvas.width() {
                    break;
                }
                // bit 0 is the leftmost pixel
                let bit = dx * 8 / cell.width;
                if (bits >> bit) & 1 == 1 {
                    canvas.put_pixel(x, y, color);
                }
            }
        }
    }
}

/// An outline font (TTF/OTF) rasterized at a fixed pixel size.
pub struct OutlineFace {
    font: FontVec,
    scale: PxScale,
}

impl OutlineFace {
    /// Parse font bytes and rasterize glyphs at `px_size`.
    pub fn from_bytes(bytes: Vec<u8>, px_size: f32) -> Result<Self, ExportError> {
        let font = FontVec::try_from_vec(bytes).map_err(|_| ExportError::InvalidFont)?;
        Ok(Self {
            font,
            scale: PxScale::from(px_size),
        })
    }

    /// Load a font file from disk.
    pub fn load(path: &Path, px_size: f32) -> Result<Self, ExportError> {
        let bytes = std::fs::read(path).map_err(|source| ExportError::FontIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(bytes, px_size)
    }
}

impl GlyphFace for OutlineFace {
    fn draw(&self, canvas: &mut RgbImage, ch: char, cell: CellRect, color: Rgb<u8>) {
        let scaled = self.font.as_scaled(self.scale);
        let glyph_id = self.font.glyph_id(ch);

        // Center horizontally, sit on the baseline.
        let advance = scaled.h_advance(glyph_id);
        let x_offset = ((cell.width as f32 - advance) / 2.0).max(0.0);
        let glyph = glyph_id.with_scale_and_position(
            self.scale,
            point(cell.x as f32 + x_offset, cell.y as f32 + scaled.ascent()),
        );

        let Some(outlined) = self.font.outline_glyph(glyph) else {
            return;
        };
        let bounds = outlined.px_bounds();
        let (width, height) = canvas.dimensions();

        outlined.draw(|gx, gy, coverage| {
            let x = bounds.min.x as i32 + gx as i32;
            let y = bounds.min.y as i32 + gy as i32;
            if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
                return;
            }
            let pixel = canvas.get_pixel_mut(x as u32, y as u32);
            for (dst, &src) in pixel.0.iter_mut().zip(color.0.iter()) {
                let blended = *dst as f32 + (src as f32 - *dst as f32) * coverage.min(1.0);
                *dst = blended.round() as u8;
            }
        });
    }
}
