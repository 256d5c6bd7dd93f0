//! Painting a mosaic onto an RGB raster.

use image::{Rgb, RgbImage};

use super::face::{CellRect, GlyphFace};
use crate::ascii::Cell;
use crate::mosaic::Mosaic;

/// Background of the rendered surface.
pub const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// Glyph color. Tone selects which glyph is drawn, never how bright it is.
pub const FOREGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Canvas size in whole pixels for a mosaic.
pub fn canvas_size(mosaic: &Mosaic) -> (u32, u32) {
    let g = &mosaic.geometry;
    (
        g.output_width().ceil() as u32,
        g.output_height().ceil() as u32,
    )
}

/// Pixel rectangle of cell `(row, col)`.
///
/// Cells start at `(col * cell_width, row * cell_height)`; fractional cell
/// widths are snapped so neighbouring cells neither overlap nor leave gaps.
pub fn cell_rect(mosaic: &Mosaic, row: usize, col: usize) -> CellRect {
    let g = &mosaic.geometry;
    let x0 = (col as f64 * g.cell_width).floor() as u32;
    let x1 = ((col + 1) as f64 * g.cell_width).floor() as u32;
    let y0 = (row as f64 * g.cell_height).floor() as u32;
    let y1 = ((row + 1) as f64 * g.cell_height).floor() as u32;
    CellRect {
        x: x0,
        y: y0,
        width: x1 - x0,
        height: y1 - y0,
    }
}

/// Draw every painted cell of `mosaic` with `face`, white on black.
pub fn rasterize(mosaic: &Mosaic, face: &dyn GlyphFace) -> RgbImage {
    let (width, height) = canvas_size(mosaic);
    let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND);

    for (row, cells) in mosaic.grid.iter_rows().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if let Cell::Glyph(ch) = *cell {
                face.draw(&mut canvas, ch, cell_rect(mosaic, row, col), FOREGROUND);
            }
        }
    }

    canvas
}
