//! End-to-end conversion: bitmap + settings -> glyph grid.

use crate::ascii::{self, Geometry, GlyphGrid};
use crate::bitmap::SourceBitmap;
use crate::settings::Settings;

/// A converted image: the grid plus the geometry it should be drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct Mosaic {
    pub geometry: Geometry,
    pub grid: GlyphGrid,
}

/// Convert a bitmap to a glyph mosaic.
///
/// Resolves the grid for the bitmap's size, box-averages the bitmap down to
/// one sample per cell and maps each sample to a glyph. Pure and
/// deterministic.
pub fn convert(bitmap: &SourceBitmap, settings: &Settings) -> Mosaic {
    let geometry = ascii::resolve(bitmap.width(), bitmap.height(), settings.resolution());
    log::debug!(
        "{}x{} image -> {}x{} grid (font {}px, cell {:.2}x{:.2})",
        bitmap.width(),
        bitmap.height(),
        geometry.cols,
        geometry.rows,
        geometry.font_size,
        geometry.cell_width,
        geometry.cell_height
    );

    let sampled = ascii::downsample(bitmap, geometry.cols, geometry.rows);
    let grid = ascii::render(
        &sampled,
        geometry.cols as usize,
        geometry.rows as usize,
        settings,
    );
    log::debug!(
        "{} of {} cells painted with '{}' ramp",
        grid.painted_count(),
        geometry.cell_count(),
        settings.charset()
    );

    Mosaic { geometry, grid }
}
