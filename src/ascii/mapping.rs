//! Tone to glyph mapping.

use rayon::prelude::*;

use super::grid::{Cell, GlyphGrid};
use super::tone::ToneCurve;
use crate::settings::Settings;

/// Ramp position for an adjusted tone in [0, 255].
///
/// index = floor(gray / 255 * (levels - 1)), so only pure white reaches the
/// last glyph.
#[inline]
pub fn ramp_index(gray: f64, levels: usize) -> usize {
    let idx = ((gray / 255.0) * (levels - 1) as f64).floor() as usize;
    idx.min(levels - 1)
}

/// Pick a glyph from `ramp` for an adjusted tone.
///
/// # Panics
/// Panics if `ramp` is empty.
#[inline]
pub fn select_glyph(gray: f64, ramp: &[char]) -> char {
    assert!(!ramp.is_empty(), "glyph ramp must not be empty");
    ramp[ramp_index(gray, ramp.len())]
}

/// Turn a sampled `cols x rows` RGBA buffer into a glyph grid.
///
/// Every cell depends only on its own sample and the shared settings, so the
/// cells are computed as a parallel map over `0..rows*cols` and collected in
/// index order. The output is identical for identical inputs.
///
/// # Panics
/// Panics if `sampled.len() != cols * rows * 4`.
pub fn render(sampled: &[u8], cols: usize, rows: usize, settings: &Settings) -> GlyphGrid {
    assert_eq!(
        sampled.len(),
        cols * rows * 4,
        "sampled buffer is not {}x{} RGBA",
        cols,
        rows
    );

    let ramp = settings.charset().glyphs();
    assert!(!ramp.is_empty(), "glyph ramp must not be empty");

    let curve = ToneCurve::new(
        settings.brightness(),
        settings.contrast(),
        settings.contrast_mode(),
        settings.invert(),
    );

    let cells: Vec<Cell> = (0..cols * rows)
        .into_par_iter()
        .map(|i| {
            let px = &sampled[i * 4..i * 4 + 4];
            let gray = curve.tone(px[0], px[1], px[2]);
            Cell::from_glyph(select_glyph(gray, &ramp))
        })
        .collect();

    GlyphGrid::from_cells(cols, rows, cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::CharSet;

    #[test]
    fn test_ramp_index_endpoints() {
        assert_eq!(ramp_index(0.0, 11), 0);
        assert_eq!(ramp_index(255.0, 11), 10);
        assert_eq!(ramp_index(254.9, 11), 9);
    }

    #[test]
    fn test_ramp_index_single_level() {
        assert_eq!(ramp_index(255.0, 1), 0);
    }

    #[test]
    fn test_select_glyph_binary() {
        let ramp = CharSet::Binary.glyphs();
        assert_eq!(select_glyph(0.0, &ramp), ' ');
        assert_eq!(select_glyph(127.5, &ramp), '0');
        assert_eq!(select_glyph(255.0, &ramp), '1');
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn test_select_glyph_empty_ramp_panics() {
        select_glyph(10.0, &[]);
    }

    #[test]
    fn test_select_glyph_across_blocks_ramp() {
        let ramp = CharSet::Blocks.glyphs();
        let chars: Vec<char> = [0.0, 64.0, 128.0, 192.0, 255.0]
            .iter()
            .map(|&gray| select_glyph(gray, &ramp))
            .collect();
        assert_eq!(chars, vec![' ', '░', '▒', '▓', '█']);
    }

    #[test]
    fn test_render_row_major_layout() {
        let settings = Settings::builder()
            .contrast(1.0)
            .charset(CharSet::Binary)
            .build()
            .unwrap();
        // 2x1: black then white
        let sampled = [0, 0, 0, 255, 255, 255, 255, 255];
        let grid = render(&sampled, 2, 1, &settings);
        assert_eq!(grid.get(0, 0), Some(Cell::Empty));
        assert_eq!(grid.get(0, 1), Some(Cell::Glyph('1')));
    }

    #[test]
    #[should_panic(expected = "RGBA")]
    fn test_render_wrong_buffer_panics() {
        render(&[0, 0, 0], 1, 1, &Settings::default());
    }
}
