//! Image to glyph-grid conversion.
//!
//! The conversion runs in four steps:
//!
//! 1. **Geometry** - pick the column/row count and cell size for the image
//! 2. **Downsampling** - average the bitmap down to one RGBA sample per cell
//! 3. **Tone curve** - BT.601 luminance, brightness, contrast, clamp, invert
//! 4. **Glyph mapping** - index the selected ramp; spaces are left unpainted
//!
//! # Character Sets
//!
//! Five ramps are available via [`CharSet`]: `halftone`, `detail` (default),
//! `ascii`, `binary` and `blocks`.

mod charset;
mod downsample;
mod geometry;
mod grayscale;
mod grid;
mod mapping;
mod tone;

pub use charset::{
    CharSet, UnknownCharSet, ASCII_RAMP, BINARY_RAMP, BLOCKS_RAMP, DETAIL_RAMP, HALFTONE_RAMP,
};
pub use downsample::downsample;
pub use geometry::{
    font_size_for, resolve, Geometry, CELL_ASPECT, MAX_COLS, MAX_FONT_SIZE, MIN_COLS,
    MIN_FONT_SIZE,
};
pub use grayscale::{luminance, LUMA_B, LUMA_G, LUMA_R};
pub use grid::{Cell, GlyphGrid};
pub use mapping::{ramp_index, render, select_glyph};
pub use tone::{contrast_factor, ContrastMode, ToneCurve, CONTRAST_PIVOT};
