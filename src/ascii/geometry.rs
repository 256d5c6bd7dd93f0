//! Grid geometry for aspect-ratio-correct mosaic rendering.

/// Largest glyph size in pixels, used at the lowest detail setting.
pub const MAX_FONT_SIZE: f64 = 20.0;

/// Smallest glyph size in pixels, used at the highest detail setting.
pub const MIN_FONT_SIZE: f64 = 5.0;

/// Glyph cell width as a fraction of its height.
/// Monospace glyphs are roughly half as wide as they are tall.
pub const CELL_ASPECT: f64 = 0.55;

/// Minimum number of columns, so tiny images still produce a legible grid.
pub const MIN_COLS: u32 = 40;

/// Maximum number of columns, bounding memory and CPU for huge images.
pub const MAX_COLS: u32 = 600;

/// Output grid dimensions and cell size for one conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Number of glyph columns, always within `MIN_COLS..=MAX_COLS`.
    pub cols: u32,
    /// Number of glyph rows, always at least 1.
    pub rows: u32,
    /// Width of one cell in output pixels.
    pub cell_width: f64,
    /// Height of one cell in output pixels.
    pub cell_height: f64,
    /// Glyph size in output pixels.
    pub font_size: f64,
}

impl Geometry {
    /// Width of the rendered surface in pixels (fractional).
    pub fn output_width(&self) -> f64 {
        self.cols as f64 * self.cell_width
    }

    /// Height of the rendered surface in pixels.
    pub fn output_height(&self) -> f64 {
        self.rows as f64 * self.cell_height
    }

    /// Total number of cells in the grid.
    pub fn cell_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }
}

/// Map the detail setting to a glyph size.
///
/// Resolution is an inverse density control: 0.1 gives 18px glyphs, 1.0 gives
/// the 5px minimum.
pub fn font_size_for(resolution: f64) -> f64 {
    (MAX_FONT_SIZE - resolution * (MAX_FONT_SIZE - MIN_FONT_SIZE))
        .floor()
        .max(MIN_FONT_SIZE)
}

/// Resolve the glyph grid for an image of the given size.
///
/// Columns come from how many `cell_width / resolution` wide strips fit in the
/// image, clamped to `MIN_COLS..=MAX_COLS`. Rows preserve the image aspect
/// ratio once cells are drawn at `cell_width x cell_height`, so
/// `output_height / output_width` matches `image_height / image_width`.
///
/// # Panics
/// Panics if either image dimension is zero.
///
/// # Example
/// ```
/// use ascii_mosaic::ascii::resolve;
///
/// let geometry = resolve(50, 50, 0.1);
/// assert_eq!(geometry.cols, 40);
/// assert_eq!(geometry.rows, 22);
/// ```
pub fn resolve(image_width: u32, image_height: u32, resolution: f64) -> Geometry {
    assert!(
        image_width > 0 && image_height > 0,
        "image dimensions must be non-zero, got {}x{}",
        image_width,
        image_height
    );

    let font_size = font_size_for(resolution);
    let cell_width = font_size * CELL_ASPECT;
    let cell_height = font_size;

    let raw_cols = (image_width as f64 / (cell_width / resolution)).floor();
    let cols = (raw_cols as u32).clamp(MIN_COLS, MAX_COLS);

    let image_aspect = image_height as f64 / image_width as f64;
    let rows = (cols as f64 * image_aspect * (cell_width / cell_height)).floor() as u32;

    Geometry {
        cols,
        rows: rows.max(1),
        cell_width,
        cell_height,
        font_size,
    }
}
