//! Resampling a source bitmap to one RGBA sample per grid cell.

use crate::bitmap::SourceBitmap;

/// Box-average an RGBA bitmap down (or up) to a `cols x rows` RGBA buffer.
///
/// Each output cell averages every source pixel whose top-left corner falls
/// inside the cell. When a cell is narrower than one source pixel (small
/// images upsampled to the minimum grid), the nearest source pixel is used
/// instead so no cell is left empty.
///
/// # Returns
/// `cols * rows * 4` bytes in row-major order. Empty when either grid
/// dimension is zero.
///
/// # Example
/// ```
/// use ascii_mosaic::ascii::downsample;
/// use ascii_mosaic::bitmap::SourceBitmap;
///
/// let bitmap = SourceBitmap::filled(640, 480, [200, 100, 50, 255]);
/// let cells = downsample(&bitmap, 40, 20);
/// assert_eq!(cells.len(), 40 * 20 * 4);
/// assert_eq!(&cells[..4], &[200, 100, 50, 255]);
/// ```
pub fn downsample(bitmap: &SourceBitmap, cols: u32, rows: u32) -> Vec<u8> {
    if cols == 0 || rows == 0 {
        return Vec::new();
    }

    let img_width = bitmap.width();
    let img_height = bitmap.height();
    let data = bitmap.data();

    let cell_w = img_width as f64 / cols as f64;
    let cell_h = img_height as f64 / rows as f64;

    let mut buffer = Vec::with_capacity(cols as usize * rows as usize * 4);

    for cy in 0..rows {
        let (start_y, end_y) = span(cy, cell_h, img_height);
        for cx in 0..cols {
            let (start_x, end_x) = span(cx, cell_w, img_width);

            let mut sum = [0u64; 4];
            let mut count = 0u64;

            for py in start_y..end_y {
                let row_offset = py as usize * img_width as usize;
                for px in start_x..end_x {
                    let idx = (row_offset + px as usize) * 4;
                    let pixel = &data[idx..idx + 4];
                    for (acc, &channel) in sum.iter_mut().zip(pixel) {
                        *acc += channel as u64;
                    }
                    count += 1;
                }
            }

            for acc in sum {
                buffer.push((acc / count.max(1)) as u8);
            }
        }
    }

    buffer
}

/// Source pixel range covered by cell `index`, never empty.
#[inline]
fn span(index: u32, cell_size: f64, limit: u32) -> (u32, u32) {
    let start = ((index as f64 * cell_size) as u32).min(limit - 1);
    let end = (((index + 1) as f64 * cell_size) as u32).min(limit);
    (start, end.max(start + 1))
}
