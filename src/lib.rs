//! ascii-mosaic library crate.
//!
//! Converts raster images into character mosaics: a grid of glyphs whose
//! visual density follows the tone of the source, exported as text or as a
//! raster image.
//!
//! ```
//! use ascii_mosaic::{bitmap::SourceBitmap, convert, Settings};
//!
//! let bitmap = SourceBitmap::filled(320, 240, [200, 200, 200, 255]);
//! let mosaic = convert(&bitmap, &Settings::default());
//! assert_eq!(mosaic.grid.cols(), mosaic.geometry.cols as usize);
//! ```

pub mod ascii;
pub mod bitmap;
pub mod config;
pub mod export;
pub mod fal;
pub mod mosaic;
pub mod settings;

pub use mosaic::{convert, Mosaic};
pub use settings::{Settings, SettingsBuilder, SettingsError};
