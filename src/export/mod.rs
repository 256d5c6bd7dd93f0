//! Exporting a mosaic as an image file or as text.

mod face;
mod raster;

use std::io::Write;
use std::path::{Path, PathBuf};

use image::ImageFormat;

pub use face::{BitmapFace, CellRect, GlyphFace, OutlineFace};
pub use raster::{canvas_size, cell_rect, rasterize, BACKGROUND, FOREGROUND};

use crate::mosaic::Mosaic;

/// Errors that can occur when exporting a mosaic.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Unsupported output format '{0}' (expected png, jpg, jpeg, webp or txt)")]
    UnsupportedFormat(String),

    #[error("Failed to read font '{}': {source}", .path.display())]
    FontIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Font file is not a valid TrueType/OpenType font")]
    InvalidFont,

    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Output file format, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    WebP,
    Text,
}

impl OutputFormat {
    /// Infer the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "webp" => Ok(OutputFormat::WebP),
            "txt" => Ok(OutputFormat::Text),
            _ => Err(ExportError::UnsupportedFormat(ext)),
        }
    }

    fn image_format(&self) -> Option<ImageFormat> {
        match self {
            OutputFormat::Png => Some(ImageFormat::Png),
            OutputFormat::Jpeg => Some(ImageFormat::Jpeg),
            OutputFormat::WebP => Some(ImageFormat::WebP),
            OutputFormat::Text => None,
        }
    }
}

/// Pick the glyph face for a mosaic: the given font file at the mosaic's
/// font size, or the built-in bitmap face.
pub fn load_face(font: Option<&Path>, mosaic: &Mosaic) -> Result<Box<dyn GlyphFace>, ExportError> {
    match font {
        Some(path) => {
            let face = OutlineFace::load(path, mosaic.geometry.font_size as f32)?;
            log::info!("Using font {}", path.display());
            Ok(Box::new(face))
        }
        None => Ok(Box::new(BitmapFace)),
    }
}

/// Write the mosaic as text, one line per row, with a trailing newline.
pub fn write_text<W: Write>(mosaic: &Mosaic, mut writer: W) -> Result<(), ExportError> {
    writer.write_all(mosaic.grid.to_text().as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Save the mosaic to `path`, as text or as a raster drawn with `face`.
pub fn save(mosaic: &Mosaic, path: &Path, face: &dyn GlyphFace) -> Result<OutputFormat, ExportError> {
    let format = OutputFormat::from_path(path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    match format.image_format() {
        Some(image_format) => {
            let canvas = rasterize(mosaic, face);
            canvas.save_with_format(path, image_format)?;
            log::info!(
                "Wrote {}x{} image to {}",
                canvas.width(),
                canvas.height(),
                path.display()
            );
        }
        None => {
            let file = std::fs::File::create(path)?;
            write_text(mosaic, std::io::BufWriter::new(file))?;
            log::info!("Wrote text mosaic to {}", path.display());
        }
    }

    Ok(format)
}
