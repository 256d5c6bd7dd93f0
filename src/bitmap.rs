//! Decoded source bitmaps.

use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbaImage};

/// Errors that can occur while obtaining a source bitmap.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to read image '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

/// A decoded RGBA image, row-major, 4 bytes per pixel.
///
/// The conversion only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl SourceBitmap {
    /// Wrap raw RGBA samples.
    ///
    /// # Panics
    /// Panics if either dimension is zero or `data.len() != width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert!(
            width > 0 && height > 0,
            "bitmap dimensions must be non-zero, got {}x{}",
            width,
            height
        );
        assert_eq!(
            data.len(),
            width as usize * height as usize * 4,
            "RGBA buffer length does not match {}x{}",
            width,
            height
        );
        Self {
            width,
            height,
            data,
        }
    }

    /// A bitmap where every pixel has the same RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba.repeat(width as usize * height as usize);
        Self::new(width, height, data)
    }

    /// Decode an encoded still image (PNG, JPEG, WebP).
    pub fn decode(bytes: &[u8]) -> Result<Self, SourceError> {
        let image = image::load_from_memory(bytes)?;
        Self::from_dynamic(image)
    }

    /// Read and decode an image file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::decode(&bytes)
    }

    /// Convert any decoded image to RGBA.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self, SourceError> {
        Self::try_from(image.to_rgba8())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA samples.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// RGBA of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }
}

impl TryFrom<RgbaImage> for SourceBitmap {
    type Error = SourceError;

    fn try_from(image: RgbaImage) -> Result<Self, Self::Error> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(SourceError::Empty { width, height });
        }
        Ok(Self::new(width, height, image.into_raw()))
    }
}
