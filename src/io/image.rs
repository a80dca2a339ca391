//! Source image decoding and PNG export of finished outputs

use crate::io::error::{PatternError, Result, file_system_error};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

/// A decoded straight-alpha RGBA raster shared between renders
///
/// Cloning is cheap; the pixels are never mutated after construction.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: Arc<RgbaImage>,
}

impl SourceImage {
    /// Wrap an already decoded image
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    /// Build from raw RGBA bytes, `None` if the buffer size does not match
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, data).map(Self::new)
    }

    /// Solid single-colour image, mostly useful as a motif in tests and benches
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::new(RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
    }

    /// Decode an encoded image (PNG, JPEG, ...) from memory
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Decode`] tagged with `index` if the bytes are not
    /// a supported image format or are corrupt
    pub fn decode(bytes: &[u8], index: usize) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|source| PatternError::Decode { index, source })?;
        Ok(Self::new(decoded.to_rgba8()))
    }

    /// Read and decode an image file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded
    pub fn open(path: &Path, index: usize) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| file_system_error(path, "read image", e))?;
        Self::decode(&bytes, index)
    }

    /// Intrinsic width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Intrinsic height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Width divided by height, 1.0 for degenerate images
    pub fn aspect_ratio(&self) -> f32 {
        if self.height() == 0 {
            1.0
        } else {
            self.width() as f32 / self.height() as f32
        }
    }

    /// Borrow the decoded pixels
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Whether two handles share the same pixel buffer
    pub fn same_pixels(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }

    /// Address of the shared pixel buffer, stable for the handle's lifetime
    pub(crate) fn identity(&self) -> usize {
        Arc::as_ptr(&self.pixels) as usize
    }
}

/// Encode a finished raster as PNG bytes
///
/// # Errors
///
/// Returns [`PatternError::Encoding`] tagged with `size_key` if the encoder fails
pub fn encode_png(image: &RgbaImage, size_key: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|source| PatternError::Encoding {
            size_key: size_key.to_string(),
            source,
        })?;
    Ok(bytes)
}

/// Write an encoded output under `directory` as `<key>.png`
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The file cannot be written
pub fn write_output(directory: &Path, key: &str, bytes: &[u8]) -> Result<std::path::PathBuf> {
    use crate::io::configuration::OUTPUT_EXTENSION;

    std::fs::create_dir_all(directory)
        .map_err(|e| file_system_error(directory, "create directory", e))?;

    let path = directory.join(format!("{key}.{OUTPUT_EXTENSION}"));
    std::fs::write(&path, bytes).map_err(|e| file_system_error(&path, "write output", e))?;
    Ok(path)
}
