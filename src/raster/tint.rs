//! Conversion between straight-alpha images and premultiplied surfaces, and motif tinting

use crate::io::error::{PatternError, Result};
use crate::math::color::Rgba;
use image::RgbaImage;
use tiny_skia::{ColorU8, Pixmap};

/// Allocate a transparent surface
///
/// # Errors
///
/// Returns [`PatternError::Surface`] if either dimension is zero or too large
pub fn new_surface(width: u32, height: u32) -> Result<Pixmap> {
    Pixmap::new(width, height).ok_or(PatternError::Surface { width, height })
}

/// Premultiply a straight-alpha image into a drawable surface
///
/// # Errors
///
/// Returns [`PatternError::Surface`] for empty images
pub fn to_pixmap(image: &RgbaImage) -> Result<Pixmap> {
    let mut pixmap = new_surface(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

/// Demultiply a surface back into a straight-alpha image
pub fn to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let data = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect();
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .unwrap_or_else(|| RgbaImage::new(pixmap.width(), pixmap.height()))
}

/// Recolour a motif: every pixel takes `color`, keeping the motif's coverage
///
/// Equivalent to filling the motif's bounds with `color` under a
/// source-in composite, so the silhouette survives and the colour is flat.
///
/// # Errors
///
/// Returns [`PatternError::Surface`] for empty images
pub fn tint(image: &RgbaImage, color: Rgba) -> Result<Pixmap> {
    let mut pixmap = new_surface(image.width(), image.height())?;
    let [red, green, blue] = color.channels();
    let color_alpha = color.alpha.clamp(0.0, 1.0);

    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [.., alpha] = src.0;
        let coverage = (f32::from(alpha) * color_alpha).round() as u8;
        *dst = ColorU8::from_rgba(red, green, blue, coverage).premultiply();
    }
    Ok(pixmap)
}
