//! Cover artwork treatment: rounded clip, edge shading and drop shadow

use crate::io::configuration::{
    COVER_CORNER_RADIUS, COVER_GRADIENT_ALPHA, COVER_SHADOW_ALPHA, COVER_SHADOW_BLUR,
    COVER_SHADOW_COLOR, COVER_SHADOW_OFFSET,
};
use crate::io::error::{PatternError, Result};
use crate::math::color::Rgba;
use crate::raster::filters::gaussian_blur;
use crate::raster::shapes::{Bounds, rounded_rect};
use crate::raster::tint::new_surface;
use tiny_skia::{
    BlendMode, ColorU8, FillRule, FilterQuality, GradientStop, LinearGradient, Paint, Pattern,
    Pixmap, PixmapPaint, Point, SpreadMode, Transform,
};

/// Stops of the multiply gradient darkening the spine and fore edge
fn edge_stops() -> Vec<GradientStop> {
    let stop = |position: f32, shade: u8| {
        GradientStop::new(
            position,
            Rgba::new(shade, shade, shade, COVER_GRADIENT_ALPHA).to_skia(),
        )
    };
    vec![stop(0.01, 110), stop(0.02, 255), stop(0.99, 255), stop(1.0, 162)]
}

/// Render a cover scaled to `width x height` with rounded corners and edge shading
///
/// # Errors
///
/// Returns [`PatternError::Surface`] if the cover layer cannot be allocated
pub fn render_cover(cover: &Pixmap, width: f32, height: f32) -> Result<Pixmap> {
    let layer_width = width.ceil().max(1.0) as u32;
    let layer_height = height.ceil().max(1.0) as u32;
    let mut layer = new_surface(layer_width, layer_height)?;

    let Some(clip) = rounded_rect(Bounds::new(0.0, 0.0, width, height), COVER_CORNER_RADIUS)
    else {
        return Ok(layer);
    };

    let scale = Transform::from_scale(
        width / cover.width() as f32,
        height / cover.height() as f32,
    );
    let artwork = Paint {
        shader: Pattern::new(
            cover.as_ref(),
            SpreadMode::Pad,
            FilterQuality::Bicubic,
            1.0,
            scale,
        ),
        anti_alias: true,
        ..Paint::default()
    };
    layer.fill_path(&clip, &artwork, FillRule::Winding, Transform::identity(), None);

    let gradient = LinearGradient::new(
        Point::from_xy(0.0, 0.0),
        Point::from_xy(width, 0.0),
        edge_stops(),
        SpreadMode::Pad,
        Transform::identity(),
    )
    .ok_or(PatternError::Surface {
        width: layer_width,
        height: layer_height,
    })?;
    let shading = Paint {
        shader: gradient,
        blend_mode: BlendMode::Multiply,
        anti_alias: true,
        ..Paint::default()
    };
    layer.fill_path(&clip, &shading, FillRule::Winding, Transform::identity(), None);

    Ok(layer)
}

/// Blurred dark silhouette of `layer`, padded so the blur is not cut off
///
/// Returns the shadow and its padding on each side.
///
/// # Errors
///
/// Returns [`PatternError::Surface`] if the shadow cannot be allocated
pub fn render_shadow(layer: &Pixmap) -> Result<(Pixmap, u32)> {
    let padding = (3.0 * COVER_SHADOW_BLUR).ceil() as u32;
    let mut silhouette = new_surface(layer.width() + 2 * padding, layer.height() + 2 * padding)?;
    silhouette.draw_pixmap(
        padding as i32,
        padding as i32,
        layer.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );

    let [red, green, blue] = COVER_SHADOW_COLOR;
    for pixel in silhouette.pixels_mut() {
        let alpha = (f32::from(pixel.alpha()) * COVER_SHADOW_ALPHA).round() as u8;
        *pixel = ColorU8::from_rgba(red, green, blue, alpha).premultiply();
    }

    Ok((gaussian_blur(&silhouette, COVER_SHADOW_BLUR)?, padding))
}

/// Draw a treated cover with its drop shadow into `bounds` on `target`
///
/// # Errors
///
/// Returns [`PatternError::Surface`] if an intermediate layer cannot be allocated
pub fn draw_cover(target: &mut Pixmap, cover: &Pixmap, bounds: Bounds) -> Result<()> {
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return Ok(());
    }

    let layer = render_cover(cover, bounds.width, bounds.height)?;
    let (shadow, padding) = render_shadow(&layer)?;
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };

    let (offset_x, offset_y) = COVER_SHADOW_OFFSET;
    let pad = padding as f32;
    target.draw_pixmap(
        0,
        0,
        shadow.as_ref(),
        &paint,
        Transform::from_translate(bounds.x - pad + offset_x, bounds.y - pad + offset_y),
        None,
    );
    target.draw_pixmap(
        0,
        0,
        layer.as_ref(),
        &paint,
        Transform::from_translate(bounds.x, bounds.y),
        None,
    );
    Ok(())
}
