//! Seeded motif scatter on the square master surface
//!
//! Placement is split from drawing: [`plan_scatter`] consumes the random
//! stream and yields a pure [`ScatterPlan`], which [`render_master`] paints.

use crate::algorithm::cache::MemoCache;
use crate::io::configuration::{
    MASTER_SIZE, MAX_SCATTER_OBJECTS, MIN_OBJECT_SCALE, MIN_SCATTER_OBJECTS, OBJECT_SCALE_SPAN,
    SCATTER_OBJECT_SPAN,
};
use crate::io::error::{PatternError, Result};
use crate::io::image::SourceImage;
use crate::io::request::ResolvedPalette;
use crate::math::random::SeededRandomStream;
use crate::raster::tint::{new_surface, tint};
use std::f64::consts::TAU;
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

/// One motif placement on the master surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterObject {
    /// Index into the motif images
    pub image_index: usize,
    /// Index into the object colours
    pub color_index: usize,
    /// Edge length as a fraction of the master size
    pub scale: f64,
    /// Centre x in master pixels
    pub x: f64,
    /// Centre y in master pixels
    pub y: f64,
    /// Rotation about the centre in radians
    pub rotation: f64,
}

impl ScatterObject {
    /// Edge length of the drawn motif in master pixels
    pub fn edge(&self) -> f64 {
        f64::from(MASTER_SIZE) * self.scale
    }

    /// Transform mapping a `width x height` motif onto its placement
    fn transform(&self, width: u32, height: u32) -> Transform {
        let edge = self.edge() as f32;
        Transform::from_translate(self.x as f32, self.y as f32)
            .pre_rotate(self.rotation.to_degrees() as f32)
            .pre_translate(-edge / 2.0, -edge / 2.0)
            .pre_scale(edge / width as f32, edge / height as f32)
    }
}

/// Ordered placements drawn from one seeded stream
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPlan {
    /// Placements in draw order
    pub objects: Vec<ScatterObject>,
}

/// Draw the placements for `seed`
///
/// The count is drawn first, then per object: image, colour, scale, x, y and
/// rotation. With equal inputs the plan is identical on every call.
pub fn plan_scatter(seed: f64, image_count: usize, color_count: usize) -> ScatterPlan {
    let mut stream = SeededRandomStream::new(seed);
    let master = f64::from(MASTER_SIZE);

    let extra = (stream.next_value() * SCATTER_OBJECT_SPAN as f64).floor() as usize;
    let count = (MIN_SCATTER_OBJECTS + extra).min(MAX_SCATTER_OBJECTS);

    let objects = (0..count)
        .map(|_| ScatterObject {
            image_index: stream.next_index(image_count),
            color_index: stream.next_index(color_count),
            scale: stream.next_value().mul_add(OBJECT_SCALE_SPAN, MIN_OBJECT_SCALE),
            x: stream.next_value() * master,
            y: stream.next_value() * master,
            rotation: stream.next_value() * TAU,
        })
        .collect();

    ScatterPlan { objects }
}

/// Paint the master surface: background fill, then every placement in order
///
/// Tinted motifs are computed once per (image, colour) pair.
///
/// # Errors
///
/// Returns [`PatternError::Surface`] if the master surface cannot be allocated
/// or [`PatternError::EmptyInput`] when there are no images to place
pub fn render_master(
    plan: &ScatterPlan,
    images: &[SourceImage],
    palette: &ResolvedPalette,
) -> Result<Pixmap> {
    if images.is_empty() {
        return Err(PatternError::EmptyInput);
    }

    let mut master = new_surface(MASTER_SIZE, MASTER_SIZE)?;
    master.fill(palette.background.to_skia());

    let mut tinted = MemoCache::new();
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };

    for object in &plan.objects {
        let (Some(image), Some(&color)) = (
            images.get(object.image_index),
            palette.objects.get(object.color_index),
        ) else {
            continue;
        };

        let motif = tinted.get_or_try_compute((object.image_index, object.color_index), || {
            tint(image.pixels(), color)
        })?;
        master.draw_pixmap(
            0,
            0,
            motif.as_ref(),
            &paint,
            object.transform(motif.width(), motif.height()),
            None,
        );
    }

    log::debug!(
        "Rendered {} objects with {} tinted motifs",
        plan.objects.len(),
        tinted.len()
    );
    Ok(master)
}
