//! Mapping the square master surface onto each target size

use crate::io::configuration::MASTER_SIZE;
use crate::io::error::Result;
use crate::raster::tint::new_surface;
use tiny_skia::{BlendMode, FilterQuality, Pixmap, PixmapPaint, Transform};

/// How a target size is cut from the master surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CropPlan {
    /// Copy the centred `width x height` region starting at the source offset
    Crop {
        /// Left edge in master coordinates
        source_x: f32,
        /// Top edge in master coordinates
        source_y: f32,
    },
    /// Scale the whole master up so it covers the target, centred
    Cover {
        /// Uniform scale factor applied to the master
        scale: f32,
        /// Horizontal placement of the scaled master, zero or negative
        offset_x: f32,
        /// Vertical placement of the scaled master, zero or negative
        offset_y: f32,
    },
}

impl CropPlan {
    /// Plan for a `width x height` output
    ///
    /// Targets that fit inside the master are centre-cropped; larger ones use
    /// a cover scale of `max(width, height) / master`.
    pub fn for_dimensions(width: u32, height: u32) -> Self {
        let master = MASTER_SIZE as f32;
        let (w, h) = (width as f32, height as f32);

        if width > MASTER_SIZE || height > MASTER_SIZE {
            let scale = (w / master).max(h / master);
            let scaled = master * scale;
            Self::Cover {
                scale,
                offset_x: (w - scaled) / 2.0,
                offset_y: (h - scaled) / 2.0,
            }
        } else {
            Self::Crop {
                source_x: ((master - w) / 2.0).max(0.0),
                source_y: ((master - h) / 2.0).max(0.0),
            }
        }
    }

    /// Transform from master coordinates into output coordinates
    pub fn transform(&self) -> Transform {
        match *self {
            Self::Crop { source_x, source_y } => Transform::from_translate(-source_x, -source_y),
            Self::Cover {
                scale,
                offset_x,
                offset_y,
            } => Transform::from_row(scale, 0.0, 0.0, scale, offset_x, offset_y),
        }
    }

    /// Whether every output pixel maps onto exactly one master pixel
    pub fn is_pixel_aligned(&self) -> bool {
        match *self {
            Self::Crop { source_x, source_y } => {
                source_x.fract() == 0.0 && source_y.fract() == 0.0
            }
            Self::Cover { .. } => false,
        }
    }
}

/// Produce the `width x height` background from the master surface
///
/// # Errors
///
/// Returns [`crate::PatternError::Surface`] if the output cannot be allocated
pub fn crop(master: &Pixmap, width: u32, height: u32) -> Result<Pixmap> {
    let plan = CropPlan::for_dimensions(width, height);
    let mut output = new_surface(width, height)?;

    let paint = PixmapPaint {
        opacity: 1.0,
        blend_mode: BlendMode::Source,
        quality: if plan.is_pixel_aligned() {
            FilterQuality::Nearest
        } else {
            FilterQuality::Bilinear
        },
    };
    output.draw_pixmap(0, 0, master.as_ref(), &paint, plan.transform(), None);

    log::debug!("Cropped {width}x{height} from master with {plan:?}");
    Ok(output)
}
