//! Rounded rectangles and the overlay panel

use crate::io::configuration::{PANEL_CORNER_RADIUS, PANEL_STROKE_WIDTH, PANEL_TINT};
use crate::math::color::Rgba;
use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform};

/// Cubic approximation constant for a quarter circle
const KAPPA: f32 = 0.552_284_8;

/// Axis-aligned rectangle in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Bounds {
    /// Create bounds
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounds shrunk by `margin` on every side
    #[must_use]
    pub fn inset(&self, margin: f32) -> Self {
        Self::new(
            self.x + margin,
            self.y + margin,
            (self.width - 2.0 * margin).max(0.0),
            (self.height - 2.0 * margin).max(0.0),
        )
    }

    /// Horizontal centre
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Vertical centre
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Convert to a drawable rectangle, `None` when empty
    pub fn to_rect(&self) -> Option<Rect> {
        Rect::from_xywh(self.x, self.y, self.width, self.height)
    }
}

/// Rounded rectangle outline; the radius is clamped to half the shorter side
///
/// Returns `None` for empty bounds.
pub fn rounded_rect(bounds: Bounds, radius: f32) -> Option<Path> {
    let Bounds {
        x,
        y,
        width,
        height,
    } = bounds;
    if width <= 0.0 || height <= 0.0 {
        return None;
    }

    let r = radius.clamp(0.0, width.min(height) / 2.0);
    if r <= 0.0 {
        return bounds.to_rect().map(PathBuilder::from_rect);
    }
    let k = r * KAPPA;
    let (right, bottom) = (x + width, y + height);

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(right - r, y);
    pb.cubic_to(right - r + k, y, right, y + r - k, right, y + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
    pb.line_to(x + r, bottom);
    pb.cubic_to(x + r - k, bottom, x, bottom - r + k, x, bottom - r);
    pb.line_to(x, y + r);
    pb.cubic_to(x, y + r - k, x + r - k, y, x + r, y);
    pb.close();
    pb.finish()
}

/// Solid anti-aliased paint for `color`
pub fn solid_paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    paint
}

/// Colour of every panel outline
pub const fn panel_outline() -> Rgba {
    let [red, green, blue] = PANEL_TINT;
    Rgba::opaque(red, green, blue)
}

/// Fill a rounded panel with `fill` and outline it
///
/// Empty bounds draw nothing.
pub fn draw_panel(pixmap: &mut Pixmap, bounds: Bounds, fill: Rgba) {
    let Some(path) = rounded_rect(bounds, PANEL_CORNER_RADIUS) else {
        log::debug!("Skipping empty panel {bounds:?}");
        return;
    };

    pixmap.fill_path(
        &path,
        &solid_paint(fill),
        FillRule::Winding,
        Transform::identity(),
        None,
    );

    let stroke = Stroke {
        width: PANEL_STROKE_WIDTH,
        ..Stroke::default()
    };
    pixmap.stroke_path(
        &path,
        &solid_paint(panel_outline()),
        &stroke,
        Transform::identity(),
        None,
    );
}
