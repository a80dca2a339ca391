//! Overlay compositing on cropped backgrounds
//!
//! The panel is drawn first, then the decorations of the layout: a row of
//! covers for 1200x628, text or a cover grid for 1080x1080.

use crate::io::configuration::{
    PANEL_TINT, TEXT_HORIZONTAL_INSET, TEXT_LETTER_SPACING, TRANSPARENT_PANEL_ALPHA,
    TRANSPARENT_PANEL_CONTRAST_BASE,
};
use crate::io::error::Result;
use crate::io::image::SourceImage;
use crate::io::request::{DecorationVariant, FontData, OverlayStyle, RenderOptions};
use crate::math::color::Rgba;
use crate::math::contrast::best_text_color;
use crate::math::random::SeededRandomStream;
use crate::raster::cover::draw_cover;
use crate::raster::shapes::{Bounds, draw_panel};
use crate::raster::text::{FontFace, PlacedLine, TextMeasure, layout_lines, wrap_lines};
use crate::raster::tint::to_pixmap;
use crate::spatial::layout::{LayoutKind, grid_placements, row_placements};
use tiny_skia::Pixmap;

/// A cover ready for drawing
#[derive(Debug, Clone)]
pub struct CoverArt {
    pixmap: Pixmap,
    aspect_ratio: f32,
}

impl CoverArt {
    /// Premultiply a decoded cover
    ///
    /// # Errors
    ///
    /// Returns [`crate::PatternError::Surface`] for empty images
    pub fn new(image: &SourceImage) -> Result<Self> {
        Ok(Self {
            pixmap: to_pixmap(image.pixels())?,
            aspect_ratio: image.aspect_ratio(),
        })
    }

    /// Width divided by height
    pub const fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }
}

/// Pick the solid panel colour shared by every size of a batch
///
/// Candidates are the object colours followed by the background; the index
/// comes from the first draw of a fresh stream seeded with `seed`.
pub fn pick_overlay_color(seed: f64, objects: &[Rgba], background: Rgba) -> Rgba {
    let candidates: Vec<Rgba> = objects.iter().copied().chain([background]).collect();
    let index = SeededRandomStream::new(seed).next_index(candidates.len());
    candidates.get(index).copied().unwrap_or(background)
}

/// Draws panels and decorations for one batch
pub struct OverlayCompositor<'a> {
    options: &'a RenderOptions,
    overlay_color: Rgba,
    object_colors: &'a [Rgba],
    covers: &'a [CoverArt],
    font: Option<&'a FontData>,
}

impl<'a> OverlayCompositor<'a> {
    /// Compositor sharing one overlay colour across every size
    pub const fn new(
        options: &'a RenderOptions,
        overlay_color: Rgba,
        object_colors: &'a [Rgba],
        covers: &'a [CoverArt],
        font: Option<&'a FontData>,
    ) -> Self {
        Self {
            options,
            overlay_color,
            object_colors,
            covers,
            font,
        }
    }

    /// Panel fill for the configured style, `None` when no panel is drawn
    pub fn panel_fill(&self) -> Option<Rgba> {
        match self.options.overlay_style {
            OverlayStyle::None => None,
            OverlayStyle::Transparent => {
                let [red, green, blue] = PANEL_TINT;
                Some(Rgba::new(red, green, blue, TRANSPARENT_PANEL_ALPHA))
            }
            OverlayStyle::Solid => Some(self.overlay_color.with_alpha(self.options.overlay_alpha)),
        }
    }

    /// Opaque colour the text is measured against
    pub fn contrast_base(&self) -> Rgba {
        match self.options.overlay_style {
            OverlayStyle::Solid => self.overlay_color.with_alpha(1.0),
            OverlayStyle::None | OverlayStyle::Transparent => TRANSPARENT_PANEL_CONTRAST_BASE
                .parse()
                .unwrap_or(self.overlay_color),
        }
    }

    /// Text colour with the best contrast against the panel
    pub fn text_color(&self) -> Rgba {
        best_text_color(self.contrast_base(), self.object_colors)
    }

    /// Decorate `surface` for `kind`
    ///
    /// `variant` selects the grid decoration and is ignored by other layouts.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PatternError::Surface`] if a cover layer cannot be allocated
    pub fn compose(
        &self,
        surface: &mut Pixmap,
        kind: LayoutKind,
        variant: DecorationVariant,
    ) -> Result<()> {
        let Some(panel) = kind.panel_bounds(surface.width(), surface.height()) else {
            return Ok(());
        };

        if let Some(fill) = self.panel_fill() {
            draw_panel(surface, panel, fill);
        }

        match kind {
            LayoutKind::Plain => Ok(()),
            LayoutKind::RowPanel => self.draw_row(surface),
            LayoutKind::GridPanel if self.options.overlay_style == OverlayStyle::None => Ok(()),
            LayoutKind::GridPanel => match variant {
                DecorationVariant::Text => {
                    self.draw_text(surface, panel);
                    Ok(())
                }
                DecorationVariant::Covers => self.draw_grid(surface, panel),
            },
        }
    }

    fn draw_row(&self, surface: &mut Pixmap) -> Result<()> {
        let aspects: Vec<f32> = self.covers.iter().map(CoverArt::aspect_ratio).collect();
        let placements = row_placements(
            &aspects,
            surface.width() as f32,
            surface.height() as f32,
        );
        for (cover, bounds) in self.covers.iter().zip(placements) {
            draw_cover(surface, &cover.pixmap, bounds)?;
        }
        Ok(())
    }

    fn draw_grid(&self, surface: &mut Pixmap, panel: Bounds) -> Result<()> {
        let aspects: Vec<f32> = self.covers.iter().map(CoverArt::aspect_ratio).collect();
        for (cover, bounds) in self.covers.iter().zip(grid_placements(&aspects, panel)) {
            draw_cover(surface, &cover.pixmap, bounds)?;
        }
        Ok(())
    }

    /// Overlay text wrapped to the panel width less the text inset, centred on `panel`
    pub fn text_lines(&self, panel: Bounds, measure: &impl TextMeasure) -> Vec<PlacedLine> {
        let max_width = panel.width - TEXT_HORIZONTAL_INSET;
        let lines = wrap_lines(
            self.options.text.trim(),
            max_width,
            measure,
            TEXT_LETTER_SPACING,
        );
        layout_lines(
            &lines,
            measure,
            (panel.center_x(), panel.center_y()),
            self.options.line_height,
            TEXT_LETTER_SPACING,
        )
    }

    fn draw_text(&self, surface: &mut Pixmap, panel: Bounds) {
        if self.options.text.trim().is_empty() {
            return;
        }
        let Some(data) = self.font else {
            log::warn!("No font supplied, skipping overlay text");
            return;
        };
        let face = match FontFace::new(data.as_ref(), self.options.font_size) {
            Ok(face) => face,
            Err(error) => {
                log::warn!("Skipping overlay text: {error}");
                return;
            }
        };

        let glyphs: Vec<_> = self
            .text_lines(panel, &face)
            .into_iter()
            .flat_map(|line| line.glyphs)
            .collect();
        face.draw(surface, &glyphs, self.text_color());
    }
}
