//! Greedy word wrapping, centred line layout and outline glyph drawing

use crate::io::error::{PatternError, Result};
use crate::math::color::Rgba;
use crate::raster::shapes::solid_paint;
use skrifa::charmap::Charmap;
use skrifa::instance::{LocationRef, Size as FontSize};
use skrifa::metrics::GlyphMetrics;
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::{FontRef, MetadataProvider, OutlineGlyphCollection};
use tiny_skia::{FillRule, PathBuilder, Pixmap, Transform};

/// Source of per-character advances used to measure lines
pub trait TextMeasure {
    /// Horizontal advance of `ch` in pixels
    fn advance(&self, ch: char) -> f32;
}

/// Width of a line: sum of advances plus spacing between neighbouring characters
pub fn line_width(line: &str, measure: &impl TextMeasure, spacing: f32) -> f32 {
    let (total, count) = line.chars().fold((0.0, 0usize), |(total, count), ch| {
        (total + measure.advance(ch), count + 1)
    });
    if count == 0 {
        0.0
    } else {
        ((count - 1) as f32).mul_add(spacing, total)
    }
}

/// Split `text` into lines no wider than `max_width`
///
/// Words are separated on whitespace and joined by single spaces. The first
/// word of a line is always accepted, so a single overlong word overflows
/// rather than looping.
pub fn wrap_lines(
    text: &str,
    max_width: f32,
    measure: &impl TextMeasure,
    spacing: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{current} {word}");
        if line_width(&candidate, measure, spacing) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// A single character positioned for drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph {
    /// Character to draw
    pub ch: char,
    /// Left edge
    pub x: f32,
    /// Vertical middle of its line
    pub y: f32,
}

/// One laid-out line of text
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    /// Line content
    pub text: String,
    /// Left edge of the first glyph
    pub left: f32,
    /// Vertical middle of the line
    pub middle: f32,
    /// Measured width
    pub width: f32,
    /// Characters advanced by their width plus the letter spacing
    pub glyphs: Vec<PlacedGlyph>,
}

/// Stack lines around `anchor_y`, each centred on `center_x`
///
/// The first line sits at `anchor_y - n * line_height / 2 + line_height / 2`
/// and each following line one `line_height` lower.
pub fn layout_lines(
    lines: &[String],
    measure: &impl TextMeasure,
    (center_x, anchor_y): (f32, f32),
    line_height: f32,
    spacing: f32,
) -> Vec<PlacedLine> {
    let count = lines.len() as f32;
    let first = (-count * line_height).mul_add(0.5, anchor_y) + line_height / 2.0;

    lines
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let width = line_width(text, measure, spacing);
            let left = center_x - width / 2.0;
            let middle = (i as f32).mul_add(line_height, first);

            let mut x = left;
            let glyphs = text
                .chars()
                .map(|ch| {
                    let glyph = PlacedGlyph { ch, x, y: middle };
                    x += measure.advance(ch) + spacing;
                    glyph
                })
                .collect();

            PlacedLine {
                text: text.clone(),
                left,
                middle,
                width,
                glyphs,
            }
        })
        .collect()
}

/// A parsed font at a fixed pixel size
pub struct FontFace<'a> {
    size: FontSize,
    charmap: Charmap<'a>,
    glyph_metrics: GlyphMetrics<'a>,
    outlines: OutlineGlyphCollection<'a>,
    ascent: f32,
    descent: f32,
}

impl<'a> FontFace<'a> {
    /// Parse `data` and scale it to `pixel_size`
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Font`] if the data is not a readable font
    pub fn new(data: &'a [u8], pixel_size: f32) -> Result<Self> {
        let font = FontRef::new(data).map_err(|e| PatternError::Font {
            reason: e.to_string(),
        })?;
        let size = FontSize::new(pixel_size);
        let metrics = font.metrics(size, LocationRef::default());

        Ok(Self {
            size,
            charmap: font.charmap(),
            glyph_metrics: font.glyph_metrics(size, LocationRef::default()),
            outlines: font.outline_glyphs(),
            ascent: metrics.ascent,
            descent: metrics.descent,
        })
    }

    /// Offset from a line's vertical middle down to its baseline
    pub fn middle_to_baseline(&self) -> f32 {
        (self.ascent + self.descent) / 2.0
    }

    /// Fill every glyph in `color`
    pub fn draw(&self, pixmap: &mut Pixmap, glyphs: &[PlacedGlyph], color: Rgba) {
        let mut pen = GlyphPen {
            builder: PathBuilder::new(),
            origin_x: 0.0,
            baseline: 0.0,
        };
        let baseline_offset = self.middle_to_baseline();

        for glyph in glyphs {
            let id = self.charmap.map(glyph.ch).unwrap_or_default();
            let Some(outline) = self.outlines.get(id) else {
                continue;
            };
            pen.origin_x = glyph.x;
            pen.baseline = glyph.y + baseline_offset;
            let settings = DrawSettings::unhinted(self.size, LocationRef::default());
            if let Err(error) = outline.draw(settings, &mut pen) {
                log::debug!("Skipping glyph {:?}: {error}", glyph.ch);
            }
        }

        if let Some(path) = pen.builder.finish() {
            pixmap.fill_path(
                &path,
                &solid_paint(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }
}

impl TextMeasure for FontFace<'_> {
    fn advance(&self, ch: char) -> f32 {
        let id = self.charmap.map(ch).unwrap_or_default();
        self.glyph_metrics.advance_width(id).unwrap_or_default()
    }
}

/// Outline sink translating font units (y up) into surface coordinates
struct GlyphPen {
    builder: PathBuilder,
    origin_x: f32,
    baseline: f32,
}

impl OutlinePen for GlyphPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(self.origin_x + x, self.baseline - y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.origin_x + x, self.baseline - y);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.builder.quad_to(
            self.origin_x + cx0,
            self.baseline - cy0,
            self.origin_x + x,
            self.baseline - y,
        );
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            self.origin_x + cx0,
            self.baseline - cy0,
            self.origin_x + cx1,
            self.baseline - cy1,
            self.origin_x + x,
            self.baseline - y,
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
