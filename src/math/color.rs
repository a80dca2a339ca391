//! Colour values parsed from palette strings
//!
//! Palettes arrive as CSS-style strings (`#rgb`, `#rrggbb`, `rgb(..)`, `rgba(..)`).
//! Parsing is strict about channel ranges so a typo surfaces as an error
//! instead of a silently wrong colour.

use crate::io::error::PatternError;
use std::fmt;
use std::str::FromStr;

/// An sRGB colour with straight (non-premultiplied) alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red channel
    pub red: u8,
    /// Green channel
    pub green: u8,
    /// Blue channel
    pub blue: u8,
    /// Opacity in `[0, 1]`
    pub alpha: f32,
}

impl Rgba {
    /// Opaque black
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    /// Opaque white
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    /// Fully opaque colour from its channels
    pub const fn opaque(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    /// Colour from channels and an explicit opacity
    pub const fn new(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Same colour with its opacity replaced
    ///
    /// Mirrors applying an alpha to any palette colour format: an existing
    /// alpha is overwritten rather than multiplied.
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Channels as an `[r, g, b]` array
    pub const fn channels(&self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    /// Convert to a raster paint colour
    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(
            self.red,
            self.green,
            self.blue,
            (self.alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        )
    }

    /// Lowercase `#rrggbb` form, ignoring opacity
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if (self.alpha - 1.0).abs() < f32::EPSILON {
            write!(f, "{}", self.to_hex())
        } else {
            write!(
                f,
                "rgba({}, {}, {}, {})",
                self.red, self.green, self.blue, self.alpha
            )
        }
    }
}

impl FromStr for Rgba {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || PatternError::InvalidColor {
            value: s.to_string(),
        };

        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }

        let lower = trimmed.to_ascii_lowercase();
        if let Some(body) = lower
            .strip_prefix("rgba(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(body, true).ok_or_else(invalid);
        }
        if let Some(body) = lower
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(body, false).ok_or_else(invalid);
        }

        Err(invalid())
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let mut digits = hex.chars().filter_map(|c| c.to_digit(16));
            let mut expand = || digits.next().map(|d| (d * 17) as u8);
            Some(Rgba::opaque(expand()?, expand()?, expand()?))
        }
        6 => {
            let channel = |range: std::ops::Range<usize>| {
                hex.get(range).and_then(|h| u8::from_str_radix(h, 16).ok())
            };
            Some(Rgba::opaque(channel(0..2)?, channel(2..4)?, channel(4..6)?))
        }
        _ => None,
    }
}

fn parse_functional(body: &str, with_alpha: bool) -> Option<Rgba> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }

    let channel = |index: usize| parts.get(index).and_then(|p| p.parse::<u8>().ok());
    let red = channel(0)?;
    let green = channel(1)?;
    let blue = channel(2)?;

    let alpha = if with_alpha {
        let value = parts.get(3)?.parse::<f32>().ok()?;
        if !(0.0..=1.0).contains(&value) {
            return None;
        }
        value
    } else {
        1.0
    };

    Some(Rgba::new(red, green, blue, alpha))
}
