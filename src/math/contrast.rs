//! WCAG-style luminance and contrast selection for readable text

use crate::math::color::Rgba;

/// Minimum contrast ratio for normal-size text (WCAG AA)
pub const MIN_TEXT_CONTRAST: f64 = 4.5;

/// Relative luminance of an sRGB colour with gamma linearisation
pub fn relative_luminance(color: Rgba) -> f64 {
    let linear = color.channels().map(|channel| {
        let v = f64::from(channel) / 255.0;
        if v <= 0.039_28 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    });
    let [r, g, b] = linear;
    0.0722_f64.mul_add(b, 0.2126_f64.mul_add(r, 0.7152 * g))
}

/// Contrast ratio between two luminances, always `>= 1`
pub fn contrast_ratio(first: f64, second: f64) -> f64 {
    let lighter = first.max(second);
    let darker = first.min(second);
    (lighter + 0.05) / (darker + 0.05)
}

/// Contrast ratio between two colours
pub fn color_contrast(first: Rgba, second: Rgba) -> f64 {
    contrast_ratio(relative_luminance(first), relative_luminance(second))
}

/// Pick a text colour readable on `background`
///
/// Candidates are black, white and `palette`. The highest-contrast candidate
/// reaching [`MIN_TEXT_CONTRAST`] wins; if none does, whichever of black or
/// white contrasts more is returned so there is always an answer.
pub fn best_text_color(background: Rgba, palette: &[Rgba]) -> Rgba {
    let background_luminance = relative_luminance(background);
    let ratio_against = |color: Rgba| contrast_ratio(relative_luminance(color), background_luminance);

    let best_qualifying = [Rgba::BLACK, Rgba::WHITE]
        .iter()
        .chain(palette)
        .map(|&color| (color, ratio_against(color)))
        .filter(|&(_, ratio)| ratio >= MIN_TEXT_CONTRAST)
        .fold(None, |best: Option<(Rgba, f64)>, candidate| match best {
            Some((_, best_ratio)) if best_ratio >= candidate.1 => best,
            _ => Some(candidate),
        });

    best_qualifying.map_or_else(
        || {
            if ratio_against(Rgba::BLACK) >= ratio_against(Rgba::WHITE) {
                Rgba::BLACK
            } else {
                Rgba::WHITE
            }
        },
        |(color, _)| color,
    )
}

/// Overlay and text colours chosen together from a palette
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorCombo {
    /// Panel colour with the strongest contrast against the background
    pub overlay: Rgba,
    /// Palette colour readable on the overlay, or black/white as a fallback
    pub text: Rgba,
}

/// Choose an overlay colour contrasting with `background` and a text colour for it
///
/// The overlay is the palette colour (other than the background) with the
/// highest contrast against the background. The text colour is the palette
/// colour with the highest contrast of at least [`MIN_TEXT_CONTRAST`] against
/// the overlay, falling back to black on light overlays and white on dark ones.
pub fn find_best_color_combo(palette: &[Rgba], background: Rgba) -> ColorCombo {
    let background_luminance = relative_luminance(background);

    let mut candidates: Vec<Rgba> = palette
        .iter()
        .copied()
        .filter(|color| color.to_hex() != background.to_hex())
        .collect();
    if candidates.is_empty() {
        candidates.push(palette.first().copied().unwrap_or(Rgba::opaque(0xcc, 0xcc, 0xcc)));
    }

    let overlay = candidates
        .iter()
        .copied()
        .fold(None, |best: Option<(Rgba, f64)>, color| {
            let ratio = contrast_ratio(relative_luminance(color), background_luminance);
            match best {
                Some((_, best_ratio)) if best_ratio >= ratio => best,
                _ => Some((color, ratio)),
            }
        })
        .map_or(Rgba::WHITE, |(color, _)| color);

    let overlay_luminance = relative_luminance(overlay);
    let text = palette
        .iter()
        .copied()
        .map(|color| {
            (
                color,
                contrast_ratio(relative_luminance(color), overlay_luminance),
            )
        })
        .filter(|&(_, ratio)| ratio >= MIN_TEXT_CONTRAST)
        .fold(None, |best: Option<(Rgba, f64)>, candidate| match best {
            Some((_, best_ratio)) if best_ratio >= candidate.1 => best,
            _ => Some(candidate),
        })
        .map_or_else(
            || {
                if overlay_luminance > 0.5 {
                    Rgba::BLACK
                } else {
                    Rgba::WHITE
                }
            },
            |(color, _)| color,
        );

    ColorCombo { overlay, text }
}
