//! Tests for rendering constants, size presets and genre palettes

#[cfg(test)]
mod tests {
    use patterngen::io::configuration::{
        GENRE_PALETTES, MAX_SCATTER_OBJECTS, MIN_SCATTER_OBJECTS, OVERLAY_ALPHA_RANGE,
        SIZE_PRESETS, genre_palette,
    };
    use patterngen::math::color::Rgba;

    // Tests the object count spans 3 to 120 inclusive
    // Verified by setting the span to 117
    #[test]
    fn test_object_count_bounds() {
        assert_eq!(MIN_SCATTER_OBJECTS, 3);
        assert_eq!(MAX_SCATTER_OBJECTS, 120);
    }

    // Tests the five presets include both decorated layouts
    // Verified by removing the Email preset
    #[test]
    fn test_presets() {
        assert_eq!(SIZE_PRESETS.len(), 5);
        assert!(SIZE_PRESETS.iter().any(|&(_, w, h)| (w, h) == (1200, 628)));
        assert!(SIZE_PRESETS.iter().any(|&(_, w, h)| (w, h) == (1080, 1080)));
    }

    // Tests every genre colour parses and every genre has a background plus objects
    // Verified by introducing a typo in one palette entry
    #[test]
    fn test_genre_palettes_parse() {
        for (genre, colors) in GENRE_PALETTES {
            assert!(colors.len() >= 2, "{genre} has too few colours");
            for color in colors {
                assert!(color.parse::<Rgba>().is_ok(), "{genre}: {color}");
            }
        }
    }

    // Tests genre lookup ignores case and rejects unknown names
    // Verified by comparing names case-sensitively
    #[test]
    fn test_genre_lookup() {
        let romance = genre_palette("romance").expect("romance palette");
        assert_eq!(romance.first(), Some(&"#ED5F93"));
        assert!(genre_palette("SCI-FI & FANTASY").is_some());
        assert!(genre_palette("Cookbooks").is_none());
    }

    // Tests the overlay alpha range matches the accepted option bounds
    // Verified by widening the lower bound to zero
    #[test]
    fn test_overlay_alpha_range() {
        assert!((OVERLAY_ALPHA_RANGE.0 - 0.1).abs() < f32::EPSILON);
        assert!((OVERLAY_ALPHA_RANGE.1 - 1.0).abs() < f32::EPSILON);
    }
}
