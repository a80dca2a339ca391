//! Tests for palette colour parsing, formatting and alpha replacement

#[cfg(test)]
mod tests {
    use patterngen::PatternError;
    use patterngen::math::color::Rgba;

    // Tests six-digit hex parsing is case-insensitive
    // Verified by parsing channels in the wrong order
    #[test]
    fn test_parse_long_hex() {
        let color: Rgba = "#ED5F93".parse().unwrap_or(Rgba::BLACK);
        assert_eq!(color, Rgba::opaque(0xed, 0x5f, 0x93));
        let lower: Rgba = "#ed5f93".parse().unwrap_or(Rgba::BLACK);
        assert_eq!(color, lower);
    }

    // Tests three-digit hex expands each nibble
    // Verified by multiplying nibbles by 16 instead of 17
    #[test]
    fn test_parse_short_hex() {
        let color: Rgba = "#fa0".parse().unwrap_or(Rgba::BLACK);
        assert_eq!(color, Rgba::opaque(0xff, 0xaa, 0x00));
    }

    // Tests functional notations with and without alpha
    // Verified by ignoring the alpha component of rgba()
    #[test]
    fn test_parse_functional() {
        let rgb: Rgba = "rgb(229, 223, 214)".parse().unwrap_or(Rgba::BLACK);
        assert_eq!(rgb, Rgba::opaque(229, 223, 214));

        let rgba: Rgba = "rgba(10,10,10,0.36)".parse().unwrap_or(Rgba::BLACK);
        assert_eq!(rgba.channels(), [10, 10, 10]);
        assert!((rgba.alpha - 0.36).abs() < f32::EPSILON);
    }

    // Tests malformed strings are rejected with the original value
    // Verified by defaulting unknown strings to black
    #[test]
    fn test_reject_invalid() {
        for input in ["", "red", "#12", "#12345g", "rgb(1,2)", "rgb(256,0,0)", "rgba(1,2,3,1.5)"] {
            match input.parse::<Rgba>() {
                Err(PatternError::InvalidColor { value }) => assert_eq!(value, input),
                other => panic!("expected InvalidColor for {input:?}, got {other:?}"),
            }
        }
    }

    // Tests applying an alpha replaces any existing alpha
    // Verified by multiplying the alphas together
    #[test]
    fn test_with_alpha_overwrites() {
        let color = Rgba::new(1, 2, 3, 0.5).with_alpha(0.8);
        assert!((color.alpha - 0.8).abs() < f32::EPSILON);
        assert_eq!(color.channels(), [1, 2, 3]);
    }

    // Tests hex output and display of opaque and translucent colours
    // Verified by printing uppercase hex digits
    #[test]
    fn test_formatting() {
        assert_eq!(Rgba::opaque(0xe5, 0xdf, 0xd6).to_hex(), "#e5dfd6");
        assert_eq!(Rgba::opaque(0, 0, 0).to_string(), "#000000");
        assert_eq!(Rgba::new(1, 2, 3, 0.5).to_string(), "rgba(1, 2, 3, 0.5)");
    }

    // Tests conversion to a raster colour rounds the alpha to a byte
    // Verified by truncating instead of rounding
    #[test]
    fn test_to_skia_alpha() {
        let color = Rgba::new(255, 0, 0, 0.45).to_skia().to_color_u8();
        assert_eq!(color.alpha(), 115);
        assert_eq!(color.red(), 255);
    }
}
