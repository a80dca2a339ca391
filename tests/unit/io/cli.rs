//! Tests for argument parsing, request assembly and output writing

#[cfg(test)]
mod tests {
    use clap::Parser;
    use patterngen::PatternError;
    use patterngen::io::cli::{Cli, FileProcessor};
    use patterngen::io::image::encode_png;
    use patterngen::io::request::{CoverVariant, OverlayStyle};
    use std::path::Path;

    fn write_motif(dir: &Path) -> String {
        let path = dir.join("motif.png");
        let motif = image::RgbaImage::from_pixel(16, 16, image::Rgba([255, 255, 255, 255]));
        std::fs::write(&path, encode_png(&motif, "motif").expect("encode")).expect("write");
        path.display().to_string()
    }

    // Tests defaults: preset sizes, first genre palette, transparent overlay
    // Verified by defaulting to an empty size list
    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["patterngen", "motif.png"]).expect("parse");
        assert_eq!(cli.overlay_style, OverlayStyle::Transparent);
        assert_eq!(cli.variant, CoverVariant::Text);
        assert!(cli.should_show_progress());

        let request = cli.request().expect("request");
        assert_eq!(request.target_sizes.len(), 5);
        assert_eq!(request.palette.colors().first().map(String::as_str), Some("#ED5F93"));
        assert!(request.has_external_sources());
    }

    // Tests explicit options flow into the request
    // Verified by ignoring the seed flag
    #[test]
    fn test_explicit_options() {
        let cli = Cli::try_parse_from([
            "patterngen",
            "a.png",
            "b.png",
            "--palette",
            "#112233,#445566",
            "--size",
            "1080x1080",
            "--size",
            "300x200",
            "--seed",
            "0.5",
            "--overlay-style",
            "solid",
            "--variant",
            "both",
            "--blur",
            "2",
            "--quiet",
        ])
        .expect("parse");

        let request = cli.request().expect("request");
        assert_eq!(request.images.len(), 2);
        assert_eq!(request.palette.colors(), ["#112233", "#445566"]);
        assert_eq!(request.target_sizes.len(), 2);
        assert!((request.seed - 0.5).abs() < f64::EPSILON);
        assert_eq!(request.options.overlay_style, OverlayStyle::Solid);
        assert_eq!(request.options.cover_variant, CoverVariant::Both);
        assert!((request.options.blur_amount - 2.0).abs() < f32::EPSILON);
        assert!(!cli.should_show_progress());
    }

    // Tests genre palettes are looked up and unknown genres rejected
    // Verified by falling back to the first genre for unknown names
    #[test]
    fn test_genre() {
        let cli = Cli::try_parse_from(["patterngen", "m.png", "--genre", "nonfiction"])
            .expect("parse");
        let palette = cli.palette().expect("palette");
        assert_eq!(palette.colors().first().map(String::as_str), Some("#C8EC64"));

        let unknown = Cli::try_parse_from(["patterngen", "m.png", "--genre", "poetry"])
            .expect("parse");
        assert!(matches!(
            unknown.palette(),
            Err(PatternError::InvalidParameter { .. })
        ));
    }

    // Tests malformed sizes and missing images are parse errors
    // Verified by making the image list optional
    #[test]
    fn test_parse_errors() {
        assert!(Cli::try_parse_from(["patterngen"]).is_err());
        assert!(Cli::try_parse_from(["patterngen", "m.png", "--size", "big"]).is_err());
        assert!(
            Cli::try_parse_from(["patterngen", "m.png", "--palette", "#fff", "--genre", "Romance"])
                .is_err()
        );
    }

    // Tests a missing font file fails request assembly
    // Verified by ignoring unreadable fonts
    #[test]
    fn test_missing_font() {
        let cli = Cli::try_parse_from(["patterngen", "m.png", "--font", "/nonexistent/font.ttf"])
            .expect("parse");
        assert!(matches!(cli.request(), Err(PatternError::FileSystem { .. })));
    }

    // Tests the processor writes one PNG per output key
    // Verified by writing outputs before rendering finishes
    #[tokio::test]
    async fn test_process_writes_outputs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let motif = write_motif(dir.path());
        let output = dir.path().join("out");

        let cli = Cli::try_parse_from([
            "patterngen",
            motif.as_str(),
            "--size",
            "320x200",
            "--size",
            "64x64",
            "--seed",
            "0.5",
            "--output",
            output.to_str().expect("utf-8 path"),
            "--quiet",
        ])
        .expect("parse");

        let written = FileProcessor::new(cli).process().await.expect("process");
        assert_eq!(written.len(), 2);
        assert!(output.join("320x200.png").exists());
        assert!(output.join("64x64.png").exists());
    }

    // Tests the background path writes the same files
    // Verified by skipping materialisation before dispatch
    #[tokio::test]
    async fn test_process_in_background() {
        let dir = tempfile::tempdir().expect("tempdir");
        let motif = write_motif(dir.path());
        let output = dir.path().join("out");

        let cli = Cli::try_parse_from([
            "patterngen",
            motif.as_str(),
            "--size",
            "100x50",
            "--seed",
            "0.25",
            "--background",
            "--output",
            output.to_str().expect("utf-8 path"),
            "--quiet",
        ])
        .expect("parse");

        let written = FileProcessor::new(cli).process().await.expect("process");
        assert_eq!(written, vec![output.join("100x50.png")]);
    }
}
