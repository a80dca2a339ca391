//! Tests for overlay colour choice, panel styles and per-layout decoration

#[cfg(test)]
mod tests {
    use patterngen::algorithm::compositor::{CoverArt, OverlayCompositor, pick_overlay_color};
    use patterngen::io::image::SourceImage;
    use patterngen::io::request::{
        CoverVariant, DecorationVariant, FontData, OverlayStyle, RenderOptions,
    };
    use patterngen::math::color::Rgba;
    use patterngen::math::contrast::{MIN_TEXT_CONTRAST, color_contrast};
    use patterngen::raster::text::TextMeasure;
    use patterngen::raster::tint::{new_surface, to_rgba_image};
    use patterngen::spatial::layout::LayoutKind;
    use tiny_skia::Pixmap;

    struct FixedMeasure;

    impl TextMeasure for FixedMeasure {
        fn advance(&self, _ch: char) -> f32 {
            10.0
        }
    }

    const RED: Rgba = Rgba::opaque(255, 0, 0);
    const BLUE: Rgba = Rgba::opaque(0, 0, 255);

    fn options(style: OverlayStyle) -> RenderOptions {
        RenderOptions {
            overlay_style: style,
            ..RenderOptions::default()
        }
    }

    fn black_surface(width: u32, height: u32) -> Pixmap {
        let mut surface = new_surface(width, height).expect("surface");
        surface.fill(Rgba::BLACK.to_skia());
        surface
    }

    fn green_covers(count: usize) -> Vec<CoverArt> {
        (0..count)
            .map(|_| CoverArt::new(&SourceImage::filled(100, 150, [0, 255, 0, 255])).expect("cover"))
            .collect()
    }

    // Tests the overlay colour comes from the first draw over objects then background
    // Verified by excluding the background from the candidates
    #[test]
    fn test_pick_overlay_color() {
        let background = Rgba::opaque(1, 2, 3);
        assert_eq!(pick_overlay_color(0.5, &[RED, BLUE], background), RED);
        assert_eq!(pick_overlay_color(0.25, &[RED, BLUE], background), background);
        assert_eq!(pick_overlay_color(0.5, &[], background), background);
    }

    // Tests the panel fill of each overlay style
    // Verified by ignoring the overlay alpha for solid panels
    #[test]
    fn test_panel_fill() {
        let none = options(OverlayStyle::None);
        let compositor = OverlayCompositor::new(&none, RED, &[], &[], None);
        assert_eq!(compositor.panel_fill(), None);

        let transparent = options(OverlayStyle::Transparent);
        let compositor = OverlayCompositor::new(&transparent, RED, &[], &[], None);
        assert_eq!(compositor.panel_fill(), Some(Rgba::new(229, 223, 214, 0.45)));

        let solid = RenderOptions {
            overlay_alpha: 0.6,
            ..options(OverlayStyle::Solid)
        };
        let compositor = OverlayCompositor::new(&solid, RED, &[], &[], None);
        assert_eq!(compositor.panel_fill(), Some(RED.with_alpha(0.6)));
    }

    // Tests text contrast is measured against the opaque panel colour
    // Verified by measuring against the translucent fill
    #[test]
    fn test_contrast_base_and_text_color() {
        let palette = [Rgba::opaque(0xff, 0xc6, 0x36), Rgba::opaque(0x23, 0x0f, 0x66)];

        let solid = options(OverlayStyle::Solid);
        let compositor = OverlayCompositor::new(&solid, palette[1], &palette, &[], None);
        assert_eq!(compositor.contrast_base(), palette[1]);
        let text = compositor.text_color();
        assert!(color_contrast(text, palette[1]) >= MIN_TEXT_CONTRAST);

        let transparent = options(OverlayStyle::Transparent);
        let compositor = OverlayCompositor::new(&transparent, palette[1], &palette, &[], None);
        assert_eq!(compositor.contrast_base(), Rgba::opaque(0xe5, 0xdf, 0xd6));
        assert!(color_contrast(compositor.text_color(), compositor.contrast_base()) >= MIN_TEXT_CONTRAST);
    }

    // Tests plain layouts are left untouched
    // Verified by drawing a panel for every layout
    #[test]
    fn test_plain_untouched() {
        let solid = options(OverlayStyle::Solid);
        let covers = green_covers(2);
        let compositor = OverlayCompositor::new(&solid, RED, &[], &covers, None);
        let mut surface = black_surface(200, 100);
        let before = surface.clone();

        compositor
            .compose(&mut surface, LayoutKind::Plain, DecorationVariant::Text)
            .expect("compose");
        assert_eq!(surface.data(), before.data());
    }

    // Tests the row layout draws the panel then the covers
    // Verified by drawing covers before the panel
    #[test]
    fn test_row_panel_and_covers() {
        let solid = options(OverlayStyle::Solid);
        let covers = green_covers(1);
        let compositor = OverlayCompositor::new(&solid, RED, &[], &covers, None);
        let mut surface = black_surface(1200, 628);

        compositor
            .compose(&mut surface, LayoutKind::RowPanel, DecorationVariant::Text)
            .expect("compose");
        let image = to_rgba_image(&surface);

        assert_eq!(image.get_pixel(10, 10).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(60, 300).0, [255, 0, 0, 255]);
        let centre = image.get_pixel(600, 314).0;
        assert!(centre[1] > 200 && centre[0] < 40, "{centre:?}");
    }

    // Tests row covers are drawn even without a panel
    // Verified by skipping row covers when the style is None
    #[test]
    fn test_row_covers_without_panel() {
        let none = options(OverlayStyle::None);
        let covers = green_covers(1);
        let compositor = OverlayCompositor::new(&none, RED, &[], &covers, None);
        let mut surface = black_surface(1200, 628);

        compositor
            .compose(&mut surface, LayoutKind::RowPanel, DecorationVariant::Text)
            .expect("compose");
        let image = to_rgba_image(&surface);
        assert_eq!(image.get_pixel(60, 300).0, [0, 0, 0, 255]);
        assert!(image.get_pixel(600, 314).0[1] > 200);
    }

    // Tests the grid is left undecorated when the style is None
    // Verified by drawing grid covers regardless of style
    #[test]
    fn test_grid_none_untouched() {
        let none = RenderOptions {
            cover_variant: CoverVariant::Covers,
            ..options(OverlayStyle::None)
        };
        let covers = green_covers(4);
        let compositor = OverlayCompositor::new(&none, RED, &[], &covers, None);
        let mut surface = black_surface(1080, 1080);
        let before = surface.clone();

        compositor
            .compose(&mut surface, LayoutKind::GridPanel, DecorationVariant::Covers)
            .expect("compose");
        assert_eq!(surface.data(), before.data());
    }

    // Tests the covers pass fills all four grid cells
    // Verified by placing every cover in the first cell
    #[test]
    fn test_grid_covers() {
        let solid = options(OverlayStyle::Solid);
        let covers = green_covers(4);
        let compositor = OverlayCompositor::new(&solid, RED, &[], &covers, None);
        let mut surface = black_surface(1080, 1080);

        compositor
            .compose(&mut surface, LayoutKind::GridPanel, DecorationVariant::Covers)
            .expect("compose");
        let image = to_rgba_image(&surface);

        for (x, y) in [(400, 300), (680, 300), (400, 780), (680, 780)] {
            let pixel = image.get_pixel(x, y).0;
            assert!(pixel[1] > 200 && pixel[0] < 40, "({x}, {y}) = {pixel:?}");
        }
        assert_eq!(image.get_pixel(100, 540).0, [255, 0, 0, 255]);
    }

    // Tests the text pass without a usable font still draws the panel
    // Verified by returning an error for a missing font
    #[test]
    fn test_grid_text_without_font() {
        let solid = options(OverlayStyle::Solid);
        let garbage: FontData = FontData::from(&b"not a font"[..]);

        for font in [None, Some(&garbage)] {
            let compositor = OverlayCompositor::new(&solid, RED, &[], &[], font);
            let mut surface = black_surface(1080, 1080);
            compositor
                .compose(&mut surface, LayoutKind::GridPanel, DecorationVariant::Text)
                .expect("compose");
            let image = to_rgba_image(&surface);
            assert_eq!(image.get_pixel(540, 540).0, [255, 0, 0, 255]);
        }
    }

    // Tests grid text wraps to the panel width less the 192 px inset, centred on the panel
    // Verified by wrapping to 794 px
    #[test]
    fn test_text_lines() {
        let options = RenderOptions {
            text: ["aaaaaaaaa"; 20].join(" "),
            ..options(OverlayStyle::Solid)
        };
        let compositor = OverlayCompositor::new(&options, RED, &[], &[], None);
        let panel = LayoutKind::GridPanel
            .panel_bounds(1080, 1080)
            .expect("panel");

        let lines = compositor.text_lines(panel, &FixedMeasure);
        let words: Vec<usize> = lines
            .iter()
            .map(|line| line.text.split(' ').count())
            .collect();
        assert_eq!(words, [9, 9, 2]);

        let first = lines.first().expect("line");
        assert!((first.width - 714.0).abs() < 1e-3);
        assert!((first.left - 183.0).abs() < 1e-3);
        assert!((first.middle - 444.0).abs() < 1e-3);
        let last = lines.last().expect("line");
        assert!((last.middle - 636.0).abs() < 1e-3);

        let blank = RenderOptions {
            text: "   ".into(),
            ..options
        };
        let compositor = OverlayCompositor::new(&blank, RED, &[], &[], None);
        assert!(compositor.text_lines(panel, &FixedMeasure).is_empty());
    }
}
