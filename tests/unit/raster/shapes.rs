//! Tests for bounds arithmetic, rounded rectangles and panel drawing

#[cfg(test)]
mod tests {
    use patterngen::math::color::Rgba;
    use patterngen::raster::shapes::{Bounds, draw_panel, panel_outline, rounded_rect};
    use patterngen::raster::tint::{new_surface, to_rgba_image};

    // Tests insetting shrinks every side and keeps the centre
    // Verified by insetting only the left and top edges
    #[test]
    fn test_inset() {
        let bounds = Bounds::new(0.0, 0.0, 1080.0, 1080.0).inset(48.0);
        assert_eq!(bounds, Bounds::new(48.0, 48.0, 984.0, 984.0));
        assert!((bounds.center_x() - 540.0).abs() < f32::EPSILON);
        assert!((bounds.center_y() - 540.0).abs() < f32::EPSILON);
    }

    // Tests insets larger than the bounds collapse to zero size
    // Verified by allowing negative widths
    #[test]
    fn test_inset_collapse() {
        let bounds = Bounds::new(0.0, 0.0, 10.0, 10.0).inset(20.0);
        assert!(bounds.width.abs() < f32::EPSILON);
        assert!(bounds.to_rect().is_none());
    }

    // Tests rounded paths keep their bounds and reject empty rectangles
    // Verified by offsetting the path by the radius
    #[test]
    fn test_rounded_rect_bounds() {
        let path = rounded_rect(Bounds::new(10.0, 20.0, 100.0, 50.0), 24.0).expect("path");
        let rect = path.bounds();
        assert!((rect.left() - 10.0).abs() < 1e-3);
        assert!((rect.top() - 20.0).abs() < 1e-3);
        assert!((rect.right() - 110.0).abs() < 1e-3);
        assert!((rect.bottom() - 70.0).abs() < 1e-3);

        assert!(rounded_rect(Bounds::new(0.0, 0.0, 0.0, 10.0), 4.0).is_none());
        assert!(rounded_rect(Bounds::new(0.0, 0.0, 10.0, 10.0), 0.0).is_some());
    }

    // Tests the panel fills its interior, leaves corners clear and is outlined
    // Verified by drawing the panel without rounded corners
    #[test]
    fn test_draw_panel() {
        let mut surface = new_surface(200, 200).expect("surface");
        draw_panel(&mut surface, Bounds::new(20.0, 20.0, 160.0, 160.0), Rgba::opaque(255, 0, 0));
        let image = to_rgba_image(&surface);

        assert_eq!(image.get_pixel(100, 100).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(21, 21).0[3], 0);
        assert_eq!(image.get_pixel(5, 100).0[3], 0);

        let outline = image.get_pixel(20, 100).0;
        assert_eq!(&outline[..3], &panel_outline().channels());
    }

    // Tests the outline colour is the opaque panel tint
    // Verified by giving the outline the translucent panel alpha
    #[test]
    fn test_panel_outline() {
        let outline = panel_outline();
        assert_eq!(outline.channels(), [229, 223, 214]);
        assert!((outline.alpha - 1.0).abs() < f32::EPSILON);
    }
}
