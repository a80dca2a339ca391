//! Pixel-level drawing primitives on premultiplied surfaces

/// Cover placement with shadow, clip and shading
pub mod cover;
/// Blur and dither post-processing
pub mod filters;
/// Rounded rectangles and overlay panels
pub mod shapes;
/// Text wrapping, layout and glyph drawing
pub mod text;
/// Surface conversion and motif tinting
pub mod tint;
