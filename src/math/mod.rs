//! Numeric and colour utilities shared by the renderers

/// Colour parsing and conversion between palette strings and raster colours
pub mod color;
/// WCAG relative luminance, contrast ratios and readable colour selection
pub mod contrast;
/// Reproducible sine-based pseudo-random stream
pub mod random;
