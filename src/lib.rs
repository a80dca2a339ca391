//! Seeded motif scatter and overlay compositing for marketing artwork
//!
//! Tinted copies of source motifs are scattered over a square master surface,
//! which is then cropped to each requested output size and decorated with
//! panels, contrast-aware text or cover imagery before PNG encoding.

#![forbid(unsafe_code)]

/// Scatter rendering, overlay compositing, caching and batch execution
pub mod algorithm;
/// Input/output operations, request model and error handling
pub mod io;
/// Deterministic randomness, colour parsing and contrast computation
pub mod math;
/// Pixel-level drawing: tinting, shapes, text, covers and filters
pub mod raster;
/// Crop planning and overlay layout geometry
pub mod spatial;

pub use algorithm::engine::{BackgroundEngine, InlineEngine, PatternEngine};
pub use io::error::{PatternError, Result};
pub use io::request::{ImageSource, Palette, RenderOptions, RenderRequest, RenderedPattern, Size};
