//! Geometry for turning the master surface into decorated outputs
//!
//! This module contains:
//! - Crop and cover planning from the master surface to a target size
//! - Layout selection, panel rectangles and cover placement

/// Crop and cover plans for target sizes
pub mod crop;
/// Layout kinds, panel bounds, row and grid placement
pub mod layout;

pub use crop::CropPlan;
pub use layout::LayoutKind;
