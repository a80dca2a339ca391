//! Request model, configuration, error types and file handling

/// Command line interface and batch file processing
pub mod cli;
/// Rendering constants, presets and defaults
pub mod configuration;
/// Error types and constructors
pub mod error;
/// Image decoding and PNG export
pub mod image;
/// Progress reporting for batch renders
pub mod progress;
/// Render requests, options and results
pub mod request;
