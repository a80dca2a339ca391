//! Error types for request validation, rendering and encoding

use std::fmt;
use std::path::PathBuf;

/// Main error type for all rendering operations
#[derive(Debug)]
pub enum PatternError {
    /// An image source could not be read or decoded
    ///
    /// Non-fatal for motifs and covers: the image is skipped and reported.
    Decode {
        /// Position of the image in its input list
        index: usize,
        /// Underlying image decoding error
        source: image::ImageError,
    },

    /// No usable motif images remain after decoding
    EmptyInput,

    /// The palette has no usable colour
    InvalidPalette {
        /// Description of what's wrong with the palette
        reason: String,
    },

    /// A colour string could not be parsed
    InvalidColor {
        /// The rejected colour string
        value: String,
    },

    /// Render option validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// An output raster could not be serialised
    ///
    /// Fatal for that size only; other sizes of the batch still complete.
    Encoding {
        /// Key of the size whose output failed
        size_key: String,
        /// Underlying image encoding error
        source: image::ImageError,
    },

    /// A raster surface could not be allocated at the requested dimensions
    Surface {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Font data could not be parsed
    Font {
        /// Description of the failure
        reason: String,
    },

    /// The background execution context is unavailable
    Worker {
        /// Description of the failure
        reason: String,
    },

    /// A newer request was submitted before this one completed
    Superseded {
        /// Generation token of the discarded request
        generation: u64,
    },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode { index, source } => {
                write!(f, "Failed to decode image #{index}: {source}")
            }
            Self::EmptyInput => write!(f, "No usable source images were provided"),
            Self::InvalidPalette { reason } => write!(f, "Invalid palette: {reason}"),
            Self::InvalidColor { value } => write!(f, "Invalid colour '{value}'"),
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Encoding { size_key, source } => {
                write!(f, "Failed to encode output for size {size_key}: {source}")
            }
            Self::Surface { width, height } => {
                write!(f, "Failed to allocate a {width}x{height} surface")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Font { reason } => write!(f, "Font error: {reason}"),
            Self::Worker { reason } => write!(f, "Background worker error: {reason}"),
            Self::Superseded { generation } => {
                write!(f, "Render generation {generation} was superseded")
            }
        }
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode { source, .. } | Self::Encoding { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl PatternError {
    /// Whether the error only affects one size of a batch
    ///
    /// Request-level errors abort the whole batch before rendering starts.
    pub const fn is_per_size(&self) -> bool {
        matches!(self, Self::Encoding { .. } | Self::Surface { .. })
    }
}

/// Convenience type alias for rendering results
pub type Result<T> = std::result::Result<T, PatternError>;

impl From<std::io::Error> for PatternError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> PatternError {
    PatternError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a file system error for `path`
pub fn file_system_error(
    path: impl Into<PathBuf>,
    operation: &'static str,
    source: std::io::Error,
) -> PatternError {
    PatternError::FileSystem {
        path: path.into(),
        operation,
        source,
    }
}
