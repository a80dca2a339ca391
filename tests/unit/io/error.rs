//! Tests for error messages, per-size classification and source chaining

#[cfg(test)]
mod tests {
    use patterngen::PatternError;
    use patterngen::io::error::{file_system_error, invalid_parameter};
    use std::error::Error;

    // Tests parameter errors name the parameter, value and reason
    // Verified by omitting the value from the message
    #[test]
    fn test_invalid_parameter_message() {
        let error = invalid_parameter("font_size", &300.0, &"must be within [20, 200]");
        assert_eq!(
            error.to_string(),
            "Invalid parameter 'font_size' = '300': must be within [20, 200]"
        );
    }

    // Tests only encoding and surface failures are confined to one size
    // Verified by classifying EmptyInput as per size
    #[test]
    fn test_per_size_classification() {
        let surface = PatternError::Surface {
            width: 0,
            height: 10,
        };
        assert!(surface.is_per_size());
        assert!(!PatternError::EmptyInput.is_per_size());
        assert!(!PatternError::Superseded { generation: 3 }.is_per_size());
        assert!(
            !PatternError::Worker {
                reason: "closed".into()
            }
            .is_per_size()
        );
    }

    // Tests file system errors keep their I/O source
    // Verified by returning None from source()
    #[test]
    fn test_file_system_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = file_system_error("/tmp/motif.png", "read image", io);
        assert!(error.source().is_some());
        assert!(error.to_string().contains("/tmp/motif.png"));
        assert!(error.to_string().contains("read image"));
    }

    // Tests plain I/O errors convert into file system errors
    // Verified by mapping I/O errors to Worker
    #[test]
    fn test_from_io_error() {
        let error: PatternError = std::io::Error::other("boom").into();
        assert!(matches!(error, PatternError::FileSystem { .. }));
    }

    // Tests the superseded message carries its generation
    // Verified by printing a fixed message
    #[test]
    fn test_superseded_message() {
        let error = PatternError::Superseded { generation: 7 };
        assert_eq!(error.to_string(), "Render generation 7 was superseded");
    }
}
