use thiserror::Error;
use std::io;
use std::path::PathBuf;

/// Custom error types for ScanRegionR
#[derive(Error, Debug)]
pub enum ScanRegionError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Payload could not be decoded as an image: {0}")]
    Decode(String),

    #[error("Empty or missing payload")]
    EmptyInput,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV output error: {0}")]
    CsvOutput(#[from] csv::Error),

    #[error("JSON output error: {0}")]
    JsonOutput(#[from] serde_json::Error),

    #[error("Invalid input path: {0}")]
    InvalidPath(PathBuf),

    #[error("Unexpected error: {0}")]
    Internal(String),
}

impl ScanRegionError {
    /// Stable, non-sensitive error code for the output record. The detailed
    /// fault text is logged server-side and never serialized to callers.
    pub fn public_code(&self) -> &'static str {
        match self {
            ScanRegionError::Decode(_) | ScanRegionError::Image(_) => "decode_error",
            ScanRegionError::EmptyInput => "empty_input",
            _ => "internal_error",
        }
    }

    /// Fixed caller-facing message matching `public_code`.
    pub fn public_message(&self) -> &'static str {
        match self {
            ScanRegionError::Decode(_) | ScanRegionError::Image(_) => {
                "payload could not be decoded as an image"
            }
            ScanRegionError::EmptyInput => "payload was empty or missing",
            _ => "internal processing error",
        }
    }
}

/// Type alias for Result with our custom error type
pub type Result<T> = std::result::Result<T, ScanRegionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_codes_do_not_leak_detail() {
        let err = ScanRegionError::Decode("bad magic at offset 3".to_string());
        assert_eq!(err.public_code(), "decode_error");
        assert!(!err.public_message().contains("offset"));

        let err = ScanRegionError::Internal("index out of bounds".to_string());
        assert_eq!(err.public_code(), "internal_error");
        assert!(!err.public_message().contains("index"));
    }

    #[test]
    fn empty_input_has_own_code() {
        assert_eq!(ScanRegionError::EmptyInput.public_code(), "empty_input");
    }
}
