//! Error types for imagecloud

use thiserror::Error;

/// Main error type for imagecloud operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "Image dimensions do not match ({}x{} vs {}x{})",
        color.0, color.1, depth.0, depth.1
    )]
    DimensionMismatch {
        color: (u32, u32),
        depth: (u32, u32),
    },

    #[error("Missing resource: {0}")]
    MissingResource(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Point cloud has been disposed")]
    Disposed,

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("Parameter decode error: {0}")]
    ParameterDecode(String),
}

/// Result type alias for imagecloud operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(feature = "gpu")]
impl From<wgpu::BufferAsyncError> for Error {
    fn from(e: wgpu::BufferAsyncError) -> Self {
        Error::Gpu(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_message_names_both_sizes() {
        let err = Error::DimensionMismatch {
            color: (2, 2),
            depth: (2, 3),
        };
        assert_eq!(err.to_string(), "Image dimensions do not match (2x2 vs 2x3)");
    }
}
