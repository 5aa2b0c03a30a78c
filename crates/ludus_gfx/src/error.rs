//! Graphics-layer error types.

use std::path::PathBuf;

/// Errors that can occur while loading image resources.
#[derive(Debug, thiserror::Error)]
pub enum GfxError {
    /// The image file could not be read.
    #[error("failed to read image `{path}`: {source}")]
    Io {
        /// Path the backend tried to read.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The image bytes could not be decoded.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}
