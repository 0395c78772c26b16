//! Error type shared by the analysis pipeline and its I/O boundary.

/// Errors that can occur while analyzing or rendering an image.
#[derive(Debug, thiserror::Error)]
pub enum AsciifyError {
    #[error("Invalid color format '{0}': expected #RRGGBB or #RGB")]
    InvalidColorFormat(String),

    #[error("Unsupported raster format: {0}")]
    UnsupportedRasterFormat(String),

    #[error("Degenerate blur kernel: sigma must be a positive finite number, got {sigma}")]
    DegenerateKernel {
        /// The rejected standard deviation
        sigma: f64,
    },

    #[error("Invalid scale factor {0}: must be at least 1")]
    InvalidScale(u32),

    #[error("Invalid palette size {0}: at least 2 shades are required")]
    InvalidPaletteSize(usize),

    #[error("Failed to load font: {0}")]
    FontLoad(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for AsciifyError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => AsciifyError::Io(e),
            other => AsciifyError::UnsupportedRasterFormat(other.to_string()),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AsciifyError>;
