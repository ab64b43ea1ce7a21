//! Error types for barcode generation and export.

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide error.
///
/// `InvalidArgument` and `UnsupportedWidth` are contract violations and abort the
/// calling operation. `CompositionFailure` discards the whole document.
/// `ExportIo` is reported per artifact.
#[derive(Debug, Error)]
pub enum Error {
    /// Value outside the byte range
    #[error("invalid byte value {value}: expected 0..=255")]
    InvalidArgument { value: i64 },

    /// Raster width other than 8 or 10 pixels
    #[error("unsupported raster width {width}: expected 8 or 10")]
    UnsupportedWidth { width: u32 },

    /// Zero scale factor, or one whose enlarged size overflows
    #[error("invalid scale {x}x{y}: factors must be non-zero and fit the image size")]
    InvalidScale { x: u32, y: u32 },

    /// Page preview scale that is not a usable positive size
    #[error("invalid preview scale {0}: must be positive and finite")]
    InvalidPreviewScale(f32),

    /// A page failed during document assembly
    #[error("page for byte {value} failed: {source}")]
    CompositionFailure {
        value: u8,
        #[source]
        source: Box<Error>,
    },

    /// Writing one exported artifact failed
    #[error("writing {} failed: {source}", .path.display())]
    ExportIo {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// Export requested while the document is stale or failed
    #[error("document is not ready for export")]
    DocumentNotReady,

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("font could not be loaded")]
    Font,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composition_failure_names_the_byte() {
        let err = Error::CompositionFailure {
            value: 42,
            source: Box::new(Error::UnsupportedWidth { width: 9 }),
        };
        let msg = err.to_string();
        assert!(msg.contains("byte 42"));
        assert!(msg.contains("width 9"));
    }

    #[test]
    fn preview_scale_error_shows_the_value() {
        let msg = Error::InvalidPreviewScale(f32::INFINITY).to_string();
        assert!(msg.contains("inf") && msg.contains("finite"));
    }

    #[test]
    fn export_failure_names_the_path() {
        let err = Error::ExportIo {
            path: PathBuf::from("images/7.png"),
            source: Box::new(Error::Io(std::io::Error::other("disk full"))),
        };
        assert!(err.to_string().contains("images/7.png"));
    }
}
