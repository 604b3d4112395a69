use crate::symbology::{EncodeError, Symbology};
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while generating barcodes
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot encode {text:?} as {symbology}: {source}")]
    Encoding {
        symbology: Symbology,
        text: String,
        #[source]
        source: EncodeError,
    },

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),
}

impl GenerationError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        GenerationError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn encoding(symbology: Symbology, text: &str, source: EncodeError) -> Self {
        GenerationError::Encoding {
            symbology,
            text: text.to_string(),
            source,
        }
    }
}

impl From<image::ImageError> for GenerationError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => GenerationError::Io {
                path: Utf8PathBuf::new(),
                source: e,
            },
            other => GenerationError::Render(other.to_string()),
        }
    }
}

#[cfg(feature = "pdf")]
impl From<lopdf::Error> for GenerationError {
    fn from(err: lopdf::Error) -> Self {
        GenerationError::Render(format!("PDF error: {}", err))
    }
}

pub type GenerationResult<T> = std::result::Result<T, GenerationError>;
