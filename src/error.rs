use std::path::PathBuf;

/// Everything that can stop a label run. Border detection never produces one of these;
/// it falls back to the full image instead.
#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error("Input file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Unsupported file format '{extension}'. Supported formats: {supported}")]
    UnsupportedFormat { extension: String, supported: String },

    #[error("Page {requested} does not exist. Document has {count} page(s).")]
    PageOutOfRange { requested: usize, count: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    #[error("Failed to rasterize PDF page: {0}")]
    Rasterize(String),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize PDF: {0}")]
    WritePdf(String),
}

impl From<lopdf::Error> for LabelError {
    fn from(err: lopdf::Error) -> Self {
        LabelError::WritePdf(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LabelError>;
