use thiserror::Error;

/// Terminal failure of an export. Field-level problems in the input never
/// produce one of these; they degrade to zero or a placeholder instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("DOCX packaging failed: {0}")]
    Docx(String),

    #[error("export worker terminated unexpectedly")]
    Worker,
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Error::Docx(e.to_string())
    }
}
