use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Worksheet not found: {0}")]
    WorksheetNotFound(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Spreadsheet API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Worksheet '{sheet}' is malformed: {details}")]
    MalformedSheet { sheet: String, details: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "sheets")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl LookupError {
    /// A missing worksheet is an expected outcome for the weekly backup tab.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::WorksheetNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
