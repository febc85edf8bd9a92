//! Error types for catalog access

use thiserror::Error;

/// Errors raised by catalog providers
///
/// The conversational core never surfaces these to the user; they are
/// logged and degraded to an empty catalog by the repository layer.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(String),

    #[error("Invalid product {id}: {message}")]
    InvalidProduct { id: String, message: String },
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
