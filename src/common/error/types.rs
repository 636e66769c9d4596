//! The error type every public slidedeck operation returns.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be parsed, e.g. a length string
    #[error("parse error: {0}")]
    ParseError(String),

    /// A part name or relationship in the package is malformed.
    #[error("corrupted package: {0}")]
    CorruptedFile(String),

    /// A file, part, relationship or slide layout that was asked for does
    /// not exist.
    #[error("not found: {0}")]
    ComponentNotFound(String),

    #[error("XML error: {0}")]
    XmlError(String),

    /// The package is not a presentation.
    #[error("invalid content type: expected {expected}, got {got}")]
    InvalidContentType { expected: String, got: String },

    #[error("ZIP error: {0}")]
    ZipError(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
