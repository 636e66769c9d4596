//! Errors raised while interpreting the parts of a presentation package.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OoxmlError>;

/// Failure reading or writing PresentationML on top of an OPC package.
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// The package layer failed: ZIP, content types, relationships.
    #[error("package error: {0}")]
    Opc(#[from] crate::ooxml::opc::error::OpcError),

    /// A part's XML could not be read or rewritten.
    #[error("malformed part XML: {0}")]
    Xml(String),

    #[error("missing part: {0}")]
    PartNotFound(String),

    /// The package's main part is not a presentation.
    #[error("not a presentation: expected {expected}, got {got}")]
    InvalidContentType { expected: String, got: String },
}

impl From<quick_xml::Error> for OoxmlError {
    fn from(err: quick_xml::Error) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}

impl From<std::io::Error> for OoxmlError {
    fn from(err: std::io::Error) -> Self {
        OoxmlError::Xml(quick_xml::Error::from(err).to_string())
    }
}
