//! Errors of the package layer: the ZIP container, `[Content_Types].xml`,
//! part names and relationships.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpcError {
    /// No file at the given path.
    #[error("no package at {0}")]
    PackageNotFound(String),

    #[error("invalid part name: {0}")]
    InvalidPackUri(String),

    #[error("no part named {0}")]
    PartNotFound(String),

    #[error("no relationship {0}")]
    RelationshipNotFound(String),

    /// Neither a Default nor an Override in `[Content_Types].xml` matches.
    #[error("no content type for {0}")]
    ContentTypeNotFound(String),

    #[error("bad relationship: {0}")]
    InvalidRelationship(String),

    #[error("malformed package XML: {0}")]
    XmlError(String),

    #[error(transparent)]
    ZipError(#[from] zip::result::ZipError),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    QuickXmlError(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    AttrError(String),
}

impl From<quick_xml::events::attributes::AttrError> for OpcError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        OpcError::AttrError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OpcError>;
