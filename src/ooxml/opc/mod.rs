/// Open Packaging Conventions (OPC) implementation.
///
/// This module provides the subset of the OPC specification needed to read
/// and rewrite PresentationML packages:
///
/// - Package structure (parts, relationships)
/// - Content type management
/// - ZIP-based physical packaging
///
/// Parts that are never edited are written back byte-for-byte, so a package
/// that is opened and saved without changes keeps every part it was loaded with.

pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgreader;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::{BlobPart, Part, PartFactory, XmlPart};
pub use pkgwriter::PackageWriter;
pub use rel::{Relationship, Relationships};
