//! Office Open XML (OOXML) format implementation.
//!
//! The module is organized in two layers:
//!
//! 1. **OPC Layer** (`opc`): Low-level package handling (ZIP, parts, relationships)
//! 2. **PresentationML** (`pptx`): PowerPoint presentations on top of the package
//!
//! # Example
//!
//! ```rust,no_run
//! use slidedeck::ooxml::pptx::Package;
//!
//! let pkg = Package::open("presentation.pptx")?;
//! let pres = pkg.into_presentation()?;
//! println!("Presentation contains {} slides", pres.slides().len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod error;
pub mod opc;
pub mod pptx;

pub use opc::{OpcPackage, PackURI};

pub use error::{OoxmlError, Result};
