//! Unified error type for the crate.
//!
//! Package-level ([`OpcError`](crate::ooxml::opc::error::OpcError)) and
//! format-level ([`OoxmlError`](crate::ooxml::error::OoxmlError)) errors
//! convert into [`Error`], so public operations return a single type.

pub mod conversions;
pub mod types;

pub use types::{Error, Result};
