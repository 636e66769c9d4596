//! Options controlling how a presentation is written.

use crate::ooxml::opc::phys_pkg::PhysPkgWriter;
use zip::CompressionMethod;

/// Compression applied to every member of the written package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    Deflated,
    /// No compression; larger files, faster writes.
    Stored,
}

/// Options for saving a presentation.
///
/// # Examples
///
/// ```rust
/// use slidedeck::ooxml::pptx::{Compression, SaveOptions};
///
/// let options = SaveOptions::new().with_compression_level(Some(9));
/// assert_eq!(options.compression, Compression::Deflated);
///
/// let fast = SaveOptions::new().with_compression(Compression::Stored);
/// assert_eq!(fast.compression_level, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOptions {
    pub compression: Compression,
    /// Deflate level (0-9); `None` uses the zip default. Ignored when stored.
    pub compression_level: Option<i64>,
}

impl SaveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_compression_level(mut self, level: Option<i64>) -> Self {
        self.compression_level = level;
        self
    }

    pub(crate) fn phys_writer(&self) -> PhysPkgWriter {
        match self.compression {
            Compression::Deflated => {
                PhysPkgWriter::with_compression(CompressionMethod::Deflated, self.compression_level)
            },
            Compression::Stored => PhysPkgWriter::with_compression(CompressionMethod::Stored, None),
        }
    }
}
