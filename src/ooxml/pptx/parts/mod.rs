/// Parts for PowerPoint presentation documents.
///
/// This module contains the parsed models of the XML parts in a .pptx
/// package that the presentation API reads and writes back.
pub mod presentation;
pub mod slide;

pub use presentation::{PresentationPart, SlideId, SlideSize};
pub use slide::SlidePart;
