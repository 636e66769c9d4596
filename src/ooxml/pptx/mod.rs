//! PowerPoint (.pptx) presentation support.
//!
//! Reads and writes PresentationML packages: slide size, the slide list,
//! slide masters and layouts, and the placeholder shapes slides inherit
//! their geometry from.
//!
//! - [`Package`]: a .pptx package, validated by its main content type
//! - [`Presentation`]: the presentation API; owns the package
//! - [`Slides`], [`Slide`], [`SlideLayout`], [`SlideMaster`]
//! - [`parts`]: parsed models of the presentation and slide parts
//!
//! # Example
//!
//! ```rust,no_run
//! use slidedeck::ooxml::pptx::Presentation;
//!
//! let pres = Presentation::open("presentation.pptx")?;
//! println!("{} x {}", pres.slide_width(), pres.slide_height());
//! for slide in pres.slides() {
//!     println!("Slide {}: {} placeholders", slide.slide_id(), slide.placeholders().count());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod options;
pub mod package;
pub mod parts;
pub mod presentation;
pub mod shapes;
pub mod slide;
pub mod slides;
pub mod template;

pub use options::{Compression, SaveOptions};
pub use package::Package;
pub use parts::SlideSize;
pub use presentation::Presentation;
pub use shapes::{
    Geometry, Orientation, PlaceholderFormat, PlaceholderSize, PlaceholderType, Shape, ShapeType,
};
pub use slide::{Slide, SlideLayout, SlideMaster};
pub use slides::Slides;
