//! Slidedeck - reading and writing PowerPoint (.pptx) presentations
//!
//! The crate parses Office Open XML presentation packages into an owned
//! [`Presentation`] and writes them back, touching only what was edited.
//!
//! # Features
//!
//! - **Slide size**: read and set the slide width and height, stored in EMU
//! - **Slides**: ordered, indexable collection in `<p:sldIdLst>` order
//! - **Layouts and masters**: placeholder geometry resolved through the
//!   slide, layout and master chain
//! - **Round trips**: untouched parts are written back byte for byte
//!
//! # Example - Resizing a presentation
//!
//! ```no_run
//! use slidedeck::{Length, Presentation};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pres = Presentation::open("presentation.pptx")?;
//! println!("{} slides, {} x {}", pres.slides().len(), pres.slide_width(), pres.slide_height());
//!
//! pres.set_slide_width(Length::from_inches(13.333));
//! pres.set_slide_height(Length::from_inches(7.5));
//! pres.save("widescreen.pptx")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Building a presentation
//!
//! ```
//! use slidedeck::Presentation;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pres = Presentation::new()?;
//! pres.add_slide(0)?;
//! pres.add_slide(1)?;
//! assert_eq!(pres.slides().len(), 2);
//!
//! let bytes = pres.to_bytes()?;
//! let reopened = Presentation::from_bytes(bytes)?;
//! assert_eq!(reopened.slides().len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod ooxml;

pub use common::{Error, Length, LengthUnit, Result};
pub use ooxml::pptx::{Presentation, SaveOptions, Slide, Slides};
