/// Shapes module for PowerPoint presentations.
///
/// Shapes are read from the `<p:spTree>` of slides, layouts and masters.
/// Only the top-level shapes of a tree are modelled; the children of a group
/// shape are part of the group.
pub mod base;
pub mod placeholder;

pub use base::{Geometry, Shape, ShapeType};
pub use placeholder::{Orientation, PlaceholderFormat, PlaceholderSize, PlaceholderType};
