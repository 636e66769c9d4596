/// Base shape types for PowerPoint presentations.
use crate::common::Length;
use crate::ooxml::pptx::shapes::placeholder::PlaceholderFormat;

/// Shape type enumeration.
///
/// Indicates what kind of shape this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    /// An autoshape or text box (p:sp)
    Shape,
    /// A picture shape (p:pic)
    Picture,
    /// A graphic frame containing a table or chart (p:graphicFrame)
    GraphicFrame,
    /// A group shape (p:grpSp)
    GroupShape,
    /// A connector shape (p:cxnSp)
    Connector,
    /// Any of the above carrying a `<p:ph>` element
    Placeholder,
}

impl ShapeType {
    /// Shape type for a shape tree child element, by local name.
    pub(crate) fn from_local_name(local_name: &[u8]) -> Option<Self> {
        match local_name {
            b"sp" => Some(Self::Shape),
            b"pic" => Some(Self::Picture),
            b"graphicFrame" => Some(Self::GraphicFrame),
            b"grpSp" => Some(Self::GroupShape),
            b"cxnSp" => Some(Self::Connector),
            _ => None,
        }
    }
}

/// Position and size of a shape. Each value is `None` when not set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Geometry {
    pub left: Option<Length>,
    pub top: Option<Length>,
    pub width: Option<Length>,
    pub height: Option<Length>,
}

impl Geometry {
    /// Per field, the value in `self`, falling back to `fallback`.
    pub fn or(self, fallback: Geometry) -> Geometry {
        Geometry {
            left: self.left.or(fallback.left),
            top: self.top.or(fallback.top),
            width: self.width.or(fallback.width),
            height: self.height.or(fallback.height),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Geometry::default()
    }
}

/// A shape on a slide, layout or master.
///
/// Position and size come in two layers. The directly applied values are
/// those in the shape's own `<a:xfrm>`. A placeholder without a directly
/// applied value takes it from the placeholder it inherits from (the layout
/// placeholder with the same `idx` on a slide, the master placeholder of the
/// matching type on a layout). The accessors return the effective value.
///
/// # Examples
///
/// ```rust,ignore
/// let shape = &slide.shapes()[0];
/// if let (Some(left), Some(width)) = (shape.left(), shape.width()) {
///     println!("{} spans {}..{} in", shape.name(), left.inches(), (left + width).inches());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Shape {
    shape_id: u32,
    name: String,
    shape_type: ShapeType,
    placeholder: Option<PlaceholderFormat>,
    direct: Geometry,
    inherited: Geometry,
    modified: bool,
}

impl Shape {
    pub(crate) fn new(
        shape_id: u32,
        name: String,
        shape_type: ShapeType,
        placeholder: Option<PlaceholderFormat>,
        direct: Geometry,
    ) -> Self {
        let shape_type = if placeholder.is_some() {
            ShapeType::Placeholder
        } else {
            shape_type
        };
        Self {
            shape_id,
            name,
            shape_type,
            placeholder,
            direct,
            inherited: Geometry::default(),
            modified: false,
        }
    }

    /// The `id` of `<p:cNvPr>`, unique within the part.
    #[inline]
    pub fn shape_id(&self) -> u32 {
        self.shape_id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    #[inline]
    pub fn is_placeholder(&self) -> bool {
        self.placeholder.is_some()
    }

    pub fn placeholder_format(&self) -> Option<&PlaceholderFormat> {
        self.placeholder.as_ref()
    }

    /// Effective geometry: directly applied values over inherited ones.
    pub fn geometry(&self) -> Geometry {
        self.direct.or(self.inherited)
    }

    /// Only the values in the shape's own XML.
    pub fn direct_geometry(&self) -> Geometry {
        self.direct
    }

    pub fn left(&self) -> Option<Length> {
        self.direct.left.or(self.inherited.left)
    }

    pub fn top(&self) -> Option<Length> {
        self.direct.top.or(self.inherited.top)
    }

    pub fn width(&self) -> Option<Length> {
        self.direct.width.or(self.inherited.width)
    }

    pub fn height(&self) -> Option<Length> {
        self.direct.height.or(self.inherited.height)
    }

    pub fn set_left(&mut self, value: Length) {
        self.direct.left = Some(value);
        self.modified = true;
    }

    pub fn set_top(&mut self, value: Length) {
        self.direct.top = Some(value);
        self.modified = true;
    }

    pub fn set_width(&mut self, value: Length) {
        self.direct.width = Some(value);
        self.modified = true;
    }

    pub fn set_height(&mut self, value: Length) {
        self.direct.height = Some(value);
        self.modified = true;
    }

    /// Whether a dimension was set since load or the last save.
    #[inline]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub(crate) fn set_inherited(&mut self, inherited: Geometry) {
        self.inherited = inherited;
    }

    pub(crate) fn mark_saved(&mut self) {
        self.modified = false;
    }
}

/// Resolve inherited geometry for `shapes` from the placeholders of the
/// part they inherit from. `lookup` maps a placeholder to the parent shape.
pub(crate) fn inherit_geometry<'p, F>(shapes: &mut [Shape], mut lookup: F)
where
    F: FnMut(&PlaceholderFormat) -> Option<&'p Shape>,
{
    for shape in shapes.iter_mut() {
        let inherited = shape
            .placeholder
            .as_ref()
            .and_then(&mut lookup)
            .map(Shape::geometry)
            .unwrap_or_default();
        shape.set_inherited(inherited);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::shapes::placeholder::PlaceholderType;

    fn emu(v: i64) -> Option<Length> {
        Some(Length::from_emu(v))
    }

    fn placeholder(ph_type: PlaceholderType, idx: u32, direct: Geometry) -> Shape {
        let format = PlaceholderFormat {
            ph_type,
            idx,
            ..Default::default()
        };
        Shape::new(2, "Placeholder".into(), ShapeType::Shape, Some(format), direct)
    }

    #[test]
    fn test_placeholder_shape_type() {
        let shape = placeholder(PlaceholderType::Title, 0, Geometry::default());
        assert_eq!(shape.shape_type(), ShapeType::Placeholder);
        assert!(shape.is_placeholder());

        let plain = Shape::new(3, "Box".into(), ShapeType::Connector, None, Geometry::default());
        assert_eq!(plain.shape_type(), ShapeType::Connector);
        assert!(plain.placeholder_format().is_none());
    }

    #[test]
    fn test_direct_overrides_inherited_per_field() {
        let mut shape = placeholder(
            PlaceholderType::Body,
            1,
            Geometry {
                left: emu(10),
                ..Default::default()
            },
        );
        shape.set_inherited(Geometry {
            left: emu(1),
            top: emu(2),
            width: emu(3),
            height: None,
        });

        assert_eq!(shape.left(), emu(10));
        assert_eq!(shape.top(), emu(2));
        assert_eq!(shape.width(), emu(3));
        assert_eq!(shape.height(), None);
        assert_eq!(shape.geometry().left, emu(10));
    }

    #[test]
    fn test_setters_store_direct_values() {
        let mut shape = placeholder(PlaceholderType::Title, 0, Geometry::default());
        assert!(!shape.is_modified());

        shape.set_width(Length::from_emu(-5));
        shape.set_height(Length::ZERO);
        assert!(shape.is_modified());
        assert_eq!(shape.direct_geometry().width, emu(-5));
        assert_eq!(shape.height(), emu(0));
        assert_eq!(shape.left(), None);

        shape.mark_saved();
        assert!(!shape.is_modified());
    }

    #[test]
    fn test_inherit_geometry_by_idx() {
        let parents = vec![placeholder(
            PlaceholderType::Body,
            1,
            Geometry {
                left: emu(100),
                top: emu(200),
                width: emu(300),
                height: emu(400),
            },
        )];
        let mut shapes = vec![
            placeholder(PlaceholderType::Object, 1, Geometry::default()),
            placeholder(PlaceholderType::Object, 7, Geometry::default()),
        ];

        inherit_geometry(&mut shapes, |ph| {
            parents
                .iter()
                .find(|p| p.placeholder_format().map(|f| f.idx) == Some(ph.idx))
        });

        assert_eq!(shapes[0].width(), emu(300));
        assert!(shapes[1].geometry().is_empty());
    }
}
