/// Slide-related objects, including Slide, SlideLayout, and SlideMaster.
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::pptx::parts::SlidePart;
use crate::ooxml::pptx::shapes::base::{Shape, inherit_geometry};
use crate::ooxml::pptx::shapes::placeholder::PlaceholderType;

/// A slide in a presentation.
///
/// Placeholders on a slide inherit position and size from the placeholder
/// with the same `idx` on the slide's layout.
///
/// # Examples
///
/// ```rust,no_run
/// use slidedeck::Presentation;
///
/// let pres = Presentation::open("presentation.pptx")?;
/// for slide in pres.slides() {
///     println!("{} ({}): {} shapes", slide.slide_id(), slide.name(), slide.shapes().len());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Slide {
    slide_id: u32,
    r_id: String,
    part: SlidePart,
    layout_partname: Option<PackURI>,
}

impl Slide {
    /// Wrap a slide part and resolve its placeholders against `layout`.
    pub(crate) fn new(
        slide_id: u32,
        r_id: String,
        mut part: SlidePart,
        layout: Option<&SlideLayout>,
    ) -> Self {
        if let Some(layout) = layout {
            inherit_geometry(part.shapes_mut(), |f| layout.placeholder(f.idx));
        }
        Self {
            slide_id,
            r_id,
            part,
            layout_partname: layout.map(|l| l.partname().clone()),
        }
    }

    /// The id from `<p:sldId>`, unique within the presentation.
    #[inline]
    pub fn slide_id(&self) -> u32 {
        self.slide_id
    }

    /// Relationship id from the presentation part to this slide.
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        self.part.partname()
    }

    /// The slide name from `<p:cSld name="…">`, empty when unnamed.
    pub fn name(&self) -> &str {
        self.part.name()
    }

    pub fn layout_partname(&self) -> Option<&PackURI> {
        self.layout_partname.as_ref()
    }

    pub fn shapes(&self) -> &[Shape] {
        self.part.shapes()
    }

    /// Mutable shapes. Geometry set through these is written on save.
    pub fn shapes_mut(&mut self) -> &mut [Shape] {
        self.part.shapes_mut()
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &Shape> {
        self.part.placeholders()
    }

    pub fn placeholder(&self, idx: u32) -> Option<&Shape> {
        self.part.placeholder(idx)
    }

    pub fn placeholder_mut(&mut self, idx: u32) -> Option<&mut Shape> {
        self.part.placeholder_mut(idx)
    }

    /// Whether any shape was edited since load or the last save.
    pub fn is_modified(&self) -> bool {
        self.part.is_modified()
    }

    pub(crate) fn part(&self) -> &SlidePart {
        &self.part
    }

    pub(crate) fn part_mut(&mut self) -> &mut SlidePart {
        &mut self.part
    }
}

/// A slide layout: the template a slide's placeholders come from.
#[derive(Debug, Clone)]
pub struct SlideLayout {
    part: SlidePart,
    master_partname: PackURI,
}

impl SlideLayout {
    /// Wrap a layout part; layout placeholders inherit from the master
    /// placeholder of their inheritee type (body for most, title for titles).
    pub(crate) fn new(mut part: SlidePart, master: &SlidePart) -> Self {
        inherit_geometry(part.shapes_mut(), |f| {
            f.ph_type
                .inheritee()
                .and_then(|ph_type| master.placeholder_by_type(ph_type))
        });
        Self {
            part,
            master_partname: master.partname().clone(),
        }
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        self.part.partname()
    }

    /// Layout name, e.g. "Title and Content".
    pub fn name(&self) -> &str {
        self.part.name()
    }

    pub fn shapes(&self) -> &[Shape] {
        self.part.shapes()
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &Shape> {
        self.part.placeholders()
    }

    pub fn placeholder(&self, idx: u32) -> Option<&Shape> {
        self.part.placeholder(idx)
    }

    pub fn master_partname(&self) -> &PackURI {
        &self.master_partname
    }

    pub(crate) fn part(&self) -> &SlidePart {
        &self.part
    }
}

/// A slide master and the layouts that belong to it.
#[derive(Debug, Clone)]
pub struct SlideMaster {
    part: SlidePart,
    layouts: Vec<SlideLayout>,
}

impl SlideMaster {
    pub(crate) fn new(part: SlidePart) -> Self {
        Self {
            part,
            layouts: Vec::new(),
        }
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        self.part.partname()
    }

    pub fn name(&self) -> &str {
        self.part.name()
    }

    /// Layouts in `<p:sldLayoutIdLst>` order.
    pub fn layouts(&self) -> &[SlideLayout] {
        &self.layouts
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &Shape> {
        self.part.placeholders()
    }

    pub fn placeholder_by_type(&self, ph_type: PlaceholderType) -> Option<&Shape> {
        self.part.placeholder_by_type(ph_type)
    }

    pub(crate) fn part(&self) -> &SlidePart {
        &self.part
    }

    pub(crate) fn push_layout(&mut self, layout: SlideLayout) {
        self.layouts.push(layout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Length;

    const MASTER: &str = r#"<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree>
<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title Placeholder 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="457200" y="274638"/><a:ext cx="8229600" cy="1143000"/></a:xfrm></p:spPr></p:sp>
<p:sp><p:nvSpPr><p:cNvPr id="3" name="Text Placeholder 2"/><p:cNvSpPr/><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="457200" y="1600200"/><a:ext cx="8229600" cy="4525963"/></a:xfrm></p:spPr></p:sp>
</p:spTree></p:cSld></p:sldMaster>"#;

    const LAYOUT: &str = r#"<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld name="Title and Content"><p:spTree>
<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>
<p:sp><p:nvSpPr><p:cNvPr id="3" name="Content Placeholder 2"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="457200" y="1700000"/><a:ext cx="4000000" cy="4000000"/></a:xfrm></p:spPr></p:sp>
</p:spTree></p:cSld></p:sldLayout>"#;

    const SLIDE: &str = r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree>
<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>
<p:sp><p:nvSpPr><p:cNvPr id="3" name="Content Placeholder 2"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>
</p:spTree></p:cSld></p:sld>"#;

    fn part(partname: &str, xml: &str) -> SlidePart {
        SlidePart::from_xml(PackURI::new(partname).unwrap(), xml.as_bytes().to_vec()).unwrap()
    }

    fn master_and_layout() -> (SlideMaster, SlideLayout) {
        let master = SlideMaster::new(part("/ppt/slideMasters/slideMaster1.xml", MASTER));
        let layout = SlideLayout::new(
            part("/ppt/slideLayouts/slideLayout2.xml", LAYOUT),
            master.part(),
        );
        (master, layout)
    }

    #[test]
    fn test_layout_inherits_from_master_by_type() {
        let (_, layout) = master_and_layout();
        assert_eq!(layout.name(), "Title and Content");
        assert_eq!(
            layout.master_partname().as_str(),
            "/ppt/slideMasters/slideMaster1.xml"
        );

        let title = layout.placeholder(0).unwrap();
        assert_eq!(title.left(), Some(Length::from_emu(457_200)));
        assert_eq!(title.height(), Some(Length::from_emu(1_143_000)));

        // Direct geometry wins over the master's body placeholder.
        let content = layout.placeholder(1).unwrap();
        assert_eq!(content.top(), Some(Length::from_emu(1_700_000)));
        assert_eq!(content.width(), Some(Length::from_emu(4_000_000)));
    }

    #[test]
    fn test_slide_inherits_from_layout_by_idx() {
        let (_, layout) = master_and_layout();
        let slide = Slide::new(
            256,
            "rId2".into(),
            part("/ppt/slides/slide1.xml", SLIDE),
            Some(&layout),
        );

        assert_eq!(slide.slide_id(), 256);
        assert_eq!(slide.r_id(), "rId2");
        assert_eq!(slide.name(), "");
        assert_eq!(
            slide.layout_partname().map(PackURI::as_str),
            Some("/ppt/slideLayouts/slideLayout2.xml")
        );
        assert_eq!(slide.placeholders().count(), 2);

        let content = slide.placeholder(1).unwrap();
        assert_eq!(content.top(), Some(Length::from_emu(1_700_000)));
        assert!(content.direct_geometry().is_empty());

        let title = slide.placeholder(0).unwrap();
        assert_eq!(title.width(), Some(Length::from_emu(8_229_600)));
    }

    #[test]
    fn test_slide_without_layout() {
        let mut slide = Slide::new(
            300,
            "rId7".into(),
            part("/ppt/slides/slide3.xml", SLIDE),
            None,
        );
        assert!(slide.layout_partname().is_none());
        assert_eq!(slide.placeholder(1).unwrap().left(), None);
        assert!(!slide.is_modified());

        slide
            .placeholder_mut(1)
            .unwrap()
            .set_left(Length::from_emu(10));
        assert!(slide.is_modified());
    }

    #[test]
    fn test_master_layouts() {
        let (mut master, layout) = master_and_layout();
        assert!(master.layouts().is_empty());
        master.push_layout(layout);
        assert_eq!(master.layouts().len(), 1);
        assert_eq!(master.placeholders().count(), 2);
        assert!(master.placeholder_by_type(PlaceholderType::Body).is_some());
        assert!(master.placeholder_by_type(PlaceholderType::Date).is_none());
    }
}
