/// Main presentation object - the high-level API for working with presentations.
use crate::common::{Error, Length, Result};
use crate::ooxml::error::Result as OoxmlResult;
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::error::Result as OpcResult;
use crate::ooxml::opc::{OpcPackage, PackURI, PackageWriter, Part, XmlPart};
use crate::ooxml::pptx::options::SaveOptions;
use crate::ooxml::pptx::package::Package;
use crate::ooxml::pptx::parts::{PresentationPart, SlidePart, SlideSize};
use crate::ooxml::pptx::slide::{Slide, SlideLayout, SlideMaster};
use crate::ooxml::pptx::slides::Slides;
use log::{debug, warn};
use std::io::{Read, Seek, Write};
use std::path::Path;

/// A PowerPoint presentation.
///
/// Owns the package it was read from. Slide size and the slide collection
/// are parsed once on load; edits are kept in memory until
/// [`save`](Self::save) or one of the other writers serializes the package.
///
/// # Examples
///
/// ```rust,no_run
/// use slidedeck::{Length, Presentation};
///
/// let mut pres = Presentation::open("presentation.pptx")?;
/// println!(
///     "{} slides, {} x {}",
///     pres.slides().len(),
///     pres.slide_width(),
///     pres.slide_height()
/// );
///
/// pres.set_slide_width(Length::from_emu(8_000_000));
/// pres.set_slide_height(Length::from_emu(5_000_000));
/// pres.save("resized.pptx")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Presentation {
    package: OpcPackage,
    part: PresentationPart,
    slides: Slides,
    masters: Vec<SlideMaster>,
}

impl Presentation {
    /// Open a .pptx file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Package::open(path)?.into_presentation()?)
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Ok(Package::from_reader(reader)?.into_presentation()?)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Ok(Package::from_bytes(data)?.into_presentation()?)
    }

    /// A new, empty 4:3 presentation built from the default template.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slidedeck::{Length, Presentation};
    ///
    /// let pres = Presentation::new()?;
    /// assert_eq!(pres.slide_width(), Length::from_emu(9_144_000));
    /// assert_eq!(pres.slide_height(), Length::from_emu(6_858_000));
    /// assert_eq!(pres.slide_layouts().len(), 4);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new() -> Result<Self> {
        Ok(Package::new()?.into_presentation()?)
    }

    /// Parse the presentation part, the masters with their layouts, and the
    /// slides, in that order, so every placeholder can resolve its parent.
    pub(crate) fn load(package: OpcPackage) -> OoxmlResult<Self> {
        let pres_part = package.main_document_part()?;
        let mut part = PresentationPart::from_part(pres_part)?;

        let mut masters = Vec::with_capacity(part.master_r_ids().len());
        for r_id in part.master_r_ids() {
            match load_master(&package, pres_part, r_id) {
                Ok(master) => masters.push(master),
                Err(e) => warn!("Skipping slide master {}: {}", r_id, e),
            }
        }

        let mut slides = Slides::new();
        let mut unresolved = Vec::new();
        for slide_id in part.slide_ids() {
            let slide_part = match related_part(&package, pres_part, &slide_id.r_id) {
                Ok(p) => p,
                Err(e) => {
                    warn!("Skipping slide {} ({}): {}", slide_id.id, slide_id.r_id, e);
                    unresolved.push(slide_id.id);
                    continue;
                },
            };
            let layout = layout_of(slide_part, &masters);
            let slide = SlidePart::from_part(slide_part)?;
            slides.push(Slide::new(slide_id.id, slide_id.r_id.clone(), slide, layout));
        }
        // Dropped entries must not be written back: their rIds are free for
        // reuse by add_slide.
        if !unresolved.is_empty() {
            part.retain_slide_ids(|s| !unresolved.contains(&s.id));
        }

        debug!(
            "Loaded presentation: {} parts, {} masters, {} slides",
            package.part_count(),
            masters.len(),
            slides.len()
        );

        Ok(Self {
            package,
            part,
            slides,
            masters,
        })
    }

    /// Slide width; 9 144 000 EMU (10 in) when the document has no
    /// `<p:sldSz>`.
    #[inline]
    pub fn slide_width(&self) -> Length {
        self.part.slide_width()
    }

    /// Store a new slide width verbatim.
    ///
    /// No validation takes place and nothing else changes: the height stays
    /// as it is and shapes keep their positions.
    #[inline]
    pub fn set_slide_width(&mut self, width: Length) {
        self.part.set_slide_width(width);
    }

    /// Slide height; 6 858 000 EMU (7.5 in) when the document has no
    /// `<p:sldSz>`.
    #[inline]
    pub fn slide_height(&self) -> Length {
        self.part.slide_height()
    }

    /// Store a new slide height verbatim; see
    /// [`set_slide_width`](Self::set_slide_width).
    #[inline]
    pub fn set_slide_height(&mut self, height: Length) {
        self.part.set_slide_height(height);
    }

    pub fn slide_size(&self) -> &SlideSize {
        self.part.slide_size()
    }

    pub fn set_slide_size(&mut self, width: Length, height: Length) {
        self.part.set_slide_width(width);
        self.part.set_slide_height(height);
    }

    /// Notes page width; 6 858 000 EMU when the document has no
    /// `<p:notesSz>`.
    pub fn notes_width(&self) -> Length {
        self.part.notes_width()
    }

    pub fn set_notes_width(&mut self, width: Length) {
        self.part.set_notes_width(width);
    }

    pub fn notes_height(&self) -> Length {
        self.part.notes_height()
    }

    pub fn set_notes_height(&mut self, height: Length) {
        self.part.set_notes_height(height);
    }

    /// The slides, in presentation order.
    ///
    /// Always the same collection: repeated calls return the same object.
    #[inline]
    pub fn slides(&self) -> &Slides {
        &self.slides
    }

    #[inline]
    pub fn slides_mut(&mut self) -> &mut Slides {
        &mut self.slides
    }

    pub fn slide_masters(&self) -> &[SlideMaster] {
        &self.masters
    }

    /// Layouts of the first slide master.
    pub fn slide_layouts(&self) -> &[SlideLayout] {
        self.masters.first().map(SlideMaster::layouts).unwrap_or_default()
    }

    /// Append a new slide based on layout `layout_index` of the first master.
    ///
    /// The slide gets a copy of the layout's placeholders, except date,
    /// footer and slide number, positioned by inheritance from the layout.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slidedeck::Presentation;
    ///
    /// let mut pres = Presentation::new()?;
    /// let slide = pres.add_slide(1)?;
    /// assert_eq!(slide.placeholders().count(), 2);
    /// assert_eq!(slide.partname().as_str(), "/ppt/slides/slide1.xml");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn add_slide(&mut self, layout_index: usize) -> Result<&mut Slide> {
        let layout = self
            .masters
            .first()
            .and_then(|m| m.layouts().get(layout_index))
            .ok_or_else(|| Error::ComponentNotFound(format!("slide layout {}", layout_index)))?;

        let partname = self.package.next_partname("/ppt/slides/slide%d.xml")?;
        let xml = SlidePart::new_slide_xml(layout.part()).into_bytes();
        let slide_part = SlidePart::from_xml(partname.clone(), xml.clone())?;

        let mut opc_part = XmlPart::new(partname.clone(), ct::PML_SLIDE.to_string(), xml);
        opc_part.relate_to(layout.partname(), rt::SLIDE_LAYOUT);
        self.package.add_part(Box::new(opc_part));

        let r_id = self
            .package
            .get_part_mut(self.part.partname())?
            .relate_to(&partname, rt::SLIDE);
        let slide_id = self.part.add_slide_id(r_id.clone());
        debug!("Added slide {} as {} ({})", slide_id, partname, r_id);

        Ok(self
            .slides
            .push(Slide::new(slide_id, r_id, slide_part, Some(layout))))
    }

    /// Whether anything changed since load or the last save.
    pub fn is_modified(&self) -> bool {
        self.part.is_modified() || self.slides.iter().any(Slide::is_modified)
    }

    /// Save to `path` with default options.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.save_with(path, &SaveOptions::default())
    }

    pub fn save_with<P: AsRef<Path>>(&mut self, path: P, options: &SaveOptions) -> Result<()> {
        let bytes = self.to_bytes_with(options)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    pub fn write_to<W: Write>(&mut self, writer: W) -> Result<()> {
        self.write_to_with(writer, &SaveOptions::default())
    }

    pub fn write_to_with<W: Write>(&mut self, mut writer: W, options: &SaveOptions) -> Result<()> {
        let bytes = self.to_bytes_with(options)?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    /// Serialize the package to a byte vector.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.to_bytes_with(&SaveOptions::default())
    }

    fn to_bytes_with(&mut self, options: &SaveOptions) -> Result<Vec<u8>> {
        self.flush()?;
        let bytes = PackageWriter::to_bytes_with(&self.package, options.phys_writer())?;
        debug!(
            "Wrote presentation: {} parts, {} bytes",
            self.package.part_count(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Write model state back into the package parts. The presentation part
    /// is always rewritten so a missing `<p:sldSz>` is filled in.
    fn flush(&mut self) -> Result<()> {
        for slide in self.slides.iter_mut() {
            if !slide.is_modified() {
                continue;
            }
            let xml = slide.part().to_xml()?;
            self.package
                .get_part_mut(slide.partname())?
                .set_blob(xml.clone());
            slide.part_mut().mark_saved(xml);
        }

        let xml = self.part.to_xml()?;
        self.package
            .get_part_mut(self.part.partname())?
            .set_blob(xml.clone());
        self.part.mark_saved(xml);
        Ok(())
    }

    /// The parsed presentation part.
    pub fn part(&self) -> &PresentationPart {
        &self.part
    }

    /// The underlying OPC package, as of the last save.
    pub fn opc_package(&self) -> &OpcPackage {
        &self.package
    }
}

/// The part `source` relates to as `r_id`.
fn related_part<'p>(
    package: &'p OpcPackage,
    source: &dyn Part,
    r_id: &str,
) -> OpcResult<&'p dyn Part> {
    package.get_part(&source.related_partname(r_id)?)
}

fn load_master(package: &OpcPackage, pres_part: &dyn Part, r_id: &str) -> OoxmlResult<SlideMaster> {
    let master_part = related_part(package, pres_part, r_id)?;
    let mut master = SlideMaster::new(SlidePart::from_part(master_part)?);

    for layout_r_id in master.part().layout_r_ids().to_vec() {
        let layout_part = match related_part(package, master_part, &layout_r_id) {
            Ok(p) => p,
            Err(e) => {
                warn!("Skipping slide layout {} of {}: {}", layout_r_id, master.partname(), e);
                continue;
            },
        };
        let layout = SlideLayout::new(SlidePart::from_part(layout_part)?, master.part());
        master.push_layout(layout);
    }
    Ok(master)
}

/// The loaded layout a slide part relates to, if any.
fn layout_of<'m>(slide_part: &dyn Part, masters: &'m [SlideMaster]) -> Option<&'m SlideLayout> {
    let partname: PackURI = slide_part
        .rels()
        .part_with_reltype(rt::SLIDE_LAYOUT)
        .and_then(|rel| rel.target_partname())
        .ok()?;
    let layout = masters
        .iter()
        .flat_map(SlideMaster::layouts)
        .find(|l| l.partname() == &partname);
    if layout.is_none() {
        warn!("{} refers to unknown layout {}", slide_part.partname(), partname);
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::options::Compression;

    #[test]
    fn test_new_presentation() {
        let pres = Presentation::new().unwrap();
        assert_eq!(pres.slide_width(), Length::from_emu(9_144_000));
        assert_eq!(pres.slide_height(), Length::from_emu(6_858_000));
        assert_eq!(pres.slide_size().kind.as_deref(), Some("screen4x3"));
        assert_eq!(pres.notes_width(), Length::from_emu(6_858_000));
        assert!(pres.slides().is_empty());
        assert_eq!(pres.slide_masters().len(), 1);

        let names: Vec<&str> = pres.slide_layouts().iter().map(SlideLayout::name).collect();
        assert_eq!(names, ["Title Slide", "Title and Content", "Title Only", "Blank"]);
        assert!(!pres.is_modified());
    }

    #[test]
    fn test_setters_are_independent() {
        let mut pres = Presentation::new().unwrap();
        pres.set_slide_width(Length::from_emu(12_192_000));
        assert_eq!(pres.slide_height(), Length::from_emu(6_858_000));
        pres.set_slide_height(Length::ZERO);
        assert_eq!(pres.slide_width(), Length::from_emu(12_192_000));
        assert_eq!(pres.slide_height(), Length::ZERO);
        assert!(pres.is_modified());
    }

    #[test]
    fn test_add_slide_inherits_layout_geometry() {
        let mut pres = Presentation::new().unwrap();
        let layout = &pres.slide_layouts()[1];
        let expected = layout.placeholder(1).unwrap().geometry();
        assert!(expected.width.is_some());

        let slide = pres.add_slide(1).unwrap();
        assert_eq!(slide.slide_id(), 256);
        assert_eq!(
            slide.layout_partname().map(PackURI::as_str),
            Some("/ppt/slideLayouts/slideLayout2.xml")
        );
        let content = slide.placeholder(1).unwrap();
        assert_eq!(content.geometry(), expected);
        assert!(content.direct_geometry().is_empty());

        let second = pres.add_slide(3).unwrap();
        assert_eq!(second.slide_id(), 257);
        assert_eq!(second.placeholders().count(), 0);
        assert_eq!(pres.slides().len(), 2);
    }

    #[test]
    fn test_add_slide_unknown_layout() {
        let mut pres = Presentation::new().unwrap();
        assert!(matches!(pres.add_slide(9), Err(Error::ComponentNotFound(_))));
        assert!(pres.slides().is_empty());
    }

    #[test]
    fn test_round_trip_through_bytes() {
        let mut pres = Presentation::new().unwrap();
        pres.add_slide(0).unwrap();
        pres.add_slide(1).unwrap();
        pres.set_slide_size(Length::from_emu(8_000_000), Length::from_emu(5_000_000));
        pres.slides_mut()
            .get_mut(1)
            .and_then(|s| s.placeholder_mut(1))
            .unwrap()
            .set_left(Length::from_emu(100));

        let bytes = pres.to_bytes().unwrap();
        assert!(!pres.is_modified());

        let reopened = Presentation::from_bytes(bytes).unwrap();
        assert_eq!(reopened.slide_width(), Length::from_emu(8_000_000));
        assert_eq!(reopened.slide_height(), Length::from_emu(5_000_000));
        assert_eq!(reopened.slides().len(), 2);

        let content = reopened.slides()[1].placeholder(1).unwrap();
        assert_eq!(content.left(), Some(Length::from_emu(100)));
        assert_eq!(
            content.direct_geometry().left,
            Some(Length::from_emu(100))
        );
        // The rest of the written xfrm is the layout's geometry.
        let layout_geometry = reopened.slide_layouts()[1].placeholder(1).unwrap().geometry();
        assert_eq!(content.width(), layout_geometry.width);
        assert_eq!(content.top(), layout_geometry.top);
    }

    #[test]
    fn test_stored_compression() {
        let mut pres = Presentation::new().unwrap();
        let options = SaveOptions::new().with_compression(Compression::Stored);
        let mut out = Vec::new();
        pres.write_to_with(&mut out, &options).unwrap();
        let reopened = Presentation::from_reader(std::io::Cursor::new(out)).unwrap();
        assert_eq!(reopened.slide_width(), Length::from_emu(9_144_000));
    }
}
