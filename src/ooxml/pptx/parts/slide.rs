/// Slide, slide layout and slide master parts.
///
/// All three share the `<p:cSld>/<p:spTree>` structure, so one part type
/// serves them; only a master carries `<p:sldLayoutIdLst>`.
use crate::common::Length;
use crate::common::xml::{
    attr, attr_i64, attr_local, attr_u32, declared_prefix, escape_xml, prefix_of, qualified,
};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::Part;
use crate::ooxml::pptx::shapes::base::{Geometry, Shape, ShapeType};
use crate::ooxml::pptx::shapes::placeholder::{PlaceholderFormat, PlaceholderType};
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashMap;
use std::fmt::Write as FmtWrite;

/// A slide, slide layout or slide master part.
#[derive(Debug, Clone)]
pub struct SlidePart {
    partname: PackURI,
    xml: Vec<u8>,
    name: Option<String>,
    shapes: Vec<Shape>,
    layout_r_ids: Vec<String>,
}

impl SlidePart {
    pub fn from_part(part: &dyn Part) -> Result<Self> {
        Self::from_xml(part.partname().clone(), part.blob().to_vec())
    }

    /// Parse the name, the top-level shapes of the shape tree and, for a
    /// master, the slide layout relationship ids.
    pub fn from_xml(partname: PackURI, xml: Vec<u8>) -> Result<Self> {
        let mut reader = Reader::from_reader(xml.as_slice());
        reader.config_mut().trim_text(true);

        let mut name = None;
        let mut shapes = Vec::new();
        let mut layout_r_ids = Vec::new();
        let mut depth = 0usize;
        let mut sp_tree: Option<usize> = None;
        let mut current: Option<ShapeReader> = None;

        loop {
            let (e, d, empty) = match reader.read_event() {
                Ok(Event::Start(e)) => {
                    depth += 1;
                    (e, depth, false)
                },
                Ok(Event::Empty(e)) => (e, depth + 1, true),
                Ok(Event::End(_)) => {
                    if current.as_ref().is_some_and(|s| s.depth == depth) {
                        shapes.extend(current.take().map(ShapeReader::finish));
                    } else if let Some(s) = current.as_mut() {
                        s.close(depth);
                    }
                    if sp_tree == Some(depth) {
                        sp_tree = None;
                    }
                    depth = depth.saturating_sub(1);
                    continue;
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(format!("{}: {}", partname, e))),
                _ => continue,
            };

            let local = e.local_name();
            if let Some(s) = current.as_mut() {
                s.open(&e, local.as_ref(), d, empty);
                continue;
            }
            match local.as_ref() {
                b"cSld" if d == 2 => name = attr(&e, b"name"),
                b"spTree" if sp_tree.is_none() && !empty => sp_tree = Some(d),
                b"sldLayoutId" => layout_r_ids.extend(attr_local(&e, b"id")),
                other if sp_tree.is_some_and(|t| t + 1 == d) => {
                    if let Some(shape_type) = ShapeType::from_local_name(other) {
                        let reader = ShapeReader::new(d, shape_type);
                        if empty {
                            shapes.push(reader.finish());
                        } else {
                            current = Some(reader);
                        }
                    }
                },
                _ => {},
            }
        }

        Ok(Self {
            partname,
            xml,
            name,
            shapes,
            layout_r_ids,
        })
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// The `name` attribute of `<p:cSld>`, empty when absent.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut [Shape] {
        &mut self.shapes
    }

    /// Relationship ids from `<p:sldLayoutIdLst>`, in order. Empty except on
    /// a slide master.
    pub fn layout_r_ids(&self) -> &[String] {
        &self.layout_r_ids
    }

    /// Placeholder shapes, in tree order.
    pub fn placeholders(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| s.is_placeholder())
    }

    /// The placeholder with `idx`.
    pub fn placeholder(&self, idx: u32) -> Option<&Shape> {
        self.placeholders()
            .find(|s| s.placeholder_format().is_some_and(|f| f.idx == idx))
    }

    pub fn placeholder_mut(&mut self, idx: u32) -> Option<&mut Shape> {
        self.shapes
            .iter_mut()
            .find(|s| s.placeholder_format().is_some_and(|f| f.idx == idx))
    }

    /// The first placeholder of `ph_type`.
    pub fn placeholder_by_type(&self, ph_type: PlaceholderType) -> Option<&Shape> {
        self.placeholders()
            .find(|s| s.placeholder_format().is_some_and(|f| f.ph_type == ph_type))
    }

    pub fn is_modified(&self) -> bool {
        self.shapes.iter().any(Shape::is_modified)
    }

    /// Serialize the part, writing the geometry of every modified shape.
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let targets: HashMap<u32, Geometry> = self
            .shapes
            .iter()
            .filter(|s| s.is_modified())
            .map(|s| (s.shape_id(), s.geometry()))
            .collect();
        if targets.is_empty() {
            return Ok(self.xml.clone());
        }
        rewrite_geometry(&self.xml, &targets)
    }

    /// Adopt `xml` as the saved state and clear shape modification flags.
    pub(crate) fn mark_saved(&mut self, xml: Vec<u8>) {
        self.xml = xml;
        for shape in &mut self.shapes {
            shape.mark_saved();
        }
    }

    /// XML of a new slide that takes its placeholders from `layout`.
    ///
    /// Date, footer and slide number placeholders are left out. The clones
    /// have no geometry of their own, so they inherit position and size from
    /// the layout.
    pub(crate) fn new_slide_xml(layout: &SlidePart) -> String {
        let mut xml = String::with_capacity(1024);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        let _ = write!(
            xml,
            r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
            namespace::DML_MAIN,
            namespace::OFC_RELATIONSHIPS,
            namespace::PML_MAIN
        );
        xml.push_str(
            r#"<p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#,
        );

        let cloned = layout.placeholders().filter_map(Shape::placeholder_format).filter(|f| {
            !matches!(
                f.ph_type,
                PlaceholderType::Date | PlaceholderType::Footer | PlaceholderType::SlideNumber
            )
        });
        for (shape_id, format) in (2u32..).zip(cloned) {
            let _ = write!(
                xml,
                r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>{}</p:nvPr></p:nvSpPr><p:spPr/>"#,
                shape_id,
                escape_xml(&format!("{} {}", format.ph_type.base_name(), shape_id - 1)),
                format.to_xml("p")
            );
            if format.ph_type.has_text_body() {
                xml.push_str("<p:txBody><a:bodyPr/><a:lstStyle/><a:p/></p:txBody>");
            }
            xml.push_str("</p:sp>");
        }

        xml.push_str(
            "</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>",
        );
        xml
    }
}

/// Collects one top-level shape while its subtree is read.
struct ShapeReader {
    depth: usize,
    shape_type: ShapeType,
    shape_id: Option<u32>,
    name: Option<String>,
    placeholder: Option<PlaceholderFormat>,
    geometry: Geometry,
    xfrm_seen: bool,
    xfrm_depth: Option<usize>,
}

impl ShapeReader {
    fn new(depth: usize, shape_type: ShapeType) -> Self {
        Self {
            depth,
            shape_type,
            shape_id: None,
            name: None,
            placeholder: None,
            geometry: Geometry::default(),
            xfrm_seen: false,
            xfrm_depth: None,
        }
    }

    fn open(&mut self, e: &BytesStart<'_>, local: &[u8], depth: usize, empty: bool) {
        let rel = depth - self.depth;
        match local {
            b"cNvPr" if rel == 2 && self.shape_id.is_none() => {
                self.shape_id = Some(attr_u32(e, b"id").unwrap_or(0));
                self.name = attr(e, b"name");
            },
            b"ph" if rel == 3 && self.placeholder.is_none() => {
                self.placeholder = Some(PlaceholderFormat::from_element(e));
            },
            // <p:xfrm> of a graphic frame, <a:xfrm> in spPr/grpSpPr
            b"xfrm" if (rel == 1 || rel == 2) && !self.xfrm_seen => {
                self.xfrm_seen = true;
                if !empty {
                    self.xfrm_depth = Some(depth);
                }
            },
            b"off" if self.xfrm_depth == Some(depth - 1) => {
                self.geometry.left = attr_i64(e, b"x").map(Length::from_emu);
                self.geometry.top = attr_i64(e, b"y").map(Length::from_emu);
            },
            b"ext" if self.xfrm_depth == Some(depth - 1) => {
                self.geometry.width = attr_i64(e, b"cx").map(Length::from_emu);
                self.geometry.height = attr_i64(e, b"cy").map(Length::from_emu);
            },
            _ => {},
        }
    }

    fn close(&mut self, depth: usize) {
        if self.xfrm_depth == Some(depth) {
            self.xfrm_depth = None;
        }
    }

    fn finish(self) -> Shape {
        Shape::new(
            self.shape_id.unwrap_or(0),
            self.name.unwrap_or_default(),
            self.shape_type,
            self.placeholder,
            self.geometry,
        )
    }
}

/// What to do with an element opened inside a shape being rewritten.
enum Open {
    /// Copy it through.
    Copy,
    /// Already written.
    Written,
    /// Drop it and its subtree.
    Drop,
}

/// Rewrite state of one top-level shape.
struct ShapeRewrite {
    depth: usize,
    graphic_frame: bool,
    prefix: Option<String>,
    target: Option<Geometry>,
    cnvpr_seen: bool,
    props_depth: Option<usize>,
    xfrm_depth: Option<usize>,
    done: bool,
}

impl ShapeRewrite {
    fn new(e: &BytesStart<'_>, depth: usize, shape_type: ShapeType) -> Self {
        Self {
            depth,
            graphic_frame: shape_type == ShapeType::GraphicFrame,
            prefix: prefix_of(e),
            target: None,
            cnvpr_seen: false,
            props_depth: None,
            xfrm_depth: None,
            done: false,
        }
    }

    fn open(
        &mut self,
        e: &BytesStart<'_>,
        depth: usize,
        empty: bool,
        targets: &HashMap<u32, Geometry>,
        a_prefix: &str,
        out: &mut Vec<u8>,
    ) -> Open {
        let local = e.local_name();
        let local = local.as_ref();
        let rel = depth - self.depth;

        if self.xfrm_depth == Some(depth - 1) && matches!(local, b"off" | b"ext") {
            return Open::Drop;
        }
        if local == b"cNvPr" && rel == 2 && !self.cnvpr_seen {
            self.cnvpr_seen = true;
            self.target = attr_u32(e, b"id").and_then(|id| targets.get(&id).copied());
            return Open::Copy;
        }
        let Some(geometry) = self.target else {
            return Open::Copy;
        };
        if self.done {
            return Open::Copy;
        }

        if rel == 1 && self.graphic_frame {
            return match local {
                b"xfrm" => self.replace_xfrm(e, depth, empty, a_prefix, &geometry, out),
                b"graphic" | b"extLst" => {
                    let name = self.frame_xfrm_name();
                    self.insert_xfrm(&name, a_prefix, &geometry, out);
                    Open::Copy
                },
                _ => Open::Copy,
            };
        }
        if rel == 1 && matches!(local, b"spPr" | b"grpSpPr") {
            if empty {
                write_open_tag(e, out);
                self.insert_xfrm(&qualified(Some(a_prefix), "xfrm"), a_prefix, &geometry, out);
                write_close_tag(e, out);
                return Open::Written;
            }
            self.props_depth = Some(depth);
            return Open::Copy;
        }
        if self.props_depth == Some(depth - 1) {
            if local == b"xfrm" {
                return self.replace_xfrm(e, depth, empty, a_prefix, &geometry, out);
            }
            self.insert_xfrm(&qualified(Some(a_prefix), "xfrm"), a_prefix, &geometry, out);
        }
        Open::Copy
    }

    fn close(&mut self, depth: usize, a_prefix: &str, out: &mut Vec<u8>) {
        if self.xfrm_depth == Some(depth) {
            self.xfrm_depth = None;
        }
        let Some(geometry) = self.target else {
            return;
        };
        if self.props_depth == Some(depth) {
            self.props_depth = None;
            if !self.done {
                self.insert_xfrm(&qualified(Some(a_prefix), "xfrm"), a_prefix, &geometry, out);
            }
        }
        if self.graphic_frame && depth == self.depth && !self.done {
            let name = self.frame_xfrm_name();
            self.insert_xfrm(&name, a_prefix, &geometry, out);
        }
    }

    fn frame_xfrm_name(&self) -> String {
        qualified(self.prefix.as_deref(), "xfrm")
    }

    fn insert_xfrm(&mut self, name: &str, a_prefix: &str, geometry: &Geometry, out: &mut Vec<u8>) {
        out.extend_from_slice(format!("<{}>", name).as_bytes());
        out.extend_from_slice(off_ext_xml(a_prefix, geometry).as_bytes());
        out.extend_from_slice(format!("</{}>", name).as_bytes());
        self.done = true;
    }

    /// Keep an existing xfrm element and its attributes; its `off`/`ext`
    /// children are replaced, any others (`chOff`, `chExt`) kept.
    fn replace_xfrm(
        &mut self,
        e: &BytesStart<'_>,
        depth: usize,
        empty: bool,
        a_prefix: &str,
        geometry: &Geometry,
        out: &mut Vec<u8>,
    ) -> Open {
        // <p:xfrm> still holds DrawingML children.
        let child_prefix = match prefix_of(e) {
            Some(prefix) if !self.graphic_frame => prefix,
            _ => a_prefix.to_string(),
        };
        write_open_tag(e, out);
        out.extend_from_slice(off_ext_xml(&child_prefix, geometry).as_bytes());
        if empty {
            write_close_tag(e, out);
        } else {
            self.xfrm_depth = Some(depth);
        }
        self.done = true;
        Open::Written
    }
}

fn off_ext_xml(a_prefix: &str, geometry: &Geometry) -> String {
    let emu = |v: Option<Length>| v.unwrap_or(Length::ZERO).emu();
    format!(
        r#"<{}:off x="{}" y="{}"/><{}:ext cx="{}" cy="{}"/>"#,
        a_prefix,
        emu(geometry.left),
        emu(geometry.top),
        a_prefix,
        emu(geometry.width),
        emu(geometry.height)
    )
}

fn write_open_tag(e: &BytesStart<'_>, out: &mut Vec<u8>) {
    out.push(b'<');
    out.extend_from_slice(e);
    out.push(b'>');
}

fn write_close_tag(e: &BytesStart<'_>, out: &mut Vec<u8>) {
    out.extend_from_slice(b"</");
    out.extend_from_slice(e.name().as_ref());
    out.push(b'>');
}

/// Copy `xml`, writing the geometry in `targets` (keyed by shape id) into
/// the matching top-level shapes of the shape tree.
pub(crate) fn rewrite_geometry(xml: &[u8], targets: &HashMap<u32, Geometry>) -> Result<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + 256));
    let mut a_prefix = "a".to_string();
    let mut depth = 0usize;
    let mut sp_tree: Option<usize> = None;
    let mut shape: Option<ShapeRewrite> = None;
    let mut skip_below: Option<usize> = None;

    loop {
        let event = reader.read_event()?;

        if let Some(skip) = skip_below {
            match event {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth < skip {
                        skip_below = None;
                    }
                },
                Event::Eof => break,
                _ => {},
            }
            continue;
        }

        match event {
            Event::Start(e) => {
                depth += 1;
                if depth == 1 {
                    if let Some(prefix) = declared_prefix(&e, namespace::DML_MAIN) {
                        a_prefix = prefix;
                    }
                }
                match shape.as_mut() {
                    Some(s) => match s.open(&e, depth, false, targets, &a_prefix, writer.get_mut()) {
                        Open::Copy => {},
                        Open::Written => continue,
                        Open::Drop => {
                            skip_below = Some(depth);
                            continue;
                        },
                    },
                    None => {
                        let local = e.local_name();
                        if local.as_ref() == b"spTree" && sp_tree.is_none() {
                            sp_tree = Some(depth);
                        } else if sp_tree.is_some_and(|t| t + 1 == depth) {
                            if let Some(shape_type) = ShapeType::from_local_name(local.as_ref()) {
                                shape = Some(ShapeRewrite::new(&e, depth, shape_type));
                            }
                        }
                    },
                }
                writer.write_event(Event::Start(e))?;
            },
            Event::Empty(e) => {
                if let Some(s) = shape.as_mut() {
                    match s.open(&e, depth + 1, true, targets, &a_prefix, writer.get_mut()) {
                        Open::Copy => {},
                        Open::Written | Open::Drop => continue,
                    }
                }
                writer.write_event(Event::Empty(e))?;
            },
            Event::End(e) => {
                if let Some(s) = shape.as_mut() {
                    s.close(depth, &a_prefix, writer.get_mut());
                    if s.depth == depth {
                        shape = None;
                    }
                }
                if sp_tree == Some(depth) {
                    sp_tree = None;
                }
                depth = depth.saturating_sub(1);
                writer.write_event(Event::End(e))?;
            },
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    Ok(writer.into_inner())
}
