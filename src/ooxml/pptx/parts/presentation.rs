/// Presentation part - the main part in a .pptx package.
///
/// Corresponds to `/ppt/presentation.xml` in the package.
use crate::common::Length;
use crate::common::xml::{
    attr, attr_i64, attr_local, attr_u32, declared_prefix, escape_xml, prefix_of, qualified,
    with_attrs,
};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::Part;
use log::warn;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Write as FmtWrite;

/// Width of a slide when `<p:sldSz>` is absent (10 in).
pub const DEFAULT_SLIDE_WIDTH: Length = Length::from_emu(9_144_000);
/// Height of a slide when `<p:sldSz>` is absent (7.5 in).
pub const DEFAULT_SLIDE_HEIGHT: Length = Length::from_emu(6_858_000);
pub const DEFAULT_NOTES_WIDTH: Length = Length::from_emu(6_858_000);
pub const DEFAULT_NOTES_HEIGHT: Length = Length::from_emu(9_144_000);

const MIN_SLIDE_ID: u32 = 256;
const MAX_SLIDE_ID: u32 = 2_147_483_647;

/// Children of `<p:presentation>` in schema order.
const CHILD_ORDER: [&[u8]; 15] = [
    b"sldMasterIdLst",
    b"notesMasterIdLst",
    b"handoutMasterIdLst",
    b"sldIdLst",
    b"sldSz",
    b"notesSz",
    b"smartTags",
    b"embeddedFontLst",
    b"custShowLst",
    b"photoAlbum",
    b"custDataLst",
    b"kinsoku",
    b"defaultTextStyle",
    b"modifyVerifier",
    b"extLst",
];

const RANK_SLD_ID_LST: usize = 3;
const RANK_SLD_SZ: usize = 4;
const RANK_NOTES_SZ: usize = 5;

fn child_rank(local_name: &[u8]) -> Option<usize> {
    CHILD_ORDER.iter().position(|name| *name == local_name)
}

/// Slide size from `<p:sldSz>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlideSize {
    pub width: Length,
    pub height: Length,
    /// The `type` attribute (`screen4x3`, `screen16x9`, `custom`, …), verbatim.
    pub kind: Option<String>,
}

impl Default for SlideSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_SLIDE_WIDTH,
            height: DEFAULT_SLIDE_HEIGHT,
            kind: None,
        }
    }
}

/// An entry of `<p:sldIdLst>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlideId {
    /// Presentation-unique slide id, 256 or greater.
    pub id: u32,
    /// Relationship from the presentation part to the slide part.
    pub r_id: String,
}

/// The main presentation part.
///
/// Parsed once when loaded. The model owns slide size, notes size and the
/// slide id list; [`to_xml`](Self::to_xml) writes those back into the
/// original XML and passes every other node through untouched.
#[derive(Debug, Clone)]
pub struct PresentationPart {
    partname: PackURI,
    xml: Vec<u8>,
    slide_size: SlideSize,
    notes_width: Length,
    notes_height: Length,
    slide_ids: Vec<SlideId>,
    master_r_ids: Vec<String>,
    modified: bool,
}

impl PresentationPart {
    /// Create a PresentationPart from an OPC Part.
    pub fn from_part(part: &dyn Part) -> Result<Self> {
        Self::from_xml(part.partname().clone(), part.blob().to_vec())
    }

    /// Parse the presentation XML.
    ///
    /// Absent or malformed sizes take their defaults. Slide ids without a
    /// usable `id` and `r:id` are dropped.
    pub fn from_xml(partname: PackURI, xml: Vec<u8>) -> Result<Self> {
        let mut part = Self {
            partname,
            xml: Vec::new(),
            slide_size: SlideSize::default(),
            notes_width: DEFAULT_NOTES_WIDTH,
            notes_height: DEFAULT_NOTES_HEIGHT,
            slide_ids: Vec::new(),
            master_r_ids: Vec::new(),
            modified: false,
        };

        let mut reader = Reader::from_reader(xml.as_slice());
        reader.config_mut().trim_text(true);
        let mut depth = 0usize;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    depth += 1;
                    part.read_element(&e, depth);
                },
                Ok(Event::Empty(e)) => part.read_element(&e, depth + 1),
                Ok(Event::End(_)) => depth = depth.saturating_sub(1),
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(format!("{}: {}", part.partname, e))),
                _ => {},
            }
        }

        part.xml = xml;
        Ok(part)
    }

    fn read_element(&mut self, e: &BytesStart<'_>, depth: usize) {
        match (depth, e.local_name().as_ref()) {
            (2, b"sldSz") => {
                self.slide_size = SlideSize {
                    width: attr_i64(e, b"cx").map_or(DEFAULT_SLIDE_WIDTH, Length::from_emu),
                    height: attr_i64(e, b"cy").map_or(DEFAULT_SLIDE_HEIGHT, Length::from_emu),
                    kind: attr(e, b"type"),
                };
            },
            (2, b"notesSz") => {
                self.notes_width = attr_i64(e, b"cx").map_or(DEFAULT_NOTES_WIDTH, Length::from_emu);
                self.notes_height =
                    attr_i64(e, b"cy").map_or(DEFAULT_NOTES_HEIGHT, Length::from_emu);
            },
            (3, b"sldId") => match (attr_u32(e, b"id"), attr_local(e, b"id")) {
                (Some(id), Some(r_id)) => self.slide_ids.push(SlideId { id, r_id }),
                _ => warn!("{}: skipping malformed sldId", self.partname),
            },
            (3, b"sldMasterId") => {
                if let Some(r_id) = attr_local(e, b"id") {
                    self.master_r_ids.push(r_id);
                }
            },
            _ => {},
        }
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    pub fn slide_size(&self) -> &SlideSize {
        &self.slide_size
    }

    #[inline]
    pub fn slide_width(&self) -> Length {
        self.slide_size.width
    }

    #[inline]
    pub fn slide_height(&self) -> Length {
        self.slide_size.height
    }

    pub fn set_slide_width(&mut self, width: Length) {
        self.slide_size.width = width;
        self.modified = true;
    }

    pub fn set_slide_height(&mut self, height: Length) {
        self.slide_size.height = height;
        self.modified = true;
    }

    #[inline]
    pub fn notes_width(&self) -> Length {
        self.notes_width
    }

    #[inline]
    pub fn notes_height(&self) -> Length {
        self.notes_height
    }

    pub fn set_notes_width(&mut self, width: Length) {
        self.notes_width = width;
        self.modified = true;
    }

    pub fn set_notes_height(&mut self, height: Length) {
        self.notes_height = height;
        self.modified = true;
    }

    /// Entries of `<p:sldIdLst>`, in presentation order.
    pub fn slide_ids(&self) -> &[SlideId] {
        &self.slide_ids
    }

    /// Relationship ids of the slide masters, in `<p:sldMasterIdLst>` order.
    pub fn master_r_ids(&self) -> &[String] {
        &self.master_r_ids
    }

    /// Append a slide id for the slide related as `r_id`; returns the id.
    pub fn add_slide_id(&mut self, r_id: String) -> u32 {
        let id = self.next_slide_id();
        self.slide_ids.push(SlideId { id, r_id });
        self.modified = true;
        id
    }

    /// Keep only the slide ids for which `keep` returns true.
    pub fn retain_slide_ids<F: FnMut(&SlideId) -> bool>(&mut self, keep: F) {
        let before = self.slide_ids.len();
        self.slide_ids.retain(keep);
        if self.slide_ids.len() != before {
            self.modified = true;
        }
    }

    /// One more than the largest slide id in use (at least 256). Once that
    /// would pass the schema maximum, the lowest unused id from 256 up.
    pub fn next_slide_id(&self) -> u32 {
        let max_id = self
            .slide_ids
            .iter()
            .map(|s| s.id)
            .max()
            .unwrap_or(MIN_SLIDE_ID - 1)
            .max(MIN_SLIDE_ID - 1);
        if max_id < MAX_SLIDE_ID {
            return max_id + 1;
        }

        let used: HashSet<u32> = self.slide_ids.iter().map(|s| s.id).collect();
        (MIN_SLIDE_ID..=MAX_SLIDE_ID)
            .find(|id| !used.contains(id))
            .unwrap_or(MAX_SLIDE_ID)
    }

    #[inline]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Adopt `xml` as the saved state.
    pub(crate) fn mark_saved(&mut self, xml: Vec<u8>) {
        self.xml = xml;
        self.modified = false;
    }

    /// Serialize the part.
    ///
    /// `<p:sldSz>` and `<p:notesSz>` get their `cx`/`cy` replaced and
    /// `<p:sldIdLst>` is regenerated; each is inserted at its schema position
    /// when missing. Everything else is copied from the loaded XML.
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut reader = Reader::from_reader(self.xml.as_slice());
        let mut writer = Writer::new(Vec::with_capacity(self.xml.len() + 512));
        let mut ctx = RewriteContext {
            p_prefix: None,
            r_prefix: "r".to_string(),
            need_sld_id_lst: !self.slide_ids.is_empty(),
            need_sld_sz: true,
            need_notes_sz: true,
        };
        let mut depth = 0usize;
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
                        let root = self.prepare_root(&e, &mut ctx);
                        writer.write_event(Event::Start(root))?;
                        continue;
                    }
                    if depth == 2 {
                        match self.rewrite_child(&e, &mut ctx, writer.get_mut()) {
                            ChildAction::Keep => {},
                            ChildAction::Replaced => {
                                skip_below = Some(2);
                                continue;
                            },
                            ChildAction::Resized(sized) => {
                                writer.write_event(Event::Start(sized))?;
                                continue;
                            },
                        }
                    }
                    writer.write_event(Event::Start(e))?;
                },
                Event::Empty(e) => {
                    if depth == 0 {
                        let root = self.prepare_root(&e, &mut ctx);
                        let end = root.to_end().into_owned();
                        writer.write_event(Event::Start(root))?;
                        self.write_missing(usize::MAX, &mut ctx, writer.get_mut());
                        writer.write_event(Event::End(end))?;
                        continue;
                    }
                    if depth == 1 {
                        match self.rewrite_child(&e, &mut ctx, writer.get_mut()) {
                            ChildAction::Keep => {},
                            ChildAction::Replaced => continue,
                            ChildAction::Resized(sized) => {
                                writer.write_event(Event::Empty(sized))?;
                                continue;
                            },
                        }
                    }
                    writer.write_event(Event::Empty(e))?;
                },
                Event::End(e) => {
                    if depth == 1 {
                        self.write_missing(usize::MAX, &mut ctx, writer.get_mut());
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

    /// Handle a child of the root: first emit whatever owned elements belong
    /// before it, then replace or resize it when the model owns it.
    fn rewrite_child(
        &self,
        e: &BytesStart<'_>,
        ctx: &mut RewriteContext,
        out: &mut Vec<u8>,
    ) -> ChildAction {
        let local = e.local_name();
        if let Some(rank) = child_rank(local.as_ref()) {
            self.write_missing(rank, ctx, out);
        }
        match local.as_ref() {
            b"sldIdLst" => {
                ctx.need_sld_id_lst = false;
                out.extend_from_slice(self.sld_id_lst_xml(ctx).as_bytes());
                ChildAction::Replaced
            },
            b"sldSz" => {
                ctx.need_sld_sz = false;
                ChildAction::Resized(self.with_size(e, self.slide_width(), self.slide_height()))
            },
            b"notesSz" => {
                ctx.need_notes_sz = false;
                ChildAction::Resized(self.with_size(e, self.notes_width, self.notes_height))
            },
            _ => ChildAction::Keep,
        }
    }

    /// Picks up the namespace prefixes and declares `r` when slide ids need
    /// it and the document has no prefix for the relationships namespace.
    fn prepare_root(&self, e: &BytesStart<'_>, ctx: &mut RewriteContext) -> BytesStart<'static> {
        ctx.p_prefix = prefix_of(e);
        match declared_prefix(e, namespace::OFC_RELATIONSHIPS) {
            Some(prefix) => {
                ctx.r_prefix = prefix;
                e.clone().into_owned()
            },
            None if !self.slide_ids.is_empty() => with_attrs(
                e,
                &[("xmlns:r", namespace::OFC_RELATIONSHIPS.to_string())],
            ),
            None => e.clone().into_owned(),
        }
    }

    fn with_size(&self, e: &BytesStart<'_>, cx: Length, cy: Length) -> BytesStart<'static> {
        with_attrs(e, &[("cx", cx.emu().to_string()), ("cy", cy.emu().to_string())])
    }

    /// Write every still-missing owned element that sorts before `rank`.
    fn write_missing(&self, rank: usize, ctx: &mut RewriteContext, out: &mut Vec<u8>) {
        let p = ctx.p_prefix.as_deref();
        if ctx.need_sld_id_lst && RANK_SLD_ID_LST < rank {
            ctx.need_sld_id_lst = false;
            out.extend_from_slice(self.sld_id_lst_xml(ctx).as_bytes());
        }
        if ctx.need_sld_sz && RANK_SLD_SZ < rank {
            ctx.need_sld_sz = false;
            let mut xml = format!(
                r#"<{} cx="{}" cy="{}""#,
                qualified(p, "sldSz"),
                self.slide_size.width.emu(),
                self.slide_size.height.emu()
            );
            if let Some(kind) = &self.slide_size.kind {
                let _ = write!(xml, r#" type="{}""#, escape_xml(kind));
            }
            xml.push_str("/>");
            out.extend_from_slice(xml.as_bytes());
        }
        if ctx.need_notes_sz && RANK_NOTES_SZ < rank {
            ctx.need_notes_sz = false;
            let xml = format!(
                r#"<{} cx="{}" cy="{}"/>"#,
                qualified(p, "notesSz"),
                self.notes_width.emu(),
                self.notes_height.emu()
            );
            out.extend_from_slice(xml.as_bytes());
        }
    }

    fn sld_id_lst_xml(&self, ctx: &RewriteContext) -> String {
        let p = ctx.p_prefix.as_deref();
        let list = qualified(p, "sldIdLst");
        if self.slide_ids.is_empty() {
            return format!("<{}/>", list);
        }

        let mut xml = format!("<{}>", list);
        let sld_id = qualified(p, "sldId");
        for slide_id in &self.slide_ids {
            let _ = write!(
                xml,
                r#"<{} id="{}" {}:id="{}"/>"#,
                sld_id,
                slide_id.id,
                ctx.r_prefix,
                escape_xml(&slide_id.r_id)
            );
        }
        let _ = write!(xml, "</{}>", list);
        xml
    }
}

enum ChildAction {
    Keep,
    /// Written from the model; the original subtree is dropped.
    Replaced,
    Resized(BytesStart<'static>),
}

/// State carried through one [`PresentationPart::to_xml`] pass.
struct RewriteContext {
    p_prefix: Option<String>,
    r_prefix: String,
    need_sld_id_lst: bool,
    need_sld_sz: bool,
    need_notes_sz: bool,
}
