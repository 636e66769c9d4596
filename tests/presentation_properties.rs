//! Slide size and slide collection behaviour of `Presentation`, against
//! packages assembled in memory.

use proptest::prelude::*;
use slidedeck::{Error, Length, Presentation};
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

const PML_NS: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const SLIDE_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";

/// A minimal presentation package.
///
/// `slides` lists `(sldId id, partname number)` in `<p:sldIdLst>` order;
/// slide `n` is related as `rId{n}` and named "Slide n". `dangling` adds a
/// `<p:sldId>` whose relationship does not exist.
struct Fixture {
    size: Option<(i64, i64)>,
    slides: Vec<(u32, u32)>,
    dangling: bool,
}

impl Fixture {
    fn sized(cx: i64, cy: i64) -> Self {
        Self {
            size: Some((cx, cy)),
            slides: Vec::new(),
            dangling: false,
        }
    }

    fn with_slides(mut self, slides: &[(u32, u32)]) -> Self {
        self.slides = slides.to_vec();
        self
    }

    fn build(&self) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        let mut overrides = String::from(
            r#"<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>"#,
        );
        for (_, n) in &self.slides {
            overrides.push_str(&format!(
                r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
                n
            ));
        }
        writer.start_file("[Content_Types].xml", options).unwrap();
        write!(
            writer,
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>{}</Types>"#,
            overrides
        )
        .unwrap();

        writer.start_file("_rels/.rels", options).unwrap();
        writer
            .write_all(br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#)
            .unwrap();

        let mut sld_ids = String::new();
        let mut rels = String::new();
        for (id, n) in &self.slides {
            sld_ids.push_str(&format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, id, n));
            rels.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="{}" Target="slides/slide{}.xml"/>"#,
                n, SLIDE_REL, n
            ));
        }
        if self.dangling {
            sld_ids.push_str(r#"<p:sldId id="999" r:id="rId99"/>"#);
        }
        let sld_id_lst = if sld_ids.is_empty() {
            String::new()
        } else {
            format!("<p:sldIdLst>{}</p:sldIdLst>", sld_ids)
        };
        let sld_sz = self
            .size
            .map(|(cx, cy)| format!(r#"<p:sldSz cx="{}" cy="{}"/>"#, cx, cy))
            .unwrap_or_default();

        writer.start_file("ppt/presentation.xml", options).unwrap();
        write!(
            writer,
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation xmlns:r="{}" xmlns:p="{}">{}{}<p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
            R_NS, PML_NS, sld_id_lst, sld_sz
        )
        .unwrap();

        writer.start_file("ppt/_rels/presentation.xml.rels", options).unwrap();
        write!(
            writer,
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
            rels
        )
        .unwrap();

        for (_, n) in &self.slides {
            writer
                .start_file(format!("ppt/slides/slide{}.xml", n), options)
                .unwrap();
            write!(
                writer,
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld xmlns:p="{}"><p:cSld name="Slide {}"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld></p:sld>"#,
                PML_NS, n
            )
            .unwrap();
        }

        writer.finish().unwrap().into_inner()
    }

    fn open(&self) -> Presentation {
        Presentation::from_bytes(self.build()).unwrap()
    }
}

fn presentation_xml(package: &[u8]) -> String {
    let mut archive = ZipArchive::new(Cursor::new(package)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("ppt/presentation.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

#[test]
fn fixture_size_reads_back_exactly() {
    let pres = Fixture::sized(9_144_000, 6_858_000).open();
    assert_eq!(pres.slide_width(), Length::from_emu(9_144_000));
    assert_eq!(pres.slide_height(), Length::from_emu(6_858_000));
    assert_eq!(pres.slide_width().inches(), 10.0);
    assert_eq!(pres.slide_height().inches(), 7.5);
}

#[test]
fn reads_are_free_of_side_effects() {
    let pres = Fixture::sized(12_192_000, 6_858_000).open();
    for _ in 0..3 {
        assert_eq!(pres.slide_width(), Length::from_emu(12_192_000));
        assert_eq!(pres.slide_height(), Length::from_emu(6_858_000));
    }
    assert!(!pres.is_modified());
}

#[test]
fn new_size_survives_save_and_reopen() {
    let mut pres = Fixture::sized(9_144_000, 6_858_000).open();
    pres.set_slide_width(Length::from_emu(8_000_000));
    pres.set_slide_height(Length::from_emu(5_000_000));
    assert_eq!(pres.slide_width(), Length::from_emu(8_000_000));
    assert_eq!(pres.slide_height(), Length::from_emu(5_000_000));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resized.pptx");
    pres.save(&path).unwrap();
    assert!(!pres.is_modified());

    let reopened = Presentation::open(&path).unwrap();
    assert_eq!(reopened.slide_width(), Length::from_emu(8_000_000));
    assert_eq!(reopened.slide_height(), Length::from_emu(5_000_000));
    assert_eq!(reopened.notes_width(), Length::from_emu(6_858_000));
}

#[test]
fn width_and_height_setters_are_independent() {
    let mut pres = Fixture::sized(9_144_000, 6_858_000).open();

    pres.set_slide_width(Length::from_emu(1_234_567));
    assert_eq!(pres.slide_height(), Length::from_emu(6_858_000));

    pres.set_slide_height(Length::from_emu(7_654_321));
    assert_eq!(pres.slide_width(), Length::from_emu(1_234_567));

    let bytes = pres.to_bytes().unwrap();
    let reopened = Presentation::from_bytes(bytes).unwrap();
    assert_eq!(reopened.slide_width(), Length::from_emu(1_234_567));
    assert_eq!(reopened.slide_height(), Length::from_emu(7_654_321));
}

#[test]
fn setters_store_zero_and_negative_verbatim() {
    let mut pres = Fixture::sized(9_144_000, 6_858_000).open();
    pres.set_slide_width(Length::ZERO);
    pres.set_slide_height(Length::from_emu(-914_400));
    assert_eq!(pres.slide_width(), Length::ZERO);
    assert_eq!(pres.slide_height(), Length::from_emu(-914_400));

    let reopened = Presentation::from_bytes(pres.to_bytes().unwrap()).unwrap();
    assert_eq!(reopened.slide_width(), Length::ZERO);
    assert_eq!(reopened.slide_height(), Length::from_emu(-914_400));
}

#[test]
fn missing_slide_size_defaults_and_is_written() {
    let mut pres = Fixture {
        size: None,
        slides: Vec::new(),
        dangling: false,
    }
    .open();
    assert_eq!(pres.slide_width(), Length::from_emu(9_144_000));
    assert_eq!(pres.slide_height(), Length::from_emu(6_858_000));

    let bytes = pres.to_bytes().unwrap();
    let xml = presentation_xml(&bytes);
    assert!(xml.contains(r#"<p:sldSz cx="9144000" cy="6858000"/>"#), "{}", xml);
    // Schema order: sldSz comes before notesSz.
    assert!(xml.find("p:sldSz").unwrap() < xml.find("p:notesSz").unwrap());
}

#[test]
fn zero_slides() {
    let pres = Fixture::sized(9_144_000, 6_858_000).open();
    let slides = pres.slides();
    assert_eq!(slides.len(), 0);
    assert!(slides.is_empty());
    assert!(slides.get(0).is_none());
    assert_eq!(slides.iter().count(), 0);
    assert_eq!(slides.into_iter().count(), 0);
}

#[test]
fn slides_follow_slide_id_list_order() {
    let pres = Fixture::sized(9_144_000, 6_858_000)
        .with_slides(&[(258, 3), (256, 1), (257, 2)])
        .open();
    let slides = pres.slides();
    assert_eq!(slides.len(), 3);

    let names: Vec<&str> = slides.iter().map(|s| s.name()).collect();
    assert_eq!(names, ["Slide 3", "Slide 1", "Slide 2"]);

    assert_eq!(slides[0].slide_id(), 258);
    assert_eq!(slides[2].partname().as_str(), "/ppt/slides/slide2.xml");
    assert_eq!(slides.get(1).map(|s| s.r_id()), Some("rId1"));
    assert!(slides.get(3).is_none());
    assert_eq!(slides.index_of(257), Some(2));

    let mut count = 0;
    for slide in slides {
        assert!(slide.layout_partname().is_none());
        count += 1;
    }
    assert_eq!(count, slides.len());
}

#[test]
fn dangling_slide_reference_is_skipped() {
    let mut fixture = Fixture::sized(9_144_000, 6_858_000).with_slides(&[(256, 1)]);
    fixture.dangling = true;
    let mut pres = fixture.open();
    assert_eq!(pres.slides().len(), 1);
    assert!(pres.slides().get_by_id(999).is_none());
    assert!(pres.is_modified());

    let saved = pres.to_bytes().unwrap();
    let xml = presentation_xml(&saved);
    assert!(xml.contains(r#"<p:sldIdLst><p:sldId id="256" r:id="rId1"/></p:sldIdLst>"#));
    assert!(!xml.contains(r#"id="999""#));
    assert!(!xml.contains("rId99"));

    let reopened = Presentation::from_bytes(saved).unwrap();
    let ids: Vec<u32> = reopened.slides().iter().map(|s| s.slide_id()).collect();
    assert_eq!(ids, [256]);
    assert!(!reopened.is_modified());
}

/// Replace `ppt/presentation.xml` in `package` with `edit` applied to it,
/// copying every other entry unchanged.
fn edit_presentation_xml(package: &[u8], edit: impl Fn(&str) -> String) -> Vec<u8> {
    let mut archive = ZipArchive::new(Cursor::new(package)).unwrap();
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let name = entry.name().to_string();
        let mut data = Vec::new();
        entry.read_to_end(&mut data).unwrap();
        if name == "ppt/presentation.xml" {
            data = edit(std::str::from_utf8(&data).unwrap()).into_bytes();
        }
        writer.start_file(name, options).unwrap();
        writer.write_all(&data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[test]
fn added_slide_never_shares_a_relationship_with_a_dropped_slide_id() {
    // The rId the next added slide will receive in a fresh presentation.
    let free_r_id = {
        let mut scratch = Presentation::new().unwrap();
        scratch.add_slide(0).unwrap().r_id().to_string()
    };

    let package = Presentation::new().unwrap().to_bytes().unwrap();
    let package = edit_presentation_xml(&package, |xml| {
        let at = xml.find("<p:sldSz").unwrap();
        format!(
            r#"{}<p:sldIdLst><p:sldId id="999" r:id="{}"/></p:sldIdLst>{}"#,
            &xml[..at],
            free_r_id,
            &xml[at..]
        )
    });

    let mut pres = Presentation::from_bytes(package).unwrap();
    assert!(pres.slides().is_empty());

    let added = pres.add_slide(0).unwrap();
    assert_eq!(added.r_id(), free_r_id);
    let added_id = added.slide_id();
    assert_ne!(added_id, 999);

    let saved = pres.to_bytes().unwrap();
    let xml = presentation_xml(&saved);
    assert_eq!(xml.matches("<p:sldId ").count(), 1);
    assert!(!xml.contains(r#"id="999""#));

    let reopened = Presentation::from_bytes(saved).unwrap();
    let ids: Vec<u32> = reopened.slides().iter().map(|s| s.slide_id()).collect();
    assert_eq!(ids, [added_id]);
    assert_eq!(reopened.slides()[0].r_id(), free_r_id);
}

#[test]
fn slides_handle_is_identity_stable() {
    let mut pres = Fixture::sized(9_144_000, 6_858_000)
        .with_slides(&[(256, 1)])
        .open();
    let first = pres.slides() as *const _;
    assert!(std::ptr::eq(first, pres.slides()));

    pres.set_slide_width(Length::from_emu(8_000_000));
    assert!(std::ptr::eq(first, pres.slides()));

    pres.to_bytes().unwrap();
    assert!(std::ptr::eq(first, pres.slides()));
}

#[test]
fn untouched_slides_are_written_verbatim() {
    let fixture = Fixture::sized(9_144_000, 6_858_000).with_slides(&[(256, 1)]);
    let original = fixture.build();
    let mut pres = Presentation::from_bytes(original.clone()).unwrap();
    pres.set_slide_height(Length::from_emu(5_000_000));
    let saved = pres.to_bytes().unwrap();

    let read = |bytes: &[u8]| {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = Vec::new();
        archive
            .by_name("ppt/slides/slide1.xml")
            .unwrap()
            .read_to_end(&mut xml)
            .unwrap();
        xml
    };
    assert_eq!(read(&original), read(&saved));
}

#[test]
fn opening_a_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = Presentation::open(dir.path().join("absent.pptx"));
    assert!(matches!(result, Err(Error::ComponentNotFound(_))));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_set_then_get_is_identity(cx in any::<i64>(), cy in any::<i64>()) {
        let mut pres = Presentation::new().unwrap();
        pres.set_slide_width(Length::from_emu(cx));
        pres.set_slide_height(Length::from_emu(cy));
        prop_assert_eq!(pres.slide_width().emu(), cx);
        prop_assert_eq!(pres.slide_height().emu(), cy);
    }

    #[test]
    fn prop_saved_size_reads_back(
        cx in -1_000_000_000_000i64..1_000_000_000_000,
        cy in -1_000_000_000_000i64..1_000_000_000_000,
    ) {
        let mut pres = Fixture::sized(9_144_000, 6_858_000).open();
        pres.set_slide_width(Length::from_emu(cx));
        pres.set_slide_height(Length::from_emu(cy));

        let reopened = Presentation::from_bytes(pres.to_bytes().unwrap()).unwrap();
        prop_assert_eq!(reopened.slide_width(), Length::from_emu(cx));
        prop_assert_eq!(reopened.slide_height(), Length::from_emu(cy));
    }
}
