//! Presentation template module.
//!
//! The default template is a 4:3 presentation with no slides, one slide
//! master, a theme and four layouts: Title Slide, Title and Content, Title
//! Only and Blank. The part XML lives under `resources/`.

use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::{OpcPackage, PackURI, Part, XmlPart};

macro_rules! resource {
    ($path:literal) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/", $path))
    };
}

/// Presentation part with a slide master and the default 4:3 slide size.
pub fn default_presentation_xml() -> &'static str {
    resource!("presentation.xml")
}

/// Slide master with title, body, date, footer and slide number placeholders.
pub fn default_slide_master_xml() -> &'static str {
    resource!("slideMasters/slideMaster1.xml")
}

/// Layout XML, in the order of the master's `<p:sldLayoutIdLst>`.
pub fn slide_layout_xmls() -> [&'static str; 4] {
    [
        resource!("slideLayouts/slideLayout1.xml"),
        resource!("slideLayouts/slideLayout2.xml"),
        resource!("slideLayouts/slideLayout3.xml"),
        resource!("slideLayouts/slideLayout4.xml"),
    ]
}

pub fn default_theme_xml() -> &'static str {
    resource!("theme/theme1.xml")
}

fn xml_part(partname: &PackURI, content_type: &str, xml: &str) -> XmlPart {
    XmlPart::new(
        partname.clone(),
        content_type.to_string(),
        xml.as_bytes().to_vec(),
    )
}

/// Build the default template package.
///
/// Relationships are created in a fixed order so the rIds match the ones
/// the template XML refers to: the master is `rId1` of the presentation,
/// the layouts are `rId1`..`rId4` of the master.
pub fn default_package() -> Result<OpcPackage> {
    let mut pkg = OpcPackage::new();

    let pres_uri = PackURI::new("/ppt/presentation.xml")?;
    let master_uri = PackURI::new("/ppt/slideMasters/slideMaster1.xml")?;
    let theme_uri = PackURI::new("/ppt/theme/theme1.xml")?;
    let pres_props_uri = PackURI::new("/ppt/presProps.xml")?;
    let view_props_uri = PackURI::new("/ppt/viewProps.xml")?;
    let table_styles_uri = PackURI::new("/ppt/tableStyles.xml")?;

    let mut master = xml_part(&master_uri, ct::PML_SLIDE_MASTER, default_slide_master_xml());
    for (n, xml) in (1..).zip(slide_layout_xmls()) {
        let layout_uri = PackURI::new(format!("/ppt/slideLayouts/slideLayout{}.xml", n))?;
        master.relate_to(&layout_uri, rt::SLIDE_LAYOUT);

        let mut layout = xml_part(&layout_uri, ct::PML_SLIDE_LAYOUT, xml);
        layout.relate_to(&master_uri, rt::SLIDE_MASTER);
        pkg.add_part(Box::new(layout));
    }
    master.relate_to(&theme_uri, rt::THEME);
    pkg.add_part(Box::new(master));

    let mut pres = xml_part(&pres_uri, ct::PML_PRESENTATION_MAIN, default_presentation_xml());
    pres.relate_to(&master_uri, rt::SLIDE_MASTER);
    pres.relate_to(&pres_props_uri, rt::PRES_PROPS);
    pres.relate_to(&view_props_uri, rt::VIEW_PROPS);
    pres.relate_to(&theme_uri, rt::THEME);
    pres.relate_to(&table_styles_uri, rt::TABLE_STYLES);
    pkg.add_part(Box::new(pres));

    pkg.add_part(Box::new(xml_part(&theme_uri, ct::OFC_THEME, default_theme_xml())));
    pkg.add_part(Box::new(xml_part(
        &pres_props_uri,
        ct::PML_PRES_PROPS,
        resource!("presProps.xml"),
    )));
    pkg.add_part(Box::new(xml_part(
        &view_props_uri,
        ct::PML_VIEW_PROPS,
        resource!("viewProps.xml"),
    )));
    pkg.add_part(Box::new(xml_part(
        &table_styles_uri,
        ct::PML_TABLE_STYLES,
        resource!("tableStyles.xml"),
    )));

    pkg.relate_to(&pres_uri, rt::OFFICE_DOCUMENT);
    Ok(pkg)
}
