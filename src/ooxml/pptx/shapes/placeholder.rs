/// Placeholder properties carried by the `<p:ph>` element.
use crate::common::xml::attr;
use quick_xml::events::BytesStart;
use serde::{Deserialize, Serialize};

/// Placeholder type, the `type` attribute of `<p:ph>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaceholderType {
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "body")]
    Body,
    #[serde(rename = "ctrTitle")]
    CenterTitle,
    #[serde(rename = "subTitle")]
    Subtitle,
    #[serde(rename = "dt")]
    Date,
    #[serde(rename = "ftr")]
    Footer,
    #[serde(rename = "sldNum")]
    SlideNumber,
    #[serde(rename = "obj")]
    Object,
    #[serde(rename = "chart")]
    Chart,
    #[serde(rename = "tbl")]
    Table,
    #[serde(rename = "clipArt")]
    ClipArt,
    #[serde(rename = "dgm")]
    Diagram,
    #[serde(rename = "media")]
    Media,
    #[serde(rename = "sldImg")]
    SlideImage,
    #[serde(rename = "pic")]
    Picture,
    #[serde(rename = "hdr")]
    Header,
}

impl PlaceholderType {
    /// The XML token, e.g. `ctrTitle`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Body => "body",
            Self::CenterTitle => "ctrTitle",
            Self::Subtitle => "subTitle",
            Self::Date => "dt",
            Self::Footer => "ftr",
            Self::SlideNumber => "sldNum",
            Self::Object => "obj",
            Self::Chart => "chart",
            Self::Table => "tbl",
            Self::ClipArt => "clipArt",
            Self::Diagram => "dgm",
            Self::Media => "media",
            Self::SlideImage => "sldImg",
            Self::Picture => "pic",
            Self::Header => "hdr",
        }
    }

    pub fn from_xml(token: &str) -> Option<Self> {
        Some(match token {
            "title" => Self::Title,
            "body" => Self::Body,
            "ctrTitle" => Self::CenterTitle,
            "subTitle" => Self::Subtitle,
            "dt" => Self::Date,
            "ftr" => Self::Footer,
            "sldNum" => Self::SlideNumber,
            "obj" => Self::Object,
            "chart" => Self::Chart,
            "tbl" => Self::Table,
            "clipArt" => Self::ClipArt,
            "dgm" => Self::Diagram,
            "media" => Self::Media,
            "sldImg" => Self::SlideImage,
            "pic" => Self::Picture,
            "hdr" => Self::Header,
            _ => return None,
        })
    }

    /// Type of the master placeholder a layout placeholder of this type
    /// takes its position and size from.
    ///
    /// Content-like placeholders inherit from the master's body, a centered
    /// title from the master's title. `None` for types with no counterpart
    /// on a slide master.
    pub fn inheritee(&self) -> Option<PlaceholderType> {
        match self {
            Self::Body
            | Self::Chart
            | Self::ClipArt
            | Self::Diagram
            | Self::Media
            | Self::Object
            | Self::Picture
            | Self::Subtitle
            | Self::Table => Some(Self::Body),
            Self::CenterTitle | Self::Title => Some(Self::Title),
            Self::Date => Some(Self::Date),
            Self::Footer => Some(Self::Footer),
            Self::SlideNumber => Some(Self::SlideNumber),
            Self::SlideImage | Self::Header => None,
        }
    }

    /// Base of the shape name given to a new placeholder of this type.
    pub(crate) fn base_name(&self) -> &'static str {
        match self {
            Self::Title | Self::CenterTitle => "Title",
            Self::Subtitle => "Subtitle",
            Self::Body => "Text Placeholder",
            Self::Object => "Content Placeholder",
            Self::Chart => "Chart Placeholder",
            Self::Table => "Table Placeholder",
            Self::ClipArt => "ClipArt Placeholder",
            Self::Diagram => "SmartArt Placeholder",
            Self::Media => "Media Placeholder",
            Self::Picture => "Picture Placeholder",
            Self::Date => "Date Placeholder",
            Self::Footer => "Footer Placeholder",
            Self::SlideNumber => "Slide Number Placeholder",
            Self::SlideImage => "Slide Image Placeholder",
            Self::Header => "Header Placeholder",
        }
    }

    /// Whether a new placeholder of this type gets an empty text body.
    pub(crate) fn has_text_body(&self) -> bool {
        matches!(
            self,
            Self::Title | Self::CenterTitle | Self::Subtitle | Self::Body | Self::Object
        )
    }
}

/// Text direction of a placeholder.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horz,
    Vert,
}

/// Relative size of a placeholder.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderSize {
    #[default]
    Full,
    Half,
    Quarter,
}

/// The attributes of a `<p:ph>` element, with schema defaults applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaceholderFormat {
    pub ph_type: PlaceholderType,
    pub idx: u32,
    pub orient: Orientation,
    pub sz: PlaceholderSize,
}

impl Default for PlaceholderFormat {
    fn default() -> Self {
        Self {
            ph_type: PlaceholderType::Object,
            idx: 0,
            orient: Orientation::Horz,
            sz: PlaceholderSize::Full,
        }
    }
}

impl PlaceholderFormat {
    /// Read a `<p:ph>` element. Missing or unrecognized attributes take the
    /// schema default.
    pub fn from_element(e: &BytesStart<'_>) -> Self {
        let mut format = Self::default();
        if let Some(ph_type) = attr(e, b"type").and_then(|t| PlaceholderType::from_xml(&t)) {
            format.ph_type = ph_type;
        }
        if let Some(idx) = crate::common::xml::attr_u32(e, b"idx") {
            format.idx = idx;
        }
        if attr(e, b"orient").as_deref() == Some("vert") {
            format.orient = Orientation::Vert;
        }
        format.sz = match attr(e, b"sz").as_deref() {
            Some("half") => PlaceholderSize::Half,
            Some("quarter") => PlaceholderSize::Quarter,
            _ => PlaceholderSize::Full,
        };
        format
    }

    /// Serialize as a `<p:ph>` element, omitting attributes at their default.
    pub(crate) fn to_xml(&self, p_prefix: &str) -> String {
        let mut xml = format!("<{}:ph", p_prefix);
        if self.ph_type != PlaceholderType::Object {
            xml.push_str(&format!(r#" type="{}""#, self.ph_type.as_str()));
        }
        if self.orient == Orientation::Vert {
            xml.push_str(r#" orient="vert""#);
        }
        match self.sz {
            PlaceholderSize::Full => {},
            PlaceholderSize::Half => xml.push_str(r#" sz="half""#),
            PlaceholderSize::Quarter => xml.push_str(r#" sz="quarter""#),
        }
        if self.idx != 0 {
            xml.push_str(&format!(r#" idx="{}""#, self.idx));
        }
        xml.push_str("/>");
        xml
    }
}
