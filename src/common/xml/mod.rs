//! Small XML helpers shared by the package and presentation layers.
//!
//! Attribute lookups here are lenient: malformed attributes are skipped the
//! same way an absent attribute is, and callers decide what a missing value
//! means.
mod escape;

pub use escape::escape_xml;

use quick_xml::events::BytesStart;
use quick_xml::events::attributes::Attribute;

/// Unescaped value of the attribute whose full (prefixed) name is `key`.
pub fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Unescaped value of the attribute whose local name is `local`, whatever
/// its namespace prefix. Used for `r:id`, whose prefix is document-defined.
pub fn attr_local(e: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == local && a.key.prefix().is_some())
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Integer value of attribute `key`.
pub fn attr_i64(e: &BytesStart<'_>, key: &[u8]) -> Option<i64> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| atoi_simd::parse::<i64, false, false>(a.value.trim_ascii()).ok())
}

/// Unsigned integer value of attribute `key`.
pub fn attr_u32(e: &BytesStart<'_>, key: &[u8]) -> Option<u32> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| atoi_simd::parse::<u32, false, false>(a.value.trim_ascii()).ok())
}

/// Namespace prefix of an element name, `p` for `<p:sldSz>`.
pub fn prefix_of(e: &BytesStart<'_>) -> Option<String> {
    e.name()
        .prefix()
        .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned())
}

/// `prefix:local`, or just `local` when there is no prefix.
pub fn qualified(prefix: Option<&str>, local: &str) -> String {
    match prefix {
        Some(p) if !p.is_empty() => format!("{}:{}", p, local),
        _ => local.to_string(),
    }
}

/// Prefix bound to `namespace` by an `xmlns:*` declaration on `e`.
pub fn declared_prefix(e: &BytesStart<'_>, namespace: &str) -> Option<String> {
    e.attributes().flatten().find_map(|a| {
        let key = a.key.as_ref();
        let prefix = key.strip_prefix(b"xmlns:")?;
        (a.value.as_ref() == namespace.as_bytes())
            .then(|| String::from_utf8_lossy(prefix).into_owned())
    })
}

/// A copy of `e` with the attributes in `values` set. Existing attributes
/// keep their position and raw value unless replaced; new ones are appended.
pub fn with_attrs(e: &BytesStart<'_>, values: &[(&str, String)]) -> BytesStart<'static> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut out = BytesStart::new(name);
    let mut applied = vec![false; values.len()];

    for a in e.attributes().flatten() {
        match values.iter().position(|(k, _)| k.as_bytes() == a.key.as_ref()) {
            Some(i) => {
                out.push_attribute((values[i].0, values[i].1.as_str()));
                applied[i] = true;
            },
            None => out.push_attribute(Attribute {
                key: a.key,
                value: a.value,
            }),
        }
    }
    for ((key, value), done) in values.iter().zip(applied) {
        if !done {
            out.push_attribute((*key, value.as_str()));
        }
    }
    out
}
