use std::fmt::Write;
use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node};
use thiserror::Error;

/// Deepest element nesting the serializer will walk before giving up.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Attributes dropped from every `<a>` element.
const STRIPPED_ANCHOR_ATTRS: [&str; 2] = ["id", "name"];

/// Elements written as `<name .../>` with no closing tag.
const VOID_ELEMENTS: [&str; 15] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose text children are written unescaped.
const RAW_TEXT_ELEMENTS: [&str; 7] = [
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

#[derive(Debug, Error)]
pub enum SanitizeError {
    /// Guard for a parse tree without the synthetic `<html>` container; the
    /// fragment parser always creates one.
    #[error("fragment has no container element")]
    MissingContainer,
    #[error("fragment nests deeper than {0} elements")]
    TooDeep(usize),
    #[error("failed to serialize fragment: {0}")]
    Serialize(#[from] std::fmt::Error),
}

fn marker_tags() -> &'static Regex {
    static RE_MARKER: OnceLock<Regex> = OnceLock::new();
    RE_MARKER.get_or_init(|| Regex::new(r"</?c_q\d+>").unwrap())
}

/// Clean an HTML fragment of stored text.
///
/// Drops `id`/`name` from anchors, deletes the `<c_qN>` editorial markers and,
/// when `remove_wrapper` is set, unwraps a single outer `<p>...</p>`. Never
/// fails: if the fragment cannot be re-serialized the trimmed input is
/// returned as-is.
pub fn sanitize_fragment(text: &str, remove_wrapper: bool) -> String {
    let text = text.trim().replace('\r', "");

    let serialized = match serialize_fragment(&text) {
        Ok(serialized) => serialized,
        Err(err) => {
            log::warn!("Keeping fragment unsanitized: {err}");
            return text;
        }
    };

    let result = if remove_wrapper {
        strip_paragraph_wrapper(&serialized)
    } else {
        serialized.as_str()
    };

    marker_tags().replace_all(result, "").into_owned()
}

/// Parse `text` as a fragment and write the container's children back out.
pub fn serialize_fragment(text: &str) -> Result<String, SanitizeError> {
    // parse_fragment hangs every top-level node off a synthetic <html> container,
    // so loose text and sibling elements all survive.
    let document = Html::parse_fragment(text);
    let container = document
        .tree
        .root()
        .children()
        .find_map(ElementRef::wrap)
        .ok_or(SanitizeError::MissingContainer)?;

    let mut out = String::with_capacity(text.len());
    write_children(&mut out, container, 0)?;
    Ok(out)
}

/// Remove one leading `<p>` and one trailing `</p>` when both are present.
pub fn strip_paragraph_wrapper(text: &str) -> &str {
    text.strip_prefix("<p>")
        .and_then(|inner| inner.strip_suffix("</p>"))
        .unwrap_or(text)
}

/// Escape text and attribute values with numeric quote entities.
///
/// `&`, `<`, `>`, `"` and `'` become `&amp;`, `&lt;`, `&gt;`, `&#34;` and `&#39;`.
pub fn escape_markup(text: &str) -> String {
    html_escape::encode_quoted_attribute(text)
        .replace("&quot;", "&#34;")
        .replace("&#x27;", "&#39;")
}

fn write_children(out: &mut String, parent: ElementRef, depth: usize) -> Result<(), SanitizeError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(SanitizeError::TooDeep(MAX_NESTING_DEPTH));
    }

    let raw_text = RAW_TEXT_ELEMENTS.contains(&parent.value().name());

    for child in parent.children() {
        match child.value() {
            Node::Text(text) if raw_text => out.push_str(text),
            Node::Text(text) => out.push_str(&escape_markup(text)),
            Node::Comment(comment) => write!(out, "<!--{}-->", &**comment)?,
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    write_element(out, element, depth + 1)?;
                }
            }
            _ => {}
        }
    }

    Ok(())
}

fn write_element(out: &mut String, element: ElementRef, depth: usize) -> Result<(), SanitizeError> {
    let name = element.value().name();
    let is_anchor = name == "a";

    write!(out, "<{name}")?;
    for (attr, value) in element.value().attrs() {
        if is_anchor && STRIPPED_ANCHOR_ATTRS.contains(&attr) {
            continue;
        }
        write!(out, " {attr}=\"{}\"", escape_markup(value))?;
    }

    if VOID_ELEMENTS.contains(&name) {
        out.push_str("/>");
        return Ok(());
    }
    out.push('>');

    write_children(out, element, depth)?;
    write!(out, "</{name}>")?;
    Ok(())
}
