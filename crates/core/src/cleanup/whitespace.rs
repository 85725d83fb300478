use std::sync::OnceLock;

use regex::Regex;

/// Stands in for a paragraph break while single newlines are collapsed.
const PARAGRAPH_PLACEHOLDER: &str = "\x00PARAGRAPH\x00";

fn newline_runs() -> &'static Regex {
    static RE_NEWLINES: OnceLock<Regex> = OnceLock::new();
    RE_NEWLINES.get_or_init(|| Regex::new(r"\n+").unwrap())
}

fn space_runs() -> &'static Regex {
    static RE_SPACES: OnceLock<Regex> = OnceLock::new();
    RE_SPACES.get_or_init(|| Regex::new(r" +").unwrap())
}

fn paragraph_breaks() -> &'static Regex {
    static RE_PARA: OnceLock<Regex> = OnceLock::new();
    RE_PARA.get_or_init(|| Regex::new(r"\n{2,}").unwrap())
}

/// Collapse every run of newlines into a single newline.
pub fn collapse_newlines(text: &str) -> String {
    newline_runs().replace_all(text, "\n").into_owned()
}

/// Collapse every run of spaces into a single space.
pub fn collapse_spaces(text: &str) -> String {
    space_runs().replace_all(text, " ").into_owned()
}

/// Collapse newline runs and space runs.
///
/// Paragraph breaks are not preserved: `"a\n\nb"` becomes `"a\nb"`.
pub fn normalize_whitespace(text: &str) -> String {
    collapse_spaces(&collapse_newlines(text))
}

/// Collapse newline runs while keeping paragraph breaks.
///
/// Any run of two or more newlines ends up as exactly one `"\n\n"`; a lone
/// newline stays a lone newline.
pub fn collapse_newlines_keep_paragraphs(text: &str) -> String {
    let protected = paragraph_breaks().replace_all(text, PARAGRAPH_PLACEHOLDER);
    collapse_newlines(&protected).replace(PARAGRAPH_PLACEHOLDER, "\n\n")
}
