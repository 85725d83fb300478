//! Text cleanup pipeline for stored narration text.
//!
//! Stored text carries HTML fragments of varying quality, legacy
//! `javascript:openquran(...)` pseudo-links and several spellings of the same
//! honorific. The four entry points below turn it into the canonical form the
//! API serves:
//!
//! | Entry point              | Used for                          |
//! |--------------------------|-----------------------------------|
//! | [`clean_text`]           | Arabic bodies, intros and endings |
//! | [`clean_en_text`]        | English bodies, intros and endings|
//! | [`clean_chapter_title`]  | Arabic chapter titles             |
//! | [`clean_en_chapter_title`] | English chapter titles          |
//!
//! Every entry point returns an empty input untouched. [`clean_en_text`] wraps
//! its output in `<p>`, so each entry point should run at most once per value.

pub mod fragment;
pub mod links;
pub mod terms;
pub mod whitespace;

pub use fragment::sanitize_fragment;
pub use links::fix_hyperlinks;
pub use terms::standardize_terms;
pub use whitespace::normalize_whitespace;

/// Clean a body in the generic (Arabic) variant.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = normalize_whitespace(text);
    let text = sanitize_fragment(&text, false);
    fix_hyperlinks(&text).trim().to_string()
}

/// Clean an English body.
///
/// Keeps paragraph breaks, standardizes honorifics, encodes apostrophes and
/// wraps the result in a single `<p>` unless it already is one. The markup
/// itself is not re-parsed.
pub fn clean_en_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = text.replace('\r', "");
    let text = whitespace::collapse_newlines_keep_paragraphs(&text);
    let text = whitespace::collapse_spaces(&text);
    let text = fix_hyperlinks(&text);
    let text = standardize_terms(&text).replace('\'', "&#39;");
    let text = text.trim();

    if text.starts_with("<p>") && text.ends_with("</p>") {
        text.to_string()
    } else {
        format!("<p>{text}</p>")
    }
}

/// Clean a chapter title in the generic (Arabic) variant, dropping an outer `<p>`.
pub fn clean_chapter_title(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = normalize_whitespace(text);
    let text = sanitize_fragment(&text, true);
    fix_hyperlinks(&text).trim().to_string()
}

/// Clean an English chapter title.
pub fn clean_en_chapter_title(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    standardize_terms(&clean_chapter_title(text))
}
