/// ARABIC LIGATURE SALLALLAHOU ALAYHE WASALLAM.
pub const HONORIFIC: char = '\u{FDFA}';

/// Literal replacements applied in order.
///
/// An entry that contains another entry's pattern must come before it.
pub const HONORIFIC_RULES: &[(&str, &str)] = &[
    ("PBUH", "\u{FDFA}"),
    ("P.B.U.H.", "\u{FDFA}"),
    ("peace_be_upon_him", "\u{FDFA}"),
    ("(may peace be upon him)", "(\u{FDFA})"),
    ("(saws)", "(\u{FDFA})"),
    ("(SAW)", "(\u{FDFA})"),
    ("(saw)", "(\u{FDFA})"),
    ("he Apostle of Allah", "he Messenger of Allah"),
    ("he Apostle of Allaah", "he Messenger of Allah"),
    ("Allah's Apostle", "Allah's Messenger"),
    ("he Holy Prophet ", "he Prophet "),
];

/// Phrases that get a `(ﷺ)` appended unless a parenthesis already follows.
pub const CARRIER_PHRASES: [&str; 3] = ["Allah's Messenger ", "he Messenger of Allah ", "he Prophet "];

/// Canonicalize honorific spellings to [`HONORIFIC`] and annotate bare mentions.
pub fn standardize_terms(text: &str) -> String {
    let mut text = HONORIFIC_RULES
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to));

    for phrase in CARRIER_PHRASES {
        text = annotate_unless_glossed(&text, phrase);
    }

    text
}

/// Replace each `phrase` with `phrase (ﷺ) ` unless the next character is `(`.
pub fn annotate_unless_glossed(text: &str, phrase: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_match_end = 0;

    for (start, matched) in text.match_indices(phrase) {
        let end = start + matched.len();
        result.push_str(&text[last_match_end..start]);
        result.push_str(matched);

        if !text[end..].starts_with('(') {
            result.push('(');
            result.push(HONORIFIC);
            result.push_str(") ");
        }

        last_match_end = end;
    }

    result.push_str(&text[last_match_end..]);
    result
}
