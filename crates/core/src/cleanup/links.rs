use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

const RELATIVE_HREF: &str = r#"href="/"#;
const ABSOLUTE_HREF: &str = r#"href="https://sunnah.com/"#;
const QURAN_BASE_URL: &str = "https://quran.com";

fn openquran_links() -> &'static Regex {
    static RE_OPENQURAN: OnceLock<Regex> = OnceLock::new();
    RE_OPENQURAN.get_or_init(|| Regex::new(r"javascript:openquran\((.+?)\)").unwrap())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PseudoLinkError {
    #[error("expected 3 comma-separated fields, found {0}")]
    FieldCount(usize),
    #[error("invalid surah index '{0}'")]
    InvalidSurah(String),
}

/// A verse range taken from a legacy `javascript:openquran(surah, begin, end)` link.
///
/// The stored surah index is zero-based; `surah` holds the one-based number.
/// Verse bounds are kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuranReference<'a> {
    pub surah: i64,
    pub begin: &'a str,
    pub end: &'a str,
}

impl<'a> QuranReference<'a> {
    /// Parse the text between the parentheses of an `openquran(...)` call.
    pub fn parse(args: &'a str) -> Result<Self, PseudoLinkError> {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        let [surah, begin, end] = parts[..] else {
            return Err(PseudoLinkError::FieldCount(parts.len()));
        };

        let surah = surah
            .parse::<i64>()
            .ok()
            .and_then(|index| index.checked_add(1))
            .ok_or_else(|| PseudoLinkError::InvalidSurah(surah.to_string()))?;

        Ok(Self { surah, begin, end })
    }

    pub fn url(&self) -> String {
        format!("{QURAN_BASE_URL}/{}/{}-{}", self.surah, self.begin, self.end)
    }
}

/// Point site-relative links at sunnah.com and resolve `openquran` pseudo-links.
///
/// Works on the raw string, not the markup tree. A malformed pseudo-link is
/// left exactly as it was and logged.
pub fn fix_hyperlinks(text: &str) -> String {
    let text = text.replace(RELATIVE_HREF, ABSOLUTE_HREF);

    let mut result = String::with_capacity(text.len());
    let mut last_match_end = 0;

    for caps in openquran_links().captures_iter(&text) {
        let (Some(whole), Some(args)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        result.push_str(&text[last_match_end..whole.start()]);

        match QuranReference::parse(args.as_str()) {
            Ok(reference) => result.push_str(&reference.url()),
            Err(err) => {
                log::warn!("Invalid openquran link '{}': {err}", args.as_str());
                result.push_str(whole.as_str());
            }
        }

        last_match_end = whole.end();
    }

    result.push_str(&text[last_match_end..]);
    result
}
