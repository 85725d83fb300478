//! Rows as they are stored, before any cleanup.

use crate::cleanup::{clean_chapter_title, clean_en_chapter_title, clean_en_text, clean_text};

/// Book ids that are not rendered as plain numbers.
const SPECIAL_BOOK_NUMBERS: [(i64, &str); 2] = [(-1, "introduction"), (-35, "35b")];

/// Only books with this status are published.
pub const PUBLISHED_BOOK_STATUS: i64 = 4;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HadithCollection {
    pub name: String,
    pub english_title: String,
    pub arabic_title: String,
    pub has_books: String,
    pub has_chapters: String,
    pub num_hadith: i64,
    pub total_hadith: Option<i64>,
    pub short_intro: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Book {
    pub our_book_id: i64,
    pub collection: String,
    pub english_name: Option<String>,
    pub arabic_name: Option<String>,
    pub first_number: i64,
    pub last_number: i64,
    pub total_number: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chapter {
    pub collection: String,
    pub arabic_book_id: f64,
    pub bab_id: f64,
    pub english_bab_number: String,
    pub english_bab_name: String,
    pub english_intro: String,
    pub english_ending: String,
    pub arabic_bab_number: String,
    pub arabic_bab_name: String,
    pub arabic_intro: String,
    pub arabic_ending: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hadith {
    pub collection: String,
    pub book_number: String,
    pub bab_id: String,
    pub hadith_number: String,
    pub english_bab_number: String,
    pub english_bab_name: String,
    pub english_urn: i64,
    pub english_text: String,
    pub arabic_bab_number: String,
    pub arabic_bab_name: String,
    pub arabic_urn: i64,
    pub arabic_text: String,
    pub english_grade: String,
    pub arabic_grade: String,
}

impl Hadith {
    /// Run every text field through its cleanup variant.
    ///
    /// Consumes the raw row so a value can only be cleaned once.
    pub fn cleaned(self) -> Self {
        Self {
            english_text: clean_en_text(&self.english_text),
            arabic_text: clean_text(&self.arabic_text),
            english_bab_name: clean_en_chapter_title(&self.english_bab_name),
            arabic_bab_name: clean_chapter_title(&self.arabic_bab_name),
            ..self
        }
    }
}

impl Chapter {
    /// Run titles, intros and endings through their cleanup variants.
    pub fn cleaned(self) -> Self {
        Self {
            english_bab_name: clean_en_chapter_title(&self.english_bab_name),
            arabic_bab_name: clean_chapter_title(&self.arabic_bab_name),
            english_intro: clean_en_text(&self.english_intro),
            english_ending: clean_en_text(&self.english_ending),
            arabic_intro: clean_text(&self.arabic_intro),
            arabic_ending: clean_text(&self.arabic_ending),
            ..self
        }
    }
}

/// Public book number for a stored book id (`-1` is the introduction).
pub fn book_number_from_id(book_id: i64) -> String {
    SPECIAL_BOOK_NUMBERS
        .iter()
        .find(|(id, _)| *id == book_id)
        .map(|(_, number)| number.to_string())
        .unwrap_or_else(|| book_id.to_string())
}

/// Stored book id for a public book number; plain numbers pass through.
pub fn book_id_from_number(book_number: &str) -> String {
    SPECIAL_BOOK_NUMBERS
        .iter()
        .find(|(_, number)| *number == book_number)
        .map(|(id, _)| id.to_string())
        .unwrap_or_else(|| book_number.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_number_from_id() {
        assert_eq!(book_number_from_id(-1), "introduction");
        assert_eq!(book_number_from_id(-35), "35b");
        assert_eq!(book_number_from_id(12), "12");
    }

    #[test]
    fn test_book_id_from_number() {
        assert_eq!(book_id_from_number("introduction"), "-1");
        assert_eq!(book_id_from_number("35b"), "-35");
        assert_eq!(book_id_from_number("7"), "7");
    }

    #[test]
    fn test_hadith_cleaned() {
        let hadith = Hadith {
            english_text: "Allah's Messenger said".to_string(),
            arabic_text: "  <p>نص</p>  ".to_string(),
            english_bab_name: "<p>Chapter</p>".to_string(),
            arabic_bab_name: "<p>باب</p>".to_string(),
            hadith_number: "1".to_string(),
            ..Default::default()
        }
        .cleaned();

        assert_eq!(
            hadith.english_text,
            "<p>Allah&#39;s Messenger (\u{FDFA}) said</p>"
        );
        assert_eq!(hadith.arabic_text, "<p>نص</p>");
        assert_eq!(hadith.english_bab_name, "Chapter");
        assert_eq!(hadith.arabic_bab_name, "باب");
        assert_eq!(hadith.hadith_number, "1");
    }

    #[test]
    fn test_hadith_cleaned_keeps_empty_fields_empty() {
        let hadith = Hadith::default().cleaned();
        assert_eq!(hadith, Hadith::default());
    }

    #[test]
    fn test_chapter_cleaned() {
        let chapter = Chapter {
            english_bab_name: "<p>The Prophet's prayer</p>".to_string(),
            english_intro: "Intro".to_string(),
            arabic_intro: "<p>مقدمة</p>".to_string(),
            ..Default::default()
        }
        .cleaned();

        assert_eq!(chapter.english_bab_name, "The Prophet&#39;s prayer");
        assert_eq!(chapter.english_intro, "<p>Intro</p>");
        assert_eq!(chapter.arabic_intro, "<p>مقدمة</p>");
        assert_eq!(chapter.english_ending, "");
    }
}
