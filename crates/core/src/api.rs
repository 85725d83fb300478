//! Response shapes served by the read API and conversions from stored rows.
//!
//! Conversions copy text verbatim; rows are expected to be cleaned already
//! (see [`crate::records::Hadith::cleaned`]).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::records::{self, book_number_from_id};

const ENGLISH: &str = "en";
const ARABIC: &str = "ar";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionMeta {
    #[serde(rename = "lang")]
    pub language: String,
    pub title: String,
    #[serde(rename = "shortIntro")]
    pub short_intro: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub name: String,
    pub has_books: bool,
    pub has_chapters: bool,
    #[serde(rename = "collection")]
    pub meta: Vec<CollectionMeta>,
    pub total_hadith: i64,
    pub total_available_hadith: i64,
}

impl From<&records::HadithCollection> for Collection {
    fn from(row: &records::HadithCollection) -> Self {
        Self {
            name: row.name.clone(),
            has_books: row.has_books == "yes",
            has_chapters: row.has_chapters == "yes",
            meta: vec![
                CollectionMeta {
                    language: ENGLISH.to_string(),
                    title: row.english_title.clone(),
                    short_intro: row.short_intro.clone(),
                },
                CollectionMeta {
                    language: ARABIC.to_string(),
                    title: row.arabic_title.clone(),
                    short_intro: row.short_intro.clone(),
                },
            ],
            total_hadith: row.total_hadith.unwrap_or(0),
            total_available_hadith: row.num_hadith,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookMeta {
    #[serde(rename = "lang")]
    pub language: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub book_number: String,
    #[serde(rename = "book")]
    pub meta: Vec<BookMeta>,
    pub hadith_start_number: i64,
    pub hadith_end_number: i64,
    pub number_of_hadith: i64,
}

impl From<&records::Book> for Book {
    fn from(row: &records::Book) -> Self {
        Self {
            book_number: book_number_from_id(row.our_book_id),
            meta: vec![
                BookMeta {
                    language: ENGLISH.to_string(),
                    name: row.english_name.clone().unwrap_or_default(),
                },
                BookMeta {
                    language: ARABIC.to_string(),
                    name: row.arabic_name.clone().unwrap_or_default(),
                },
            ],
            hadith_start_number: row.first_number,
            hadith_end_number: row.last_number,
            number_of_hadith: row.total_number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterMeta {
    #[serde(rename = "lang")]
    pub language: String,
    pub chapter_number: String,
    pub chapter_title: String,
    pub intro: Option<String>,
    pub ending: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub book_number: String,
    pub chapter_id: String,
    #[serde(rename = "chapter")]
    pub meta: Vec<ChapterMeta>,
}

impl From<&records::Chapter> for Chapter {
    fn from(row: &records::Chapter) -> Self {
        Self {
            book_number: format!("{:.0}", row.arabic_book_id),
            chapter_id: format!("{:.2}", row.bab_id),
            meta: vec![
                ChapterMeta {
                    language: ENGLISH.to_string(),
                    chapter_number: row.english_bab_number.clone(),
                    chapter_title: row.english_bab_name.clone(),
                    intro: Some(row.english_intro.clone()),
                    ending: Some(row.english_ending.clone()),
                },
                ChapterMeta {
                    language: ARABIC.to_string(),
                    chapter_number: row.arabic_bab_number.clone(),
                    chapter_title: row.arabic_bab_name.clone(),
                    intro: Some(row.arabic_intro.clone()),
                    ending: Some(row.arabic_ending.clone()),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    #[serde(default)]
    pub graded_by: String,
    #[serde(default)]
    pub grade: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HadithMeta {
    #[serde(rename = "lang")]
    pub language: String,
    pub chapter_number: String,
    pub chapter_title: String,
    pub urn: i64,
    pub body: String,
    pub grades: Vec<Grade>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hadith {
    pub collection: String,
    pub book_number: String,
    pub chapter_id: String,
    pub hadith_number: String,
    #[serde(rename = "hadith")]
    pub meta: Vec<HadithMeta>,
}

impl From<&records::Hadith> for Hadith {
    fn from(row: &records::Hadith) -> Self {
        Self {
            collection: row.collection.clone(),
            book_number: row.book_number.clone(),
            chapter_id: format_chapter_id(&row.bab_id),
            hadith_number: row.hadith_number.clone(),
            meta: vec![
                HadithMeta {
                    language: ENGLISH.to_string(),
                    chapter_number: row.english_bab_number.clone(),
                    chapter_title: row.english_bab_name.clone(),
                    urn: row.english_urn,
                    body: row.english_text.clone(),
                    grades: parse_grades(&row.english_grade, ""),
                },
                HadithMeta {
                    language: ARABIC.to_string(),
                    chapter_number: row.arabic_bab_number.clone(),
                    chapter_title: row.arabic_bab_name.clone(),
                    urn: row.arabic_urn,
                    body: row.arabic_text.clone(),
                    grades: parse_grades(&row.arabic_grade, ""),
                },
            ],
        }
    }
}

/// Render a stored chapter id with two decimals ("61" -> "61.00").
///
/// Ids that are not numbers render as "0.00".
pub fn format_chapter_id(bab_id: &str) -> String {
    let value = bab_id.trim().parse::<f64>().unwrap_or(0.0);
    format!("{value:.2}")
}

/// Parse a stored grade.
///
/// Newer rows hold a JSON array of `{"graded_by", "grade"}` objects; a field
/// that is missing or not a string reads as empty. Older rows hold a bare
/// grade, which is attributed to `default_grader`.
pub fn parse_grades(value: &str, default_grader: &str) -> Vec<Grade> {
    if value.is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Option<Vec<Option<Map<String, Value>>>>>(value) {
        Ok(entries) => entries
            .unwrap_or_default()
            .into_iter()
            .map(|entry| {
                let entry = entry.unwrap_or_default();
                Grade {
                    graded_by: string_field(&entry, "graded_by"),
                    grade: string_field(&entry, "grade"),
                }
            })
            .collect(),
        Err(_) => vec![Grade {
            graded_by: default_grader.to_string(),
            grade: value.to_string(),
        }],
    }
}

fn string_field(entry: &Map<String, Value>, key: &str) -> String {
    entry
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_from_row() {
        let row = records::HadithCollection {
            name: "bukhari".to_string(),
            english_title: "Sahih al-Bukhari".to_string(),
            arabic_title: "صحيح البخاري".to_string(),
            has_books: "yes".to_string(),
            has_chapters: "no".to_string(),
            num_hadith: 7558,
            total_hadith: None,
            short_intro: "intro".to_string(),
            ..Default::default()
        };

        let collection = Collection::from(&row);
        assert!(collection.has_books);
        assert!(!collection.has_chapters);
        assert_eq!(collection.total_hadith, 0);
        assert_eq!(collection.total_available_hadith, 7558);
        assert_eq!(collection.meta[0].language, "en");
        assert_eq!(collection.meta[1].title, "صحيح البخاري");
    }

    #[test]
    fn test_collection_json_shape() {
        let collection = Collection::from(&records::HadithCollection {
            name: "muslim".to_string(),
            total_hadith: Some(10),
            ..Default::default()
        });
        let json = serde_json::to_value(&collection).unwrap();

        assert_eq!(json["name"], "muslim");
        assert_eq!(json["totalHadith"], 10);
        assert_eq!(json["hasBooks"], false);
        assert_eq!(json["collection"][1]["lang"], "ar");
        assert!(json["collection"][0].get("shortIntro").is_some());
    }

    #[test]
    fn test_book_from_row() {
        let book = Book::from(&records::Book {
            our_book_id: -1,
            english_name: Some("Revelation".to_string()),
            arabic_name: None,
            first_number: 1,
            last_number: 7,
            total_number: 7,
            ..Default::default()
        });

        assert_eq!(book.book_number, "introduction");
        assert_eq!(book.meta[0].name, "Revelation");
        assert_eq!(book.meta[1].name, "");

        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["bookNumber"], "introduction");
        assert_eq!(json["numberOfHadith"], 7);
        assert_eq!(json["book"][0]["lang"], "en");
    }

    #[test]
    fn test_chapter_from_row() {
        let chapter = Chapter::from(&records::Chapter {
            arabic_book_id: 2.0,
            bab_id: 61.0,
            english_bab_name: "Title".to_string(),
            ..Default::default()
        });

        assert_eq!(chapter.book_number, "2");
        assert_eq!(chapter.chapter_id, "61.00");
        assert_eq!(chapter.meta[0].chapter_title, "Title");
        assert_eq!(chapter.meta[1].intro, Some(String::new()));

        let json = serde_json::to_value(&chapter).unwrap();
        assert_eq!(json["chapterId"], "61.00");
        assert_eq!(json["chapter"][0]["chapterTitle"], "Title");
    }

    #[test]
    fn test_hadith_from_row() {
        let hadith = Hadith::from(&records::Hadith {
            collection: "bukhari".to_string(),
            book_number: "1".to_string(),
            bab_id: "3".to_string(),
            hadith_number: "4".to_string(),
            english_urn: 10,
            arabic_urn: 20,
            english_text: "<p>body</p>".to_string(),
            arabic_grade: "صحيح".to_string(),
            ..Default::default()
        });

        assert_eq!(hadith.chapter_id, "3.00");
        assert_eq!(hadith.meta[0].urn, 10);
        assert_eq!(hadith.meta[0].body, "<p>body</p>");
        assert!(hadith.meta[0].grades.is_empty());
        assert_eq!(hadith.meta[1].grades[0].grade, "صحيح");

        let json = serde_json::to_value(&hadith).unwrap();
        assert_eq!(json["hadithNumber"], "4");
        assert_eq!(json["hadith"][1]["urn"], 20);
        assert_eq!(json["hadith"][1]["grades"][0]["graded_by"], "");
    }

    #[test]
    fn test_format_chapter_id() {
        assert_eq!(format_chapter_id("61"), "61.00");
        assert_eq!(format_chapter_id("1.5"), "1.50");
        assert_eq!(format_chapter_id(""), "0.00");
    }

    #[test]
    fn test_parse_grades_json() {
        let grades = parse_grades(
            r#"[{"graded_by":"Al-Albani","grade":"Sahih"},{"graded_by":"Zubair","grade":"Hasan"}]"#,
            "",
        );
        assert_eq!(grades.len(), 2);
        assert_eq!(grades[0].graded_by, "Al-Albani");
        assert_eq!(grades[1].grade, "Hasan");
    }

    #[test]
    fn test_parse_grades_plain() {
        assert_eq!(
            parse_grades("Sahih", "Darussalam"),
            vec![Grade {
                graded_by: "Darussalam".to_string(),
                grade: "Sahih".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_grades_non_string_fields_read_as_empty() {
        assert_eq!(
            parse_grades(r#"[{"graded_by":null,"grade":"Sahih"}]"#, ""),
            vec![Grade {
                graded_by: String::new(),
                grade: "Sahih".to_string(),
            }]
        );

        let grades = parse_grades(
            r#"[{"graded_by":"Al-Albani","grade":1},{"grade":"Hasan"},null]"#,
            "",
        );
        assert_eq!(grades.len(), 3);
        assert_eq!(grades[0].graded_by, "Al-Albani");
        assert_eq!(grades[0].grade, "");
        assert_eq!(grades[1].graded_by, "");
        assert_eq!(grades[1].grade, "Hasan");
        assert_eq!(grades[2].grade, "");
    }

    #[test]
    fn test_parse_grades_json_null() {
        assert!(parse_grades("null", "").is_empty());
    }

    #[test]
    fn test_parse_grades_empty() {
        assert!(parse_grades("", "").is_empty());
    }
}
