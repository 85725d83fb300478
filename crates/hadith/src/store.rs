//! SQLite access to the stored collections, books, chapters and narrations.
//!
//! Rows come back exactly as stored; cleanup happens in the service layer.

use std::path::Path;
use std::sync::Mutex;

use hadith_core::pagination::PageRequest;
use hadith_core::records::{Book, Chapter, Hadith, HadithCollection, PUBLISHED_BOOK_STATUS};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::Error;

/// Collection the random endpoint draws from.
pub const RANDOM_COLLECTION: &str = "riyadussalihin";

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS Collections (
    collectionID INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    englishTitle TEXT NOT NULL DEFAULT '',
    arabicTitle TEXT NOT NULL DEFAULT '',
    hasvolumes TEXT NOT NULL DEFAULT 'no',
    hasbooks TEXT NOT NULL DEFAULT 'no',
    haschapters TEXT NOT NULL DEFAULT 'no',
    numhadith INTEGER NOT NULL DEFAULT 0,
    totalhadith INTEGER,
    shortintro TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS BookData (
    ourBookID INTEGER NOT NULL,
    collection TEXT NOT NULL,
    englishBookName TEXT,
    arabicBookName TEXT,
    firstNumber INTEGER NOT NULL DEFAULT 0,
    lastNumber INTEGER NOT NULL DEFAULT 0,
    totalNumber INTEGER NOT NULL DEFAULT 0,
    status INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS ChapterData (
    collection TEXT NOT NULL,
    arabicBookID REAL NOT NULL,
    babID REAL NOT NULL,
    englishBabNumber TEXT NOT NULL DEFAULT '',
    englishBabName TEXT NOT NULL DEFAULT '',
    englishIntro TEXT NOT NULL DEFAULT '',
    englishEnding TEXT NOT NULL DEFAULT '',
    arabicBabNumber TEXT NOT NULL DEFAULT '',
    arabicBabName TEXT NOT NULL DEFAULT '',
    arabicIntro TEXT NOT NULL DEFAULT '',
    arabicEnding TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS HadithTable (
    collection TEXT NOT NULL,
    bookNumber TEXT NOT NULL,
    babID TEXT NOT NULL DEFAULT '',
    hadithNumber TEXT NOT NULL,
    englishBabNumber TEXT NOT NULL DEFAULT '',
    englishBabName TEXT NOT NULL DEFAULT '',
    englishURN INTEGER NOT NULL,
    englishText TEXT NOT NULL DEFAULT '',
    arabicBabNumber TEXT NOT NULL DEFAULT '',
    arabicBabName TEXT NOT NULL DEFAULT '',
    arabicURN INTEGER NOT NULL DEFAULT 0,
    arabicText TEXT NOT NULL DEFAULT '',
    englishgrade1 TEXT NOT NULL DEFAULT '',
    arabicgrade1 TEXT NOT NULL DEFAULT ''
);
"#;

const COLLECTION_COLUMNS: &str = "name, englishTitle, arabicTitle, hasbooks, haschapters, \
     numhadith, totalhadith, shortintro";

const BOOK_COLUMNS: &str = "ourBookID, collection, englishBookName, arabicBookName, \
     firstNumber, lastNumber, totalNumber";

const CHAPTER_COLUMNS: &str = "collection, arabicBookID, babID, englishBabNumber, \
     englishBabName, englishIntro, englishEnding, arabicBabNumber, arabicBabName, \
     arabicIntro, arabicEnding";

const HADITH_COLUMNS: &str = "collection, bookNumber, babID, hadithNumber, englishBabNumber, \
     englishBabName, englishURN, englishText, arabicBabNumber, arabicBabName, arabicURN, \
     arabicText, englishgrade1, arabicgrade1";

/// A page of rows plus the total number of matching rows.
pub type Page<T> = (Vec<T>, usize);

pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self::from_connection(Connection::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self, Error> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Create the tables if they do not exist yet.
    pub fn init_schema(&self) -> Result<(), Error> {
        self.with_conn(|conn| Ok(conn.execute_batch(SCHEMA)?))
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T, Error>) -> Result<T, Error> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| Error::Internal("database connection lock poisoned".to_string()))?;
        f(&conn)
    }

    pub fn collections(&self, page: PageRequest) -> Result<Page<HadithCollection>, Error> {
        self.with_conn(|conn| {
            let total: i64 = conn.query_row("SELECT COUNT(*) FROM Collections", [], |r| r.get(0))?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLLECTION_COLUMNS} FROM Collections ORDER BY collectionID LIMIT ?1 OFFSET ?2"
            ))?;
            let rows = stmt
                .query_map(params![page.limit as i64, page.offset() as i64], collection_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok((rows, total as usize))
        })
    }

    pub fn collection(&self, name: &str) -> Result<HadithCollection, Error> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {COLLECTION_COLUMNS} FROM Collections WHERE name = ?1"),
                params![name],
                collection_from_row,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("collection '{name}'")))
        })
    }

    pub fn books(&self, collection: &str, page: PageRequest) -> Result<Page<Book>, Error> {
        self.with_conn(|conn| {
            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM BookData WHERE collection = ?1 AND status = ?2",
                params![collection, PUBLISHED_BOOK_STATUS],
                |r| r.get(0),
            )?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {BOOK_COLUMNS} FROM BookData WHERE collection = ?1 AND status = ?2 \
                 ORDER BY ABS(ourBookID) LIMIT ?3 OFFSET ?4"
            ))?;
            let rows = stmt
                .query_map(
                    params![
                        collection,
                        PUBLISHED_BOOK_STATUS,
                        page.limit as i64,
                        page.offset() as i64
                    ],
                    book_from_row,
                )?
                .collect::<Result<Vec<_>, _>>()?;
            Ok((rows, total as usize))
        })
    }

    pub fn book(&self, collection: &str, book_id: i64) -> Result<Book, Error> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!(
                    "SELECT {BOOK_COLUMNS} FROM BookData \
                     WHERE collection = ?1 AND ourBookID = ?2 AND status = ?3"
                ),
                params![collection, book_id, PUBLISHED_BOOK_STATUS],
                book_from_row,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("book {book_id} in '{collection}'")))
        })
    }

    pub fn chapters(
        &self,
        collection: &str,
        book_number: &str,
        page: PageRequest,
    ) -> Result<Page<Chapter>, Error> {
        self.with_conn(|conn| {
            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM ChapterData WHERE collection = ?1 AND arabicBookID = ?2",
                params![collection, book_number],
                |r| r.get(0),
            )?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {CHAPTER_COLUMNS} FROM ChapterData \
                 WHERE collection = ?1 AND arabicBookID = ?2 ORDER BY babID LIMIT ?3 OFFSET ?4"
            ))?;
            let rows = stmt
                .query_map(
                    params![
                        collection,
                        book_number,
                        page.limit as i64,
                        page.offset() as i64
                    ],
                    chapter_from_row,
                )?
                .collect::<Result<Vec<_>, _>>()?;
            Ok((rows, total as usize))
        })
    }

    pub fn chapter(
        &self,
        collection: &str,
        book_number: &str,
        chapter_id: &str,
    ) -> Result<Chapter, Error> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!(
                    "SELECT {CHAPTER_COLUMNS} FROM ChapterData \
                     WHERE collection = ?1 AND arabicBookID = ?2 AND babID = ?3"
                ),
                params![collection, book_number, chapter_id],
                chapter_from_row,
            )
            .optional()?
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "chapter {chapter_id} of book {book_number} in '{collection}'"
                ))
            })
        })
    }

    pub fn hadiths(
        &self,
        collection: &str,
        book_number: &str,
        page: PageRequest,
    ) -> Result<Page<Hadith>, Error> {
        self.with_conn(|conn| {
            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM HadithTable WHERE collection = ?1 AND bookNumber = ?2",
                params![collection, book_number],
                |r| r.get(0),
            )?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {HADITH_COLUMNS} FROM HadithTable \
                 WHERE collection = ?1 AND bookNumber = ?2 ORDER BY englishURN LIMIT ?3 OFFSET ?4"
            ))?;
            let rows = stmt
                .query_map(
                    params![
                        collection,
                        book_number,
                        page.limit as i64,
                        page.offset() as i64
                    ],
                    hadith_from_row,
                )?
                .collect::<Result<Vec<_>, _>>()?;
            Ok((rows, total as usize))
        })
    }

    pub fn hadith_by_number(&self, collection: &str, hadith_number: &str) -> Result<Hadith, Error> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!(
                    "SELECT {HADITH_COLUMNS} FROM HadithTable \
                     WHERE collection = ?1 AND hadithNumber = ?2"
                ),
                params![collection, hadith_number],
                hadith_from_row,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("hadith {hadith_number} in '{collection}'")))
        })
    }

    pub fn hadith_by_urn(&self, urn: i64) -> Result<Hadith, Error> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {HADITH_COLUMNS} FROM HadithTable WHERE englishURN = ?1"),
                params![urn],
                hadith_from_row,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("hadith with urn {urn}")))
        })
    }

    pub fn random_hadith(&self, collection: &str) -> Result<Hadith, Error> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!(
                    "SELECT {HADITH_COLUMNS} FROM HadithTable WHERE collection = ?1 \
                     ORDER BY RANDOM() LIMIT 1"
                ),
                params![collection],
                hadith_from_row,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("hadiths in '{collection}'")))
        })
    }
}

fn collection_from_row(row: &Row) -> rusqlite::Result<HadithCollection> {
    Ok(HadithCollection {
        name: row.get("name")?,
        english_title: row.get("englishTitle")?,
        arabic_title: row.get("arabicTitle")?,
        has_books: row.get("hasbooks")?,
        has_chapters: row.get("haschapters")?,
        num_hadith: row.get("numhadith")?,
        total_hadith: row.get("totalhadith")?,
        short_intro: row.get("shortintro")?,
    })
}

fn book_from_row(row: &Row) -> rusqlite::Result<Book> {
    Ok(Book {
        our_book_id: row.get("ourBookID")?,
        collection: row.get("collection")?,
        english_name: row.get("englishBookName")?,
        arabic_name: row.get("arabicBookName")?,
        first_number: row.get("firstNumber")?,
        last_number: row.get("lastNumber")?,
        total_number: row.get("totalNumber")?,
    })
}

fn chapter_from_row(row: &Row) -> rusqlite::Result<Chapter> {
    Ok(Chapter {
        collection: row.get("collection")?,
        arabic_book_id: row.get("arabicBookID")?,
        bab_id: row.get("babID")?,
        english_bab_number: row.get("englishBabNumber")?,
        english_bab_name: row.get("englishBabName")?,
        english_intro: row.get("englishIntro")?,
        english_ending: row.get("englishEnding")?,
        arabic_bab_number: row.get("arabicBabNumber")?,
        arabic_bab_name: row.get("arabicBabName")?,
        arabic_intro: row.get("arabicIntro")?,
        arabic_ending: row.get("arabicEnding")?,
    })
}

fn hadith_from_row(row: &Row) -> rusqlite::Result<Hadith> {
    Ok(Hadith {
        collection: row.get("collection")?,
        book_number: row.get("bookNumber")?,
        bab_id: row.get("babID")?,
        hadith_number: row.get("hadithNumber")?,
        english_bab_number: row.get("englishBabNumber")?,
        english_bab_name: row.get("englishBabName")?,
        english_urn: row.get("englishURN")?,
        english_text: row.get("englishText")?,
        arabic_bab_number: row.get("arabicBabNumber")?,
        arabic_bab_name: row.get("arabicBabName")?,
        arabic_urn: row.get("arabicURN")?,
        arabic_text: row.get("arabicText")?,
        english_grade: row.get("englishgrade1")?,
        arabic_grade: row.get("arabicgrade1")?,
    })
}

/// In-memory store with a small fixture data set.
#[cfg(test)]
pub(crate) fn seeded() -> Store {
    let store = Store::open_in_memory().unwrap();
    store.init_schema().unwrap();
    store
        .with_conn(|conn| {
            conn.execute_batch(
                r#"
                INSERT INTO Collections (collectionID, name, englishTitle, arabicTitle, hasbooks, haschapters, numhadith, totalhadith, shortintro)
                VALUES (1, 'bukhari', 'Sahih al-Bukhari', 'صحيح البخاري', 'yes', 'yes', 7558, 7563, 'Intro'),
                       (2, 'riyadussalihin', 'Riyad as-Salihin', 'رياض الصالحين', 'yes', 'no', 1896, NULL, '');

                INSERT INTO BookData (ourBookID, collection, englishBookName, arabicBookName, firstNumber, lastNumber, totalNumber, status)
                VALUES (-1, 'bukhari', 'Introduction', NULL, 1, 1, 1, 4),
                       (2, 'bukhari', 'Belief', 'كتاب الإيمان', 8, 58, 51, 4),
                       (1, 'bukhari', 'Revelation', 'كتاب بدء الوحى', 1, 7, 7, 4),
                       (3, 'bukhari', 'Draft', NULL, 0, 0, 0, 1);

                INSERT INTO ChapterData (collection, arabicBookID, babID, englishBabName, englishIntro, arabicBabName)
                VALUES ('bukhari', 1, 2, '<p>Second chapter</p>', '', '<p>باب</p>'),
                       ('bukhari', 1, 1, '<p>How the Divine Revelation started</p>', 'Allah''s Messenger said', '');

                INSERT INTO HadithTable (collection, bookNumber, babID, hadithNumber, englishBabName, englishURN, englishText, arabicBabName, arabicURN, arabicText, englishgrade1)
                VALUES ('bukhari', '1', '1', '1', '<p>Revelation</p>', 10, 'Allah''s Apostle PBUH said', '<p>باب</p>', 110, '<p>حدثنا <a id="a1" href="/bukhari">link</a></p>', ''),
                       ('bukhari', '1', '1', '2', '', 20, 'See javascript:openquran(1,1,7)', '', 120, '', '[{"graded_by":"Al-Albani","grade":"Sahih"}]'),
                       ('riyadussalihin', '1', '1', '1', '', 30, 'he Prophet said', '', 130, '', 'Sahih');
                "#,
            )?;
            Ok(())
        })
        .unwrap();
    store
}
