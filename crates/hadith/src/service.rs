//! Read operations behind the HTTP routes.
//!
//! Rows come from the [`Store`], narrations and chapters are cleaned exactly
//! once here, and everything leaves as an API model.

use hadith_core::api;
use hadith_core::pagination::{PageRequest, Paginated};
use hadith_core::records::book_id_from_number;

use crate::error::Error;
use crate::store::{Store, RANDOM_COLLECTION};

pub struct Service {
    store: Store,
}

impl Service {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn collections(&self, page: PageRequest) -> Result<Paginated<api::Collection>, Error> {
        let (rows, total) = self.store.collections(page)?;
        Ok(Paginated::new(rows, total, page).map(|row| api::Collection::from(&row)))
    }

    pub fn collection(&self, name: &str) -> Result<api::Collection, Error> {
        Ok(api::Collection::from(&self.store.collection(name)?))
    }

    pub fn books(
        &self,
        collection: &str,
        page: PageRequest,
    ) -> Result<Paginated<api::Book>, Error> {
        let (rows, total) = self.store.books(collection, page)?;
        Ok(Paginated::new(rows, total, page).map(|row| api::Book::from(&row)))
    }

    /// Look up a book by its public number (`introduction`, `35b` or digits).
    pub fn book(&self, collection: &str, book_number: &str) -> Result<api::Book, Error> {
        let book_id = book_id_from_number(book_number)
            .parse::<i64>()
            .map_err(|_| Error::NotFound(format!("book {book_number} in '{collection}'")))?;

        Ok(api::Book::from(&self.store.book(collection, book_id)?))
    }

    pub fn chapters(
        &self,
        collection: &str,
        book_number: &str,
        page: PageRequest,
    ) -> Result<Paginated<api::Chapter>, Error> {
        let (rows, total) = self.store.chapters(collection, book_number, page)?;
        Ok(Paginated::new(rows, total, page).map(|row| api::Chapter::from(&row.cleaned())))
    }

    pub fn chapter(
        &self,
        collection: &str,
        book_number: &str,
        chapter_id: &str,
    ) -> Result<api::Chapter, Error> {
        let row = self.store.chapter(collection, book_number, chapter_id)?;
        Ok(api::Chapter::from(&row.cleaned()))
    }

    pub fn hadiths(
        &self,
        collection: &str,
        book_number: &str,
        page: PageRequest,
    ) -> Result<Paginated<api::Hadith>, Error> {
        let (rows, total) = self.store.hadiths(collection, book_number, page)?;
        Ok(Paginated::new(rows, total, page).map(|row| api::Hadith::from(&row.cleaned())))
    }

    pub fn hadith(&self, collection: &str, hadith_number: &str) -> Result<api::Hadith, Error> {
        let row = self.store.hadith_by_number(collection, hadith_number)?;
        Ok(api::Hadith::from(&row.cleaned()))
    }

    pub fn hadith_by_urn(&self, urn: i64) -> Result<api::Hadith, Error> {
        Ok(api::Hadith::from(&self.store.hadith_by_urn(urn)?.cleaned()))
    }

    pub fn random_hadith(&self) -> Result<api::Hadith, Error> {
        Ok(api::Hadith::from(
            &self.store.random_hadith(RANDOM_COLLECTION)?.cleaned(),
        ))
    }
}
