//! Text cleanup and response shaping for the hadith read API.
//!
//! Narrations are stored with legacy markup: stray whitespace, anchor ids,
//! site-relative links, `javascript:openquran(...)` verse links and dated
//! honorific spellings. This crate turns those rows into the text the API
//! returns. Nothing here touches the database or the network; the `hadith`
//! binary owns storage, HTTP and the command line and calls into these
//! functions. Recoverable input problems are reported through `log`.
//!
//! # Modules
//!
//! - [`cleanup`]: Normalization of stored narration text (whitespace, HTML
//!   fragments, links, honorifics)
//! - [`records`]: Stored rows and the cleanup applied to them
//! - [`api`]: Response models and conversions from stored rows
//! - [`pagination`]: Page/limit validation and response envelopes
//!
//! # Example
//!
//! ```rust
//! use hadith_core::cleanup::{clean_chapter_title, clean_en_text};
//!
//! assert_eq!(clean_chapter_title("<p>Chapter title</p>"), "Chapter title");
//! assert_eq!(
//!     clean_en_text("see javascript:openquran(2,255,255)"),
//!     "<p>see https://quran.com/3/255-255</p>"
//! );
//! ```

pub mod api;
pub mod cleanup;
pub mod pagination;
pub mod records;
