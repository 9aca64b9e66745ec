// ABOUTME: Library entry point for the coursegrab extraction crate.
// ABOUTME: Re-exports the record models, the listing/content extractors, session, and OAuth helper.

//! coursegrab-extract - extraction of assignment data from saved Canvas pages.
//!
//! This crate holds the pure extraction logic (link discovery on listing
//! pages, field extraction on item pages) plus the blocking download
//! session and the OAuth code-exchange helper. Extraction functions take
//! parsed documents and explicit parameters, so they are testable against
//! saved sample pages with no network or prompting involved.
//!
//! # Example
//!
//! ```
//! use coursegrab_extract::{extract_fields, extract_items};
//! use scraper::Html;
//!
//! let doc = Html::parse_document("<title>Assignments: Chinese 1 | Canvas</title>");
//! let listing = extract_items(&doc, None);
//! assert_eq!(listing.course_name, "Chinese 1");
//!
//! let page = Html::parse_document("<h1 class='title'>Essay One</h1>");
//! let fields = extract_fields(&page);
//! assert_eq!(fields.title.as_deref(), Some("Essay One"));
//! ```

pub mod client;
pub mod content;
pub mod error;
pub mod listing;
pub mod oauth;
pub mod record;
pub mod select;

pub use crate::client::{Session, SessionBuilder, BROWSER_USER_AGENT, SESSION_COOKIE};
pub use crate::content::extract_fields;
pub use crate::error::{ErrorCode, ScrapeError};
pub use crate::listing::{extract_items, normalize_url, Listing, UNKNOWN_COURSE};
pub use crate::record::{
    Attachment, Availability, ContentRecord, CourseContent, ItemKind, ItemRecord,
};
