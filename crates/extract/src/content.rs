// ABOUTME: Content extractor for a single item page: title, description, dates, points, etc.
// ABOUTME: Each field is a prioritized selector cascade; misses omit the field, never error.

//! Item-page extraction.
//!
//! [`extract_fields`] pulls a fixed set of named fields out of one saved
//! assignment/page document. Every field is independent and best-effort:
//! the first selector in its cascade that matches wins, and when nothing
//! matches the field is simply absent from the returned record.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::record::{Attachment, Availability, ContentRecord};
use crate::select::{
    element_text, first_block_text, first_element, first_text, own_text, truncate_chars,
};

/// Descriptions are capped at this many characters.
pub const DESCRIPTION_MAX_CHARS: usize = 2000;
/// Rubric summaries are capped at this many characters.
pub const RUBRIC_SUMMARY_MAX_CHARS: usize = 500;

static NUMERIC_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([\d.]+)").unwrap());
static POINTS_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)points?").unwrap());

static ANY_ELEMENT_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("body *").unwrap());
static ATTACHMENT_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.instructure_file_link").unwrap());

const TITLE_SELECTORS: &[&str] = &["h1.title", "h1", "h2.page-title"];
const DESCRIPTION_SELECTORS: &[&str] = &[".description", ".user_content", "#assignment_description"];
const DUE_DATE_SELECTORS: &[&str] = &[".due", ".due_date_display", "tr.due_date_display"];
const POINTS_SELECTORS: &[&str] = &["div.points_possible", "span.points_possible"];
const SUBMISSION_SELECTORS: &[&str] = &[".submission_types"];
const AVAILABLE_FROM_SELECTORS: &[&str] = &[".available_from_date"];
const AVAILABLE_UNTIL_SELECTORS: &[&str] = &[".available_until_date"];
const RUBRIC_SELECTORS: &[&str] = &[".rubric"];

/// Extract all content fields from an item page.
///
/// `id` and `url` are left empty here; the caller merges them in from the
/// originating listing record.
pub fn extract_fields(doc: &Html) -> ContentRecord {
    ContentRecord {
        title: first_text(doc, TITLE_SELECTORS),
        description: first_block_text(doc, DESCRIPTION_SELECTORS)
            .map(|text| truncate_chars(text, DESCRIPTION_MAX_CHARS)),
        due_date: first_text(doc, DUE_DATE_SELECTORS),
        points_possible: extract_points(doc),
        submission_types: first_text(doc, SUBMISSION_SELECTORS),
        availability: extract_availability(doc),
        attachments: extract_attachments(doc),
        has_rubric: first_element(doc, RUBRIC_SELECTORS).map(|_| true),
        rubric_summary: extract_rubric_summary(doc),
        ..Default::default()
    }
}

/// Points: the `points_possible` element, else any element whose own text
/// mentions points. The leading numeric token is preferred; otherwise the
/// raw trimmed text is kept as-is.
fn extract_points(doc: &Html) -> Option<String> {
    let text = first_text(doc, POINTS_SELECTORS).or_else(|| {
        doc.select(&ANY_ELEMENT_SEL)
            .map(|el| own_text(&el))
            .find(|text| POINTS_WORD_RE.is_match(text))
    })?;

    match NUMERIC_TOKEN_RE.captures(&text) {
        Some(caps) => Some(caps[1].to_string()),
        None => Some(text),
    }
}

/// Availability window; the whole field is omitted when neither end is on
/// the page.
fn extract_availability(doc: &Html) -> Option<Availability> {
    let availability = Availability {
        from: first_text(doc, AVAILABLE_FROM_SELECTORS),
        until: first_text(doc, AVAILABLE_UNTIL_SELECTORS),
    };
    if availability.is_empty() {
        None
    } else {
        Some(availability)
    }
}

fn extract_attachments(doc: &Html) -> Vec<Attachment> {
    doc.select(&ATTACHMENT_SEL)
        .filter_map(|el| {
            let url = el.value().attr("href")?.trim().to_string();
            if url.is_empty() {
                return None;
            }
            Some(Attachment {
                name: element_text(&el),
                url,
            })
        })
        .collect()
}

fn extract_rubric_summary(doc: &Html) -> Option<String> {
    let el = first_element(doc, RUBRIC_SELECTORS)?;
    let text = element_text(&el);
    if text.is_empty() {
        None
    } else {
        Some(truncate_chars(text, RUBRIC_SUMMARY_MAX_CHARS))
    }
}
