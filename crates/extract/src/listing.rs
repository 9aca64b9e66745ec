// ABOUTME: Link extractor for course listing pages: course-name resolution and item discovery.
// ABOUTME: Finds assignment and module-item links, deduplicates by normalized URL, mines due/points.

//! Listing-page extraction.
//!
//! Given a parsed listing page (assignments, modules, or grades overview),
//! [`extract_items`] resolves the course name through an ordered cascade of
//! candidate sources and returns the ordered, deduplicated sequence of item
//! records discovered in the main content region.
//!
//! Two link shapes qualify:
//! - direct assignment links (`/assignments/<id>`), with due date and point
//!   value opportunistically mined from the sibling details block;
//! - module-item links (`/modules/items/<id>` or `/module_item_redirect/<id>`),
//!   classified by the icon markup of their enclosing row.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::record::{ItemKind, ItemRecord};
use crate::select::{element_text, first_element, normalize_whitespace};

/// A listing page's extraction result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub course_name: String,
    pub items: Vec<ItemRecord>,
}

/// Course name used when every resolution rule misses.
pub const UNKNOWN_COURSE: &str = "Unknown_Course";

static COURSE_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:Modules|Assignments|Grades):\s*([^|]+)").unwrap());
static DUE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Due([^-]+)").unwrap());
static PTS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([\d.]+)\s*pts").unwrap());
static SOURCE_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:assignments?|grades?|modules?)[\s_-]*").unwrap());

static ANCHOR_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static TITLE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static BREADCRUMB_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("#breadcrumbs a").unwrap());
static HEADING_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("h1, h2").unwrap());
static DETAILS_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse(".ig-details").unwrap());

/// Containers that delimit the main content region; the whole document is
/// scanned when neither is present.
const CONTENT_CONTAINERS: &[&str] = &["#not_right_side", ".ic-app-main-content"];

/// Row containers that group an item link with its details and icon markup.
const ROW_CLASSES: &[&str] = &["ig-row", "context_module_item"];

/// Extract the course name and the ordered item records from a listing page.
///
/// `source_name` is the saved file's name, used as one of the course-name
/// fallbacks.
pub fn extract_items(doc: &Html, source_name: Option<&str>) -> Listing {
    Listing {
        course_name: resolve_course_name(doc, source_name),
        items: discover_items(doc),
    }
}

/// Resolve the course name; the first rule that produces a value wins and
/// later rules are not evaluated.
fn resolve_course_name(doc: &Html, source_name: Option<&str>) -> String {
    let title = doc
        .select(&TITLE_SEL)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_default();

    // (a) "Modules|Assignments|Grades: <course>" in the page title,
    // trimmed at a following "|".
    if let Some(caps) = COURSE_TITLE_RE.captures(&title) {
        return caps[1].trim().to_string();
    }

    // (b) a short, plausible title verbatim.
    if plausible_name(&title) {
        return title;
    }

    // (c) breadcrumb navigation, skipping the root crumb and generic links.
    for link in doc.select(&BREADCRUMB_SEL).skip(1) {
        let text = element_text(&link);
        let lower = text.to_lowercase();
        if text.is_empty() || matches!(lower.as_str(), "dashboard" | "my dashboard" | "home") {
            continue;
        }
        return text;
    }

    // (d) the saved file's name, minus extension and listing-page prefix.
    if let Some(name) = source_name {
        let stem = strip_html_extension(name);
        let stripped = SOURCE_PREFIX_RE.replace(stem, "");
        let cleaned = stripped.trim_matches(|c: char| c.is_whitespace() || c == '_' || c == '-');
        if !cleaned.is_empty() {
            return cleaned.to_string();
        }
    }

    // (e) the first heading, under the same filters as (b).
    if let Some(heading) = doc.select(&HEADING_SEL).next() {
        let text = element_text(&heading);
        if plausible_name(&text) {
            return text;
        }
    }

    UNKNOWN_COURSE.to_string()
}

/// A candidate course name must be non-empty, short, and not a leftover
/// "enable javascript" interstitial title.
fn plausible_name(text: &str) -> bool {
    !text.is_empty() && text.chars().count() < 100 && !text.to_lowercase().contains("javascript")
}

fn strip_html_extension(name: &str) -> &str {
    let lower = name.to_lowercase();
    if lower.ends_with(".html") {
        &name[..name.len() - 5]
    } else if lower.ends_with(".htm") {
        &name[..name.len() - 4]
    } else {
        name
    }
}

/// Scan the main content region for item links, in document order.
fn discover_items(doc: &Html) -> Vec<ItemRecord> {
    let anchors: Vec<ElementRef> = match first_element(doc, CONTENT_CONTAINERS) {
        Some(container) => container.select(&ANCHOR_SEL).collect(),
        None => doc.select(&ANCHOR_SEL).collect(),
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut items = Vec::new();

    for anchor in anchors {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !href.starts_with("http") {
            continue;
        }

        let record =
            parse_assignment_link(&anchor, href).or_else(|| parse_module_link(&anchor, href));
        if let Some(record) = record {
            // First occurrence of a normalized URL wins.
            if seen.insert(record.url.clone()) {
                items.push(record);
            }
        }
    }

    items
}

/// Direct assignment link: `/assignments/<all-digit id>`.
fn parse_assignment_link(anchor: &ElementRef, href: &str) -> Option<ItemRecord> {
    let rest = href.split("/assignments/").nth(1)?;
    let id = id_token(rest)?;
    let (due_date, points) = mine_details(anchor);

    Some(ItemRecord {
        id,
        title: element_text(anchor),
        url: normalize_url(href),
        due_date,
        points,
        kind: ItemKind::Assignment,
    })
}

/// Module-item link: `/modules/items/<id>` or `/module_item_redirect/<id>`,
/// recorded with a `module_` id prefix to avoid collisions with direct
/// assignment ids.
fn parse_module_link(anchor: &ElementRef, href: &str) -> Option<ItemRecord> {
    let rest = ["/modules/items/", "/module_item_redirect/"]
        .iter()
        .find_map(|marker| href.split(marker).nth(1))?;
    let id = id_token(rest)?;

    Some(ItemRecord {
        id: format!("module_{}", id),
        title: element_text(anchor),
        url: normalize_url(href),
        due_date: String::new(),
        points: String::new(),
        kind: classify_module_item(anchor),
    })
}

/// First path-or-query-terminated token, accepted only when all digits.
fn id_token(rest: &str) -> Option<String> {
    let token = rest.split(['?', '#', '/']).next().unwrap_or("");
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        Some(token.to_string())
    } else {
        None
    }
}

/// Strip query and fragment. Falls back to string truncation when the href
/// does not parse as an absolute URL.
pub fn normalize_url(href: &str) -> String {
    match Url::parse(href) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => {
            let end = href.find(['?', '#']).unwrap_or(href.len());
            href[..end].to_string()
        }
    }
}

/// Mine due date and points from the row's details block. Misses leave the
/// fields empty.
fn mine_details(anchor: &ElementRef) -> (String, String) {
    let Some(row) = ancestor_with_class(anchor, ROW_CLASSES) else {
        return (String::new(), String::new());
    };
    let Some(details) = row.select(&DETAILS_SEL).next() else {
        return (String::new(), String::new());
    };

    let text = normalize_whitespace(&details.text().collect::<Vec<_>>().join(" "));
    let due = DUE_RE
        .captures(&text)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_default();
    let points = PTS_RE
        .captures(&text)
        .map(|c| c[1].to_string())
        .unwrap_or_default();
    (due, points)
}

/// Classify a module item by the icon classes inside its enclosing row.
fn classify_module_item(anchor: &ElementRef) -> ItemKind {
    let Some(row) = ancestor_with_class(anchor, ROW_CLASSES) else {
        return ItemKind::Unknown;
    };

    for node in row.descendants() {
        let Some(element) = node.value().as_element() else {
            continue;
        };
        for class in element.classes() {
            if class.contains("icon-assignment") || class.contains("icon-quiz") {
                return ItemKind::Assignment;
            }
            if class.contains("icon-document") || class.contains("icon-page") {
                return ItemKind::Page;
            }
        }
    }
    ItemKind::Unknown
}

/// Nearest ancestor carrying one of the given classes.
fn ancestor_with_class<'a>(el: &ElementRef<'a>, classes: &[&str]) -> Option<ElementRef<'a>> {
    for node in el.ancestors() {
        let Some(ancestor) = ElementRef::wrap(node) else {
            continue;
        };
        if ancestor
            .value()
            .classes()
            .any(|c| classes.contains(&c))
        {
            return Some(ancestor);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ASSIGNMENTS_PAGE: &str = r#"
        <!DOCTYPE html>
        <html>
        <head><title>Assignments: Chinese 1 | Canvas</title></head>
        <body>
            <div id="breadcrumbs"><ul>
                <li><a href="https://school.instructure.com">Home</a></li>
                <li><a href="https://school.instructure.com/courses/77">Chinese 1</a></li>
            </ul></div>
            <div id="not_right_side">
                <div class="ig-row">
                    <a href="https://school.instructure.com/courses/77/assignments/101?module_item_id=5">Essay One</a>
                    <div class="ig-details">Due Oct 5 by 11:59pm - 10 pts</div>
                </div>
                <div class="ig-row">
                    <a href="https://school.instructure.com/courses/77/assignments/101#submit">Essay One (again)</a>
                </div>
                <div class="ig-row">
                    <a href="https://school.instructure.com/courses/77/assignments/102">Essay Two</a>
                    <div class="ig-details">No dates here</div>
                </div>
                <a href="https://school.instructure.com/courses/77/assignments/">Index</a>
                <a href="/courses/77/assignments/103">Relative, skipped</a>
                <a href="https://school.instructure.com/courses/77/quizzes/9">Quiz link, skipped</a>
            </div>
            <div class="right-side">
                <a href="https://school.instructure.com/courses/77/assignments/999">Sidebar, skipped</a>
            </div>
        </body>
        </html>
    "#;

    const MODULES_PAGE: &str = r#"
        <!DOCTYPE html>
        <html>
        <head><title>Course Modules: Chinese 1</title></head>
        <body>
            <div class="ic-app-main-content">
                <div class="context_module_item">
                    <i class="icon-quiz module-icon"></i>
                    <a href="https://school.instructure.com/courses/77/modules/items/4521">Unit Quiz</a>
                </div>
                <div class="context_module_item">
                    <span class="icon-page"></span>
                    <a href="https://school.instructure.com/courses/77/module_item_redirect/4522">Reading</a>
                </div>
                <div class="context_module_item">
                    <a href="https://school.instructure.com/courses/77/modules/items/4523">Mystery</a>
                </div>
            </div>
        </body>
        </html>
    "#;

    #[test]
    fn course_name_from_title_pattern() {
        let doc = Html::parse_document(ASSIGNMENTS_PAGE);
        let listing = extract_items(&doc, None);
        assert_eq!(listing.course_name, "Chinese 1");
    }

    #[test]
    fn course_name_from_short_title() {
        let doc = Html::parse_document(
            "<html><head><title>Intro to Pottery</title></head><body></body></html>",
        );
        assert_eq!(extract_items(&doc, None).course_name, "Intro to Pottery");
    }

    #[test]
    fn course_name_skips_javascript_interstitial_title() {
        let doc = Html::parse_document(
            r#"<html><head><title>Please enable JavaScript</title></head>
               <body><div id="breadcrumbs"><ul>
                 <li><a href="/">My Dashboard</a></li>
                 <li><a href="/courses/1">Dashboard</a></li>
                 <li><a href="/courses/1">Biology 2</a></li>
               </ul></div></body></html>"#,
        );
        assert_eq!(extract_items(&doc, None).course_name, "Biology 2");
    }

    #[test]
    fn course_name_from_source_filename() {
        let doc = Html::parse_document("<html><head></head><body></body></html>");
        let listing = extract_items(&doc, Some("Assignments_Spanish 2.html"));
        assert_eq!(listing.course_name, "Spanish 2");
    }

    #[test]
    fn course_name_from_heading() {
        let doc = Html::parse_document("<html><body><h1>World History</h1></body></html>");
        assert_eq!(extract_items(&doc, None).course_name, "World History");
    }

    #[test]
    fn course_name_falls_back_to_unknown() {
        let doc = Html::parse_document("<html><body></body></html>");
        assert_eq!(extract_items(&doc, None).course_name, UNKNOWN_COURSE);
    }

    #[test]
    fn discovers_assignment_links_with_details() {
        let doc = Html::parse_document(ASSIGNMENTS_PAGE);
        let items = extract_items(&doc, None).items;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "101");
        assert_eq!(items[0].title, "Essay One");
        assert_eq!(
            items[0].url,
            "https://school.instructure.com/courses/77/assignments/101"
        );
        assert_eq!(items[0].due_date, "Oct 5 by 11:59pm");
        assert_eq!(items[0].points, "10");
        assert_eq!(items[0].kind, ItemKind::Assignment);

        assert_eq!(items[1].id, "102");
        assert_eq!(items[1].due_date, "");
        assert_eq!(items[1].points, "");
    }

    #[test]
    fn normalized_urls_are_unique_and_first_occurrence_wins() {
        let doc = Html::parse_document(ASSIGNMENTS_PAGE);
        let items = extract_items(&doc, None).items;

        let mut urls: Vec<&str> = items.iter().map(|i| i.url.as_str()).collect();
        let before = urls.len();
        urls.sort();
        urls.dedup();
        assert_eq!(urls.len(), before);

        // The query-string variant came first, so its title is the keeper.
        assert_eq!(items[0].title, "Essay One");
    }

    #[test]
    fn sidebar_links_are_outside_the_content_region() {
        let doc = Html::parse_document(ASSIGNMENTS_PAGE);
        let items = extract_items(&doc, None).items;
        assert!(items.iter().all(|i| i.id != "999"));
    }

    #[test]
    fn module_items_get_prefixed_ids_and_icon_kinds() {
        let doc = Html::parse_document(MODULES_PAGE);
        let items = extract_items(&doc, None).items;

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].id, "module_4521");
        assert_eq!(items[0].kind, ItemKind::Assignment);
        assert_eq!(items[1].id, "module_4522");
        assert_eq!(items[1].kind, ItemKind::Page);
        assert_eq!(items[2].id, "module_4523");
        assert_eq!(items[2].kind, ItemKind::Unknown);
    }

    #[test]
    fn non_numeric_ids_are_rejected() {
        let doc = Html::parse_document(
            r#"<html><body>
                <a href="https://x.example/courses/1/assignments/syllabus">Syllabus</a>
                <a href="https://x.example/courses/1/modules/items/new">New</a>
            </body></html>"#,
        );
        assert!(extract_items(&doc, None).items.is_empty());
    }

    #[test]
    fn normalize_url_strips_query_and_fragment() {
        assert_eq!(
            normalize_url("https://x.example/a/1?b=2#frag"),
            "https://x.example/a/1"
        );
        assert_eq!(normalize_url("not a url?x=1"), "not a url");
    }
}
