// ABOUTME: Selector-cascade helpers for extracting text and attributes from HTML documents.
// ABOUTME: Selectors are tried in priority order; the first non-empty match wins.

//! Selector-cascade extraction helpers.
//!
//! Every field in this system is pulled out of the page by trying a short
//! prioritized list of CSS selectors and taking the first one that yields
//! a non-empty result. These helpers express that pattern once:
//!
//! - Text extraction joins inner text and collapses whitespace.
//! - Block-aware text extraction preserves line breaks at `<br>` and
//!   block-element boundaries (used for assignment descriptions).
//! - A miss is `None`, never an error.

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};

/// Collapses runs of whitespace into single spaces.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized inner text of a single element.
pub fn element_text(el: &ElementRef) -> String {
    normalize_whitespace(&el.text().collect::<Vec<_>>().join(" "))
}

/// Text of an element's direct text-node children only.
///
/// Used where matching against the whole subtree text would make every
/// ancestor (up to `<html>`) a candidate.
pub fn own_text(el: &ElementRef) -> String {
    let mut out = String::new();
    for child in el.children() {
        if let Node::Text(text) = child.value() {
            out.push_str(&**text);
            out.push(' ');
        }
    }
    normalize_whitespace(&out)
}

/// Returns the normalized text of the first non-empty match across the
/// given selectors, in priority order.
pub fn first_text(doc: &Html, selectors: &[&str]) -> Option<String> {
    for &sel_str in selectors {
        let sel = match Selector::parse(sel_str) {
            Ok(s) => s,
            Err(_) => continue,
        };
        for el in doc.select(&sel) {
            let text = element_text(&el);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Returns the first matching element across the given selectors.
pub fn first_element<'a>(doc: &'a Html, selectors: &[&str]) -> Option<ElementRef<'a>> {
    for &sel_str in selectors {
        let sel = match Selector::parse(sel_str) {
            Ok(s) => s,
            Err(_) => continue,
        };
        if let Some(el) = doc.select(&sel).next() {
            return Some(el);
        }
    }
    None
}

/// Tags whose closing edge forces a line break in block-aware text.
fn is_block_tag(name: &str) -> bool {
    matches!(
        name,
        "p" | "div"
            | "br"
            | "li"
            | "tr"
            | "ul"
            | "ol"
            | "table"
            | "blockquote"
            | "pre"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
    )
}

/// Inner text with line breaks preserved at block boundaries.
///
/// Walks the subtree; text nodes accumulate onto the current line, and
/// leaving a block element (or hitting a `<br>`) starts a new one. Each
/// line is whitespace-normalized and runs of blank lines collapse to one.
pub fn block_text(el: &ElementRef) -> String {
    fn walk(node: NodeRef<Node>, lines: &mut Vec<String>, current: &mut String) {
        for child in node.children() {
            match child.value() {
                Node::Text(text) => {
                    current.push_str(&**text);
                    current.push(' ');
                }
                Node::Element(element) => {
                    let block = is_block_tag(element.name());
                    walk(child, lines, current);
                    if block {
                        lines.push(normalize_whitespace(current));
                        current.clear();
                    }
                }
                _ => {}
            }
        }
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    walk(**el, &mut lines, &mut current);
    lines.push(normalize_whitespace(&current));

    let mut out: Vec<&str> = Vec::new();
    for line in &lines {
        if line.is_empty() {
            if matches!(out.last(), Some(l) if !l.is_empty()) {
                out.push("");
            }
        } else {
            out.push(line);
        }
    }
    while matches!(out.last(), Some(&"")) {
        out.pop();
    }
    out.join("\n")
}

/// Block-aware text of the first non-empty match across the selectors.
pub fn first_block_text(doc: &Html, selectors: &[&str]) -> Option<String> {
    for &sel_str in selectors {
        let sel = match Selector::parse(sel_str) {
            Ok(s) => s,
            Err(_) => continue,
        };
        for el in doc.select(&sel) {
            let text = block_text(&el);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Truncates to at most `max` characters, respecting char boundaries.
pub fn truncate_chars(s: String, max: usize) -> String {
    if s.chars().count() <= max {
        s
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html>
        <head><title>Sample</title></head>
        <body>
            <h1 class="title">  Weekly   Essay  </h1>
            <div class="empty"></div>
            <div class="description">
                <p>First paragraph.</p>
                <p>Second paragraph<br>with a break.</p>
                <ul><li>one</li><li>two</li></ul>
            </div>
            <span class="points_possible"> 10 </span>
        </body>
        </html>
    "#;

    fn doc() -> Html {
        Html::parse_document(SAMPLE_HTML)
    }

    #[test]
    fn first_text_takes_priority_order() {
        let doc = doc();
        let result = first_text(&doc, &["h1.title", "h1"]);
        assert_eq!(result, Some("Weekly Essay".to_string()));
    }

    #[test]
    fn first_text_skips_empty_elements() {
        let doc = doc();
        let result = first_text(&doc, &["div.empty", "span.points_possible"]);
        assert_eq!(result, Some("10".to_string()));
    }

    #[test]
    fn first_text_none_when_nothing_matches() {
        let doc = doc();
        assert_eq!(first_text(&doc, &[".nope", ".also-nope"]), None);
    }

    #[test]
    fn invalid_selector_is_skipped() {
        let doc = doc();
        let result = first_text(&doc, &["[[[bad", "h1.title"]);
        assert_eq!(result, Some("Weekly Essay".to_string()));
    }

    #[test]
    fn block_text_preserves_line_breaks() {
        let doc = doc();
        let result = first_block_text(&doc, &[".description"]).unwrap();
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(
            lines,
            vec![
                "First paragraph.",
                "Second paragraph",
                "with a break.",
                "one",
                "two",
            ]
        );
    }

    #[test]
    fn own_text_ignores_child_elements() {
        let html = Html::parse_document(
            r#"<div class="outer">Points <span>ignored</span> 25</div>"#,
        );
        let sel = Selector::parse("div.outer").unwrap();
        let el = html.select(&sel).next().unwrap();
        assert_eq!(own_text(&el), "Points 25");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo".to_string(), 2), "hé");
        assert_eq!(truncate_chars("abc".to_string(), 5), "abc");
        assert_eq!(truncate_chars("a".repeat(2500), 2000).chars().count(), 2000);
    }
}
