//! Chapter body extraction.
//!
//! The reader page layout has drifted across site revisions, so the readable
//! content is located by four strategies tried in order; each runs only when
//! the previous one produced nothing. All of them drop the known non-content
//! furniture: navigation tables, comment forms, reader controls, scripts and
//! styles. An empty string means no strategy matched.

use scraper::{Element, ElementRef, Html, Node, Selector};

const CONTENT_CONTAINERS: [&str; 2] = [".read-text", ".reader-content"];
const BLOCKED_TAGS: [&str; 3] = ["table", "script", "style"];
const BLOCKED_CLASSES: [&str; 2] = ["comments-form", "reader-controls"];

pub(crate) fn extract_chapter_content(html: &str) -> String {
    let document = Html::parse_document(html);

    for container in CONTENT_CONTAINERS {
        let selector = Selector::parse(container).unwrap();
        if let Some(element) = document.select(&selector).next() {
            let content = filtered_inner_html(element);
            if !content.trim().is_empty() {
                return content;
            }
        }
    }

    let content = collect_after_heading(&document);
    if !content.trim().is_empty() {
        return content;
    }

    raw_slice_between_heading_and_table(html)
}

fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|candidate| candidate == class)
}

fn is_furniture(element: ElementRef<'_>) -> bool {
    BLOCKED_TAGS.contains(&element.value().name())
        || BLOCKED_CLASSES
            .iter()
            .any(|class| has_class(element, class))
}

/// Inner markup of `element` with non-content children dropped.
fn filtered_inner_html(element: ElementRef<'_>) -> String {
    let mut content = String::new();
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if !is_furniture(child_element) {
                content.push_str(&child_element.html());
            }
        } else if let Node::Text(text) = child.value() {
            content.push_str(text);
        }
    }
    content
}

/// Structural fallback: walk forward from the first heading collecting
/// paragraph-level siblings until the chapter-list table or the comments
/// form.
fn collect_after_heading(document: &Html) -> String {
    let heading = Selector::parse("h1.reader-title, h1").unwrap();
    let Some(h1) = document.select(&heading).next() else {
        return String::new();
    };

    let mut content = String::new();
    let mut current = h1.next_sibling_element();
    while let Some(element) = current {
        let tag = element.value().name();
        if tag == "table" || has_class(element, "comments-form") {
            break;
        }
        let skip = matches!(tag, "script" | "style") || has_class(element, "reader-controls");
        if !skip && matches!(tag, "p" | "div" | "br") {
            content.push_str(&element.html());
        }
        current = element.next_sibling_element();
    }
    content
}

/// Last resort on markup the tree parser cannot make sense of: the raw HTML
/// between the closing tag of the first heading and the first table.
fn raw_slice_between_heading_and_table(html: &str) -> String {
    let Some(heading_end) = html.find("</h1>") else {
        return String::new();
    };
    let body_start = heading_end + "</h1>".len();
    match html[body_start..].find("<table") {
        Some(table_start) => html[body_start..body_start + table_start].trim().to_string(),
        None => String::new(),
    }
}
