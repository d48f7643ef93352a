//! HTML helpers shared by the engines
//!
//! Everything here is synchronous. A parsed `scraper::Html` is not `Send`, so
//! engines parse after the fetch completes and drop the document before
//! returning.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use docsift_domain::Metadata;
use scraper::{ElementRef, Html, Node, Selector};
use serde_json::Value;
use url::Url;

/// Elements whose text is never part of the content
pub(crate) const SKIPPED_TAGS: [&str; 10] = [
    "script", "style", "noscript", "template", "nav", "header", "footer", "aside", "form",
    "iframe",
];

/// Elements treated as one paragraph each
pub(crate) const BLOCK_TAGS: [&str; 13] = [
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "blockquote", "pre", "dd", "dt",
    "figcaption",
];

/// Images kept per page
pub(crate) const MAX_IMAGES: usize = 10;

pub(crate) fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Collapse whitespace runs into single spaces
pub(crate) fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn walk(el: ElementRef<'_>, acc: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => acc.push_str(text),
            Node::Element(element) => {
                let name = element.name();
                if SKIPPED_TAGS.contains(&name) {
                    continue;
                }
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                let spaced = name == "br" || name == "div" || BLOCK_TAGS.contains(&name);
                if spaced {
                    acc.push(' ');
                }
                walk(child_el, acc);
                if spaced {
                    acc.push(' ');
                }
            }
            _ => {}
        }
    }
}

/// Visible text of `el`, whitespace collapsed
pub(crate) fn visible_text(el: ElementRef<'_>) -> String {
    let mut acc = String::new();
    walk(el, &mut acc);
    collapse_ws(&acc)
}

fn collect_blocks(el: ElementRef<'_>, out: &mut Vec<String>) {
    for child in el.children() {
        let Some(child_el) = ElementRef::wrap(child) else {
            continue;
        };
        let name = child_el.value().name();
        if SKIPPED_TAGS.contains(&name) {
            continue;
        }
        if BLOCK_TAGS.contains(&name) {
            let text = visible_text(child_el);
            if !text.is_empty() {
                out.push(text);
            }
        } else {
            collect_blocks(child_el, out);
        }
    }
}

/// Paragraph block texts under `el`, in document order
pub(crate) fn blocks(el: ElementRef<'_>) -> Vec<String> {
    let mut out = Vec::new();
    collect_blocks(el, &mut out);
    out
}

/// Block texts of `el` joined by blank lines, or its visible text when it has no blocks
pub(crate) fn paragraph_text(el: ElementRef<'_>) -> String {
    let blocks = blocks(el);
    if blocks.is_empty() {
        return visible_text(el);
    }
    blocks.join("\n\n")
}

/// Re-join text that uses single newlines between paragraphs with blank lines
pub(crate) fn normalize_paragraphs(text: &str) -> String {
    text.lines()
        .map(collapse_ws)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Body element, or the document root
pub(crate) fn body(doc: &Html) -> ElementRef<'_> {
    selector("body")
        .and_then(|sel| doc.select(&sel).next())
        .unwrap_or_else(|| doc.root_element())
}

/// Trimmed text of the first element matching `css`
pub(crate) fn first_text(doc: &Html, css: &str) -> Option<String> {
    let sel = selector(css)?;
    doc.select(&sel)
        .map(visible_text)
        .find(|t| !t.is_empty())
}

/// Trimmed attribute of the first element matching `css` that has it
pub(crate) fn first_attr(doc: &Html, css: &str, attr: &str) -> Option<String> {
    let sel = selector(css)?;
    doc.select(&sel)
        .filter_map(|el| el.value().attr(attr))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

/// `<title>` text
pub(crate) fn title(doc: &Html) -> Option<String> {
    let sel = selector("title")?;
    doc.select(&sel)
        .map(|el| collapse_ws(&el.text().collect::<String>()))
        .find(|t| !t.is_empty())
}

/// Every `<meta>` with a `name` or `property` mapped to its `content`
pub(crate) fn meta_map(doc: &Html) -> Metadata {
    let mut map = Metadata::new();
    let Some(sel) = selector("meta[content]") else {
        return map;
    };
    for el in doc.select(&sel) {
        let key = el
            .value()
            .attr("name")
            .or_else(|| el.value().attr("property"));
        if let (Some(key), Some(content)) = (key, el.value().attr("content")) {
            map.entry(key.to_string())
                .or_insert_with(|| Value::String(content.trim().to_string()));
        }
    }
    map
}

/// Resolve `href` against `base`, keeping http(s) targets only
pub(crate) fn absolutize(base: &Url, href: &str) -> Option<String> {
    let resolved = base.join(href.trim()).ok()?;
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}

/// Absolute image URLs under `el`, first `MAX_IMAGES`, deduplicated
pub(crate) fn images(el: ElementRef<'_>, base: &Url) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let Some(sel) = selector("img[src]") else {
        return out;
    };
    for src in el.select(&sel).filter_map(|img| img.value().attr("src")) {
        if out.len() >= MAX_IMAGES {
            break;
        }
        if let Some(url) = absolutize(base, src) {
            if !out.contains(&url) {
                out.push(url);
            }
        }
    }
    out
}

/// Absolute outbound link targets under `el`, deduplicated
pub(crate) fn links(el: ElementRef<'_>, base: &Url) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let Some(sel) = selector("a[href]") else {
        return out;
    };
    for href in el.select(&sel).filter_map(|a| a.value().attr("href")) {
        if href.starts_with('#') {
            continue;
        }
        if let Some(url) = absolutize(base, href) {
            if !out.contains(&url) {
                out.push(url);
            }
        }
    }
    out
}

/// Publication date declared in `article:published_time` or the first `<time datetime>`
pub(crate) fn declared_date(doc: &Html) -> Option<DateTime<Utc>> {
    first_attr(doc, r#"meta[property="article:published_time"]"#, "content")
        .or_else(|| first_attr(doc, "time[datetime]", "datetime"))
        .and_then(|raw| parse_date(&raw))
}

/// Parse the date formats commonly found in article markup
pub(crate) fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    None
}
