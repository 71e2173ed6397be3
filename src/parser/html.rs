// src/parser/html.rs
// =============================================================================
// This module pulls metadata and same-site links out of HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Extraction is best effort: a missing <title> or <meta> tag simply gives
// an empty string, never an error.
//
// Only root-relative links ("/docs", "/about#team") are collected. They are
// resolved against the start URL later by the crawl queue, which keeps the
// crawl on the site it started from.
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashSet;

/// Metadata found in the <head> of a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub keywords: String,
}

/// Everything we want from one HTML document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlExtract {
    pub meta: PageMeta,
    /// Root-relative links, de-duplicated, in the order they first appear
    pub links: Vec<String>,
}

// Parses the HTML once and extracts both metadata and links
pub fn extract_page(html: &str) -> HtmlExtract {
    let document = Html::parse_document(html);

    HtmlExtract {
        meta: extract_meta(&document),
        links: extract_links(&document),
    }
}

// Reads <title>, <meta name="description"> and <meta name="keywords">
fn extract_meta(document: &Html) -> PageMeta {
    // These selectors are constants and known to be valid
    let title_selector = Selector::parse("title").expect("valid title selector");
    let description_selector =
        Selector::parse(r#"meta[name="description"]"#).expect("valid description selector");
    let keywords_selector =
        Selector::parse(r#"meta[name="keywords"]"#).expect("valid keywords selector");

    let title = document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    PageMeta {
        title,
        description: meta_content(document, &description_selector),
        keywords: meta_content(document, &keywords_selector),
    }
}

// Returns the trimmed `content` attribute of the first matching <meta> tag
fn meta_content(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

// Collects every root-relative href on the page
fn extract_links(document: &Html) -> Vec<String> {
    let selector = Selector::parse("a[href]").expect("valid link selector");

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(link) = root_relative(href) {
                // insert() returns false when we've already seen this link
                if seen.insert(link.clone()) {
                    links.push(link);
                }
            }
        }
    }

    links
}

// Keeps links of the form "/path", dropping any "#fragment"
//
// Examples:
//   "/docs"          -> Some("/docs")
//   "/docs#install"  -> Some("/docs")
//   "//cdn.site/x"   -> None (protocol-relative, another host)
//   "https://x.com"  -> None (absolute)
//   "about"          -> None (document-relative)
//   "#top"           -> None (anchor on the same page)
fn root_relative(href: &str) -> Option<String> {
    let href = href.trim();

    if !href.starts_with('/') || href.starts_with("//") {
        return None;
    }

    let path = match href.find('#') {
        Some(index) => &href[..index],
        None => href,
    };

    Some(path.to_string())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does element.text() return?
//    - An iterator over all text nodes inside the element
//    - collect::<String>() glues them together
//
// 2. Why a HashSet and a Vec?
//    - The HashSet answers "have we seen this link?" in O(1)
//    - The Vec keeps the links in page order
// -----------------------------------------------------------------------------
