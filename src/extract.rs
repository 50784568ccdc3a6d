//! Reduces a fetched page to coarse admission keywords.
//!
//! Markup handling is naive: tags and comments are dropped, a handful of
//! entities are decoded, and the text nodes are concatenated as they appear.
//! The content of `<script>`, `<style>` and `<template>` is not page text.

use crate::config::{FULL_KEYWORD, OPEN_KEYWORDS, SNIPPET_LEN};

/// Elements whose content never counts as text. Matched case-insensitively.
const RAW_TEXT_ELEMENTS: [&str; 3] = ["script", "style", "template"];

/// A successfully fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    pub url: String,
    pub status: u16,
    pub html: String,
}

/// Keyword flags derived from one page.
///
/// `is_full` and `is_open` are independent; a page can set both or neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageStatus {
    pub is_full: bool,
    pub is_open: bool,
    /// Leading characters of the normalized text, for logs only.
    pub snippet: String,
}

/// Extract the keyword flags from a page.
pub fn extract(page: &RawPage) -> PageStatus {
    extract_text(&html_to_text(&page.html))
}

/// Keyword detection over already-extracted text. Case-insensitive.
pub fn extract_text(text: &str) -> PageStatus {
    let upper = text.to_uppercase();

    PageStatus {
        is_full: upper.contains(FULL_KEYWORD),
        is_open: OPEN_KEYWORDS.iter().any(|k| upper.contains(k)),
        snippet: upper.chars().take(SNIPPET_LEN).collect(),
    }
}

/// Strip markup from `html`, returning whitespace-normalized text.
pub fn html_to_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        out.push_str(&decode_entities(&rest[..lt]));
        let tail = &rest[lt..];

        if !starts_markup(tail) {
            out.push('<');
            rest = &tail[1..];
            continue;
        }

        let end = if tail.starts_with("<!--") {
            tail.find("-->").map(|i| i + 3)
        } else {
            tail.find('>').map(|i| i + 1)
        };
        rest = match end {
            Some(end) => match raw_text_element(&tail[..end]) {
                Some(name) => skip_raw_text(&tail[end..], name),
                None => &tail[end..],
            },
            // Unterminated tag swallows the remainder
            None => "",
        };
    }
    out.push_str(&decode_entities(rest));

    normalize_ws(&out)
}

/// `<` opens markup only when followed by a tag name, `/`, `!` or `?`.
fn starts_markup(s: &str) -> bool {
    matches!(
        s[1..].chars().next(),
        Some(c) if c.is_ascii_alphabetic() || c == '/' || c == '!' || c == '?'
    )
}

/// Name of the raw-text element opened by `tag`, if it opens one.
fn raw_text_element(tag: &str) -> Option<&'static str> {
    let name = tag[1..]
        .split(|c: char| !c.is_ascii_alphanumeric())
        .next()
        .unwrap_or_default();
    if tag.ends_with("/>") {
        return None;
    }
    RAW_TEXT_ELEMENTS
        .iter()
        .copied()
        .find(|element| element.eq_ignore_ascii_case(name))
}

/// Skip the content of a raw-text element up to and including `</name>`.
///
/// An element that is never closed swallows the remainder.
fn skip_raw_text<'a>(content: &'a str, name: &str) -> &'a str {
    // ASCII lowering keeps byte offsets valid for `content`
    let lower = content.to_ascii_lowercase();
    let needle = format!("</{name}");
    let mut from = 0;

    while let Some(i) = lower[from..].find(&needle) {
        let after = from + i + needle.len();
        if !lower[after..].starts_with(|c: char| c.is_ascii_alphanumeric()) {
            return match content[after..].find('>') {
                Some(gt) => &content[after + gt + 1..],
                None => "",
            };
        }
        from = after;
    }
    ""
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
