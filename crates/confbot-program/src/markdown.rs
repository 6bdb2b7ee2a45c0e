//! HTML to markdown conversion for session abstracts.
//!
//! The program export stores abstracts as small HTML fragments produced by
//! a CMS editor: paragraphs, line breaks, emphasis, links, lists and the
//! occasional heading. This converter covers that subset; any other tag is
//! dropped and its text kept.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Deserializer};

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h([1-6])[^>]*>(.*?)</h[1-6]\s*>").unwrap());
static BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static STRONG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?(strong|b)(\s[^>]*)?>").unwrap());
static EMPHASIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?(em|i)(\s[^>]*)?>").unwrap());
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</?code(\s[^>]*)?>").unwrap());
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*?href\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a\s*>"#).unwrap()
});
static ORDERED_LIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<ol[^>]*>(.*?)</ol\s*>").unwrap());
static LIST_ITEM_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<li(\s[^>]*)?>").unwrap());
static BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?(p|div|ul|ol|blockquote)(\s[^>]*)?>").unwrap());
static ANY_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").unwrap());
static BLANK_LINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Convert an HTML fragment to markdown.
pub fn html_to_markdown(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    // Source newlines carry no meaning in HTML.
    let text = WHITESPACE_RE.replace_all(html, " ");

    let text = HEADING_RE.replace_all(&text, |caps: &Captures| {
        let level: usize = caps[1].parse().unwrap_or(1);
        format!("\n\n{} {}\n\n", "#".repeat(level), caps[2].trim())
    });
    let text = LINK_RE.replace_all(&text, |caps: &Captures| {
        format!("[{}]({})", caps[2].trim(), &caps[1])
    });
    let text = ORDERED_LIST_RE.replace_all(&text, |caps: &Captures| {
        let items = LIST_ITEM_OPEN_RE.replace_all(&caps[1], "\n1. ");
        format!("\n\n{items}\n\n")
    });
    let text = LIST_ITEM_OPEN_RE.replace_all(&text, "\n- ");
    let text = BREAK_RE.replace_all(&text, "\n");
    let text = STRONG_RE.replace_all(&text, "**");
    let text = EMPHASIS_RE.replace_all(&text, "*");
    let text = CODE_RE.replace_all(&text, "`");
    let text = BLOCK_RE.replace_all(&text, "\n\n");
    let text = ANY_TAG_RE.replace_all(&text, "");
    let text = ENTITY_RE.replace_all(&text, |caps: &Captures| decode_entity(&caps[1], &caps[0]));

    let lines: Vec<&str> = text.split('\n').map(str::trim).collect();
    let joined = lines.join("\n");
    BLANK_LINES_RE
        .replace_all(&joined, "\n\n")
        .trim()
        .to_string()
}

fn decode_entity(entity: &str, original: &str) -> String {
    let decoded = match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        "ndash" => Some('\u{2013}'),
        "mdash" => Some('\u{2014}'),
        "hellip" => Some('\u{2026}'),
        _ => {
            if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                None
            }
        }
    };
    decoded.map_or_else(|| original.to_string(), String::from)
}

/// Serde helper: deserialize an HTML string (or `null`) as markdown.
pub fn deserialize_html<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().map(html_to_markdown).unwrap_or_default())
}
