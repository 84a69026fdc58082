//! Escaping and post-body sanitizing for rendered markup.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Tags a post body may keep.
pub const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "strong", "em", "ul", "ol", "li", "a", "h1", "h2", "h3", "h4", "blockquote",
    "code", "pre",
];

/// Attributes kept on allowed tags.
pub const ALLOWED_ATTRIBUTES: &[&str] = &["href", "title", "alt"];

static COMMENT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?(-->|$)").unwrap());
static TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9]*)([^>]*)>").unwrap());
static ATTR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .unwrap()
});
static ENTITY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(?:#[xX]([0-9A-Fa-f]+)|#([0-9]+)|([A-Za-z]+));?").unwrap());

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape for a double-quoted attribute value.
pub fn escape_attr(s: &str) -> String {
    escape_html(s)
}

/// Reduce untrusted HTML to the allowed tag and attribute sets.
///
/// Disallowed tags are dropped and their text kept. Comments are removed,
/// scriptable links lose their `href`, and any `<` left outside an emitted
/// tag (such as a tag cut off at the end of the input) is escaped.
pub fn sanitize_html(html: &str) -> String {
    let without_comments = COMMENT_REGEX.replace_all(html, "");
    let mut out = String::with_capacity(without_comments.len());
    let mut last = 0;

    for caps in TAG_REGEX.captures_iter(&without_comments) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(&mut out, &without_comments[last..whole.start()]);
        last = whole.end();

        let name = caps[2].to_ascii_lowercase();
        if !ALLOWED_TAGS.contains(&name.as_str()) {
            continue;
        }
        if caps[1].is_empty() {
            out.push_str(&format!("<{}{}>", name, allowed_attributes(&caps[3])));
        } else {
            out.push_str(&format!("</{}>", name));
        }
    }
    push_text(&mut out, &without_comments[last..]);
    out
}

// Text between tags keeps its entities; only markup delimiters are escaped.
fn push_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn allowed_attributes(raw: &str) -> String {
    let mut out = String::new();
    for caps in ATTR_REGEX.captures_iter(raw) {
        let name = caps[1].to_ascii_lowercase();
        if !ALLOWED_ATTRIBUTES.contains(&name.as_str()) {
            continue;
        }
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str())
            .unwrap_or("");
        if name == "href" && is_script_url(value) {
            continue;
        }
        out.push_str(&format!(" {}=\"{}\"", name, quote_attr(value)));
    }
    out
}

// Values come from markup and may already carry entities, so `&` stays.
fn quote_attr(value: &str) -> String {
    value
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Character references decoded the way a browser would before it reads
/// the URL scheme.
fn decode_entities(value: &str) -> String {
    ENTITY_REGEX
        .replace_all(value, |caps: &Captures| {
            let code = match (caps.get(1), caps.get(2)) {
                (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
                (None, Some(dec)) => dec.as_str().parse::<u32>().ok(),
                (None, None) => None,
            };
            if let Some(code) = code {
                return char::from_u32(code).map(String::from).unwrap_or_default();
            }
            let named = match caps.get(3).map(|m| m.as_str().to_ascii_lowercase()).as_deref() {
                Some("colon") => ":",
                Some("tab") => "\t",
                Some("newline") => "\n",
                Some("amp") => "&",
                Some("sol") => "/",
                Some("lpar") => "(",
                Some("rpar") => ")",
                _ => return caps[0].to_string(),
            };
            named.to_string()
        })
        .into_owned()
}

fn is_script_url(value: &str) -> bool {
    let compact: String = decode_entities(value)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    let lower = compact.to_ascii_lowercase();
    lower.starts_with("javascript:") || lower.starts_with("vbscript:") || lower.starts_with("data:")
}
