//! markup.rs - Single-pass cleanup of serialized sanitizer output.
//!
//! The input must be serializer output: lower-case tag names, double-quoted
//! attribute values, no comments, and a literal `<` only where a tag starts.
//! One left-to-right scan removes elements that hold nothing but whitespace,
//! including elements that only become empty once their children are gone.
//! The same scan marks external links to open in a new tab. The work is linear
//! in the input length whatever the nesting depth.
//!
//! License: MIT OR APACHE 2.0

/// Attribute added to links that leave the site.
pub const EXTERNAL_LINK_TARGET: &str = r#" target="_blank""#;

/// Elements that never have a closing tag.
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements that are meaningful even when empty.
const KEEP_WHEN_EMPTY: [&str; 5] = ["td", "th", "iframe", "textarea", "video"];

/// Schemes (and the scheme-relative prefix) that make a link external.
const EXTERNAL_PREFIXES: [&str; 3] = ["http://", "https://", "//"];

struct OpenElement<'a> {
    name: &'a str,
    /// Output length before the opening tag was written.
    start: usize,
    keep: bool,
    has_content: bool,
}

/// Removes empty elements and marks external links in one pass.
pub fn finish_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut open: Vec<OpenElement<'_>> = Vec::new();
    let mut rest = html;

    while let Some(offset) = rest.find('<') {
        let (text, tail) = rest.split_at(offset);
        push_text(&mut out, &mut open, text);
        let Some(length) = tag_length(tail) else {
            push_text(&mut out, &mut open, tail);
            return out;
        };
        let (tag, after) = tail.split_at(length);
        handle_tag(&mut out, &mut open, tag);
        rest = after;
    }
    push_text(&mut out, &mut open, rest);
    out
}

fn push_text(out: &mut String, open: &mut [OpenElement<'_>], text: &str) {
    out.push_str(text);
    if !text.trim().is_empty() {
        mark_content(open);
    }
}

fn mark_content(open: &mut [OpenElement<'_>]) {
    if let Some(parent) = open.last_mut() {
        parent.has_content = true;
    }
}

/// Byte length of the tag at the start of `s`, quotes respected.
fn tag_length(s: &str) -> Option<usize> {
    let mut quoted = false;
    for (index, byte) in s.bytes().enumerate().skip(1) {
        match byte {
            b'"' => quoted = !quoted,
            b'>' if !quoted => return Some(index + 1),
            _ => {}
        }
    }
    None
}

fn tag_name(tag: &str) -> &str {
    let body = tag.trim_start_matches("</").trim_start_matches('<');
    let end = body
        .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
        .unwrap_or(body.len());
    &body[..end]
}

fn handle_tag<'a>(out: &mut String, open: &mut Vec<OpenElement<'a>>, tag: &'a str) {
    let name = tag_name(tag);

    if tag.starts_with("</") {
        close_element(out, open, name, tag);
        return;
    }

    let start = out.len();
    if name == "a" && is_external_link(tag) {
        out.push_str(&tag[..tag.len() - 1]);
        out.push_str(EXTERNAL_LINK_TARGET);
        out.push('>');
    } else {
        out.push_str(tag);
    }

    if name.is_empty() || VOID_ELEMENTS.contains(&name) || tag.ends_with("/>") {
        mark_content(open);
        return;
    }
    open.push(OpenElement {
        name,
        start,
        keep: KEEP_WHEN_EMPTY.contains(&name),
        has_content: false,
    });
}

fn close_element(out: &mut String, open: &mut Vec<OpenElement<'_>>, name: &str, tag: &str) {
    let matches_top = open.last().map(|element| element.name == name).unwrap_or(false);
    if !matches_top {
        out.push_str(tag);
        mark_content(open);
        return;
    }
    let Some(element) = open.pop() else {
        return;
    };
    if element.has_content || element.keep {
        out.push_str(tag);
        mark_content(open);
    } else {
        out.truncate(element.start);
    }
}

fn is_external_link(tag: &str) -> bool {
    let Some(position) = tag.find(r#" href=""#) else {
        return false;
    };
    let value = &tag[position + r#" href=""#.len()..];
    let value = value.split('"').next().unwrap_or("").trim_start().to_ascii_lowercase();
    EXTERNAL_PREFIXES.iter().any(|prefix| value.starts_with(prefix))
}
