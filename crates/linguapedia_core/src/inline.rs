use crate::html::{push_escaped, push_escaped_char};
use crate::ArticleRoute;

/// Class carried by links that route through the internal article view.
pub const INTERNAL_LINK_CLASS: &str = "internal-link";

/// Renders one line of inline Markdown: links, `**bold**`, `*italic*`.
/// Unmatched markers are emitted as literal text.
pub(crate) fn render_inline(text: &str, out: &mut String) {
    let mut rest = text;
    while let Some(ch) = rest.chars().next() {
        match ch {
            '[' => {
                if let Some(link) = parse_link(rest) {
                    write_link(&link, out);
                    rest = &rest[link.consumed..];
                    continue;
                }
            }
            '*' if rest.starts_with("**") => {
                if let Some(end) = find_bold_close(&rest[2..]) {
                    out.push_str("<strong>");
                    render_inline(&rest[2..2 + end], out);
                    out.push_str("</strong>");
                    rest = &rest[2 + end + 2..];
                    continue;
                }
                if let Some(end) = find_italic_close(&rest[1..]) {
                    write_italic(&rest[1..1 + end], out);
                    rest = &rest[1 + end + 1..];
                    continue;
                }
            }
            '*' => {
                if let Some(end) = find_italic_close(&rest[1..]) {
                    write_italic(&rest[1..1 + end], out);
                    rest = &rest[1 + end + 1..];
                    continue;
                }
            }
            _ => {}
        }
        push_escaped_char(out, ch);
        rest = &rest[ch.len_utf8()..];
    }
}

struct Link<'a> {
    label: &'a str,
    target: &'a str,
    consumed: usize,
}

fn parse_link(rest: &str) -> Option<Link<'_>> {
    let label_end = rest.find(']')?;
    let after_label = &rest[label_end + 1..];
    if !after_label.starts_with('(') {
        return None;
    }
    let target_end = after_label.find(')')?;
    let target = after_label[1..target_end].trim();
    if target.is_empty() {
        return None;
    }
    Some(Link {
        label: &rest[1..label_end],
        target,
        consumed: label_end + 1 + target_end + 1,
    })
}

fn write_link(link: &Link<'_>, out: &mut String) {
    match ArticleRoute::parse(link.target) {
        Some(route) => {
            out.push_str("<a href=\"");
            push_escaped(out, &route.path());
            out.push_str("\" class=\"");
            out.push_str(INTERNAL_LINK_CLASS);
            out.push_str("\">");
        }
        None => {
            out.push_str("<a href=\"");
            push_escaped(out, link.target);
            out.push_str("\">");
        }
    }
    render_inline(link.label, out);
    out.push_str("</a>");
}

fn write_italic(inner: &str, out: &mut String) {
    out.push_str("<em>");
    render_inline(inner, out);
    out.push_str("</em>");
}

/// Offset of the closing `**`, if the enclosed text is non-empty.
fn find_bold_close(text: &str) -> Option<usize> {
    let end = text.find("**")?;
    (end > 0).then_some(end)
}

/// Offset of the closing single `*`. Bold pairs inside italics are skipped so
/// `*a **b** c*` stays one italic span. The span may not start with whitespace,
/// which keeps arithmetic like `2 * 3 * 4` literal.
fn find_italic_close(text: &str) -> Option<usize> {
    if text.is_empty() || text.starts_with(char::is_whitespace) || text.starts_with('*') {
        return None;
    }
    let bytes = text.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'*' {
            if bytes.get(idx + 1) == Some(&b'*') {
                match text[idx + 2..].find("**") {
                    Some(close) => {
                        idx += 2 + close + 2;
                        continue;
                    }
                    None => return None,
                }
            }
            return Some(idx);
        }
        idx += 1;
    }
    None
}
