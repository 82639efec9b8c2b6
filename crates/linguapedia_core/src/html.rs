//! Minimal HTML escaping shared by the renderer and the page assembly.

/// Escapes text content. Quotes are escaped too so the result is also safe
/// inside a double-quoted attribute.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    push_escaped(&mut out, raw);
    out
}

pub fn push_escaped(out: &mut String, raw: &str) {
    for ch in raw.chars() {
        push_escaped_char(out, ch);
    }
}

pub(crate) fn push_escaped_char(out: &mut String, ch: char) {
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        _ => out.push(ch),
    }
}
