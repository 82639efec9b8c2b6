//! Renderer for the Markdown subset the synthesis backend produces.
//!
//! Input is scanned line by line into blocks (headings, lists, paragraphs),
//! then each block is rendered with the inline rules from `inline`. The
//! grammar is deliberately small:
//!
//! - headings `#` to `####` followed by a space
//! - `**bold**` and `*italic*`
//! - unordered items `* x` / `- x`, ordered items `N. x`
//! - links `[text](url)`, with `/article/<lang>/<name>` targets marked internal
//! - paragraphs separated by blank lines
//!
//! Rendering never fails. Anything outside the grammar comes out as escaped text.

use std::collections::HashSet;

use crate::html::push_escaped;
use crate::inline::render_inline;

const MAX_HEADING_LEVEL: usize = 4;

/// How heading `id` attributes are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingIds {
    /// The trimmed heading text, verbatim. Duplicate headings share an id.
    #[default]
    Literal,
    /// Lowercased, hyphenated, and de-duplicated with `-2`, `-3`, ...
    Slugged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub heading_ids: HeadingIds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    Heading { level: u8, text: &'a str },
    List { kind: ListKind, items: Vec<&'a str> },
    Paragraph(Vec<&'a str>),
}

enum Line<'a> {
    Blank,
    Heading { level: u8, text: &'a str },
    Item { kind: ListKind, text: &'a str },
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    let content = line.trim();
    if content.is_empty() {
        return Line::Blank;
    }

    let hashes = content.bytes().take_while(|b| *b == b'#').count();
    if (1..=MAX_HEADING_LEVEL).contains(&hashes) {
        let after = &content[hashes..];
        if after.starts_with([' ', '\t']) && !after.trim().is_empty() {
            return Line::Heading {
                level: hashes as u8,
                text: after.trim(),
            };
        }
    }

    if let Some(text) = content
        .strip_prefix("* ")
        .or_else(|| content.strip_prefix("- "))
    {
        return Line::Item {
            kind: ListKind::Unordered,
            text: text.trim(),
        };
    }

    let digits = content.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 {
        if let Some(text) = content[digits..].strip_prefix(". ") {
            return Line::Item {
                kind: ListKind::Ordered,
                text: text.trim(),
            };
        }
    }

    Line::Text(content)
}

/// Splits the payload into blocks. Adjacent items of the same kind share one
/// list; a blank line, a text line, a heading, or a change of kind ends it.
pub fn scan(input: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut list_open = false;

    for line in input.lines() {
        match classify(line) {
            Line::Blank => {
                flush_paragraph(&mut paragraph, &mut blocks);
                list_open = false;
            }
            Line::Heading { level, text } => {
                flush_paragraph(&mut paragraph, &mut blocks);
                blocks.push(Block::Heading { level, text });
                list_open = false;
            }
            Line::Item { kind, text } => {
                flush_paragraph(&mut paragraph, &mut blocks);
                match blocks.last_mut() {
                    Some(Block::List {
                        kind: open_kind,
                        items,
                    }) if list_open && *open_kind == kind => items.push(text),
                    _ => blocks.push(Block::List {
                        kind,
                        items: vec![text],
                    }),
                }
                list_open = true;
            }
            Line::Text(text) => {
                paragraph.push(text);
                list_open = false;
            }
        }
    }
    flush_paragraph(&mut paragraph, &mut blocks);
    blocks
}

fn flush_paragraph<'a>(paragraph: &mut Vec<&'a str>, blocks: &mut Vec<Block<'a>>) {
    if !paragraph.is_empty() {
        blocks.push(Block::Paragraph(std::mem::take(paragraph)));
    }
}

pub fn render_markdown(input: &str) -> String {
    render_markdown_with(input, &RenderOptions::default())
}

pub fn render_markdown_with(input: &str, options: &RenderOptions) -> String {
    let blocks = scan(input);
    if blocks.is_empty() {
        return "<p></p>".to_string();
    }

    let mut ids = HeadingIdAllocator::new(options.heading_ids);
    let mut out = String::with_capacity(input.len() + input.len() / 2);
    for (idx, block) in blocks.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        match block {
            Block::Heading { level, text } => {
                let id = ids.allocate(text);
                out.push_str(&format!("<h{level} id=\""));
                push_escaped(&mut out, &id);
                out.push_str("\">");
                render_inline(text, &mut out);
                out.push_str(&format!("</h{level}>"));
            }
            Block::List { kind, items } => {
                let tag = kind.tag();
                out.push_str(&format!("<{tag}>\n"));
                for item in items {
                    out.push_str("<li>");
                    render_inline(item, &mut out);
                    out.push_str("</li>\n");
                }
                out.push_str(&format!("</{tag}>"));
            }
            Block::Paragraph(lines) => {
                out.push_str("<p>");
                for (line_idx, line) in lines.iter().enumerate() {
                    if line_idx > 0 {
                        out.push('\n');
                    }
                    render_inline(line, &mut out);
                }
                out.push_str("</p>");
            }
        }
    }
    out
}

struct HeadingIdAllocator {
    mode: HeadingIds,
    used: HashSet<String>,
}

impl HeadingIdAllocator {
    fn new(mode: HeadingIds) -> Self {
        Self {
            mode,
            used: HashSet::new(),
        }
    }

    fn allocate(&mut self, text: &str) -> String {
        match self.mode {
            HeadingIds::Literal => text.to_string(),
            HeadingIds::Slugged => {
                let base = slugify(text);
                let mut candidate = base.clone();
                let mut suffix = 2;
                while self.used.contains(&candidate) {
                    candidate = format!("{base}-{suffix}");
                    suffix += 1;
                }
                self.used.insert(candidate.clone());
                candidate
            }
        }
    }
}

/// Lowercase, keep alphanumerics (any script), hyphenate separators, drop the rest.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(ch.to_lowercase());
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_hyphen = true;
        }
    }
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}
