use std::collections::{HashMap, HashSet};

use ego_tree::{NodeId, NodeRef};
use linguapedia_core::{escape_html, push_escaped};
use scraper::node::Node;
use scraper::{ElementRef, Html};

/// Articles with fewer headings than this get no table of contents.
pub const TOC_MIN_HEADINGS: usize = 3;
/// Indentation per heading level below h1.
pub const TOC_INDENT_PX: u32 = 20;
const POSITIONAL_ID_PREFIX: &str = "heading-";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub level: u8,
    pub anchor: String,
    pub text: String,
}

impl TocEntry {
    pub fn indent_px(&self) -> u32 {
        u32::from(self.level.saturating_sub(1)) * TOC_INDENT_PX
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TocPanel {
    Hidden,
    Visible(Vec<TocEntry>),
}

impl TocPanel {
    pub fn is_hidden(&self) -> bool {
        matches!(self, TocPanel::Hidden)
    }

    pub fn entries(&self) -> &[TocEntry] {
        match self {
            TocPanel::Hidden => &[],
            TocPanel::Visible(entries) => entries,
        }
    }

    /// `<li>` items for the TOC list, one per entry, indented by level.
    pub fn to_html_list(&self) -> String {
        self.entries()
            .iter()
            .map(|entry| {
                format!(
                    "<li class=\"toc-h{level}\" style=\"margin-left: {indent}px\"><a href=\"#{anchor}\">{text}</a></li>",
                    level = entry.level,
                    indent = entry.indent_px(),
                    anchor = escape_html(&entry.anchor),
                    text = escape_html(&entry.text),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedArticle {
    /// Article HTML, with positional ids added to headings that had none.
    pub html: String,
    pub toc: TocPanel,
}

struct FoundHeading {
    node: NodeId,
    level: u8,
    existing_id: Option<String>,
    text: String,
}

/// Scans rendered article HTML for h1-h3 headings in document order and
/// derives the table of contents.
///
/// With fewer than [`TOC_MIN_HEADINGS`] headings the panel is hidden and the
/// HTML is returned untouched. Otherwise headings without a non-empty `id`
/// are given `heading-<n>`, `n` being the heading's position among h1-h3,
/// with a numeric suffix when that id is already present in the document.
/// The function is pure, so annotating its own output again yields the same
/// entries.
pub fn build_toc(html: &str) -> AnnotatedArticle {
    let fragment = Html::parse_fragment(html);
    let headings = find_headings(&fragment);

    if headings.len() < TOC_MIN_HEADINGS {
        return AnnotatedArticle {
            html: html.to_string(),
            toc: TocPanel::Hidden,
        };
    }

    let mut taken = existing_ids(&fragment);
    let mut assigned: HashMap<NodeId, String> = HashMap::new();
    let entries = headings
        .into_iter()
        .enumerate()
        .map(|(index, heading)| {
            let anchor = match heading.existing_id {
                Some(id) => id,
                None => {
                    let id = unused_positional_id(index, &mut taken);
                    assigned.insert(heading.node, id.clone());
                    id
                }
            };
            TocEntry {
                level: heading.level,
                anchor,
                text: heading.text,
            }
        })
        .collect();

    let html = if assigned.is_empty() {
        html.to_string()
    } else {
        let mut writer = FragmentWriter {
            assigned: &assigned,
            out: String::with_capacity(html.len() + assigned.len() * 24),
        };
        for child in fragment.root_element().children() {
            writer.write_node(child);
        }
        writer.out
    };

    AnnotatedArticle {
        html,
        toc: TocPanel::Visible(entries),
    }
}

fn find_headings(fragment: &Html) -> Vec<FoundHeading> {
    fragment
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter_map(|element| {
            let level = heading_level(element.value().name())?;
            let existing_id = element
                .value()
                .id()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(ToOwned::to_owned);
            let text = element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ");
            Some(FoundHeading {
                node: (*element).id(),
                level,
                existing_id,
                text,
            })
        })
        .collect()
}

fn existing_ids(fragment: &Html) -> HashSet<String> {
    fragment
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter_map(|element| element.value().id())
        .map(|id| id.trim().to_string())
        .collect()
}

/// `heading-<index>`, suffixed `-2`, `-3`, ... if the document already uses it.
fn unused_positional_id(index: usize, taken: &mut HashSet<String>) -> String {
    let base = format!("{POSITIONAL_ID_PREFIX}{index}");
    let mut candidate = base.clone();
    let mut suffix = 2;
    while taken.contains(&candidate) {
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }
    taken.insert(candidate.clone());
    candidate
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        _ => None,
    }
}

/// Re-serializes a parsed fragment, injecting assigned heading ids.
/// Attributes are written in name order so output is deterministic.
struct FragmentWriter<'a> {
    assigned: &'a HashMap<NodeId, String>,
    out: String,
}

impl FragmentWriter<'_> {
    fn write_node(&mut self, node: NodeRef<'_, Node>) {
        match node.value() {
            Node::Text(text) => push_escaped(&mut self.out, text),
            Node::Comment(comment) => {
                self.out.push_str("<!--");
                self.out.push_str(comment);
                self.out.push_str("-->");
            }
            Node::Element(element) => {
                let name = element.name();
                self.out.push('<');
                self.out.push_str(name);

                let assigned_id = self.assigned.get(&node.id());
                if let Some(id) = assigned_id {
                    self.write_attr("id", id);
                }
                let mut attrs: Vec<(&str, &str)> = element
                    .attrs()
                    .filter(|(key, _)| assigned_id.is_none() || *key != "id")
                    .collect();
                attrs.sort_unstable_by(|a, b| a.0.cmp(b.0));
                for (key, value) in attrs {
                    self.write_attr(key, value);
                }
                self.out.push('>');

                if VOID_ELEMENTS.contains(&name) {
                    return;
                }
                for child in node.children() {
                    self.write_node(child);
                }
                self.out.push_str("</");
                self.out.push_str(name);
                self.out.push('>');
            }
            _ => {
                for child in node.children() {
                    self.write_node(child);
                }
            }
        }
    }

    fn write_attr(&mut self, key: &str, value: &str) {
        self.out.push(' ');
        self.out.push_str(key);
        self.out.push_str("=\"");
        push_escaped(&mut self.out, value);
        self.out.push('"');
    }
}
