use linguapedia_core::{render_markdown, ArticleRoute, HeadingIds, RenderOptions};
use linguapedia_engine::{build_toc, render_article_page, TocEntry, TocPanel};
use pretty_assertions::assert_eq;

fn entry(level: u8, anchor: &str, text: &str) -> TocEntry {
    TocEntry {
        level,
        anchor: anchor.to_string(),
        text: text.to_string(),
    }
}

#[test]
fn fewer_than_three_headings_hides_the_panel() {
    let html = "<h1>One</h1><p>x</p><h2>Two</h2>";
    let annotated = build_toc(html);
    assert_eq!(annotated.toc, TocPanel::Hidden);
    assert_eq!(annotated.html, html);
    assert_eq!(annotated.toc.to_html_list(), "");
}

#[test]
fn headings_without_ids_get_positional_ids() {
    let html = "<h1>Intro</h1><h2 id=\"kept\">Kept</h2><h4>Skipped</h4><h3>Deep <em>part</em></h3>";
    let annotated = build_toc(html);
    assert_eq!(
        annotated.toc.entries(),
        &[
            entry(1, "heading-0", "Intro"),
            entry(2, "kept", "Kept"),
            entry(3, "heading-2", "Deep part"),
        ]
    );
    assert_eq!(
        annotated.html,
        "<h1 id=\"heading-0\">Intro</h1><h2 id=\"kept\">Kept</h2><h4>Skipped</h4><h3 id=\"heading-2\">Deep <em>part</em></h3>"
    );
}

#[test]
fn positional_ids_avoid_ids_already_in_the_document() {
    let annotated = build_toc("<h1>Intro</h1><h2>B</h2><h2 id=\"heading-0\">C</h2>");
    let anchors: Vec<&str> = annotated
        .toc
        .entries()
        .iter()
        .map(|entry| entry.anchor.as_str())
        .collect();
    assert_eq!(anchors, vec!["heading-0-2", "heading-1", "heading-0"]);
    assert!(annotated.html.starts_with("<h1 id=\"heading-0-2\">Intro</h1>"));

    let again = build_toc(&annotated.html);
    assert_eq!(again.toc, annotated.toc);
}

#[test]
fn list_items_are_indented_by_level() {
    let annotated = build_toc("<h1 id=\"a\">A</h1><h2 id=\"b\">B</h2><h3 id=\"c\">C &amp; D</h3>");
    assert_eq!(
        annotated.toc.to_html_list(),
        "<li class=\"toc-h1\" style=\"margin-left: 0px\"><a href=\"#a\">A</a></li>\n\
<li class=\"toc-h2\" style=\"margin-left: 20px\"><a href=\"#b\">B</a></li>\n\
<li class=\"toc-h3\" style=\"margin-left: 40px\"><a href=\"#c\">C &amp; D</a></li>"
    );
}

#[test]
fn annotating_twice_gives_the_same_entries() {
    let first = build_toc("<h1>A</h1><h2>B</h2><h2>C</h2>");
    let second = build_toc(&first.html);
    assert_eq!(first.toc, second.toc);
    assert_eq!(first.html, second.html);
}

#[test]
fn rendered_markdown_keeps_literal_heading_ids() {
    let html = render_markdown("# Early life\n\n## Work\n\n## Legacy\n\nText.");
    let annotated = build_toc(&html);
    let anchors: Vec<&str> = annotated
        .toc
        .entries()
        .iter()
        .map(|entry| entry.anchor.as_str())
        .collect();
    assert_eq!(anchors, vec!["Early life", "Work", "Legacy"]);
}

#[test]
fn article_page_document_wires_toc_and_regenerate_prompt() {
    let route = ArticleRoute::new("en", "Ada_Lovelace").unwrap();
    let options = RenderOptions {
        heading_ids: HeadingIds::Slugged,
    };
    let page = render_article_page(
        &route,
        "# Early life\n\n## Work\n\nSee [Babbage](/article/en/Charles_Babbage).\n\n## Legacy",
        &options,
    );
    assert!(!page.toc.is_hidden());
    assert_eq!(page.title, "Ada Lovelace");

    let document = page.to_html_document();
    assert!(document.contains("<nav id=\"toc\">"));
    assert!(document.contains("href=\"#early-life\""));
    assert!(document.contains("class=\"internal-link\""));
    assert!(document.contains("href=\"/regenerate/en/Ada_Lovelace\""));
    assert!(document.contains("onclick=\"return confirm("));
}

#[test]
fn short_article_page_hides_the_toc_panel() {
    let route = ArticleRoute::new("en", "Stub").unwrap();
    let page = render_article_page(&route, "Just a line.", &RenderOptions::default());
    assert!(page.toc.is_hidden());
    assert!(page.to_html_document().contains("<nav id=\"toc\" hidden>"));
}
