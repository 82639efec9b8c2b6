use linguapedia_core::{
    escape_html, render_markdown_with, ArticleRoute, DestructiveAction, RenderOptions,
};

use crate::toc::{build_toc, TocPanel};

/// A rendered article plus its table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticlePage {
    pub route: ArticleRoute,
    pub title: String,
    pub content_html: String,
    pub toc: TocPanel,
}

/// Markdown payload -> article HTML -> TOC pass.
pub fn render_article_page(
    route: &ArticleRoute,
    markdown: &str,
    options: &RenderOptions,
) -> ArticlePage {
    let rendered = render_markdown_with(markdown, options);
    let annotated = build_toc(&rendered);
    ArticlePage {
        route: route.clone(),
        title: route.display_title(),
        content_html: annotated.html,
        toc: annotated.toc,
    }
}

impl ArticlePage {
    /// Standalone HTML document. The TOC panel carries `hidden` when there
    /// are too few headings; the regenerate link asks for confirmation first.
    pub fn to_html_document(&self) -> String {
        let title = escape_html(&self.title);
        let prompt = DestructiveAction::Regenerate(self.route.clone()).prompt();
        let prompt_js = serde_json::to_string(&prompt).unwrap_or_else(|_| "\"\"".to_string());
        let hidden = if self.toc.is_hidden() { " hidden" } else { "" };

        format!(
            "<!DOCTYPE html>\n\
<html lang=\"{lang}\">\n\
<head>\n\
<meta charset=\"utf-8\">\n\
<title>{title}</title>\n\
</head>\n\
<body>\n\
<header>\n\
<p class=\"article-title\">{title}</p>\n\
<a class=\"regenerate\" href=\"{regenerate}\" onclick=\"return confirm({prompt});\">Regenerate</a>\n\
</header>\n\
<nav id=\"toc\"{hidden}>\n\
<p class=\"toc-title\">Contents</p>\n\
<ul id=\"toc-list\">\n\
{toc}\n\
</ul>\n\
</nav>\n\
<article id=\"article-content\">\n\
{content}\n\
</article>\n\
</body>\n\
</html>\n",
            lang = escape_html(self.route.language()),
            title = title,
            regenerate = escape_html(&self.route.regenerate_path()),
            prompt = escape_html(&prompt_js),
            hidden = hidden,
            toc = self.toc.to_html_list(),
            content = self.content_html,
        )
    }
}
