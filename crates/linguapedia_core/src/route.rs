use std::fmt;

/// Path prefix shared by the server router and the link rewriter.
pub const ARTICLE_PREFIX: &str = "/article/";

/// The two-segment `/article/<lang>/<name>` contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArticleRoute {
    language: String,
    name: String,
}

impl ArticleRoute {
    /// Builds a route from its segments, rejecting anything the parser would reject.
    pub fn new(language: impl Into<String>, name: impl Into<String>) -> Option<Self> {
        let language = language.into();
        let name = name.into();
        if is_language_segment(&language) && is_name_segment(&name) {
            Some(Self { language, name })
        } else {
            None
        }
    }

    /// Parses an exact `/article/<lang>/<name>` path.
    ///
    /// Anything else, including extra segments, a trailing slash, or a
    /// query string, is not an article route.
    pub fn parse(path: &str) -> Option<Self> {
        let rest = path.strip_prefix(ARTICLE_PREFIX)?;
        let (language, name) = rest.split_once('/')?;
        Self::new(language, name)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable title: the article name with underscores as spaces.
    pub fn display_title(&self) -> String {
        self.name.replace('_', " ")
    }

    pub fn path(&self) -> String {
        format!("{ARTICLE_PREFIX}{}/{}", self.language, self.name)
    }

    /// Segments of the job-status endpoint for this article.
    pub fn status_segments(&self) -> [&str; 4] {
        ["api", "status", &self.language, &self.name]
    }

    /// Segments of the cache-bypassing regenerate endpoint.
    pub fn regenerate_segments(&self) -> [&str; 3] {
        ["regenerate", &self.language, &self.name]
    }

    /// Segments of the raw Markdown download endpoint.
    pub fn download_segments(&self) -> [&str; 3] {
        ["download", &self.language, &self.name]
    }

    pub fn regenerate_path(&self) -> String {
        format!("/{}", self.regenerate_segments().join("/"))
    }

    pub fn download_path(&self) -> String {
        format!("/{}", self.download_segments().join("/"))
    }
}

impl fmt::Display for ArticleRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.language, self.name)
    }
}

fn is_language_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == '-')
}

fn is_name_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'))
}
