use thiserror::Error;

pub const DEFAULT_MAX_TRANSLATIONS: u8 = 5;
pub const MAX_TRANSLATIONS_LIMIT: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

/// Wikipedia editions offered on the search form.
pub const SUPPORTED_LANGUAGES: [Language; 10] = [
    Language { code: "en", name: "English" },
    Language { code: "ja", name: "日本語" },
    Language { code: "ru", name: "Русский" },
    Language { code: "de", name: "Deutsch" },
    Language { code: "es", name: "Español" },
    Language { code: "fr", name: "Français" },
    Language { code: "zh", name: "中文" },
    Language { code: "it", name: "Italiano" },
    Language { code: "pt", name: "Português" },
    Language { code: "pl", name: "Polski" },
];

pub fn find_language(code: &str) -> Option<&'static Language> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|lang| lang.code.eq_ignore_ascii_case(code.trim()))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("search title is empty")]
    EmptyTitle,
    #[error("unsupported language code {0:?}")]
    UnsupportedLanguage(String),
    #[error("max_translations must be between 1 and {max}, got {0}", max = MAX_TRANSLATIONS_LIMIT)]
    TranslationCount(u32),
}

/// A validated search submission: the form both the home page and the
/// "article not found" page post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    title: String,
    language: &'static Language,
    max_translations: u8,
}

impl SearchRequest {
    pub fn new(title: &str, language: &str, max_translations: u32) -> Result<Self, SearchError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(SearchError::EmptyTitle);
        }
        let language = find_language(language)
            .ok_or_else(|| SearchError::UnsupportedLanguage(language.to_string()))?;
        let max_translations = u8::try_from(max_translations)
            .ok()
            .filter(|count| (1..=MAX_TRANSLATIONS_LIMIT).contains(count))
            .ok_or(SearchError::TranslationCount(max_translations))?;
        Ok(Self {
            title: title.to_string(),
            language,
            max_translations,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn language(&self) -> &'static Language {
        self.language
    }

    pub fn max_translations(&self) -> u8 {
        self.max_translations
    }

    /// Form fields in submission order.
    pub fn form_fields(&self) -> [(&'static str, String); 3] {
        [
            ("title", self.title.clone()),
            ("language", self.language.code.to_string()),
            ("max_translations", self.max_translations.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{SearchError, SearchRequest, DEFAULT_MAX_TRANSLATIONS};

    #[test]
    fn title_is_trimmed_and_language_normalized() {
        let request =
            SearchRequest::new("  Albert Einstein ", "DE", u32::from(DEFAULT_MAX_TRANSLATIONS))
                .unwrap();
        assert_eq!(request.title(), "Albert Einstein");
        assert_eq!(request.language().code, "de");
        assert_eq!(
            request.form_fields(),
            [
                ("title", "Albert Einstein".to_string()),
                ("language", "de".to_string()),
                ("max_translations", "5".to_string()),
            ]
        );
    }

    #[test]
    fn invalid_submissions_are_rejected() {
        assert_eq!(SearchRequest::new("   ", "en", 5), Err(SearchError::EmptyTitle));
        assert_eq!(
            SearchRequest::new("Rust", "xx", 5),
            Err(SearchError::UnsupportedLanguage("xx".to_string()))
        );
        assert_eq!(
            SearchRequest::new("Rust", "en", 0),
            Err(SearchError::TranslationCount(0))
        );
        assert_eq!(
            SearchRequest::new("Rust", "en", 300),
            Err(SearchError::TranslationCount(300))
        );
    }
}
