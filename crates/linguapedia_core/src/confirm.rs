use crate::ArticleRoute;

/// Backend actions with no undo. Each must be confirmed before it is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestructiveAction {
    /// Redo synthesis for an article, bypassing the cache.
    Regenerate(ArticleRoute),
    ClearCache,
}

impl DestructiveAction {
    pub fn prompt(&self) -> String {
        match self {
            DestructiveAction::Regenerate(route) => format!(
                "Regenerate \"{}\" ({})? The cached version will be replaced.",
                route.display_title(),
                route.language()
            ),
            DestructiveAction::ClearCache => {
                "Clear every cached article? This cannot be undone.".to_string()
            }
        }
    }

    /// Returns the action only if the answer is an explicit yes.
    pub fn confirm(self, answer: &str) -> Option<Self> {
        is_affirmative(answer).then_some(self)
    }
}

/// `y` / `yes`, case-insensitive. Anything else, including an empty line, declines.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
