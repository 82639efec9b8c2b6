/// A stage of the synthesis pipeline as shown on the status page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressStep {
    pub threshold: u8,
    pub label: &'static str,
}

/// Steps in display order; thresholds match the progress the backend
/// reports on entering each stage.
pub const PROGRESS_STEPS: [ProgressStep; 6] = [
    ProgressStep {
        threshold: 5,
        label: "Searching for the article",
    },
    ProgressStep {
        threshold: 10,
        label: "Retrieving the source article",
    },
    ProgressStep {
        threshold: 20,
        label: "Selecting relevant languages",
    },
    ProgressStep {
        threshold: 30,
        label: "Fetching translated editions",
    },
    ProgressStep {
        threshold: 40,
        label: "Translating articles",
    },
    ProgressStep {
        threshold: 80,
        label: "Synthesizing the final article",
    },
];

impl ProgressStep {
    /// Highlighting is cumulative: every step at or below `progress` is active.
    pub fn is_active(&self, progress: u8) -> bool {
        progress >= self.threshold
    }
}

pub fn active_step_count(progress: u8) -> usize {
    PROGRESS_STEPS
        .iter()
        .filter(|step| step.is_active(progress))
        .count()
}
