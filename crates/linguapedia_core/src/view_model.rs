use crate::{JobStatus, PollPhase};

/// Everything the status page shows, derived from `PollState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub title: String,
    pub article_path: String,
    pub progress: u8,
    pub status: JobStatus,
    pub steps: Vec<StepView>,
    pub phase: PollPhase,
    /// Set once the job is done; the user reloads manually.
    pub reload_prompt: bool,
    pub error_banner: Option<String>,
    /// Failed requests since the last good response. Logged, never shown as an error.
    pub consecutive_failures: u32,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepView {
    pub label: &'static str,
    pub threshold: u8,
    pub active: bool,
}

impl StatusView {
    /// Fill width of the progress bar, as a CSS percentage.
    pub fn bar_width(&self) -> String {
        format!("{}%", self.progress)
    }

    pub fn readout(&self) -> String {
        format!("{}%", self.progress)
    }

    pub fn active_steps(&self) -> impl Iterator<Item = &StepView> {
        self.steps.iter().filter(|step| step.active)
    }
}
