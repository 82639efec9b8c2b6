use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue one request to the status endpoint.
    FetchStatus,
    /// Arm one timer; `Msg::TimerFired` is expected when it elapses.
    ScheduleNext { delay: Duration },
    /// Show the "reload to view" prompt. Never navigate on the user's behalf.
    RevealReloadPrompt { article_path: String },
    /// Show the failure banner with a way back to search.
    ShowFailure { message: String },
}
