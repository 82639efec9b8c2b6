use std::time::Duration;

use crate::view_model::{StatusView, StepView};
use crate::{ArticleRoute, JobStatus, StatusReport, PROGRESS_STEPS};

/// Delay after a successful, non-terminal status response.
pub const SUCCESS_DELAY: Duration = Duration::from_secs(2);
/// Delay after a failed request (network error, bad status, non-JSON body).
pub const FAILURE_DELAY: Duration = Duration::from_secs(5);

/// Two-tier retry cadence. There is no attempt cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub success_delay: Duration,
    pub failure_delay: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            success_delay: SUCCESS_DELAY,
            failure_delay: FAILURE_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    /// Page rendered, first request not yet issued.
    Idle,
    /// Exactly one timer pending.
    Scheduled { delay: Duration },
    /// Exactly one request outstanding.
    InFlight,
    /// Absorbing.
    Stopped(StopReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Completed,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    route: ArticleRoute,
    policy: PollPolicy,
    phase: PollPhase,
    last_report: Option<StatusReport>,
    failure_message: Option<String>,
    requests_issued: u64,
    consecutive_failures: u32,
    dirty: bool,
}

impl PollState {
    pub fn new(route: ArticleRoute) -> Self {
        Self::with_policy(route, PollPolicy::default())
    }

    pub fn with_policy(route: ArticleRoute, policy: PollPolicy) -> Self {
        Self {
            route,
            policy,
            phase: PollPhase::Idle,
            last_report: None,
            failure_message: None,
            requests_issued: 0,
            consecutive_failures: 0,
            dirty: false,
        }
    }

    pub fn route(&self) -> &ArticleRoute {
        &self.route
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.phase, PollPhase::Stopped(_))
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        match self.phase {
            PollPhase::Stopped(reason) => Some(reason),
            _ => None,
        }
    }

    /// Number of status requests this chain has asked for so far.
    pub fn requests_issued(&self) -> u64 {
        self.requests_issued
    }

    pub fn last_report(&self) -> Option<&StatusReport> {
        self.last_report.as_ref()
    }

    /// Returns whether the view changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> StatusView {
        let progress = self.last_report.as_ref().map_or(0, |r| r.progress);
        let status = self
            .last_report
            .as_ref()
            .map(|r| r.status.clone())
            .unwrap_or(JobStatus::Pending);
        let title = self
            .last_report
            .as_ref()
            .and_then(|r| r.title.clone())
            .unwrap_or_else(|| self.route.display_title());
        let steps = PROGRESS_STEPS
            .iter()
            .map(|step| StepView {
                label: step.label,
                threshold: step.threshold,
                active: step.is_active(progress),
            })
            .collect();

        StatusView {
            title,
            article_path: self.route.path(),
            progress,
            status,
            steps,
            phase: self.phase,
            reload_prompt: self.phase == PollPhase::Stopped(StopReason::Completed),
            error_banner: self.failure_message.clone(),
            consecutive_failures: self.consecutive_failures,
            dirty: self.dirty,
        }
    }

    pub(crate) fn begin_request(&mut self) {
        self.phase = PollPhase::InFlight;
        self.requests_issued += 1;
    }

    pub(crate) fn schedule(&mut self, delay: Duration) {
        self.phase = PollPhase::Scheduled { delay };
    }

    pub(crate) fn record_report(&mut self, report: StatusReport) {
        if self.consecutive_failures > 0 {
            self.consecutive_failures = 0;
            self.dirty = true;
        }
        if self.last_report.as_ref() != Some(&report) {
            self.last_report = Some(report);
            self.dirty = true;
        }
    }

    pub(crate) fn record_failure(&mut self) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.dirty = true;
    }

    pub(crate) fn stop(&mut self, reason: StopReason) {
        self.phase = PollPhase::Stopped(reason);
        self.dirty = true;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.failure_message = Some(message);
        self.stop(StopReason::Failed);
    }
}
