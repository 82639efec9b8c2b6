use std::collections::VecDeque;
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use linguapedia_core::{
    update, ArticleRoute, Effect, Msg, PollPolicy, PollState, StopReason,
};
use linguapedia_logging::{lp_debug, lp_info, lp_warn};
use tokio_util::sync::CancellationToken;

use crate::client::StatusSource;
use crate::{FailureKind, FetchError, PollEvent};

pub trait ViewSink: Send + Sync {
    fn emit(&self, event: PollEvent);
}

pub struct ChannelViewSink {
    tx: mpsc::Sender<PollEvent>,
}

impl ChannelViewSink {
    pub fn new(tx: mpsc::Sender<PollEvent>) -> Self {
        Self { tx }
    }
}

impl ViewSink for ChannelViewSink {
    fn emit(&self, event: PollEvent) {
        let _ = self.tx.send(event);
    }
}

/// Drives one poll chain to its end.
///
/// The pure `update` function decides; this loop only executes effects.
/// Each effect yields at most one follow-up message, so exactly one timer or
/// one request is outstanding at any time. Cancelling `cancel` ends the chain
/// at the next await point without issuing further requests.
pub async fn run_poll_loop(
    source: &dyn StatusSource,
    route: ArticleRoute,
    policy: PollPolicy,
    sink: &dyn ViewSink,
    cancel: &CancellationToken,
) -> StopReason {
    let mut state = PollState::with_policy(route, policy);
    let mut inbox = VecDeque::from([Msg::PageLoaded]);

    while let Some(msg) = inbox.pop_front() {
        let (next, effects) = update(state, msg);
        state = next;
        if state.consume_dirty() {
            sink.emit(PollEvent::View(state.view()));
        }
        for effect in effects {
            if let Some(msg) = execute(effect, source, &state, cancel).await {
                inbox.push_back(msg);
            }
        }
    }

    let reason = state.stop_reason().unwrap_or(StopReason::Cancelled);
    lp_debug!(
        "Poll chain for {} ended: {:?} after {} request(s)",
        state.route(),
        reason,
        state.requests_issued()
    );
    sink.emit(PollEvent::Finished(reason));
    reason
}

async fn execute(
    effect: Effect,
    source: &dyn StatusSource,
    state: &PollState,
    cancel: &CancellationToken,
) -> Option<Msg> {
    match effect {
        Effect::FetchStatus => {
            tokio::select! {
                biased;
                () = cancel.cancelled() => Some(Msg::PageUnloaded),
                result = source.fetch_status(state.route()) => Some(match result {
                    Ok(report) => Msg::StatusReceived(report),
                    Err(err) => {
                        lp_warn!(
                            "Status request for {} failed ({}); retrying in {:?}",
                            state.route(),
                            err,
                            state.policy().failure_delay
                        );
                        Msg::StatusFailed { reason: err.to_string() }
                    }
                }),
            }
        }
        Effect::ScheduleNext { delay } => {
            tokio::select! {
                biased;
                () = cancel.cancelled() => Some(Msg::PageUnloaded),
                () = tokio::time::sleep(delay) => Some(Msg::TimerFired),
            }
        }
        Effect::RevealReloadPrompt { article_path } => {
            lp_info!(
                "Synthesis of {} completed; reload {} to view it",
                state.route(),
                article_path
            );
            None
        }
        Effect::ShowFailure { message } => {
            lp_warn!("Synthesis of {} failed: {}", state.route(), message);
            None
        }
    }
}

/// A poll chain running on its own thread and runtime.
///
/// Dropping the handle cancels the chain, the way leaving the status page does.
pub struct PollerHandle {
    events: mpsc::Receiver<PollEvent>,
    cancel: CancellationToken,
    thread: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn spawn(
        source: Arc<dyn StatusSource>,
        route: ArticleRoute,
        policy: PollPolicy,
    ) -> Result<Self, FetchError> {
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        let (tx, events) = mpsc::channel();
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let thread = thread::Builder::new()
            .name(format!("poll-{route}"))
            .spawn(move || {
                let sink = ChannelViewSink::new(tx);
                runtime.block_on(run_poll_loop(
                    source.as_ref(),
                    route,
                    policy,
                    &sink,
                    &task_cancel,
                ));
            })
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            events,
            cancel,
            thread: Some(thread),
        })
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn try_recv(&self) -> Option<PollEvent> {
        self.events.try_recv().ok()
    }

    /// Blocks for the next event. `None` once the chain has ended and every event was read.
    pub fn recv(&self) -> Option<PollEvent> {
        self.events.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<PollEvent> {
        self.events.recv_timeout(timeout).ok()
    }

    pub fn events(&self) -> impl Iterator<Item = PollEvent> + '_ {
        std::iter::from_fn(|| self.recv())
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
