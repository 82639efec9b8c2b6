use crate::{Effect, Msg, PollPhase, PollState, StopReason, Verdict};

/// Pure update function: applies a message to state and returns any effects.
///
/// Each message answering an in-flight request yields exactly one of
/// `ScheduleNext` (short or long delay) or a stop. Messages that do not fit
/// the current phase (stale timers, duplicate responses) are ignored, so at
/// most one timer or request is ever outstanding.
pub fn update(mut state: PollState, msg: Msg) -> (PollState, Vec<Effect>) {
    if state.is_stopped() {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::PageLoaded => {
            if state.phase() == PollPhase::Idle {
                state.begin_request();
                vec![Effect::FetchStatus]
            } else {
                Vec::new()
            }
        }
        Msg::TimerFired => match state.phase() {
            PollPhase::Scheduled { .. } => {
                state.begin_request();
                vec![Effect::FetchStatus]
            }
            _ => Vec::new(),
        },
        Msg::StatusReceived(report) => {
            if state.phase() != PollPhase::InFlight {
                return (state, Vec::new());
            }
            let verdict = report.verdict();
            let failure = report.failure_message();
            state.record_report(report);
            match verdict {
                Verdict::Continue => {
                    let delay = state.policy().success_delay;
                    state.schedule(delay);
                    vec![Effect::ScheduleNext { delay }]
                }
                Verdict::Completed => {
                    state.stop(StopReason::Completed);
                    vec![Effect::RevealReloadPrompt {
                        article_path: state.route().path(),
                    }]
                }
                Verdict::Failed => {
                    state.fail(failure.clone());
                    vec![Effect::ShowFailure { message: failure }]
                }
            }
        }
        Msg::StatusFailed { .. } => {
            if state.phase() != PollPhase::InFlight {
                return (state, Vec::new());
            }
            state.record_failure();
            let delay = state.policy().failure_delay;
            state.schedule(delay);
            vec![Effect::ScheduleNext { delay }]
        }
        Msg::PageUnloaded => {
            state.stop(StopReason::Cancelled);
            Vec::new()
        }
    };

    (state, effects)
}
