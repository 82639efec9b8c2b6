use linguapedia_core::{update, ArticleRoute, Msg, PollState};

fn route() -> ArticleRoute {
    ArticleRoute::new("en", "Example").unwrap()
}

#[test]
fn timer_before_start_is_noop() {
    let state = PollState::new(route());
    let (next, effects) = update(state.clone(), Msg::TimerFired);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn failure_before_start_is_noop() {
    let state = PollState::new(route());
    let (next, effects) = update(
        state.clone(),
        Msg::StatusFailed {
            reason: "connection refused".to_string(),
        },
    );

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
