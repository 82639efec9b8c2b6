use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use linguapedia_core::{ArticleRoute, JobStatus, PollPhase, PollPolicy, StatusReport, StopReason};
use linguapedia_engine::{
    run_poll_loop, BackendClient, BackendSettings, CancellationToken, FailureKind, FetchError,
    PollEvent, PollerHandle, StatusSource, ViewSink,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FAST: PollPolicy = PollPolicy {
    success_delay: Duration::from_millis(5),
    failure_delay: Duration::from_millis(15),
};

/// Answers with a fixed script, then repeats the last answer.
struct ScriptedSource {
    script: Mutex<VecDeque<Result<StatusReport, FetchError>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    fn new(script: Vec<Result<StatusReport, FetchError>>) -> Self {
        linguapedia_logging::initialize_for_tests();
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl StatusSource for ScriptedSource {
    async fn fetch_status(&self, _route: &ArticleRoute) -> Result<StatusReport, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap()
        }
    }
}

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<PollEvent>>,
}

impl RecordingSink {
    fn take(&self) -> Vec<PollEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ViewSink for RecordingSink {
    fn emit(&self, event: PollEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn report(progress: u8, status: JobStatus) -> Result<StatusReport, FetchError> {
    Ok(StatusReport {
        progress,
        status,
        ..StatusReport::default()
    })
}

fn network_error() -> Result<StatusReport, FetchError> {
    Err(FetchError {
        kind: FailureKind::Network,
        message: "connection refused".to_string(),
    })
}

fn route() -> ArticleRoute {
    ArticleRoute::new("en", "Ada_Lovelace").unwrap()
}

#[tokio::test]
async fn completes_after_progress_reaches_done() {
    let source = ScriptedSource::new(vec![
        report(10, JobStatus::Processing),
        report(55, JobStatus::Processing),
        report(100, JobStatus::Completed),
    ]);
    let sink = RecordingSink::default();
    let cancel = CancellationToken::new();

    let reason = run_poll_loop(&source, route(), FAST, &sink, &cancel).await;
    assert_eq!(reason, StopReason::Completed);
    assert_eq!(source.calls(), 3);

    let events = sink.take();
    let views: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            PollEvent::View(view) => Some(view),
            PollEvent::Finished(_) => None,
        })
        .collect();
    let progress: Vec<u8> = views.iter().map(|view| view.progress).collect();
    assert_eq!(progress, vec![10, 55, 100]);
    let last = views.last().unwrap();
    assert!(last.reload_prompt);
    assert_eq!(last.phase, PollPhase::Stopped(StopReason::Completed));
    assert_eq!(last.active_steps().count(), 6);
    assert_eq!(events.last(), Some(&PollEvent::Finished(StopReason::Completed)));
}

#[tokio::test]
async fn request_failures_keep_polling() {
    let source = ScriptedSource::new(vec![
        network_error(),
        network_error(),
        report(40, JobStatus::Processing),
        report(100, JobStatus::Processing),
    ]);
    let sink = RecordingSink::default();
    let cancel = CancellationToken::new();

    let reason = run_poll_loop(&source, route(), FAST, &sink, &cancel).await;
    assert_eq!(reason, StopReason::Completed);
    assert_eq!(source.calls(), 4);
    let banners = sink
        .take()
        .into_iter()
        .filter_map(|event| match event {
            PollEvent::View(view) => view.error_banner,
            PollEvent::Finished(_) => None,
        })
        .count();
    assert_eq!(banners, 0);
}

#[tokio::test]
async fn failed_job_stops_with_banner() {
    let source = ScriptedSource::new(vec![
        report(20, JobStatus::Processing),
        Ok(StatusReport {
            progress: 20,
            status: JobStatus::Failed,
            error: Some("translation service unavailable".to_string()),
            ..StatusReport::default()
        }),
    ]);
    let sink = RecordingSink::default();
    let cancel = CancellationToken::new();

    let reason = run_poll_loop(&source, route(), FAST, &sink, &cancel).await;
    assert_eq!(reason, StopReason::Failed);
    assert_eq!(source.calls(), 2);

    let last_view = sink
        .take()
        .into_iter()
        .filter_map(|event| match event {
            PollEvent::View(view) => Some(view),
            PollEvent::Finished(_) => None,
        })
        .last()
        .unwrap();
    assert_eq!(
        last_view.error_banner.as_deref(),
        Some("translation service unavailable")
    );
    assert!(!last_view.reload_prompt);
}

#[tokio::test]
async fn cancelled_before_start_issues_no_request() {
    let source = ScriptedSource::new(vec![report(10, JobStatus::Processing)]);
    let sink = RecordingSink::default();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let reason = run_poll_loop(&source, route(), FAST, &sink, &cancel).await;
    assert_eq!(reason, StopReason::Cancelled);
    assert_eq!(source.calls(), 0);
    assert_eq!(sink.take().last(), Some(&PollEvent::Finished(StopReason::Cancelled)));
}

#[tokio::test]
async fn cancellation_stops_a_running_chain() {
    let source = Arc::new(ScriptedSource::new(vec![report(10, JobStatus::Processing)]));
    let sink = Arc::new(RecordingSink::default());
    let cancel = CancellationToken::new();
    let policy = PollPolicy {
        success_delay: Duration::from_secs(60),
        failure_delay: Duration::from_secs(60),
    };

    let task = {
        let source = Arc::clone(&source);
        let sink = Arc::clone(&sink);
        let cancel = cancel.clone();
        tokio::spawn(async move {
            run_poll_loop(source.as_ref(), route(), policy, sink.as_ref(), &cancel).await
        })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();
    let reason = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("chain ends promptly")
        .unwrap();
    assert_eq!(reason, StopReason::Cancelled);
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn unknown_job_stops_with_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status/en/Nope"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string(r#"{"error": "Job not found"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(&BackendSettings {
        base_url: server.uri(),
        ..BackendSettings::default()
    })
    .unwrap();
    let sink = RecordingSink::default();
    let cancel = CancellationToken::new();
    let route = ArticleRoute::new("en", "Nope").unwrap();

    let reason = tokio::time::timeout(
        Duration::from_millis(500),
        run_poll_loop(&client, route, FAST, &sink, &cancel),
    )
    .await
    .expect("chain stops on its own");
    assert_eq!(reason, StopReason::Failed);

    let banner = sink
        .take()
        .into_iter()
        .filter_map(|event| match event {
            PollEvent::View(view) => view.error_banner,
            PollEvent::Finished(_) => None,
        })
        .last();
    assert_eq!(banner.as_deref(), Some("Job not found"));
}

#[test]
fn poller_handle_polls_a_live_backend() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/status/en/Ada_Lovelace"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"progress": 100, "status": "completed", "title": "Ada Lovelace"}"#,
            ))
            .mount(&server)
            .await;
        server
    });

    let client = BackendClient::new(&BackendSettings {
        base_url: server.uri(),
        ..BackendSettings::default()
    })
    .unwrap();
    let handle = PollerHandle::spawn(Arc::new(client), route(), FAST).unwrap();

    let events: Vec<PollEvent> = handle.events().collect();
    match events.as_slice() {
        [PollEvent::View(view), PollEvent::Finished(StopReason::Completed)] => {
            assert_eq!(view.title, "Ada Lovelace");
            assert_eq!(view.article_path, "/article/en/Ada_Lovelace");
            assert!(view.reload_prompt);
        }
        other => panic!("unexpected events: {other:?}"),
    }
    drop(handle);
    drop(server);
}

#[test]
fn dropping_the_handle_cancels_the_chain() {
    let source = Arc::new(ScriptedSource::new(vec![network_error()]));
    let policy = PollPolicy {
        success_delay: Duration::from_secs(60),
        failure_delay: Duration::from_secs(60),
    };
    let handle = PollerHandle::spawn(source.clone(), route(), policy).unwrap();
    std::thread::sleep(Duration::from_millis(200));
    drop(handle);
    assert_eq!(source.calls(), 1);
}
