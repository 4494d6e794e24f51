//! Request lifecycle tests
//!
//! Drive `RequestLifecycle` with `FakeTransport` and check the state machine:
//! inert submits, one call per accepted submit, error classification, and
//! stale-completion rejection.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use askdata::query::{
    FailureKind, FakeTransport, HttpReply, QueryRequest, QueryTransport, RequestLifecycle,
    RequestState, TransportError, CONNECTIVITY_MESSAGE,
};
use async_trait::async_trait;
use tokio::runtime::Handle;

/// Transport whose call task dies before producing a reply
struct PanickingTransport;

#[async_trait]
impl QueryTransport for PanickingTransport {
    async fn post_query(&self, _request: &QueryRequest) -> Result<HttpReply, TransportError> {
        panic!("transport blew up");
    }
}

fn lifecycle(fake: &Arc<FakeTransport>) -> RequestLifecycle {
    RequestLifecycle::new(fake.clone(), Handle::current())
}

/// Yield until the fake has seen `n` calls (each spawned call records itself
/// before awaiting its reply)
async fn wait_for_calls(fake: &FakeTransport, n: usize) {
    for _ in 0..1000 {
        if fake.call_count() >= n {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("expected {} calls, saw {}", n, fake.call_count());
}

fn success_body(marker: &str) -> String {
    format!(
        r#"{{"success":true,"sql_query":"SELECT '{m}'","data":[{{"marker":"{m}"}}],"row_count":1}}"#,
        m = marker
    )
}

fn marker_of(state: &RequestState) -> Option<String> {
    match state {
        RequestState::Success(result) => result.rows()[0]
            .get("marker")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        _ => None,
    }
}

#[tokio::test]
async fn test_blank_queries_are_inert() {
    let fake = Arc::new(FakeTransport::new());
    let mut lc = lifecycle(&fake);

    for blank in ["", " ", "\t", "\n\n", "  \t \r\n ", "\u{3000}"] {
        assert_eq!(lc.submit(blank), None, "submit({:?}) should be inert", blank);
        assert_eq!(lc.state(), &RequestState::Idle);
    }

    tokio::task::yield_now().await;
    assert_eq!(fake.call_count(), 0);
    assert_eq!(lc.generation(), 0);
}

#[tokio::test]
async fn test_blank_query_after_result_keeps_result() {
    let fake = Arc::new(FakeTransport::with_reply(200, &success_body("kept")));
    let mut lc = lifecycle(&fake);
    lc.submit("first");
    lc.settle().await;

    assert_eq!(lc.submit("   "), None);
    assert_eq!(marker_of(lc.state()).as_deref(), Some("kept"));
}

#[tokio::test]
async fn test_one_call_with_trimmed_payload() {
    let fake = Arc::new(FakeTransport::with_reply(200, &success_body("x")));
    let mut lc = lifecycle(&fake);

    assert_eq!(lc.submit("\t Which products have the highest margin?  \n"), Some(1));
    lc.settle().await;

    assert_eq!(
        fake.calls(),
        vec![QueryRequest::new("Which products have the highest margin?", None)]
    );
}

#[tokio::test]
async fn test_submit_while_loading_is_noop() {
    let fake = Arc::new(FakeTransport::new());
    let gate = fake.push_gated();
    let mut lc = lifecycle(&fake);

    assert_eq!(lc.submit("first"), Some(1));
    assert_eq!(lc.submit("second"), None);
    assert_eq!(lc.submit("third"), None);
    assert!(lc.is_loading());

    wait_for_calls(&fake, 1).await;
    gate.send(Ok(HttpReply::new(200, success_body("first")))).unwrap();
    lc.settle().await;

    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(fake.call_count(), 1);
    assert_eq!(fake.calls()[0].query, "first");
    assert_eq!(marker_of(lc.state()).as_deref(), Some("first"));
}

#[tokio::test]
async fn test_backend_error_message_verbatim() {
    let fake = Arc::new(FakeTransport::with_reply(200, r#"{"success":false,"error":"x"}"#));
    let mut lc = lifecycle(&fake);
    lc.submit("q");
    lc.settle().await;

    match lc.state() {
        RequestState::Error(failure) => {
            assert_eq!(failure.message(), "x");
            assert_eq!(failure.kind, FailureKind::Backend);
        }
        other => panic!("expected Error(\"x\"), got {:?}", other),
    }
}

#[tokio::test]
async fn test_detail_on_http_error() {
    let fake = Arc::new(FakeTransport::with_reply(
        400,
        r#"{"detail":"Could not generate a SQL query from the input"}"#,
    ));
    let mut lc = lifecycle(&fake);
    lc.submit("q");
    lc.settle().await;

    match lc.state() {
        RequestState::Error(failure) => {
            assert_eq!(failure.message(), "Could not generate a SQL query from the input")
        }
        other => panic!("expected error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_data_is_success() {
    let fake = Arc::new(FakeTransport::with_reply(200, r#"{"success":true,"data":[]}"#));
    let mut lc = lifecycle(&fake);
    lc.submit("q");
    lc.settle().await;

    match lc.state() {
        RequestState::Success(result) => assert!(result.rows().is_empty()),
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_transport_failures_use_connectivity_message() {
    let failures = [
        TransportError::Network("connection refused".to_string()),
        TransportError::Timeout,
    ];
    for err in failures {
        let fake = Arc::new(FakeTransport::with_error(err.clone()));
        let mut lc = lifecycle(&fake);
        lc.submit("q");
        lc.settle().await;

        match lc.state() {
            RequestState::Error(failure) => {
                assert_eq!(failure.message(), CONNECTIVITY_MESSAGE, "for {:?}", err);
                assert_eq!(failure.kind, FailureKind::Transport);
            }
            other => panic!("expected error, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_malformed_body_is_transport_error() {
    for body in ["not json", r#"{"status":"ok"}"#, r#"{"success":true,"data":["a"]}"#] {
        let fake = Arc::new(FakeTransport::with_reply(200, body));
        let mut lc = lifecycle(&fake);
        lc.submit("q");
        lc.settle().await;

        match lc.state() {
            RequestState::Error(failure) => {
                assert_eq!(failure.kind, FailureKind::Transport, "for {:?}", body);
                assert_eq!(failure.message(), CONNECTIVITY_MESSAGE);
            }
            other => panic!("expected error for {:?}, got {:?}", body, other),
        }
    }
}

#[tokio::test]
async fn test_new_submit_clears_previous_error() {
    let fake = Arc::new(FakeTransport::new());
    fake.push_reply(200, r#"{"success":false,"error":"boom"}"#);
    let gate = fake.push_gated();
    let mut lc = lifecycle(&fake);

    lc.submit("first");
    lc.settle().await;
    assert!(matches!(lc.state(), RequestState::Error(_)));

    lc.submit("second");
    assert_eq!(lc.state(), &RequestState::Loading);

    wait_for_calls(&fake, 2).await;
    gate.send(Ok(HttpReply::new(200, success_body("second")))).unwrap();
    lc.settle().await;
    assert_eq!(marker_of(lc.state()).as_deref(), Some("second"));
}

#[tokio::test]
async fn test_stale_response_resolving_last_is_discarded() {
    let fake = Arc::new(FakeTransport::new());
    let gate_a = fake.push_gated();
    let gate_b = fake.push_gated();
    let mut lc = lifecycle(&fake);

    let a = lc.submit("question a").unwrap();
    wait_for_calls(&fake, 1).await;
    assert!(lc.abandon());
    let b = lc.submit("question b").unwrap();
    wait_for_calls(&fake, 2).await;
    assert!(b > a);

    gate_b.send(Ok(HttpReply::new(200, success_body("b")))).unwrap();
    assert!(lc.next_event().await);
    assert_eq!(marker_of(lc.state()).as_deref(), Some("b"));

    gate_a.send(Ok(HttpReply::new(200, success_body("a")))).unwrap();
    assert!(!lc.next_event().await, "A's late completion must be dropped");
    assert_eq!(marker_of(lc.state()).as_deref(), Some("b"));
}

#[tokio::test]
async fn test_stale_response_resolving_first_is_discarded() {
    let fake = Arc::new(FakeTransport::new());
    let gate_a = fake.push_gated();
    let gate_b = fake.push_gated();
    let mut lc = lifecycle(&fake);

    lc.submit("question a");
    wait_for_calls(&fake, 1).await;
    lc.abandon();
    lc.submit("question b");
    wait_for_calls(&fake, 2).await;

    gate_a
        .send(Ok(HttpReply::new(200, r#"{"success":false,"error":"a failed"}"#.to_string())))
        .unwrap();
    assert!(!lc.next_event().await);
    assert_eq!(lc.state(), &RequestState::Loading);

    gate_b.send(Ok(HttpReply::new(200, success_body("b")))).unwrap();
    assert!(lc.next_event().await);
    assert_eq!(marker_of(lc.state()).as_deref(), Some("b"));
}

#[tokio::test]
async fn test_abandoned_request_never_lands_in_idle() {
    let fake = Arc::new(FakeTransport::new());
    let gate = fake.push_gated();
    let mut lc = lifecycle(&fake);

    lc.submit("q");
    wait_for_calls(&fake, 1).await;
    lc.abandon();

    gate.send(Ok(HttpReply::new(200, success_body("late")))).unwrap();
    assert!(!lc.next_event().await);
    assert_eq!(lc.state(), &RequestState::Idle);
}

#[tokio::test]
async fn test_observer_sees_loading_then_outcome() {
    let fake = Arc::new(FakeTransport::new());
    fake.push_reply(200, &success_body("one"));
    fake.push_error(TransportError::Timeout);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut lc = lifecycle(&fake);
    let sink = seen.clone();
    lc.subscribe(move |state| sink.lock().unwrap().push(state.name()));

    lc.submit("one");
    lc.settle().await;
    lc.submit("two");
    lc.settle().await;

    assert_eq!(
        *seen.lock().unwrap(),
        vec!["loading", "success", "loading", "error"]
    );
}

#[tokio::test]
async fn test_max_rows_forwarded() {
    let fake = Arc::new(FakeTransport::with_reply(200, &success_body("x")));
    let mut lc = lifecycle(&fake).with_max_rows(Some(10));
    lc.submit("q");
    lc.settle().await;
    assert_eq!(fake.calls()[0].max_rows, Some(10));
}

#[tokio::test]
async fn test_dead_call_task_resolves_to_error() {
    let mut lc = RequestLifecycle::new(Arc::new(PanickingTransport), Handle::current());
    lc.submit("q").unwrap();

    tokio::time::timeout(Duration::from_secs(2), lc.settle())
        .await
        .expect("settle must finish when the call task dies");

    match lc.state() {
        RequestState::Error(failure) => {
            assert_eq!(failure.kind, FailureKind::Transport);
            assert_eq!(failure.message(), CONNECTIVITY_MESSAGE);
        }
        other => panic!("expected error, got {:?}", other),
    }

    // The lifecycle accepts a new submit afterwards
    assert!(!lc.is_loading());
    assert_eq!(lc.submit("again"), Some(2));
}
