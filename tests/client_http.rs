//! End-to-end tests against a mock gateway.

use mockito::Matcher;
use std::sync::{Arc, Mutex};
use textgate::{Error, GatewayClient, SendOptions, SendOutcome};

type Captured = Arc<Mutex<Option<String>>>;

fn capture() -> (Captured, impl FnOnce(&str) + Send + 'static) {
    let slot: Captured = Arc::new(Mutex::new(None));
    let writer = slot.clone();
    (slot, move |text: &str| {
        *writer.lock().unwrap() = Some(text.to_string());
    })
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn client_for(server: &mockito::ServerGuard) -> GatewayClient {
    GatewayClient::builder()
        .project_id("proj-1")
        .endpoint(format!("{}/generate", server.url()))
        .build()
        .expect("client should build")
}

#[tokio::test]
async fn non_streaming_call_returns_the_assembled_text() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/generate")
        .match_header("content-type", "text/plain")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "projectId": "proj-1",
            "prompt": "ping",
            "allowCaching": true,
        })))
        .with_status(200)
        .with_header("x-callId", "call-123")
        .with_body("pong")
        .create_async()
        .await;

    let client = client_for(&server);
    let (completed, on_complete) = capture();

    let outcome = client
        .send(SendOptions::new("ping").stream(false).on_complete(on_complete))
        .await
        .unwrap();

    let text = match outcome {
        SendOutcome::Complete(text) => text,
        other => panic!("expected Complete, got {other:?}"),
    };
    assert_eq!(text, "pong");

    let state = client.state();
    assert_eq!(state.text, "pong");
    assert!(state.idle);
    assert_eq!(state.error, None);
    assert_eq!(state.call_id, "call-123");
    assert_eq!(completed.lock().unwrap().as_deref(), Some("pong"));
    mock.assert_async().await;
}

#[tokio::test]
async fn streaming_call_resolves_through_the_join_handle() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/generate")
        .with_status(200)
        .with_body("pong")
        .create_async()
        .await;

    let client = client_for(&server);
    let outcome = client.send(SendOptions::new("ping")).await.unwrap();

    let handle = match outcome {
        SendOutcome::Streaming(handle) => handle,
        other => panic!("expected Streaming, got {other:?}"),
    };
    assert_eq!(handle.await.unwrap(), "pong");

    let state = client.state();
    assert_eq!(state.text, "pong");
    assert!(state.idle);
}

#[tokio::test]
async fn http_503_fails_the_call_without_reading_a_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/generate")
        .with_status(503)
        .create_async()
        .await;

    let client = client_for(&server);
    let (completed, on_complete) = capture();
    let (errored, on_error) = capture();

    let outcome = client
        .send(
            SendOptions::new("ping")
                .on_complete(on_complete)
                .on_error(on_error),
        )
        .await
        .unwrap();

    assert!(outcome.is_failed());
    let state = client.state();
    assert!(state.idle);
    assert_eq!(state.text, "");

    let error = errored.lock().unwrap().clone().expect("on_error fired");
    assert!(error.contains("503"), "got: {error}");
    assert_eq!(state.error.as_deref(), Some(error.as_str()));
    // Builder-level failures report only through on_error.
    assert_eq!(completed.lock().unwrap().clone(), None);
}

#[tokio::test]
async fn transport_failure_is_reported_like_a_bad_status() {
    // Nothing listens here; the POST itself is rejected.
    let client = GatewayClient::builder()
        .project_id("proj-1")
        .endpoint("http://127.0.0.1:1/generate")
        .build()
        .unwrap();
    let (errored, on_error) = capture();

    let outcome = client
        .send(SendOptions::new("ping").on_error(on_error))
        .await
        .unwrap();

    assert!(outcome.is_failed());
    assert!(client.state().idle);
    assert!(errored.lock().unwrap().is_some());
}

#[tokio::test]
async fn sentinel_body_reports_the_server_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/generate")
        .with_status(200)
        .with_body("Error: rate limited")
        .create_async()
        .await;

    let client = client_for(&server);
    let (completed, on_complete) = capture();
    let (errored, on_error) = capture();

    let outcome = client
        .send(
            SendOptions::new("ping")
                .stream(false)
                .on_complete(on_complete)
                .on_error(on_error),
        )
        .await
        .unwrap();

    match outcome {
        SendOutcome::Complete(text) => assert_eq!(text, "Error: rate limited"),
        other => panic!("expected Complete, got {other:?}"),
    }
    assert_eq!(errored.lock().unwrap().as_deref(), Some("rate limited"));
    assert_eq!(
        completed.lock().unwrap().as_deref(),
        Some("Error: rate limited")
    );
    let state = client.state();
    assert!(state.idle);
    assert_eq!(state.error.as_deref(), Some("rate limited"));
}

#[tokio::test]
async fn missing_call_id_header_defaults_to_empty() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/generate")
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;

    let client = client_for(&server);
    let outcome = client.send(SendOptions::new("ping").stream(false)).await.unwrap();
    assert!(!outcome.is_failed());
    assert_eq!(client.state().call_id, "");
}

#[tokio::test]
async fn empty_prompt_is_rejected_at_entry() {
    let client = GatewayClient::builder()
        .project_id("proj-1")
        .build()
        .unwrap();

    let err = client.send(SendOptions::new("   ")).await.unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    // No call was started.
    assert!(client.is_idle());
}

#[tokio::test]
async fn stop_cancels_and_restores_idle_immediately() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/generate")
        .with_status(200)
        .with_body("partial")
        .create_async()
        .await;

    let client = client_for(&server);
    let (handle, _rx) = textgate::cancel_pair();
    let outcome = client
        .send(SendOptions::new("ping").cancel(handle.clone()))
        .await
        .unwrap();

    client.stop(&handle);
    assert!(client.is_idle());
    assert!(handle.is_cancelled());

    if let SendOutcome::Streaming(join) = outcome {
        // The consumer finishes its own cleanup; whatever it read before the
        // signal was observed is the final text.
        let _ = join.await.unwrap();
    }
    assert!(client.is_idle());
    assert_eq!(client.state().error, None);
}
