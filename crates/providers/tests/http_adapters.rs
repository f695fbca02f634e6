//! HTTP-level tests: each adapter driven through the reqwest transport
//! against a local mock server.

use heimdall_core::backend::{BackendConfig, BackendId};
use heimdall_core::context::{FileInfo, RepoStatus, WorkingContext};
use heimdall_core::error::Error;
use heimdall_providers::AdapterRegistry;
use mockito::{Matcher, Server};

fn python_context() -> WorkingContext {
    WorkingContext {
        current_file: Some(FileInfo {
            path: "/repo/app.py".into(),
            language: "python".into(),
            size_chars: 512,
        }),
        repo_status: RepoStatus::Dirty,
        ..WorkingContext::default()
    }
}

#[tokio::test]
async fn claude_round_trip_over_http() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "sk-ant-test")
        .match_header("anthropic-version", "2023-06-01")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "model": "claude-3-sonnet-20240229",
            "messages": [{"role": "user", "content": "Current file: /repo/app.py (python)\nexplain this"}],
            "max_tokens": 4096
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"msg_1","type":"message","content":[{"type":"text","text":"A walkthrough."}]}"#)
        .create_async()
        .await;

    let config = BackendConfig::new("sk-ant-test", format!("{}/v1/messages", server.url()));
    let reply = AdapterRegistry::http()
        .dispatch(BackendId::Claude, "explain this", &python_context(), &config)
        .await
        .unwrap();

    assert_eq!(reply, "A walkthrough.");
    mock.assert_async().await;
}

#[tokio::test]
async fn deepseek_round_trip_over_http() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-ds-test")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "messages": [{"role": "user", "content": "Language: python\nfix the bug"}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"Patched."}}]}"#)
        .create_async()
        .await;

    let config = BackendConfig::new("sk-ds-test", format!("{}/v1/chat/completions", server.url()));
    let reply = AdapterRegistry::http()
        .dispatch(BackendId::Deepseek, "fix the bug", &python_context(), &config)
        .await
        .unwrap();

    assert_eq!(reply, "Patched.");
    mock.assert_async().await;
}

#[tokio::test]
async fn deepseek_server_error_is_surfaced_once() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(503)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"message":"Server overloaded","type":"server_error"}}"#)
        .expect(1)
        .create_async()
        .await;

    let target = format!("{}/v1/chat/completions", server.url());
    let config = BackendConfig::new("sk-ds-test", target.clone());
    let err = AdapterRegistry::http()
        .dispatch(BackendId::Deepseek, "optimize", &WorkingContext::minimal(), &config)
        .await
        .unwrap_err();

    let Error::BackendRequest(failure) = err else {
        panic!("expected a backend failure, got {err:?}");
    };
    assert_eq!(failure.status, Some(503));
    assert_eq!(failure.reason, "Server overloaded");
    assert_eq!(failure.target, target);
    mock.assert_async().await;
}

#[tokio::test]
async fn aider_remote_sends_prompt_and_context() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api")
        .match_body(Matcher::Json(serde_json::json!({
            "prompt": "commit the fix",
            "context": {"repoStatus": "dirty", "path": "/repo/app.py", "language": "python"}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"response":"Committed 1 file."}"#)
        .create_async()
        .await;

    let config = BackendConfig::new("", format!("{}/api", server.url()));
    let reply = AdapterRegistry::http()
        .dispatch(BackendId::Aider, "commit the fix", &python_context(), &config)
        .await
        .unwrap();

    assert_eq!(reply, "Committed 1 file.");
    mock.assert_async().await;
}

#[tokio::test]
async fn unreachable_backend_has_no_status() {
    // Nothing listens on port 9 (discard) on a test host.
    let config = BackendConfig::new("sk-ant-test", "http://127.0.0.1:9/v1/messages");
    let err = AdapterRegistry::http()
        .dispatch(BackendId::Claude, "explain", &WorkingContext::minimal(), &config)
        .await
        .unwrap_err();

    let Error::BackendRequest(failure) = err else {
        panic!("expected a backend failure, got {err:?}");
    };
    assert_eq!(failure.status, None);
    assert_eq!(failure.target, "http://127.0.0.1:9/v1/messages");
}
