//! End-to-end tests over a real socket.
//!
//! The router is served on an ephemeral port and driven with real WebSocket
//! clients and a real HTTP client, covering the full
//! upgrade -> register -> broadcast -> close -> unregister path.

mod common;

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use common::TestContext;
use filingcast::summarizer::MockSummarizer;

const TIMEOUT: Duration = Duration::from_secs(5);

type WsStream = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

async fn serve(ctx: &TestContext) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = ctx.router();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn connect(addr: SocketAddr, path: &str) -> WsStream {
    let (ws, _) = timeout(TIMEOUT, connect_async(format!("ws://{addr}{path}")))
        .await
        .expect("connect timed out")
        .expect("connect failed");
    ws
}

/// Next text frame, skipping control frames
async fn next_text(ws: &mut WsStream) -> String {
    loop {
        let msg = timeout(TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for message")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = msg {
            return text.as_str().to_string();
        }
    }
}

#[tokio::test]
async fn test_e2e_broadcast_reaches_every_client() {
    let ctx = TestContext::new();
    let addr = serve(&ctx).await;

    let mut first = connect(addr, "/ws").await;
    let mut second = connect(addr, "/").await;
    assert!(ctx.wait_for_connections(2).await);

    let payload = r#"{"filingId":"123","summary":"Quarterly results"}"#;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/broadcast"))
        .header("content-type", "application/json")
        .body(payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "Broadcast sent");

    assert_eq!(next_text(&mut first).await, payload);
    assert_eq!(next_text(&mut second).await, payload);
}

#[tokio::test]
async fn test_e2e_simulate_delivers_summary() {
    let ctx = TestContext::new();
    let addr = serve(&ctx).await;

    let mut client = connect(addr, "/ws").await;
    assert!(ctx.wait_for_connections(1).await);

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/simulate"))
        .json(&serde_json::json!({
            "id": "777",
            "company": "Gamma Healthcare",
            "eventType": "REGULATION_FD",
            "content": "The company has made an oral presentation."
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&next_text(&mut client).await).unwrap();
    assert_eq!(json["filingId"], "777");
    assert_eq!(json["company"], "Gamma Healthcare");
    assert_eq!(json["summary"], MockSummarizer::summary_for("777"));
}

#[tokio::test]
async fn test_e2e_messages_arrive_in_order() {
    let ctx = TestContext::new();
    let addr = serve(&ctx).await;

    let mut client = connect(addr, "/ws").await;
    assert!(ctx.wait_for_connections(1).await);

    for n in 0..10 {
        ctx.state
            .registry
            .broadcast(format!(r#"{{"filingId":"{n}","summary":"s"}}"#))
            .await;
    }

    for n in 0..10 {
        let text = next_text(&mut client).await;
        assert!(text.contains(&format!(r#""filingId":"{n}""#)), "got {text}");
    }
}

#[tokio::test]
async fn test_e2e_client_close_unregisters() {
    let ctx = TestContext::new();
    let addr = serve(&ctx).await;

    let mut leaving = connect(addr, "/ws").await;
    let mut staying = connect(addr, "/ws").await;
    assert!(ctx.wait_for_connections(2).await);

    leaving.send(Message::Close(None)).await.unwrap();
    assert!(ctx.wait_for_connections(1).await);

    let outcome = ctx
        .state
        .registry
        .broadcast(r#"{"filingId":"1","summary":"after close"}"#)
        .await;
    assert_eq!(outcome.attempted, 1);
    assert!(next_text(&mut staying).await.contains("after close"));
}

#[tokio::test]
async fn test_e2e_close_handshake_completes() {
    let ctx = TestContext::new();
    let addr = serve(&ctx).await;

    let mut client = connect(addr, "/ws").await;
    assert!(ctx.wait_for_connections(1).await);

    client.send(Message::Close(None)).await.unwrap();

    // The server answers with its own Close frame rather than resetting
    let reply = timeout(TIMEOUT, client.next())
        .await
        .expect("timed out waiting for close reply")
        .expect("stream ended without a close frame");
    assert!(
        matches!(reply, Ok(Message::Close(_))),
        "expected close frame, got {reply:?}"
    );

    assert!(ctx.wait_for_connections(0).await);
}

#[tokio::test]
async fn test_e2e_dropped_transport_unregisters() {
    let ctx = TestContext::new();
    let addr = serve(&ctx).await;

    let client = connect(addr, "/ws").await;
    assert!(ctx.wait_for_connections(1).await);

    drop(client);
    assert!(ctx.wait_for_connections(0).await);
}

#[tokio::test]
async fn test_e2e_plain_http_on_ws_path() {
    let ctx = TestContext::new();
    let addr = serve(&ctx).await;

    let response = reqwest::get(format!("http://{addr}/ws")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.unwrap(), "Expected websocket");
    assert!(ctx.state.registry.is_empty().await);
}
