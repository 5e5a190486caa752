//! HTTP Server Integration Tests
//!
//! This module drives a real AreaCheck server over loopback HTTP.
//! Tests cover:
//! - Hit/miss evaluation and the reply envelope
//! - Range validation and malformed input
//! - Method and content type enforcement
//! - History accumulation, clearing and the capacity bound
//! - Concurrent requests against the shared history

use areacheck_common::protocol::Reply;
use areacheck_server::ServerConfig;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

mod support;
use support::{check_body, TestServer};

/// Helper to POST a JSON check
async fn post_check(client: &Client, server: &TestServer, body: String) -> reqwest::Response {
    client
        .post(server.endpoint("/api/check"))
        .header("Content-Type", "application/json")
        .body(body)
        .send()
        .await
        .unwrap()
}

async fn check(client: &Client, server: &TestServer, x: &str, y: &str, r: &str) -> Reply {
    post_check(client, server, check_body(x, y, r)).await.json().await.unwrap()
}

async fn clear(client: &Client, server: &TestServer) -> Value {
    client
        .post(server.endpoint("/api/clear"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

// ============================================================================
// Evaluation Tests
// ============================================================================

#[tokio::test]
async fn test_check_hit_in_rect() {
    let server = TestServer::start().await;
    let client = Client::new();

    let response = post_check(&client, &server, check_body("1", "-1", "2")).await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/json; charset=UTF-8"
    );

    let reply: Value = response.json().await.unwrap();
    assert_eq!(reply["ok"], true);
    assert_eq!(reply["item"]["hit"], true);
    assert_eq!(reply["item"]["debugRect"], true);
    assert_eq!(reply["item"]["debugTri"], false);
    assert_eq!(reply["item"]["debugCirc"], false);
    assert_eq!(reply["item"]["x"], 1.0);
    assert!(reply["item"]["durationMs"].is_u64());
    assert_eq!(reply["item"]["time"].as_str().unwrap().len(), 19);
    assert_eq!(reply["history"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_check_reply_key_order() {
    let server = TestServer::start().await;
    let client = Client::new();

    let text = post_check(&client, &server, check_body("0", "0", "1"))
        .await
        .text()
        .await
        .unwrap();
    assert!(text.starts_with(r#"{"ok":true,"item":{"time":""#), "got {}", text);
    assert!(text.contains(r#","x":0.0,"y":0.0,"r":1.0,"hit":true,"durationMs":"#));
}

#[tokio::test]
async fn test_check_each_region() {
    let server = TestServer::start().await;
    let client = Client::new();

    let tri = check(&client, &server, "-0.5", "0.5", "2").await.item.unwrap();
    assert!(tri.hit && tri.debug_tri && !tri.debug_rect && !tri.debug_circ);

    let circ = check(&client, &server, "1", "1", "2").await.item.unwrap();
    assert!(circ.hit && circ.debug_circ && !circ.debug_rect && !circ.debug_tri);

    let miss = check(&client, &server, "-1", "-1", "2").await.item.unwrap();
    assert!(!miss.hit && !miss.debug_rect && !miss.debug_tri && !miss.debug_circ);
}

#[tokio::test]
async fn test_numeric_body_values() {
    let server = TestServer::start().await;
    let client = Client::new();

    let response = post_check(&client, &server, r#"{"x": 2, "y": 0, "r": 2}"#.to_string()).await;
    let reply: Reply = response.json().await.unwrap();
    assert!(reply.ok);
    assert!(reply.item.unwrap().hit);
}

// ============================================================================
// Validation Tests
// ============================================================================

#[tokio::test]
async fn test_x_out_of_range() {
    let server = TestServer::start().await;
    let client = Client::new();

    let reply = check(&client, &server, "10", "0", "2").await;
    assert!(!reply.ok);
    assert_eq!(reply.error.as_deref(), Some("X out of range [-3;3]"));
}

#[tokio::test]
async fn test_y_and_r_out_of_range() {
    let server = TestServer::start().await;
    let client = Client::new();

    let reply = check(&client, &server, "0", "6", "2").await;
    assert_eq!(reply.error.as_deref(), Some("Y out of range {-3..5}"));

    let reply = check(&client, &server, "0", "0", "5").await;
    assert_eq!(reply.error.as_deref(), Some("R out of range [1;4]"));
}

#[tokio::test]
async fn test_malformed_input() {
    let server = TestServer::start().await;
    let client = Client::new();

    let reply = check(&client, &server, "one", "0", "2").await;
    assert!(!reply.ok);
    assert!(reply.error.unwrap().starts_with("Bad request: "));

    let response = post_check(&client, &server, "not json at all".to_string()).await;
    let reply: Reply = response.json().await.unwrap();
    assert!(reply.error.unwrap().starts_with("Bad request: "));
}

#[tokio::test]
async fn test_rejected_requests_are_not_recorded() {
    let server = TestServer::start().await;
    let client = Client::new();

    check(&client, &server, "10", "0", "2").await;
    check(&client, &server, "x", "0", "2").await;
    let reply = check(&client, &server, "0", "0", "2").await;
    assert_eq!(reply.history.len(), 1);
}

// ============================================================================
// Method / Content-Type Tests
// ============================================================================

#[tokio::test]
async fn test_get_check_not_allowed() {
    let server = TestServer::start().await;
    let client = Client::new();

    let response = client
        .get(server.endpoint("/api/check"))
        .header("Content-Type", "application/json")
        .body(check_body("1", "-1", "2"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let reply: Value = response.json().await.unwrap();
    assert_eq!(reply["ok"], false);
    assert_eq!(reply["error"], "Method Not Allowed (use POST)");
}

#[tokio::test]
async fn test_check_requires_json_content_type() {
    let server = TestServer::start().await;
    let client = Client::new();

    let response = client
        .post(server.endpoint("/api/check"))
        .header("Content-Type", "text/plain")
        .body(check_body("1", "-1", "2"))
        .send()
        .await
        .unwrap();
    let reply: Value = response.json().await.unwrap();
    assert_eq!(reply["error"], "Content-Type must be application/json");
}

#[tokio::test]
async fn test_unknown_endpoint() {
    let server = TestServer::start().await;
    let client = Client::new();

    let reply: Value = client
        .post(server.endpoint("/api/foo"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reply, serde_json::json!({"ok": false, "error": "Unknown endpoint: /api/foo"}));
}

// ============================================================================
// History Tests
// ============================================================================

#[tokio::test]
async fn test_clear_then_check() {
    let server = TestServer::start().await;
    let client = Client::new();

    for _ in 0..3 {
        check(&client, &server, "1", "-1", "2").await;
    }

    let reply = clear(&client, &server).await;
    assert_eq!(reply, serde_json::json!({"ok": true, "cleared": true, "history": []}));

    let reply = check(&client, &server, "1", "-1", "2").await;
    assert_eq!(reply.history.len(), 1);
}

#[tokio::test]
async fn test_clear_with_query_string() {
    let server = TestServer::start().await;
    let client = Client::new();

    let reply: Value = client
        .post(server.endpoint("/api/clear?ts=1700000000"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reply["cleared"], true);
}

#[tokio::test]
async fn test_get_clear_not_allowed() {
    let server = TestServer::start().await;
    let client = Client::new();

    check(&client, &server, "1", "-1", "2").await;
    let reply: Value = client
        .get(server.endpoint("/api/clear"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reply["error"], "Method Not Allowed (use POST)");

    let reply = check(&client, &server, "1", "-1", "2").await;
    assert_eq!(reply.history.len(), 2);
}

#[tokio::test]
async fn test_history_is_newest_first_and_bounded() {
    let server = TestServer::with_config(ServerConfig::default().with_history_capacity(5)).await;
    let client = Client::new();

    let mut last = None;
    for i in 0..8 {
        let x = format!("{}", f64::from(i) / 4.0);
        last = Some(check(&client, &server, &x, "0", "2").await);
    }

    let history = last.unwrap().history;
    let xs: Vec<f64> = history.iter().map(|r| r.x).collect();
    assert_eq!(xs, vec![1.75, 1.5, 1.25, 1.0, 0.75]);
}

#[tokio::test]
async fn test_concurrent_checks_share_history() {
    let server = TestServer::start().await;
    let client = Client::new();

    let mut tasks = Vec::new();
    for _ in 0..20 {
        let client = client.clone();
        let url = server.endpoint("/api/check");
        tasks.push(tokio::spawn(async move {
            let reply: Reply = client
                .post(url)
                .header("Content-Type", "application/json")
                .body(check_body("0", "0", "1"))
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            reply
        }));
    }

    for task in tasks {
        let reply = task.await.unwrap();
        assert!(reply.ok);
        assert!(!reply.history.is_empty());
    }

    let reply = check(&client, &server, "0", "0", "1").await;
    assert_eq!(reply.history.len(), 21);
}

// ============================================================================
// Raw Transport Tests
// ============================================================================

/// Reads one complete reply from the stream.
///
/// Gives up after a few seconds so a server that waits for more request body
/// fails the test instead of hanging it.
async fn read_reply(stream: &mut TcpStream) -> String {
    let mut received = Vec::new();
    let mut chunk = [0u8; 4096];

    let read = async {
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&received);
            if text.contains("\r\n\r\n") && text.ends_with('}') {
                break;
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(5), read)
        .await
        .expect("no reply within 5s");

    String::from_utf8_lossy(&received).into_owned()
}

#[tokio::test]
async fn test_content_length_bounds_the_body() {
    let server = TestServer::start().await;
    let mut stream = TcpStream::connect(server.addr()).await.unwrap();

    let body = check_body("1", "-1", "2");
    let request = format!(
        "POST /api/check HTTP/1.1\r\nHost: {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
        server.addr(),
        body.len(),
        body
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let response = read_reply(&mut stream).await;
    assert!(response.starts_with("HTTP/1.1 200 OK"), "got {}", response);
    assert!(response.contains(r#""ok":true"#));
}

#[tokio::test]
async fn test_chunked_body_without_length_reads_nothing() {
    let server = TestServer::start().await;
    let mut stream = TcpStream::connect(server.addr()).await.unwrap();

    let body = check_body("1", "-1", "2");
    let request = format!(
        "POST /api/check HTTP/1.1\r\nHost: {}\r\nContent-Type: application/json\r\nTransfer-Encoding: chunked\r\n\r\n{:x}\r\n{}\r\n0\r\n\r\n",
        server.addr(),
        body.len(),
        body
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let response = read_reply(&mut stream).await;
    assert!(response.contains(r#""ok":false"#), "got {}", response);
    assert!(response.contains("Bad request: missing value for x"));
}

#[tokio::test]
async fn test_unterminated_chunked_check_still_replies() {
    let server = TestServer::start().await;
    let mut stream = TcpStream::connect(server.addr()).await.unwrap();

    // One chunk and no terminating zero-length chunk.
    let request = format!(
        "POST /api/check HTTP/1.1\r\nHost: {}\r\nContent-Type: application/json\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n",
        server.addr()
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let response = read_reply(&mut stream).await;
    assert!(response.starts_with("HTTP/1.1 200 OK"), "got {}", response);
    assert!(response.contains("Bad request: missing value for x"));
}

#[tokio::test]
async fn test_clear_does_not_wait_for_body() {
    let server = TestServer::start().await;
    let mut stream = TcpStream::connect(server.addr()).await.unwrap();

    // Declares 100 bytes but sends only 2.
    let request = format!(
        "POST /api/clear HTTP/1.1\r\nHost: {}\r\nContent-Length: 100\r\n\r\n{{}}",
        server.addr()
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let response = read_reply(&mut stream).await;
    assert!(response.contains(r#"{"ok":true,"cleared":true,"history":[]}"#), "got {}", response);
}

#[tokio::test]
async fn test_unknown_route_does_not_wait_for_body() {
    let server = TestServer::start().await;
    let mut stream = TcpStream::connect(server.addr()).await.unwrap();

    let request = format!(
        "POST /api/foo HTTP/1.1\r\nHost: {}\r\nTransfer-Encoding: chunked\r\n\r\n3\r\nabc\r\n",
        server.addr()
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let response = read_reply(&mut stream).await;
    assert!(response.contains("Unknown endpoint: /api/foo"), "got {}", response);
}

#[tokio::test]
async fn test_server_survives_bad_requests() {
    let server = TestServer::start().await;
    let client = Client::new();

    client.get(server.url()).send().await.unwrap();
    check(&client, &server, "bad", "bad", "bad").await;

    let reply = check(&client, &server, "1", "-1", "2").await;
    assert!(reply.ok);
}
