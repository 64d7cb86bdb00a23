//! End-to-end tests: real sockets between client, gateway and upstream.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

mod common;

const FIREFOX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

#[derive(Clone, Default)]
struct Seen {
    hits: Arc<AtomicU32>,
    requests: Arc<Mutex<Vec<(String, HeaderMap)>>>,
}

async fn subscription(
    State(seen): State<Seen>,
    Path(short_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    seen.hits.fetch_add(1, Ordering::SeqCst);
    seen.requests.lock().unwrap().push((short_id.clone(), headers));

    if short_id == "missing" {
        return (StatusCode::NOT_FOUND, [("profile-title", "none")], "no such user").into_response();
    }

    let mut response = common::gzip(b"proxy-config-text").into_response();
    let out = response.headers_mut();
    out.insert(header::CONTENT_ENCODING, HeaderValue::from_static("gzip"));
    out.append("subscription-userinfo", HeaderValue::from_static("up=10"));
    out.append("subscription-userinfo", HeaderValue::from_static("down=5"));
    out.insert("profile-update-interval", HeaderValue::from_static("12"));
    out.insert("x-upstream", HeaderValue::from_static("panel"));
    response
}

async fn upstream() -> (std::net::SocketAddr, Seen) {
    let seen = Seen::default();
    let app = Router::new()
        .route("/api/sub/{short_id}", get(subscription))
        .with_state(seen.clone());
    (common::start_upstream(app).await, seen)
}

#[tokio::test]
async fn test_programmatic_client_gets_payload_and_headers() {
    let (upstream_addr, seen) = upstream().await;
    let gateway = common::start_gateway(upstream_addr, |_| {}).await;

    let res = common::client()
        .get(gateway.url("/abc123"))
        .header("user-agent", "curl/8.0")
        .header("x-hwid", "device-1")
        .send()
        .await
        .expect("gateway unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["subscription-userinfo"], "up=10,down=5");
    assert_eq!(res.headers().get_all("subscription-userinfo").iter().count(), 1);
    assert_eq!(res.headers()["profile-update-interval"], "12");
    assert_eq!(res.headers()["x-upstream"], "panel");
    assert_eq!(res.headers()["content-encoding"], "application/gzip");
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.bytes().await.unwrap().as_ref(), b"proxy-config-text");

    let requests = seen.requests.lock().unwrap();
    let (short_id, headers) = &requests[0];
    assert_eq!(short_id, "abc123");
    assert_eq!(headers["user-agent"], "curl/8.0");
    assert_eq!(headers["x-hwid"], "device-1");

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_sees_only_client_headers() {
    let (upstream_addr, seen) = upstream().await;
    let gateway = common::start_gateway(upstream_addr, |_| {}).await;

    let res = common::client()
        .get(gateway.url("/abc"))
        .header("user-agent", "curl/8.0")
        .header("x-hwid", "device-1")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));

    let requests = seen.requests.lock().unwrap();
    let (_, headers) = &requests[0];
    assert!(headers.get("x-request-id").is_none());
    assert_eq!(headers["user-agent"], "curl/8.0");
    assert_eq!(headers["x-hwid"], "device-1");
    for name in headers.keys() {
        assert!(
            ["host", "user-agent", "x-hwid", "accept"].contains(&name.as_str()),
            "unexpected header {name}"
        );
    }

    drop(requests);
    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_client_request_id_reaches_upstream() {
    let (upstream_addr, seen) = upstream().await;
    let gateway = common::start_gateway(upstream_addr, |_| {}).await;

    let res = common::client()
        .get(gateway.url("/abc"))
        .header("user-agent", "curl/8.0")
        .header("x-request-id", "trace-42")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-42");

    let requests = seen.requests.lock().unwrap();
    assert_eq!(requests[0].1["x-request-id"], "trace-42");
    assert_eq!(requests[0].1.get_all("x-request-id").iter().count(), 1);

    drop(requests);
    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_browser_gets_page() {
    let (upstream_addr, _) = upstream().await;
    let gateway = common::start_gateway(upstream_addr, |_| {}).await;

    let res = common::client()
        .get(gateway.url("/abc123"))
        .header("user-agent", FIREFOX)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert!(res.headers()["content-type"].to_str().unwrap().starts_with("text/html"));
    assert!(res.headers().get("subscription-userinfo").is_none());
    assert!(res.headers().get("x-upstream").is_none());

    let body = res.text().await.unwrap();
    assert!(body.contains("<script id=\"sub\" type=\"text/plain\">proxy-config-text</script>"));

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_status_propagated() {
    let (upstream_addr, _) = upstream().await;
    let gateway = common::start_gateway(upstream_addr, |_| {}).await;

    let res = common::client()
        .get(gateway.url("/missing"))
        .header("user-agent", "clash-verge/v1.7.7")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    assert_eq!(res.headers()["profile-title"], "none");
    assert_eq!(res.text().await.unwrap(), "no such user");

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_missing_identifier_skips_upstream() {
    let (upstream_addr, seen) = upstream().await;
    let gateway = common::start_gateway(upstream_addr, |c| c.route.prefix = "/sub".into()).await;

    for path in ["/sub/", "/sub"] {
        let res = common::client().get(gateway.url(path)).send().await.unwrap();
        assert_eq!(res.status(), 400, "{path}");
        assert_eq!(res.text().await.unwrap(), "Bad request.");
    }
    assert_eq!(seen.hits.load(Ordering::SeqCst), 0);

    let res = common::client().get(gateway.url("/sub/abc")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(seen.hits.load(Ordering::SeqCst), 1);

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream_is_server_error() {
    let dead = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead_addr = dead.local_addr().unwrap();
    drop(dead);

    let gateway = common::start_gateway(dead_addr, |_| {}).await;

    let res = common::client()
        .get(gateway.url("/abc123"))
        .header("user-agent", "curl/8.0")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    assert_eq!(res.text().await.unwrap(), "Request error.");

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_timeout_is_server_error() {
    let app = Router::new().route(
        "/api/sub/{short_id}",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "late"
        }),
    );
    let upstream_addr = common::start_upstream(app).await;
    let gateway =
        common::start_gateway(upstream_addr, |c| c.upstream.request_timeout_secs = 1).await;

    let res = common::client()
        .get(gateway.url("/slow"))
        .header("user-agent", "curl/8.0")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    assert_eq!(res.text().await.unwrap(), "Request error.");

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_shutdown_stops_server() {
    let (upstream_addr, _) = upstream().await;
    let gateway = common::start_gateway(upstream_addr, |_| {}).await;

    assert_eq!(gateway.shutdown.trigger(), 1);
    let result = tokio::time::timeout(Duration::from_secs(5), gateway.task)
        .await
        .expect("server did not stop");
    assert!(result.unwrap().is_ok());
}
