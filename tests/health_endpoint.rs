//! Health endpoint integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use concierge::http::{AppState, HealthServer};
use concierge::lifecycle::Shutdown;

async fn start_server(guild_count: Arc<AtomicUsize>) -> (std::net::SocketAddr, Shutdown) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HealthServer::new(AppState {
        started_at: Instant::now(),
        guild_count,
    });
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    (addr, shutdown)
}

#[tokio::test]
async fn health_reports_status_uptime_and_guild_count() {
    let guild_count = Arc::new(AtomicUsize::new(0));
    let (addr, shutdown) = start_server(Arc::clone(&guild_count)).await;
    guild_count.store(3, Ordering::Relaxed);

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let res = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .expect("health endpoint unreachable");

    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["guild_count"], 3);
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);

    let time = body["time"].as_str().unwrap();
    assert!(
        chrono::DateTime::parse_from_rfc3339(time).is_ok(),
        "time should be RFC 3339 (got {})",
        time
    );

    shutdown.trigger();
}

#[tokio::test]
async fn uptime_grows_between_requests() {
    let (addr, shutdown) = start_server(Arc::new(AtomicUsize::new(0))).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let url = format!("http://{}/health", addr);

    let first: serde_json::Value =
        client.get(&url).send().await.unwrap().json().await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    let second: serde_json::Value =
        client.get(&url).send().await.unwrap().json().await.unwrap();

    assert!(second["uptime"].as_f64().unwrap() > first["uptime"].as_f64().unwrap());

    shutdown.trigger();
}

#[tokio::test]
async fn unknown_paths_are_not_found() {
    let (addr, shutdown) = start_server(Arc::new(AtomicUsize::new(0))).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let res = client
        .get(format!("http://{}/does-not-exist", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    let res = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
}

#[tokio::test]
async fn shutdown_stops_the_server() {
    let (addr, shutdown) = start_server(Arc::new(AtomicUsize::new(0))).await;

    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let res = client.get(format!("http://{}/health", addr)).send().await;
    assert!(res.is_err(), "server should be gone after shutdown");
}
