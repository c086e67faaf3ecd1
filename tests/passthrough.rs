//! Pass-through of non go-get traffic to the hosting server.

use std::time::Duration;

use go_import::config::{GoImportConfig, RepositoryConfig, UpstreamConfig};
use go_import::http::HttpServer;
use go_import::lifecycle::Shutdown;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

mod common;

/// Start the service in the background; returns its base URL.
async fn spawn_service(upstream: std::net::SocketAddr, shutdown: &Shutdown) -> String {
    let mut config = GoImportConfig::default();
    config.server.canonical_web_url = "https://example.com".into();
    config.upstream = Some(UpstreamConfig {
        address: upstream.to_string(),
    });
    config.repositories.push(RepositoryConfig {
        name: "proj".into(),
        anonymous_read: true,
    });

    let server = HttpServer::new(&config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (_updates_tx, updates) = mpsc::unbounded_channel();
    let stop = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, updates, stop).await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    format!("http://{addr}")
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_non_go_get_requests_reach_upstream() {
    let upstream = common::start_echo_upstream().await;
    let shutdown = Shutdown::new();
    let base = spawn_service(upstream, &shutdown).await;

    let res = client()
        .get(format!("{base}/proj/info/refs?service=git-upload-pack"))
        .send()
        .await
        .expect("service unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(
        res.text().await.unwrap(),
        "GET /proj/info/refs?service=git-upload-pack HTTP/1.1"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_go_get_is_answered_locally() {
    let upstream = common::start_echo_upstream().await;
    let shutdown = Shutdown::new();
    let base = spawn_service(upstream, &shutdown).await;

    let res = client()
        .get(format!("{base}/proj/pkg?go-get=1"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body = res.text().await.unwrap();
    assert!(body.contains("content=\"example.com/proj git https://example.com/proj\""));

    shutdown.trigger();
}

#[tokio::test]
async fn test_dead_upstream_is_bad_gateway() {
    let upstream = common::dead_address().await;
    let shutdown = Shutdown::new();
    let base = spawn_service(upstream, &shutdown).await;

    let res = client().get(format!("{base}/proj")).send().await.unwrap();
    assert_eq!(res.status(), 502);

    shutdown.trigger();
}
