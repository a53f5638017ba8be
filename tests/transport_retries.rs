//! Retry behaviour of the HTTP transport, observed from the server side.

use brightdata::{Client, Error, ResultStatus, ScrapeOptions};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRODUCT_URL: &str = "https://www.amazon.com/dp/B0CRMZHDG8";

#[derive(Clone, Copy)]
enum Behaviour {
    /// Read the request, then close the connection without answering.
    Drop,
    /// Read the request and never answer.
    Hang,
}

/// A bare TCP server recording the request line of every request it reads.
async fn raw_server(behaviour: Behaviour) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let log = seen.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let log = log.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 16 * 1024];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                if let Some(line) = String::from_utf8_lossy(&buf[..n]).lines().next() {
                    log.lock().unwrap().push(line.to_string());
                }
                if let Behaviour::Hang = behaviour {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                }
                drop(socket);
            });
        }
    });

    (format!("http://{}", addr), seen)
}

fn count(seen: &Mutex<Vec<String>>, prefix: &str) -> usize {
    seen.lock()
        .unwrap()
        .iter()
        .filter(|line| line.starts_with(prefix))
        .count()
}

#[tokio::test]
async fn dropped_trigger_is_not_resent() {
    let (base_url, seen) = raw_server(Behaviour::Drop).await;
    // default max_retries
    let client = Client::builder("test-token-123456")
        .base_url(base_url)
        .build()
        .unwrap();

    let started = Instant::now();
    let result = client
        .scrape()
        .amazon()
        .options(ScrapeOptions::default().poll_interval(Duration::from_millis(20)))
        .products(PRODUCT_URL)
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.status, ResultStatus::Error);
    assert!(result.error.unwrap().starts_with("Trigger failed"));
    assert_eq!(count(&seen, "POST /datasets/v3/trigger"), 1);
    assert!(started.elapsed() < Duration::from_secs(1), "{:?}", started.elapsed());
}

#[tokio::test]
async fn dropped_get_is_retried_up_to_max_retries() {
    let (base_url, seen) = raw_server(Behaviour::Drop).await;
    let client = Client::builder("test-token-123456")
        .base_url(base_url)
        .max_retries(2)
        .build()
        .unwrap();

    let started = Instant::now();
    let err = client.list_zones().await.unwrap_err();

    assert!(matches!(err, Error::Http(_)), "{err:?}");
    assert_eq!(count(&seen, "GET /zone/get_active_zones"), 3);
    // backoff of 1s then 2s
    assert!(started.elapsed() >= Duration::from_secs(3));
}

#[tokio::test]
async fn refused_connection_is_retried_for_post() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Client::builder("test-token-123456")
        .base_url(format!("http://{}", addr))
        .max_retries(1)
        .build()
        .unwrap();

    let started = Instant::now();
    let result = client
        .scrape()
        .amazon()
        .products(PRODUCT_URL)
        .await
        .unwrap();

    assert!(!result.success);
    assert!(result.error.unwrap().starts_with("Trigger failed"));
    // one backoff pause means the second attempt was made
    assert!(started.elapsed() >= Duration::from_secs(1));
}

#[tokio::test]
async fn request_timeout_is_not_retried() {
    let (base_url, seen) = raw_server(Behaviour::Hang).await;
    let client = Client::builder("test-token-123456")
        .base_url(base_url)
        .timeout(Duration::from_millis(300))
        .max_retries(3)
        .build()
        .unwrap();

    let started = Instant::now();
    let err = client.list_zones().await.unwrap_err();

    assert!(matches!(err, Error::Timeout), "{err:?}");
    assert_eq!(count(&seen, "GET /zone/get_active_zones"), 1);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn server_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zone/get_active_zones"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"error": "maintenance"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/datasets/v3/trigger"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::builder("test-token-123456")
        .base_url(server.uri())
        .max_retries(3)
        .build()
        .unwrap();

    let err = client.list_zones().await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 503, .. }), "{err:?}");

    let result = client
        .scrape()
        .amazon()
        .products(PRODUCT_URL)
        .await
        .unwrap();
    assert_eq!(result.status, ResultStatus::Error);
    assert!(result.error.unwrap().contains("bad gateway"));
}
