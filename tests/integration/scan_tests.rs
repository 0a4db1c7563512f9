//! Integration tests for batch scanning
//!
//! These tests use wiremock to stand in for the scanned sites and drive the
//! orchestrator end-to-end over real HTTP.

use contact_sweep::config::Config;
use contact_sweep::scanner::{BatchOrchestrator, DomainScanner, ScanRequest};
use contact_sweep::state::ScanStatus;
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates an orchestrator with test-friendly settings
fn create_orchestrator(batch_timeout_ms: Option<u64>) -> BatchOrchestrator {
    let mut config = Config::default();
    config.scanner.user_agent = "TestBot/1.0".to_string();
    config.scanner.batch_timeout_ms = batch_timeout_ms;
    BatchOrchestrator::new(&config).expect("Failed to build orchestrator")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_scan_extracts_links_and_contacts() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/about">About</a>
           <a href="https://external.test/page#top">Elsewhere</a>
           <a href="mailto:Sales@Example.com">Sales</a>
           <p>Call 555-123-4567 today.</p>"#,
    )
    .await;

    let scanner = DomainScanner::new(&Config::default()).unwrap();
    let result = scanner.scan(&base_url, Duration::from_secs(5)).await;

    assert_eq!(result.status(), ScanStatus::Ok);
    assert_eq!(result.http_status(), Some(200));
    assert_eq!(result.error(), None);
    assert!(result.links().contains(&format!("{}/about", base_url)));
    assert!(result.links().contains("https://external.test/page"));
    assert_eq!(result.links().len(), 2);
    assert!(result.emails().contains("sales@example.com"));
    assert!(result.phones().contains("5551234567"));

    let counts = result.counts();
    assert_eq!(counts.links, 2);
    assert_eq!(counts.internal_links, 1);
    assert_eq!(counts.external_links, 1);
    assert_eq!(counts.emails, 1);
    assert_eq!(counts.phones, 1);
}

#[tokio::test]
async fn test_connection_refused_is_fetch_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let scanner = DomainScanner::new(&Config::default()).unwrap();
    let result = scanner
        .scan(&format!("http://127.0.0.1:{}/", port), Duration::from_secs(5))
        .await;

    assert_eq!(result.status(), ScanStatus::FetchError);
    assert_eq!(result.http_status(), None);
    assert!(result.error().is_some());
    assert!(result.links().is_empty());
    assert!(result.emails().is_empty());
    assert!(result.phones().is_empty());
}

#[tokio::test]
async fn test_not_found_is_fetch_error_with_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<p>gone@example.com</p>"))
        .mount(&mock_server)
        .await;

    let scanner = DomainScanner::new(&Config::default()).unwrap();
    let result = scanner
        .scan(&format!("{}/missing", mock_server.uri()), Duration::from_secs(5))
        .await;

    assert_eq!(result.status(), ScanStatus::FetchError);
    assert_eq!(result.http_status(), Some(404));
    assert!(result.emails().is_empty());
}

#[tokio::test]
async fn test_redirect_loop_is_fetch_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/loop"))
        .mount(&mock_server)
        .await;

    let scanner = DomainScanner::new(&Config::default()).unwrap();
    let result = scanner
        .scan(&format!("{}/loop", mock_server.uri()), Duration::from_secs(5))
        .await;

    assert_eq!(result.status(), ScanStatus::FetchError);
    assert_eq!(result.http_status(), None);
    assert!(result.error().unwrap().contains("redirect"));
}

#[tokio::test]
async fn test_links_resolve_against_redirect_target() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/docs/index.html"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/docs/index.html", r#"<a href="page2">Next</a>"#).await;

    let scanner = DomainScanner::new(&Config::default()).unwrap();
    let result = scanner
        .scan(&format!("{}/old", base_url), Duration::from_secs(5))
        .await;

    assert_eq!(result.status(), ScanStatus::Ok);
    assert_eq!(result.url(), format!("{}/old", base_url));
    assert!(result.links().contains(&format!("{}/docs/page2", base_url)));
}

#[tokio::test]
async fn test_binary_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blob"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0x3c, 0x70, 0x3e, 0x00, 0x01, 0x02, 0x00])
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let scanner = DomainScanner::new(&Config::default()).unwrap();
    let result = scanner
        .scan(&format!("{}/blob", mock_server.uri()), Duration::from_secs(5))
        .await;

    assert_eq!(result.status(), ScanStatus::ParseError);
    assert_eq!(result.http_status(), None);
    assert!(result.links().is_empty());
}

#[tokio::test]
async fn test_user_agent_override_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header("user-agent", "custom-agent/2.0"))
        .respond_with(html("<p>hello</p>"))
        .mount(&mock_server)
        .await;

    let orchestrator = create_orchestrator(None);
    let request = ScanRequest::new(
        vec![format!("{}/ua", mock_server.uri())],
        1,
        Duration::from_secs(5),
    )
    .unwrap()
    .with_user_agent("custom-agent/2.0");

    let summary = orchestrator.run(&request).await;
    assert_eq!(summary.results[0].status(), ScanStatus::Ok);
}

#[tokio::test]
async fn test_slow_url_times_out_without_affecting_others() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    for i in 0..5 {
        let mut response = html(&format!("<p>contact{}@example.com</p>", i));
        if i == 2 {
            response = response.set_delay(Duration::from_secs(3));
        }
        Mock::given(method("GET"))
            .and(path(format!("/site{}", i)))
            .respond_with(response)
            .mount(&mock_server)
            .await;
    }

    let urls: Vec<String> = (0..5).map(|i| format!("{}/site{}", base_url, i)).collect();
    let request = ScanRequest::new(urls.clone(), 5, Duration::from_millis(500)).unwrap();

    let started = Instant::now();
    let summary = create_orchestrator(None).run(&request).await;

    // The slow URL is cut off at its own deadline, not waited out
    assert!(started.elapsed() < Duration::from_secs(3));

    assert_eq!(summary.total, 5);
    assert_eq!(summary.succeeded, 4);
    assert_eq!(summary.failed, 1);

    for (i, result) in summary.results.iter().enumerate() {
        assert_eq!(result.url(), urls[i]);
        if i == 2 {
            assert_eq!(result.status(), ScanStatus::Timeout);
            assert_eq!(result.http_status(), None);
            assert!(result.emails().is_empty());
        } else {
            assert_eq!(result.status(), ScanStatus::Ok);
            assert!(result.emails().contains(&format!("contact{}@example.com", i)));
        }
    }
}

#[tokio::test]
async fn test_results_follow_input_order_with_duplicates() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Earlier inputs answer later, so completion order is the reverse of input order
    for (route, delay_ms) in [("/c", 300), ("/a", 150), ("/b", 0)] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(html("<p>ok</p>").set_delay(Duration::from_millis(delay_ms)))
            .mount(&mock_server)
            .await;
    }

    let urls: Vec<String> = ["/c", "/a", "/b", "/a"]
        .iter()
        .map(|route| format!("{}{}", base_url, route))
        .collect();
    let request = ScanRequest::new(urls.clone(), 4, Duration::from_secs(5)).unwrap();

    let summary = create_orchestrator(None).run(&request).await;

    assert_eq!(summary.total, 4);
    let seen: Vec<&str> = summary.results.iter().map(|r| r.url()).collect();
    let expected: Vec<&str> = urls.iter().map(String::as_str).collect();
    assert_eq!(seen, expected);
    assert_eq!(summary.results[1], summary.results[3]);
}

#[tokio::test]
async fn test_concurrency_does_not_change_content() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    for i in 0..6 {
        mount_page(
            &mock_server,
            &format!("/p{}", i),
            &format!(
                r#"<a href="/next{}">next</a><p>team{}@example.com 555-000-{:04}</p>"#,
                i,
                i,
                1000 + i
            ),
        )
        .await;
    }

    let mut urls: Vec<String> = (0..6).map(|i| format!("{}/p{}", base_url, i)).collect();
    urls.push("not a url at all://".to_string());

    let orchestrator = create_orchestrator(None);
    let sequential = ScanRequest::new(urls.clone(), 1, Duration::from_secs(5)).unwrap();
    let parallel = ScanRequest::new(urls, 6, Duration::from_secs(5)).unwrap();

    let one = orchestrator.run(&sequential).await;
    let many = orchestrator.run(&parallel).await;

    assert_eq!(one, many);
    assert_eq!(one.succeeded, 6);
    assert_eq!(one.failed, 1);
}

#[tokio::test]
async fn test_concurrency_one_runs_sequentially() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .respond_with(html("<p>slow</p>").set_delay(Duration::from_millis(150)))
        .mount(&mock_server)
        .await;

    let urls: Vec<String> = (0..4).map(|i| format!("{}/s{}", base_url, i)).collect();
    let request = ScanRequest::new(urls, 1, Duration::from_secs(5)).unwrap();

    let report = create_orchestrator(None).run_report(&request).await;

    assert_eq!(report.effective_concurrency, 1);
    assert_eq!(report.summary.succeeded, 4);
    assert!(report.duration >= Duration::from_millis(600));
}

#[tokio::test]
async fn test_concurrency_two_runs_in_pairs() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let delay = Duration::from_millis(300);

    Mock::given(method("GET"))
        .respond_with(html("<p>slow</p>").set_delay(delay))
        .mount(&mock_server)
        .await;

    let urls: Vec<String> = (0..4).map(|i| format!("{}/p{}", base_url, i)).collect();
    let request = ScanRequest::new(urls, 2, Duration::from_secs(5)).unwrap();

    let report = create_orchestrator(None).run_report(&request).await;

    assert_eq!(report.effective_concurrency, 2);
    assert_eq!(report.summary.succeeded, 4);
    // Two waves of two: never all four at once, never one at a time
    assert!(report.duration >= delay * 2, "took {:?}", report.duration);
    assert!(report.duration < delay * 4, "took {:?}", report.duration);
}

#[tokio::test]
async fn test_effective_concurrency_capped_by_batch_size() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "<p>hi</p>").await;

    let request = ScanRequest::new(vec![mock_server.uri()], 16, Duration::from_secs(5)).unwrap();
    let report = create_orchestrator(None).run_report(&request).await;

    assert_eq!(report.effective_concurrency, 1);
    assert_eq!(report.summary.total, 1);
}

#[tokio::test]
async fn test_batch_deadline_records_pending_as_timeout() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/fast", "<p>quick@example.com</p>").await;
    Mock::given(method("GET"))
        .and(path("/stuck"))
        .respond_with(html("<p>late</p>").set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let urls = vec![format!("{}/stuck", base_url), format!("{}/fast", base_url)];
    let request = ScanRequest::new(urls, 2, Duration::from_secs(10)).unwrap();

    let started = Instant::now();
    let summary = create_orchestrator(Some(500)).run(&request).await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(summary.total, 2);
    assert_eq!(summary.results[0].status(), ScanStatus::Timeout);
    assert_eq!(summary.results[0].error(), Some("batch deadline exceeded"));
    assert_eq!(summary.results[1].status(), ScanStatus::Ok);
    assert!(summary.results[1].emails().contains("quick@example.com"));
}
