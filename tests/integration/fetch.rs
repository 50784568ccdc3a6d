//! Page fetching over a real HTTP connection

use std::time::Duration;

use amp_monitor::error::{FetchError, TransportError};
use amp_monitor::fetcher::{fetch, Fetcher, StatusSource};
use amp_monitor::http::ReqwestTransport;

use super::helpers::{closed_port_url, test_config, MockResponse, MockServer};

#[test]
fn test_fetch_returns_page_and_sends_user_agent() {
    let server = MockServer::start(vec![MockResponse::html(
        "<html><body><h1>Amp Free is full for now</h1></body></html>",
    )]);
    let transport = ReqwestTransport::direct().expect("transport");
    let config = test_config(server.url("/news"), closed_port_url());
    let fetcher = Fetcher::new(&transport, &config);

    let page = fetcher.fetch().expect("fetch should succeed");

    assert_eq!(page.status, 200);
    assert!(page.html.contains("full for now"));
    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].request_line, "GET /news HTTP/1.1");
    assert!(requests[0].headers.contains("user-agent: mozilla/5.0"));
}

#[test]
fn test_poll_derives_status() {
    let server = MockServer::start(vec![MockResponse::html(
        "<p>Admission is <b>OPEN</b> again</p>",
    )]);
    let transport = ReqwestTransport::direct().expect("transport");
    let config = test_config(server.url("/"), closed_port_url());

    let status = Fetcher::new(&transport, &config).poll().expect("poll");

    assert!(!status.is_full);
    assert!(status.is_open);
}

#[test]
fn test_error_status_fails_without_fallback() {
    let server = MockServer::start(vec![MockResponse::status(404, "Not Found", "missing")]);
    let transport = ReqwestTransport::direct().expect("transport");

    let err = fetch(&transport, &server.url("/gone"), &[], Duration::from_secs(2))
        .expect_err("404 must fail");

    match err {
        FetchError::HttpStatus { status, reason, .. } => {
            assert_eq!(status, 404);
            assert_eq!(reason, "Not Found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(server.requests().len(), 1);
}

#[test]
fn test_unreachable_host_is_transport_error() {
    let transport = ReqwestTransport::direct().expect("transport");

    let err = fetch(&transport, &closed_port_url(), &[], Duration::from_secs(2))
        .expect_err("closed port must fail");

    assert!(matches!(err, FetchError::Transport(TransportError::Failed(_))));
}

#[test]
fn test_timeout_retries_exactly_once() {
    let server = MockServer::silent();
    let transport = ReqwestTransport::direct().expect("transport");

    let err = fetch(&transport, &server.url("/"), &[], Duration::from_millis(300))
        .expect_err("silent server must time out");

    assert_eq!(
        err,
        FetchError::Transport(TransportError::Timeout(Duration::from_millis(300)))
    );
    assert_eq!(server.requests().len(), 2);
}
