//! Webhook delivery over a real HTTP connection

use amp_monitor::error::NotifyError;
use amp_monitor::http::ReqwestTransport;
use amp_monitor::notifier::{Delivery, Notifier, Notify};

use super::helpers::{closed_port_url, test_config, MockResponse, MockServer};

#[test]
fn test_no_content_is_delivered() {
    let server = MockServer::start(vec![MockResponse::no_content()]);
    let transport = ReqwestTransport::direct().expect("transport");
    let config = test_config(closed_port_url(), server.url("/api/webhooks/1/token"));
    let notifier = Notifier::new(&transport, &config);

    assert_eq!(notifier.notify("Status changed"), Delivery::Delivered);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].request_line,
        "POST /api/webhooks/1/token HTTP/1.1"
    );
    assert!(requests[0].headers.contains("content-type: application/json"));
    let body: serde_json::Value = serde_json::from_str(&requests[0].body).expect("json body");
    assert_eq!(
        body,
        serde_json::json!({"content": "Status changed", "username": "AMP Monitor"})
    );
}

#[test]
fn test_ok_with_body_is_not_delivered() {
    let server = MockServer::start(vec![MockResponse::status(200, "OK", "{\"id\":1}")]);
    let transport = ReqwestTransport::direct().expect("transport");
    let config = test_config(closed_port_url(), server.url("/hook"));

    let delivery = Notifier::new(&transport, &config).notify("hello");

    assert_eq!(
        delivery,
        Delivery::NotDelivered(NotifyError::UnexpectedStatus {
            status: 200,
            body: "{\"id\":1}".into(),
        })
    );
}

#[test]
fn test_server_error_is_not_delivered() {
    let server = MockServer::start(vec![MockResponse::status(
        500,
        "Internal Server Error",
        "boom",
    )]);
    let transport = ReqwestTransport::direct().expect("transport");
    let config = test_config(closed_port_url(), server.url("/hook"));

    let delivery = Notifier::new(&transport, &config).notify("hello");

    assert!(!delivery.is_delivered());
    assert_eq!(server.requests().len(), 1);
}

#[test]
fn test_unreachable_webhook_is_not_delivered() {
    let transport = ReqwestTransport::direct().expect("transport");
    let config = test_config(closed_port_url(), closed_port_url());

    let delivery = Notifier::new(&transport, &config).notify("hello");

    assert!(matches!(
        delivery,
        Delivery::NotDelivered(NotifyError::Transport(_))
    ));
}
