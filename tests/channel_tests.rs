//! HTTP channel senders against a local stub upstream.

mod harness;

use arbscan::adapter::outbound::channel::email::{EmailConfig, EmailSender};
use arbscan::adapter::outbound::channel::in_app::InAppSender;
use arbscan::adapter::outbound::channel::whatsapp::{WhatsappConfig, WhatsappSender};
use arbscan::application::message::render_opportunity;
use arbscan::domain::notification::{Channel, NotificationType};
use arbscan::port::outbound::channel::{ChannelSender, RenderedNotification};
use arbscan::testkit::domain::opportunity;
use harness::stub_server::{StubResponse, StubServer};
use rust_decimal_macros::dec;
use serde_json::json;

fn system_update() -> RenderedNotification {
    RenderedNotification {
        kind: NotificationType::SystemUpdate,
        title: "Maintenance <tonight>".into(),
        message: "Scans pause at 02:00 UTC".into(),
        payload: json!({}),
    }
}

fn email_sender(server: &StubServer) -> EmailSender {
    EmailSender::new(EmailConfig {
        relay_url: format!("{}/send", server.base_url()),
        from_address: "alerts@example.com".into(),
        timeout_ms: 2_000,
        api_key: Some("relay-key".into()),
    })
}

fn whatsapp_sender(server: &StubServer) -> WhatsappSender {
    WhatsappSender::new(WhatsappConfig {
        api_url: server.base_url(),
        language: "en_US".into(),
        timeout_ms: 2_000,
        access_token: "graph-token".into(),
        phone_number_id: "555000".into(),
    })
}

#[tokio::test]
async fn in_app_always_delivers() {
    let sender = InAppSender;

    assert_eq!(sender.channel(), Channel::InApp);
    assert!(sender.send("alice", &system_update()).await.unwrap());
}

#[tokio::test]
async fn email_posts_to_relay_with_bearer_key() {
    let server = StubServer::start().await;
    server.respond("/send", vec![StubResponse::ok(r#"{"id": "m-1"}"#)]);

    let delivered = email_sender(&server)
        .send("alice@example.com", &system_update())
        .await
        .unwrap();

    assert!(delivered);
    let requests = server.requests("/send");
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert!(request.starts_with("POST /send"));
    assert!(request.to_lowercase().contains("authorization: bearer relay-key"));
    assert!(request.contains(r#""to":["alice@example.com"]"#));
    assert!(request.contains(r#""subject":"Maintenance <tonight>""#));
    assert!(request.contains("Maintenance &lt;tonight&gt;"));
}

#[tokio::test]
async fn email_relay_error_carries_status_and_body() {
    let server = StubServer::start().await;
    server.respond("/send", vec![StubResponse::json(502, r#"{"error": "upstream down"}"#)]);

    let err = email_sender(&server)
        .send("alice@example.com", &system_update())
        .await
        .unwrap_err()
        .to_string();

    assert!(err.contains("HTTP 502"));
    assert!(err.contains("upstream down"));
}

#[tokio::test]
async fn email_rejects_address_without_at_sign() {
    let server = StubServer::start().await;

    let result = email_sender(&server).send("alice", &system_update()).await;

    assert!(result.is_err());
    assert_eq!(server.hits("/send"), 0);
}

#[tokio::test]
async fn whatsapp_sends_high_profit_template() {
    let server = StubServer::start().await;
    server.respond(
        "/555000/messages",
        vec![StubResponse::ok(r#"{"messages": [{"id": "wamid.1"}]}"#)],
    );
    let content = render_opportunity(
        &opportunity("bitcoin", "binance", "kraken", dec!(100), dec!(110)),
        1,
    );

    let delivered = whatsapp_sender(&server)
        .send("+15551234567", &content)
        .await
        .unwrap();

    assert!(delivered);
    let request = &server.requests("/555000/messages")[0];
    assert!(request.to_lowercase().contains("authorization: bearer graph-token"));
    assert!(request.contains(r#""to":"15551234567""#));
    assert!(request.contains(r#""name":"high_profit_alert""#));
}

#[tokio::test]
async fn whatsapp_api_error_is_reported() {
    let server = StubServer::start().await;
    server.respond(
        "/555000/messages",
        vec![StubResponse::json(
            400,
            r#"{"error": {"message": "Template name does not exist"}}"#,
        )],
    );

    let err = whatsapp_sender(&server)
        .send("15551234567", &system_update())
        .await
        .unwrap_err()
        .to_string();

    assert!(err.contains("HTTP 400"));
    assert!(err.contains("Template name does not exist"));
}

#[tokio::test]
async fn whatsapp_rejects_short_numbers() {
    let server = StubServer::start().await;

    assert!(whatsapp_sender(&server)
        .send("12345", &system_update())
        .await
        .is_err());
    assert_eq!(server.hits("/555000/messages"), 0);
}
