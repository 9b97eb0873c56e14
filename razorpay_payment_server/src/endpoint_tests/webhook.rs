use actix_web::http::StatusCode;
use razorpay_payment_engine::SignatureVerifier;
use serde_json::json;

use super::helpers::{
    order_status,
    payment_event_body,
    payment_status,
    seed_order,
    signed_payment_event,
    webhook_request,
    TestServer,
    WEBHOOK_SECRET,
};

const ORDER_ID: &str = "order_EKwxwAgItmmXdp";
const PAYMENT_ID: &str = "pay_EKwxwAgItmmXdp";

fn signed(body: &str) -> String {
    SignatureVerifier::sign(body.as_bytes(), WEBHOOK_SECRET)
}

#[actix_web::test]
async fn payment_captured() {
    let server = TestServer::new().await;
    seed_order(&server, ORDER_ID, 50_000).await;
    let db = server.db.clone();
    let (status, body) =
        server.send(signed_payment_event("payment.captured", PAYMENT_ID, Some(ORDER_ID), 50_000, "captured")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert!(body["message"].as_str().unwrap().starts_with("payment.captured processed"), "{body}");
    assert_eq!(order_status(&db, ORDER_ID).await.as_deref(), Some("paid"));
    assert_eq!(payment_status(&db, PAYMENT_ID).await.as_deref(), Some("captured"));
}

#[actix_web::test]
async fn payment_captured_for_unknown_order() {
    let server = TestServer::new().await;
    let db = server.db.clone();
    let (status, body) =
        server.send(signed_payment_event("payment.captured", PAYMENT_ID, Some(ORDER_ID), 75_000, "captured")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(order_status(&db, ORDER_ID).await.as_deref(), Some("paid"));
}

#[actix_web::test]
async fn replayed_webhook() {
    let server = TestServer::new().await;
    seed_order(&server, ORDER_ID, 50_000).await;
    let db = server.db.clone();
    let event = payment_event_body("payment.captured", PAYMENT_ID, Some(ORDER_ID), 50_000, "captured");
    let signature = signed(&event);
    let responses = server
        .send_all(vec![webhook_request(&event, Some(&signature)), webhook_request(&event, Some(&signature))])
        .await;
    for (status, body) in responses {
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
    }
    assert_eq!(order_status(&db, ORDER_ID).await.as_deref(), Some("paid"));
    assert_eq!(payment_status(&db, PAYMENT_ID).await.as_deref(), Some("captured"));
}

#[actix_web::test]
async fn late_authorized_event_does_not_downgrade() {
    let server = TestServer::new().await;
    seed_order(&server, ORDER_ID, 50_000).await;
    let db = server.db.clone();
    let responses = server
        .send_all(vec![
            signed_payment_event("payment.captured", PAYMENT_ID, Some(ORDER_ID), 50_000, "captured"),
            signed_payment_event("payment.authorized", PAYMENT_ID, Some(ORDER_ID), 50_000, "authorized"),
        ])
        .await;
    assert!(responses.iter().all(|(status, _)| *status == StatusCode::OK));
    assert_eq!(payment_status(&db, PAYMENT_ID).await.as_deref(), Some("captured"));
    assert_eq!(order_status(&db, ORDER_ID).await.as_deref(), Some("paid"));
}

#[actix_web::test]
async fn payment_failed_leaves_order_open() {
    let server = TestServer::new().await;
    seed_order(&server, ORDER_ID, 50_000).await;
    let db = server.db.clone();
    let (status, body) =
        server.send(signed_payment_event("payment.failed", PAYMENT_ID, Some(ORDER_ID), 50_000, "failed")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(payment_status(&db, PAYMENT_ID).await.as_deref(), Some("failed"));
    assert_eq!(order_status(&db, ORDER_ID).await.as_deref(), Some("created"));
}

#[actix_web::test]
async fn captured_event_with_other_status_is_ignored() {
    let server = TestServer::new().await;
    seed_order(&server, ORDER_ID, 50_000).await;
    let db = server.db.clone();
    let (status, body) =
        server.send(signed_payment_event("payment.captured", PAYMENT_ID, Some(ORDER_ID), 50_000, "authorized")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ignored");
    assert_eq!(payment_status(&db, PAYMENT_ID).await, None);
    assert_eq!(order_status(&db, ORDER_ID).await.as_deref(), Some("created"));
}

#[actix_web::test]
async fn unknown_event_is_ignored() {
    let server = TestServer::new().await;
    let event = json!({"entity": "event", "event": "order.paid", "payload": {}}).to_string();
    let signature = signed(&event);
    let (status, body) = server.send(webhook_request(&event, Some(&signature))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ignored");
    assert!(body["message"].as_str().unwrap().starts_with("order.paid ignored"), "{body}");
}

#[actix_web::test]
async fn invalid_signature() {
    let server = TestServer::new().await;
    seed_order(&server, ORDER_ID, 50_000).await;
    let db = server.db.clone();
    let event = payment_event_body("payment.captured", PAYMENT_ID, Some(ORDER_ID), 50_000, "captured");
    let signature = SignatureVerifier::sign(event.as_bytes(), "not_the_webhook_secret");
    let (status, body) = server.send(webhook_request(&event, Some(&signature))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid webhook signature"}));
    assert_eq!(order_status(&db, ORDER_ID).await.as_deref(), Some("created"));
    assert_eq!(payment_status(&db, PAYMENT_ID).await, None);
}

#[actix_web::test]
async fn tampered_body() {
    let server = TestServer::new().await;
    let event = payment_event_body("payment.captured", PAYMENT_ID, Some(ORDER_ID), 50_000, "captured");
    let signature = signed(&event);
    let tampered = event.replace("50000", "5000000");
    let (status, body) = server.send(webhook_request(&tampered, Some(&signature))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid webhook signature"}));
}

#[actix_web::test]
async fn missing_signature() {
    let server = TestServer::new().await;
    let event = payment_event_body("payment.captured", PAYMENT_ID, Some(ORDER_ID), 50_000, "captured");
    let (status, body) = server.send(webhook_request(&event, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid webhook signature"}));
}

#[actix_web::test]
async fn malformed_payload() {
    let server = TestServer::new().await;
    let event = r#"{"event": "payment.captured", "payload": {"payment": {}}}"#;
    let signature = signed(event);
    let (status, body) = server.send(webhook_request(event, Some(&signature))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Malformed webhook payload"}));

    let server = TestServer::new().await;
    let event = "this is not json";
    let signature = signed(event);
    let (status, body) = server.send(webhook_request(event, Some(&signature))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Malformed webhook payload"}));
}
