use actix_web::http::StatusCode;
use razorpay_payment_engine::{helpers::payment_signature_material, SignatureVerifier};
use serde_json::json;

use super::helpers::{
    order_status,
    payment_status,
    post_json,
    seed_order,
    signed_payment_event,
    verify_payment_request,
    TestServer,
    KEY_SECRET,
};

const ORDER_ID: &str = "order_DBJOWzybf0sJbb";
const PAYMENT_ID: &str = "pay_DBJOWzybf0sJbb";

#[actix_web::test]
async fn verify_payment() {
    let server = TestServer::new().await;
    seed_order(&server, ORDER_ID, 50_000).await;
    let db = server.db.clone();
    let (status, body) = server.send(verify_payment_request(ORDER_ID, PAYMENT_ID)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
    assert_eq!(order_status(&db, ORDER_ID).await.as_deref(), Some("paid"));
    assert_eq!(payment_status(&db, PAYMENT_ID).await.as_deref(), Some("captured"));
}

#[actix_web::test]
async fn verify_payment_twice() {
    let server = TestServer::new().await;
    seed_order(&server, ORDER_ID, 50_000).await;
    let db = server.db.clone();
    let responses = server
        .send_all(vec![verify_payment_request(ORDER_ID, PAYMENT_ID), verify_payment_request(ORDER_ID, PAYMENT_ID)])
        .await;
    for (status, body) in responses {
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }
    assert_eq!(order_status(&db, ORDER_ID).await.as_deref(), Some("paid"));
}

#[actix_web::test]
async fn verify_payment_after_webhook() {
    let server = TestServer::new().await;
    seed_order(&server, ORDER_ID, 50_000).await;
    let db = server.db.clone();
    let responses = server
        .send_all(vec![
            signed_payment_event("payment.captured", PAYMENT_ID, Some(ORDER_ID), 50_000, "captured"),
            verify_payment_request(ORDER_ID, PAYMENT_ID),
        ])
        .await;
    assert_eq!(responses[0].0, StatusCode::OK);
    assert_eq!(responses[0].1["status"], "success");
    assert_eq!(responses[1], (StatusCode::OK, json!({"status": "ok"})));
    assert_eq!(order_status(&db, ORDER_ID).await.as_deref(), Some("paid"));
    assert_eq!(payment_status(&db, PAYMENT_ID).await.as_deref(), Some("captured"));
}

#[actix_web::test]
async fn verify_payment_bad_signature() {
    let server = TestServer::new().await;
    seed_order(&server, ORDER_ID, 50_000).await;
    let db = server.db.clone();
    let req = post_json(
        "/api/verify-payment",
        json!({
            "razorpay_order_id": ORDER_ID,
            "razorpay_payment_id": PAYMENT_ID,
            "razorpay_signature": "0d4e745a1838664ad6c9c9902212a32d627d68e917290b0ad5f08ff4561bc50f",
        }),
    );
    let (status, body) = server.send(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"status": "verification_failed"}));
    assert_eq!(order_status(&db, ORDER_ID).await.as_deref(), Some("created"));
    assert_eq!(payment_status(&db, PAYMENT_ID).await, None);
}

#[actix_web::test]
async fn verify_payment_signature_for_another_order() {
    let server = TestServer::new().await;
    seed_order(&server, ORDER_ID, 50_000).await;
    seed_order(&server, "order_other", 10_000).await;
    let db = server.db.clone();
    let material = payment_signature_material("order_other", PAYMENT_ID);
    let signature = SignatureVerifier::sign(material.as_bytes(), KEY_SECRET);
    let req = post_json(
        "/api/verify-payment",
        json!({
            "razorpay_order_id": ORDER_ID,
            "razorpay_payment_id": PAYMENT_ID,
            "razorpay_signature": signature,
        }),
    );
    let (status, body) = server.send(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"status": "verification_failed"}));
    assert_eq!(order_status(&db, ORDER_ID).await.as_deref(), Some("created"));
    assert_eq!(order_status(&db, "order_other").await.as_deref(), Some("created"));
}

#[actix_web::test]
async fn verify_payment_unknown_order() {
    let server = TestServer::new().await;
    let db = server.db.clone();
    let (status, body) = server.send(verify_payment_request("order_missing", PAYMENT_ID)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"status": "order_not_found"}));
    assert_eq!(payment_status(&db, PAYMENT_ID).await, None);
}

#[actix_web::test]
async fn verify_payment_malformed_body() {
    let server = TestServer::new().await;
    let (status, body) =
        server.send(post_json("/api/verify-payment", json!({"razorpay_order_id": ORDER_ID}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Could not read request body"), "{body}");
}
