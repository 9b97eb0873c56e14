use actix_web::http::StatusCode;
use mockall::predicate::eq;
use razorpay_payment_engine::{
    db_types::{MinorUnits, PaymentId, RefundId},
    GatewayError,
    GatewayRefund,
};
use serde_json::json;

use super::helpers::{
    order_status,
    payment_status,
    post_json,
    seed_captured_payment,
    seed_order,
    seed_payment_event,
    TestServer,
};

const ORDER_ID: &str = "order_FZ7k1xW2c0dmPt";
const PAYMENT_ID: &str = "pay_FZ7k1xW2c0dmPt";

fn issued(id: &str, payment_id: &PaymentId, amount: MinorUnits) -> GatewayRefund {
    GatewayRefund {
        id: RefundId::new(id),
        payment_id: payment_id.clone(),
        amount,
        currency: "INR".into(),
        status: "processed".into(),
    }
}

fn refund_request(payment_id: &str, amount: serde_json::Value) -> actix_web::test::TestRequest {
    post_json("/api/refund", json!({ "paymentId": payment_id, "amount": amount }))
}

#[actix_web::test]
async fn partial_refund() {
    let mut server = TestServer::new().await;
    seed_captured_payment(&server, ORDER_ID, PAYMENT_ID, 50_000).await;
    server
        .refunds
        .expect_create_refund()
        .with(eq(PaymentId::new(PAYMENT_ID)), eq(MinorUnits::from(10_000)))
        .times(1)
        .returning(|payment_id, amount| Ok(issued("rfnd_FP8QHiV938haTz", payment_id, amount)));
    let db = server.db.clone();
    let (status, body) = server.send(refund_request(PAYMENT_ID, json!(100))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Refund initiated successfully");
    assert_eq!(body["refund"]["refund_id"], "rfnd_FP8QHiV938haTz");
    assert_eq!(body["refund"]["payment_id"], PAYMENT_ID);
    assert_eq!(body["refund"]["amount"], 10_000);
    assert_eq!(body["refund"]["status"], "processed");
    assert_eq!(payment_status(&db, PAYMENT_ID).await.as_deref(), Some("captured"));
    assert_eq!(order_status(&db, ORDER_ID).await.as_deref(), Some("paid"));
}

#[actix_web::test]
async fn full_refund_closes_order() {
    let mut server = TestServer::new().await;
    seed_captured_payment(&server, ORDER_ID, PAYMENT_ID, 50_000).await;
    let mut seq = mockall::Sequence::new();
    server
        .refunds
        .expect_create_refund()
        .with(eq(PaymentId::new(PAYMENT_ID)), eq(MinorUnits::from(20_000)))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|payment_id, amount| Ok(issued("rfnd_first", payment_id, amount)));
    server
        .refunds
        .expect_create_refund()
        .with(eq(PaymentId::new(PAYMENT_ID)), eq(MinorUnits::from(30_000)))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|payment_id, amount| Ok(issued("rfnd_second", payment_id, amount)));
    let db = server.db.clone();
    let requests = vec![refund_request(PAYMENT_ID, json!(200)), refund_request(PAYMENT_ID, json!("300.00"))];
    let responses = server.send_all(requests).await;
    assert!(responses.iter().all(|(status, _)| *status == StatusCode::OK), "{responses:?}");
    assert_eq!(responses[1].1["refund"]["refund_id"], "rfnd_second");
    assert_eq!(payment_status(&db, PAYMENT_ID).await.as_deref(), Some("refunded"));
    assert_eq!(order_status(&db, ORDER_ID).await.as_deref(), Some("refunded"));
}

#[actix_web::test]
async fn refund_more_than_remaining() {
    let mut server = TestServer::new().await;
    seed_captured_payment(&server, ORDER_ID, PAYMENT_ID, 50_000).await;
    server
        .refunds
        .expect_create_refund()
        .times(1)
        .returning(|payment_id, amount| Ok(issued("rfnd_first", payment_id, amount)));
    let responses =
        server.send_all(vec![refund_request(PAYMENT_ID, json!(400)), refund_request(PAYMENT_ID, json!(100.01))]).await;
    assert_eq!(responses[0].0, StatusCode::OK);
    let (status, body) = &responses[1];
    assert_eq!(*status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid amount"), "{body}");
}

#[actix_web::test]
async fn refund_invalid_amounts() {
    for amount in [json!(0), json!(-1), json!("lots"), json!(null)] {
        let mut server = TestServer::new().await;
        seed_captured_payment(&server, ORDER_ID, PAYMENT_ID, 50_000).await;
        server.refunds.expect_create_refund().never();
        let (status, body) = server.send(refund_request(PAYMENT_ID, amount.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{amount} should be rejected");
        assert!(body["error"].as_str().unwrap().starts_with("Invalid amount"), "{body}");
    }
}

#[actix_web::test]
async fn refund_unknown_payment() {
    let mut server = TestServer::new().await;
    server.refunds.expect_create_refund().never();
    let (status, body) = server.send(refund_request("pay_missing", json!(100))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Payment not found", "error": "pay_missing"}));
}

#[actix_web::test]
async fn refund_uncaptured_payment() {
    let mut server = TestServer::new().await;
    seed_order(&server, ORDER_ID, 50_000).await;
    seed_payment_event(&server, "payment.failed", PAYMENT_ID, ORDER_ID, 50_000, "failed").await;

    server.refunds.expect_create_refund().never();
    let (status, body) = server.send(refund_request(PAYMENT_ID, json!(100))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Refund not allowed");
    assert!(body["error"].as_str().unwrap().contains("failed"), "{body}");
}

#[actix_web::test]
async fn refund_rejected_by_gateway() {
    let mut server = TestServer::new().await;
    seed_captured_payment(&server, ORDER_ID, PAYMENT_ID, 50_000).await;
    server.refunds.expect_create_refund().times(1).returning(|_, _| {
        Err(GatewayError::Rejected {
            status: 400,
            message: "The payment has been fully refunded already".into(),
        })
    });
    let db = server.db.clone();
    let (status, body) = server.send(refund_request(PAYMENT_ID, json!(100))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"message": "Failed to initiate refund", "error": "The payment has been fully refunded already"})
    );
    assert_eq!(payment_status(&db, PAYMENT_ID).await.as_deref(), Some("captured"));
}

#[actix_web::test]
async fn refund_gateway_unavailable() {
    let mut server = TestServer::new().await;
    seed_captured_payment(&server, ORDER_ID, PAYMENT_ID, 50_000).await;
    server
        .refunds
        .expect_create_refund()
        .times(1)
        .returning(|_, _| Err(GatewayError::Transport("operation timed out".into())));
    let (status, body) = server.send(refund_request(PAYMENT_ID, json!(100))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to initiate refund");
    assert!(!body.to_string().contains("timed out"));
}
