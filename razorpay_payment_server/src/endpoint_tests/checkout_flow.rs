use actix_web::http::StatusCode;
use razorpay_payment_engine::{
    db_types::{MinorUnits, OrderId, PaymentId, RefundId},
    GatewayOrder,
    GatewayRefund,
    RefundProcessorApi,
};
use serde_json::json;

use super::{
    helpers::{
        get,
        order_status,
        payment_status,
        post_json,
        signed_payment_event,
        verify_payment_request,
        TestServer,
    },
    mocks::MockGateway,
};

const ORDER_ID: &str = "order_HbYT3kZ2cQlcXn";
const PAYMENT_ID: &str = "pay_HbYT3kZ2cQlcXn";

/// Checkout, a repeated client confirmation and a late webhook leave one paid order. Refunding it in full closes
/// it, and nothing is left to refund afterwards.
#[actix_web::test]
async fn pay_then_refund_in_full() {
    let mut server = TestServer::new().await;
    server.checkout.expect_create_order().times(1).returning(|amount, currency, receipt| {
        Ok(GatewayOrder {
            id: OrderId::new(ORDER_ID),
            amount,
            currency: currency.to_string(),
            receipt: receipt.to_string(),
            status: "created".into(),
            created_at: 1_700_000_000,
        })
    });
    server.refunds.expect_create_refund().times(1).returning(|payment_id, amount| {
        Ok(GatewayRefund {
            id: RefundId::new("rfnd_HbYT3kZ2cQlcXn"),
            payment_id: payment_id.clone(),
            amount,
            currency: "INR".into(),
            status: "processed".into(),
        })
    });
    let db = server.db.clone();
    let responses = server
        .send_all(vec![
            post_json("/api/create-order", json!({"amount": 500})),
            verify_payment_request(ORDER_ID, PAYMENT_ID),
            get("/api/getAllOrders"),
            verify_payment_request(ORDER_ID, PAYMENT_ID),
            get("/api/getAllOrders"),
            signed_payment_event("payment.captured", PAYMENT_ID, Some(ORDER_ID), 50_000, "captured"),
            get("/api/getAllOrders"),
            post_json("/api/refund", json!({"paymentId": PAYMENT_ID, "amount": 500})),
            post_json("/api/refund", json!({"paymentId": PAYMENT_ID, "amount": 1})),
        ])
        .await;
    let [created, verified, after_verify, replayed, after_replay, webhook, after_webhook, refund, second_refund] =
        <[_; 9]>::try_from(responses).unwrap();

    assert_eq!(created.0, StatusCode::OK);
    assert_eq!(created.1["id"], ORDER_ID);
    assert_eq!(created.1["amount"], 50_000);

    assert_eq!(verified, (StatusCode::OK, json!({"status": "ok"})));
    let orders = after_verify.1["data"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["order_id"], ORDER_ID);
    assert_eq!(orders[0]["status"], "paid");
    assert_eq!(orders[0]["payment_id"], PAYMENT_ID);

    assert_eq!(replayed, (StatusCode::OK, json!({"status": "ok"})));
    assert_eq!(after_replay, after_verify);

    assert_eq!(webhook.0, StatusCode::OK);
    assert_eq!(webhook.1["status"], "success");
    assert_eq!(after_webhook, after_verify);

    assert_eq!(refund.0, StatusCode::OK);
    assert_eq!(refund.1["message"], "Refund initiated successfully");
    assert_eq!(refund.1["refund"]["amount"], 50_000);

    assert_eq!(second_refund.0, StatusCode::BAD_REQUEST);
    assert!(second_refund.1["error"].as_str().unwrap().starts_with("Invalid amount."), "{}", second_refund.1);

    assert_eq!(order_status(&db, ORDER_ID).await.as_deref(), Some("refunded"));
    assert_eq!(payment_status(&db, PAYMENT_ID).await.as_deref(), Some("refunded"));
    let refund_api = RefundProcessorApi::new(db.handle(), MockGateway::new());
    let refunds = refund_api.refunds_for_payment(&PaymentId::new(PAYMENT_ID)).await.unwrap();
    assert_eq!(refunds.len(), 1);
    assert_eq!(refunds[0].amount, MinorUnits::from(50_000));
}
