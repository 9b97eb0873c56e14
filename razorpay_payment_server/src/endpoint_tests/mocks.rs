use mockall::mock;
use razorpay_payment_engine::{
    db_types::{MinorUnits, PaymentId},
    GatewayError,
    GatewayOrder,
    GatewayRefund,
    PaymentGateway,
};

mock! {
    pub Gateway {}
    impl PaymentGateway for Gateway {
        async fn create_order(&self, amount: MinorUnits, currency: &str, receipt: &str) -> Result<GatewayOrder, GatewayError>;
        async fn create_refund(&self, payment_id: &PaymentId, amount: MinorUnits) -> Result<GatewayRefund, GatewayError>;
    }
}
