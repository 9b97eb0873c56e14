use actix_web::{
    http::{header, Method, StatusCode},
    test::TestRequest,
};

use super::helpers::{get, TestServer, FRONTEND_URL};

fn preflight(origin: &str) -> TestRequest {
    TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/api/create-order")
        .insert_header((header::ORIGIN, origin))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
}

#[actix_web::test]
async fn preflight_from_the_storefront() {
    let server = TestServer::new().await;
    let (status, headers) = server.send_for_headers(preflight(FRONTEND_URL)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), FRONTEND_URL);
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(), "true");
    let methods = headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap().to_str().unwrap();
    assert!(methods.contains("POST"), "{methods}");
    let allowed = headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap().to_str().unwrap().to_lowercase();
    assert!(allowed.contains("content-type"), "{allowed}");
}

#[actix_web::test]
async fn preflight_from_another_origin() {
    let server = TestServer::new().await;
    let (status, headers) = server.send_for_headers(preflight("https://attacker.example")).await;
    assert!(status.is_client_error(), "{status}");
    assert!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[actix_web::test]
async fn storefront_requests_carry_cors_headers() {
    let server = TestServer::new().await;
    let req = get("/api/getAllOrders").insert_header((header::ORIGIN, FRONTEND_URL));
    let (status, headers) = server.send_for_headers(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), FRONTEND_URL);
}
