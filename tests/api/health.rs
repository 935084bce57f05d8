use axum::http::StatusCode;

use crate::{AppStateTest, EMAIL, PASSWORD, body_json, get, send};

#[tokio::test]
async fn should_be_ok() {
    let test_state = AppStateTest::new().await;

    let response = test_state.generate_response(get("/health", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn unknown_route_is_enveloped_404() {
    let test_state = AppStateTest::new().await;

    let response = test_state.generate_response(get("/nope", None)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Endpoint not found");
}

#[tokio::test]
async fn request_id_is_propagated() {
    let test_state = AppStateTest::new().await;

    let response = test_state.generate_response(get("/health", None)).await;

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn wrong_method_is_enveloped_405() {
    let test_state = AppStateTest::new().await;
    let cookie = test_state.sign_up(EMAIL, PASSWORD).await;

    let requests = [
        send("PATCH", "/dramas/d1", None),
        send("DELETE", "/dramas", None),
        send("GET", "/episodes/d1-ep1/view", None),
        send("PUT", "/favorites", Some(&cookie)),
    ];

    for request in requests {
        let uri = request.uri().to_string();
        let response = test_state.generate_response(request).await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{uri}");
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Method not allowed");
    }
}
