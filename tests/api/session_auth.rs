use axum::http::StatusCode;
use serde_json::json;

use crate::{AppStateTest, body_json, get, json_request, send};

#[tokio::test]
async fn protected_routes_require_a_session() {
    let test_state = AppStateTest::new().await;

    let requests = [
        get("/favorites", None),
        get("/favorites/check/d1", None),
        json_request("POST", "/favorites", json!({ "drama_id": "d1" })),
        send("DELETE", "/favorites/d1", None),
    ];

    for request in requests {
        let response = test_state.generate_response(request).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Unauthorized - Please log in");
    }
}

#[tokio::test]
async fn forged_session_is_rejected() {
    let test_state = AppStateTest::new().await;

    let response = test_state
        .generate_response(get("/favorites", Some("session=0123456789abcdef")))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn other_cookies_are_not_a_session() {
    let test_state = AppStateTest::new().await;

    let response = test_state
        .generate_response(get("/favorites", Some("theme=dark; lang=th")))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
