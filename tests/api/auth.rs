use axum::{
    body::Body,
    http::{self, Request, StatusCode, header},
};
use serde_json::json;

use crate::{
    AppStateTest, EMAIL, PASSWORD, body_json, get, json_request, send, session_cookie_of,
};

#[tokio::test]
async fn should_be_error_when_body_is_missing() {
    let test_state = AppStateTest::new().await;

    let request = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();

    let response = test_state.generate_response(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn should_be_error_when_fields_are_missing() {
    let test_state = AppStateTest::new().await;

    let response = test_state
        .generate_response(json_request(
            "POST",
            "/auth/login",
            json!({ "email": EMAIL }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Email and password are required");
}

#[tokio::test]
async fn signup_rejects_invalid_input() {
    let test_state = AppStateTest::new().await;

    for body in [
        json!({ "email": "not-an-email", "password": PASSWORD }),
        json!({ "email": EMAIL, "password": "12345" }),
        json!({ "email": EMAIL }),
    ] {
        let response = test_state
            .generate_response(json_request("POST", "/auth/signup", body))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn signup_creates_user_and_session() {
    let test_state = AppStateTest::new().await;

    let response = test_state
        .generate_response(json_request(
            "POST",
            "/auth/signup",
            json!({ "email": "User@Test.com", "password": PASSWORD }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("session="));
    assert!(set_cookie.contains("HttpOnly"));

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], EMAIL);
    assert!(body["user"]["id"].is_string());
}

#[tokio::test]
async fn signup_with_taken_email_is_conflict() {
    let test_state = AppStateTest::new().await;
    test_state.sign_up(EMAIL, PASSWORD).await;

    let response = test_state
        .generate_response(json_request(
            "POST",
            "/auth/signup",
            json!({ "email": "USER@test.com", "password": "another1" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Email already registered");
}

#[tokio::test]
async fn should_be_error_when_credential_is_invalid() {
    let test_state = AppStateTest::new().await;
    test_state.sign_up(EMAIL, PASSWORD).await;

    for body in [
        json!({ "email": EMAIL, "password": "incorrect-password" }),
        json!({ "email": "nobody@test.com", "password": PASSWORD }),
    ] {
        let response = test_state
            .generate_response(json_request("POST", "/auth/login", body))
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(session_cookie_of(&response).is_none());
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid email or password");
    }
}

#[tokio::test]
async fn login_issues_a_working_session() {
    let test_state = AppStateTest::new().await;
    test_state.sign_up(EMAIL, PASSWORD).await;

    let response = test_state
        .generate_response(json_request(
            "POST",
            "/auth/login",
            json!({ "email": EMAIL, "password": PASSWORD }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie_of(&response).unwrap();

    let response = test_state
        .generate_response(get("/auth/me", Some(&cookie)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], EMAIL);
}

#[tokio::test]
async fn me_without_session_is_null_user() {
    let test_state = AppStateTest::new().await;

    let response = test_state.generate_response(get("/auth/me", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert!(body["user"].is_null());

    let response = test_state
        .generate_response(get("/auth/me", Some("session=forged")))
        .await;
    let body = body_json(response).await;
    assert!(body["user"].is_null());
}

#[tokio::test]
async fn logout_ends_session_and_is_idempotent() {
    let test_state = AppStateTest::new().await;
    let cookie = test_state.sign_up(EMAIL, PASSWORD).await;

    let response = test_state
        .generate_response(send("POST", "/auth/logout", Some(&cookie)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(session_cookie_of(&response).as_deref(), Some("session="));

    let response = test_state
        .generate_response(send("POST", "/auth/logout", Some(&cookie)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = test_state
        .generate_response(send("POST", "/auth/logout", None))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = test_state
        .generate_response(get("/favorites", Some(&cookie)))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
