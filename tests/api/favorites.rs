use axum::http::StatusCode;
use serde_json::json;

use crate::{
    AppStateTest, EMAIL, PASSWORD, body_json, get, json_request, json_request_with_cookie, send,
};

async fn is_favorite(test_state: &AppStateTest, cookie: &str, drama_id: &str) -> bool {
    let body = body_json(
        test_state
            .generate_response(get(&format!("/favorites/check/{drama_id}"), Some(cookie)))
            .await,
    )
    .await;
    body["isFavorite"].as_bool().unwrap()
}

#[tokio::test]
async fn empty_list_for_new_user() {
    let test_state = AppStateTest::new().await;
    let cookie = test_state.sign_up(EMAIL, PASSWORD).await;

    let response = test_state
        .generate_response(get("/favorites", Some(&cookie)))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "success": true, "data": [], "total": 0 }));
}

#[tokio::test]
async fn add_returns_created_record() {
    let test_state = AppStateTest::new().await;
    let cookie = test_state.sign_up(EMAIL, PASSWORD).await;

    let response = test_state
        .generate_response(json_request_with_cookie(
            "POST",
            "/favorites",
            json!({ "drama_id": "d1" }),
            &cookie,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["drama_id"], "d1");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["user_id"].is_string());
}

#[tokio::test]
async fn list_embeds_drama_under_dramas_newest_first() {
    let test_state = AppStateTest::new().await;
    let cookie = test_state.sign_up(EMAIL, PASSWORD).await;

    for drama_id in ["d3", "d1"] {
        let response = test_state
            .generate_response(json_request_with_cookie(
                "POST",
                "/favorites",
                json!({ "drama_id": drama_id }),
                &cookie,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let body = body_json(
        test_state
            .generate_response(get("/favorites", Some(&cookie)))
            .await,
    )
    .await;

    assert_eq!(body["total"], 2);
    assert_eq!(body["data"][0]["drama_id"], "d1");
    assert_eq!(body["data"][0]["dramas"]["id"], "d1");
    assert_eq!(body["data"][0]["dramas"]["title"], "ท่านประธานกลับมาแล้ว");
    assert_eq!(body["data"][1]["drama_id"], "d3");
}

#[tokio::test]
async fn check_reflects_add_and_remove() {
    let test_state = AppStateTest::new().await;
    let cookie = test_state.sign_up(EMAIL, PASSWORD).await;

    assert!(!is_favorite(&test_state, &cookie, "d2").await);

    test_state
        .generate_response(json_request_with_cookie(
            "POST",
            "/favorites",
            json!({ "drama_id": "d2" }),
            &cookie,
        ))
        .await;
    assert!(is_favorite(&test_state, &cookie, "d2").await);

    test_state
        .generate_response(send("DELETE", "/favorites/d2", Some(&cookie)))
        .await;
    assert!(!is_favorite(&test_state, &cookie, "d2").await);
}

#[tokio::test]
async fn drama_id_is_required() {
    let test_state = AppStateTest::new().await;
    let cookie = test_state.sign_up(EMAIL, PASSWORD).await;

    for body in [json!({}), json!({ "drama_id": "" })] {
        let response = test_state
            .generate_response(json_request_with_cookie("POST", "/favorites", body, &cookie))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "drama_id is required");
    }
}

#[tokio::test]
async fn unknown_drama_is_not_found() {
    let test_state = AppStateTest::new().await;
    let cookie = test_state.sign_up(EMAIL, PASSWORD).await;

    let response = test_state
        .generate_response(json_request_with_cookie(
            "POST",
            "/favorites",
            json!({ "drama_id": "missing" }),
            &cookie,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Drama not found");
}

#[tokio::test]
async fn concurrent_duplicate_adds_yield_one_created_one_conflict() {
    let test_state = AppStateTest::new().await;
    let cookie = test_state.sign_up(EMAIL, PASSWORD).await;

    let add = || {
        test_state.generate_response(json_request_with_cookie(
            "POST",
            "/favorites",
            json!({ "drama_id": "d1" }),
            &cookie,
        ))
    };
    let (first, second) = tokio::join!(add(), add());

    let mut statuses = [first.status(), second.status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);

    let body = body_json(
        test_state
            .generate_response(get("/favorites", Some(&cookie)))
            .await,
    )
    .await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn favorites_are_per_user() {
    let test_state = AppStateTest::new().await;
    let alice = test_state.sign_up("alice@test.com", PASSWORD).await;
    let bob = test_state.sign_up("bob@test.com", PASSWORD).await;

    test_state
        .generate_response(json_request_with_cookie(
            "POST",
            "/favorites",
            json!({ "drama_id": "d1" }),
            &alice,
        ))
        .await;

    let body = body_json(
        test_state
            .generate_response(get("/favorites/check/d1", Some(&bob)))
            .await,
    )
    .await;
    assert_eq!(body["isFavorite"], false);

    let response = test_state
        .generate_response(json_request_with_cookie(
            "POST",
            "/favorites",
            json!({ "drama_id": "d1" }),
            &bob,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let test_state = AppStateTest::new().await;
    let cookie = test_state.sign_up(EMAIL, PASSWORD).await;

    let mut request = json_request("POST", "/favorites", json!(null));
    *request.body_mut() = axum::body::Body::from("{not json");
    request
        .headers_mut()
        .insert(axum::http::header::COOKIE, cookie.parse().unwrap());

    let response = test_state.generate_response(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}
