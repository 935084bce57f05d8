use axum::http::StatusCode;
use serde_json::Value;

use crate::{AppStateTest, body_json, get};

fn ids(body: &Value) -> Vec<&str> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn lists_all_dramas_newest_first() {
    let test_state = AppStateTest::new().await;

    let response = test_state.generate_response(get("/dramas", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["total"], 3);
    assert_eq!(ids(&body), ["d1", "d2", "d3"]);
}

#[tokio::test]
async fn drama_uses_wire_field_names() {
    let test_state = AppStateTest::new().await;

    let body = body_json(test_state.generate_response(get("/dramas/d1", None)).await).await;
    let drama = &body["data"];

    for key in [
        "id",
        "title",
        "title_en",
        "poster_url",
        "description",
        "episodes",
        "category",
        "section",
        "view_count",
        "rating",
        "year",
        "is_featured",
        "created_at",
    ] {
        assert!(drama.get(key).is_some(), "missing {key}");
    }
    assert_eq!(drama["category"][0], "ดราม่า");
}

#[tokio::test]
async fn filters_by_section() {
    let test_state = AppStateTest::new().await;

    let body = body_json(
        test_state
            .generate_response(get("/dramas?section=trending", None))
            .await,
    )
    .await;

    assert_eq!(ids(&body), ["d1", "d2"]);
    for drama in body["data"].as_array().unwrap() {
        assert_eq!(drama["section"], "trending");
    }
}

#[tokio::test]
async fn filters_by_category() {
    let test_state = AppStateTest::new().await;

    let uri = format!(
        "/dramas?category={}",
        "%E0%B8%94%E0%B8%A3%E0%B8%B2%E0%B8%A1%E0%B9%88%E0%B8%B2"
    );
    let body = body_json(test_state.generate_response(get(&uri, None)).await).await;

    assert_eq!(ids(&body), ["d1", "d3"]);
}

#[tokio::test]
async fn filters_combine() {
    let test_state = AppStateTest::new().await;

    let body = body_json(
        test_state
            .generate_response(get("/dramas?section=trending&category=comedy", None))
            .await,
    )
    .await;
    assert_eq!(ids(&body), ["d2"]);

    let body = body_json(
        test_state
            .generate_response(get("/dramas?featured=true", None))
            .await,
    )
    .await;
    assert_eq!(ids(&body), ["d1"]);
}

#[tokio::test]
async fn search_is_case_insensitive_and_literal() {
    let test_state = AppStateTest::new().await;

    let body = body_json(
        test_state
            .generate_response(get("/dramas?search=boss", None))
            .await,
    )
    .await;
    assert_eq!(ids(&body), ["d2"]);

    let body = body_json(
        test_state
            .generate_response(get("/dramas?search=100%25%20love_", None))
            .await,
    )
    .await;
    assert_eq!(ids(&body), ["d3"]);
}

#[tokio::test]
async fn popular_order_and_limit() {
    let test_state = AppStateTest::new().await;

    let body = body_json(
        test_state
            .generate_response(get("/dramas?order=popular&limit=2", None))
            .await,
    )
    .await;

    assert_eq!(ids(&body), ["d2", "d1"]);
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn invalid_query_is_bad_request() {
    let test_state = AppStateTest::new().await;

    for uri in [
        "/dramas?limit=0",
        "/dramas?limit=201",
        "/dramas?limit=abc",
        "/dramas?order=random",
    ] {
        let response = test_state.generate_response(get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn missing_drama_is_not_found() {
    let test_state = AppStateTest::new().await;

    let response = test_state
        .generate_response(get("/dramas/unknown", None))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Drama not found");
}

#[tokio::test]
async fn episodes_are_ordered_by_number() {
    let test_state = AppStateTest::new().await;

    let body = body_json(
        test_state
            .generate_response(get("/dramas/d1/episodes", None))
            .await,
    )
    .await;

    assert_eq!(body["total"], 3);
    let numbers: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["episode_number"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, [1, 2, 3]);
}

#[tokio::test]
async fn episodes_of_unknown_drama_is_empty() {
    let test_state = AppStateTest::new().await;

    let response = test_state
        .generate_response(get("/dramas/unknown/episodes", None))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 0);
    assert_eq!(body["data"], serde_json::json!([]));
}
