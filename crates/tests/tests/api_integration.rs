use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use waymark_api::build_app;

#[tokio::test]
async fn health_is_public() {
    let app = build_app().await.expect("app should build");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn plan_requires_api_key() {
    let app = build_app().await.expect("app should build");

    let request = Request::builder()
        .method("POST")
        .uri("/v1/trip/plan")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "query": "Plan a trip from Dallas to Austin"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn plan_returns_structured_payload() {
    let app = build_app().await.expect("app should build");

    let request = Request::builder()
        .method("POST")
        .uri("/v1/trip/plan")
        .header("content-type", "application/json")
        .header("x-api-key", "dev-waymark-key")
        .body(Body::from(
            json!({
                "query": "Plan a trip from Dallas to Austin with a stop at a Walmart and a coffee shop."
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(parsed["start"]["status"], "resolved");
    assert_eq!(parsed["end"]["status"], "resolved");
    assert!(parsed["intents"]
        .as_array()
        .unwrap()
        .contains(&json!("multi_stop")));
    assert_eq!(parsed["waypoints"].as_array().unwrap().len(), 2);
    assert!(parsed["route"].is_object());
}

#[tokio::test]
async fn empty_query_is_rejected() {
    let app = build_app().await.expect("app should build");

    let request = Request::builder()
        .method("POST")
        .uri("/v1/trip/plan")
        .header("content-type", "application/json")
        .header("x-api-key", "dev-waymark-key")
        .body(Body::from(json!({ "query": "   " }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyze_returns_extraction_only() {
    let app = build_app().await.expect("app should build");

    let request = Request::builder()
        .method("POST")
        .uri("/v1/query/analyze")
        .header("content-type", "application/json")
        .header("x-api-key", "dev-waymark-key")
        .body(Body::from(
            json!({
                "query": "go from Seattle to Portland with rest stops every 100 miles"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(parsed["start"], "Seattle");
    assert_eq!(parsed["end"], "Portland");
    assert_eq!(parsed["distance_constraints"][0]["raw"], "100 miles");
}

#[tokio::test]
async fn intents_listing_covers_the_closed_set() {
    let app = build_app().await.expect("app should build");

    let request = Request::builder()
        .uri("/v1/intents")
        .header("x-api-key", "dev-waymark-key")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 15);
}

#[tokio::test]
async fn rate_limit_returns_429_past_the_budget() {
    let app = build_app().await.expect("app should build");

    let mut last_status = StatusCode::OK;
    for _ in 0..81 {
        let request = Request::builder()
            .uri("/v1/intents")
            .header("x-api-key", "dev-waymark-key")
            .header("x-forwarded-for", "198.51.100.77")
            .body(Body::empty())
            .unwrap();

        last_status = app.clone().oneshot(request).await.unwrap().status();
    }

    assert_eq!(last_status, StatusCode::TOO_MANY_REQUESTS);
}
