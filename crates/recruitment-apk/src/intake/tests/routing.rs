use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use super::common::*;

fn post_request(body: Vec<u8>) -> Request<Body> {
    Request::post("/api/submit-assessment")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("request builds")
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is json")
}

#[tokio::test]
async fn a_valid_submission_returns_the_success_envelope() {
    let router = router_with_limit(5);

    let body = serde_json::to_vec(&submission_json(7)).unwrap();
    let response = router.oneshot(post_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Assessment succesvol ontvangen");
    assert_eq!(json["data"]["csv_saved"], true);
    assert_eq!(json["data"]["pipedrive_synced"], true);
    assert!(json["data"]["timestamp"].is_string());
}

#[tokio::test]
async fn invalid_json_is_a_bad_request() {
    let router = router_with_limit(5);

    let response = router
        .oneshot(post_request(b"{not json".to_vec()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Ongeldige JSON data");
}

#[tokio::test]
async fn validation_errors_are_listed() {
    let router = router_with_limit(5);

    let response = router.oneshot(post_request(b"{}".to_vec())).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["success"], false);
    let errors = json["errors"].as_array().expect("errors array");
    assert_eq!(errors.len(), 5);
    assert!(errors.contains(&Value::from("Geldig email adres is verplicht")));
}

#[tokio::test]
async fn the_sixth_request_in_the_window_is_limited() {
    let router = router_with_limit(5);

    for _ in 0..5 {
        let body = serde_json::to_vec(&submission_json(7)).unwrap();
        let response = router.clone().oneshot(post_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let body = serde_json::to_vec(&submission_json(7)).unwrap();
    let response = router.oneshot(post_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let json = response_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(
        json["error"],
        "Te veel verzoeken. Probeer het over een uur opnieuw."
    );
}

#[tokio::test]
async fn limited_requests_are_refused_before_the_body_is_parsed() {
    let router = router_with_limit(0);

    let response = router
        .oneshot(post_request(b"{not json".to_vec()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn other_methods_are_rejected() {
    let router = router_with_limit(5);

    let response = router
        .oneshot(
            Request::get("/api/submit-assessment")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let json = response_json(response).await;
    assert_eq!(json["error"], "Method not allowed");
}
