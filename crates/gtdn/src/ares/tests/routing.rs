use super::common::*;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::ares::client::AresApiError;
use crate::ares::{ares_router, ares_router_with_throttles};
use crate::throttle::{ClientThrottle, Rate};

fn search_request(body: serde_json::Value) -> Request<Body> {
    Request::post("/api/v1/ares/search/")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", "198.51.100.9")
        .body(Body::from(serde_json::to_vec(&body).expect("body")))
        .expect("request")
}

#[tokio::test]
async fn search_route_returns_entities() {
    let router = ares_router(build_service(Arc::new(FakeAres::new())));

    let response = router
        .oneshot(search_request(json!({ "businessName": "Alza" })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["totalCount"], 1);
    assert_eq!(body["economicSubjects"][0]["icoId"], "27082440");
    assert_eq!(
        body["economicSubjects"][0]["records"][0]["businessName"],
        "Alza.cz a.s."
    );
}

#[tokio::test]
async fn search_route_reports_field_errors() {
    let router = ares_router(build_service(Arc::new(FakeAres::new())));

    let response = router
        .oneshot(search_request(json!({ "count": 500, "start": -2 })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(
        body["count"][0],
        "Ensure this value is less than or equal to 100."
    );
    assert_eq!(
        body["start"][0],
        "Ensure this value is greater than or equal to 0."
    );
}

#[tokio::test]
async fn mistyped_body_field_is_a_field_error() {
    let gateway = Arc::new(FakeAres::new());
    let router = ares_router(build_service(gateway.clone()));

    let response = router
        .oneshot(search_request(json!({ "businessName": "Alza", "count": "ten" })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(
        body["count"][0],
        "invalid type: string \"ten\", expected i64"
    );
    assert!(gateway.search_calls().is_empty());
}

#[tokio::test]
async fn malformed_json_belongs_to_the_body() {
    let router = ares_router(build_service(Arc::new(FakeAres::new())));
    let request = Request::post("/api/v1/ares/search/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"businessName\":"))
        .expect("request");

    let response = router.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert!(body["non_field_errors"][0].is_string(), "{body}");
}

#[tokio::test]
async fn subject_route_maps_upstream_status() {
    let gateway = Arc::new(FakeAres::failing(
        AresApiError::from_status(404).expect("404 is an error"),
    ));
    let router = ares_router(build_service(gateway));

    let response = router
        .oneshot(
            Request::get("/api/v1/ares/subjects/27082440/")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(
        body,
        json!({ "error": "Economic subject not found", "service": "ares" })
    );
}

#[tokio::test]
async fn subject_route_answers_bad_gateway_when_unreachable() {
    let router = ares_router(build_service(Arc::new(FakeAres::failing(
        AresApiError::Connect,
    ))));

    let response = router
        .oneshot(
            Request::get("/api/v1/ares/subjects/27082440/")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "Unable to connect to ARES service");
}

#[tokio::test]
async fn subject_route_rejects_invalid_ico() {
    let router = ares_router(build_service(Arc::new(FakeAres::new())));

    let response = router
        .oneshot(
            Request::get("/api/v1/ares/subjects/abc/")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "Invalid ICO format. ICO must be 8 digits.");
}

#[tokio::test]
async fn per_client_throttle_answers_retry_after() {
    let one_per_minute = || {
        ClientThrottle::new(
            "test",
            Rate {
                requests: 1,
                period: Duration::from_secs(60),
            },
        )
    };
    let router = ares_router_with_throttles(
        build_service(Arc::new(FakeAres::new())),
        one_per_minute(),
        one_per_minute(),
    );

    let first = router
        .clone()
        .oneshot(search_request(json!({ "businessName": "Alza" })))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::OK);

    let second = router
        .oneshot(search_request(json!({ "businessName": "Alza" })))
        .await
        .expect("response");
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after = second
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
        .expect("retry-after header");
    assert!((1..=60).contains(&retry_after));
    let body = read_json_body(second).await;
    assert!(body["detail"]
        .as_str()
        .is_some_and(|detail| detail.starts_with("Request was throttled.")));
}

#[tokio::test]
async fn region_tables_are_served() {
    let router = ares_router(build_service(Arc::new(FakeAres::new())));

    let response = router
        .clone()
        .oneshot(
            Request::get("/api/v1/ares/regions/")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(14));
    assert_eq!(body[0], json!({ "code": 19, "name": "Hlavní město Praha" }));

    let response = router
        .clone()
        .oneshot(
            Request::get("/api/v1/ares/regions/51/districts/")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let body = read_json_body(response).await;
    assert_eq!(body["region"]["name"], "Karlovarský");
    assert_eq!(body["districts"].as_array().map(Vec::len), Some(3));

    let response = router
        .oneshot(
            Request::get("/api/v1/ares/regions/999/districts/")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
