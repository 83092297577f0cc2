use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::Request,
};
use backend::{create_router, incidents::IncidentStore, upstream::DirectionsClient, AppState};
use hyper::StatusCode;
use shared::{ApiError, HeatPoint, IncidentKind, IncidentRecord, RoutePayload};
use tower::ServiceExt;

const SAMPLE_INCIDENTS: &str = r#"[
    {"lat": 36.10, "lon": -80.24, "type": "crime",
     "label": "Robbery reported", "timestamp": "2026-07-01 21:00", "severity": 7},
    {"lat": 36.11, "lon": -80.25, "type": "crime",
     "label": "Vehicle break-in", "timestamp": "2026-07-02 03:30", "severity": 4},
    {"lat": 36.12, "lon": -80.26, "type": "hazard",
     "label": "Broken streetlight", "timestamp": "2026-07-03 23:10", "severity": 2}
]"#;

fn test_app() -> axum::Router {
    let incidents = IncidentStore::from_reader(SAMPLE_INCIDENTS.as_bytes()).expect("incidents");
    let state = AppState {
        incidents: Arc::new(incidents),
        // The endpoints under test never reach the upstreams.
        directions: Arc::new(DirectionsClient::new(
            "http://127.0.0.1:9".to_string(),
            "http://127.0.0.1:9".to_string(),
            String::new(),
        )),
    };
    create_router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn incidents_endpoint_serves_the_whole_store() {
    let response = test_app().oneshot(get("/incidents")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let records: Vec<IncidentRecord> = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].label, "Robbery reported");
    assert_eq!(records[0].kind, IncidentKind::Crime);
    assert_eq!(records[2].kind, IncidentKind::Hazard);

    // The category round-trips as the `type` wire field.
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json[0]["type"], "crime");
    assert_eq!(json[2]["type"], "hazard");
}

#[tokio::test]
async fn safety_data_serves_crime_heat_points_only() {
    let response = test_app().oneshot(get("/safety-data")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let points: Vec<HeatPoint> = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].severity, 7.0);
    assert_eq!(points[1].severity, 4.0);
}

#[tokio::test]
async fn route_rejects_blank_locations_before_any_upstream_call() {
    for uri in ["/route", "/route?start=Library", "/route?start=Library&end=%20"] {
        let response = test_app().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri: {uri}");

        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        let body: ApiError = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "Please provide both start and end locations");
    }
}

#[tokio::test]
async fn route_payload_discriminates_error_and_success_bodies() {
    let response = test_app().oneshot(get("/route")).await.unwrap();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let payload: RoutePayload = serde_json::from_slice(&bytes).unwrap();
    assert!(matches!(payload, RoutePayload::Failure(_)));

    let success = r#"{
        "coordinates": [[36.0, -80.2], [36.01, -80.21]],
        "segment_scores": [2.0],
        "safety_score": 2.0,
        "distance": 1200.0,
        "duration": 90.0
    }"#;
    let payload: RoutePayload = serde_json::from_str(success).unwrap();
    match payload {
        RoutePayload::Route(route) => {
            assert_eq!(route.coordinates.len(), 2);
            assert_eq!(route.coordinates[0].lat, 36.0);
            assert_eq!(route.coordinates[0].lon, -80.2);
            assert_eq!(route.segment_scores, vec![2.0]);
            assert_eq!(route.distance, Some(1200.0));
        }
        RoutePayload::Failure(failure) => panic!("expected a route, got {failure:?}"),
    }
}

#[tokio::test]
async fn route_payload_tolerates_missing_optional_fields() {
    let minimal = r#"{"coordinates": [[36.0, -80.2], [36.01, -80.21]], "safety_score": 5.0}"#;
    let payload: RoutePayload = serde_json::from_str(minimal).unwrap();

    match payload {
        RoutePayload::Route(route) => {
            assert!(route.segment_scores.is_empty());
            assert_eq!(route.distance, None);
            assert_eq!(route.duration, None);
        }
        RoutePayload::Failure(failure) => panic!("expected a route, got {failure:?}"),
    }
}
