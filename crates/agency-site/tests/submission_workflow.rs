//! End-to-end scenarios for the form endpoints backed by a real SQLite store.
//!
//! Requests go through the public router so validation, persistence, and response shapes are
//! exercised together.

use std::sync::Arc;

use agency_site::submissions::{
    submission_router, ListingAccess, SqliteStore, SubmissionRepository, SubmissionService,
};
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

fn site_router() -> (Router, Arc<SqliteStore>) {
    let store = Arc::new(SqliteStore::in_memory().expect("store opens"));
    let service = Arc::new(SubmissionService::new(Arc::clone(&store)));
    (submission_router(service, ListingAccess::Open), store)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("route executes");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

fn post(uri: &str, payload: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

#[tokio::test]
async fn jane_doe_contact_is_stored_and_listed() {
    let (router, _) = site_router();

    let (status, body) = send(
        &router,
        post(
            "/api/contact",
            json!({
                "firstName": "Jane",
                "lastName": "Doe",
                "email": "jane@x.com",
                "phone": "7135550100",
                "businessType": "restaurant",
                "message": ""
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let id = body["id"].as_str().expect("id returned").to_string();
    assert!(uuid::Uuid::parse_str(&id).is_ok(), "id should be a uuid");

    let (status, listing) = send(&router, get("/api/contact-submissions")).await;
    assert_eq!(status, StatusCode::OK);
    let records = listing.as_array().expect("array");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], json!(id));
    assert_eq!(records[0]["firstName"], "Jane");
    assert_eq!(records[0]["message"], "");
    assert!(records[0]["submittedAt"].is_string());
}

#[tokio::test]
async fn empty_first_name_is_rejected_without_a_row() {
    let (router, store) = site_router();

    let (status, body) = send(
        &router,
        post(
            "/api/contact",
            json!({
                "firstName": "",
                "lastName": "Doe",
                "email": "jane@x.com",
                "phone": "7135550100",
                "businessType": "restaurant"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert!(body["details"]
        .as_str()
        .expect("details string")
        .contains("firstName"));
    assert!(store
        .list_contact_submissions()
        .expect("listing works")
        .is_empty());
}

#[tokio::test]
async fn each_missing_contact_field_is_a_client_error() {
    let (router, store) = site_router();
    let complete = json!({
        "firstName": "Jane",
        "lastName": "Doe",
        "email": "jane@x.com",
        "phone": "7135550100",
        "businessType": "restaurant"
    });

    for field in ["firstName", "lastName", "email", "phone", "businessType"] {
        let mut payload = complete.clone();
        payload.as_object_mut().expect("object").remove(field);
        let (status, _) = send(&router, post("/api/contact", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "missing {field}");
    }

    assert!(store.list_contact_submissions().expect("listing").is_empty());
}

#[tokio::test]
async fn lead_magnet_fields_round_trip_for_every_known_type() {
    let (router, _) = site_router();
    let mut submitted = Vec::new();

    for (index, kind) in ["audit", "guide", "checklist", "calendar", "calculator"]
        .iter()
        .enumerate()
    {
        let payload = json!({
            "firstName": format!("Owner{index}"),
            "lastName": "Nguyen",
            "email": format!("owner{index}@example.com"),
            "phone": if index % 2 == 0 { Value::Null } else { json!("2815550199") },
            "businessType": "retail",
            "leadMagnetType": kind,
            "additionalInfo": format!("answer {index}")
        });
        let (status, body) = send(&router, post("/api/lead-magnet", payload.clone())).await;
        assert_eq!(status, StatusCode::OK);
        submitted.push((body["id"].as_str().expect("id").to_string(), payload));
    }

    let (_, listing) = send(&router, get("/api/lead-magnet-submissions")).await;
    let records = listing.as_array().expect("array");
    assert_eq!(records.len(), submitted.len());

    for (id, payload) in submitted {
        let record = records
            .iter()
            .find(|record| record["id"] == json!(id))
            .expect("record listed");
        for field in [
            "firstName",
            "lastName",
            "email",
            "phone",
            "businessType",
            "leadMagnetType",
            "additionalInfo",
        ] {
            assert_eq!(record[field], payload[field], "{field} differs");
        }
    }
}

#[tokio::test]
async fn listing_counts_grow_with_successful_creations() {
    let (router, _) = site_router();
    let valid = json!({
        "firstName": "Sam",
        "lastName": "Ortiz",
        "email": "sam@ortizlaw.com",
        "phone": "7135550142",
        "businessType": "professional service",
        "message": "Need help with reviews"
    });

    for expected in 1..=3 {
        let (status, _) = send(&router, post("/api/contact", valid.clone())).await;
        assert_eq!(status, StatusCode::OK);
        let (_, _) = send(&router, post("/api/contact", json!({ "firstName": "Sam" }))).await;

        let (_, listing) = send(&router, get("/api/contact-submissions")).await;
        assert_eq!(listing.as_array().expect("array").len(), expected);
    }
}
