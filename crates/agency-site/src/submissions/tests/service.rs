use super::common::*;
use serde_json::json;
use std::collections::HashSet;

use crate::submissions::{RepositoryError, SubmissionServiceError};

#[tokio::test]
async fn submit_contact_assigns_fresh_ids() {
    let (service, repository) = build_service();

    let mut ids = HashSet::new();
    for _ in 0..5 {
        let record = service
            .submit_contact(&contact_payload())
            .await
            .expect("submission succeeds");
        assert!(ids.insert(record.id), "id reused");
    }

    assert_eq!(repository.contact_count(), 5);
}

#[tokio::test]
async fn double_submission_creates_two_rows() {
    let (service, repository) = build_service();

    let first = service
        .submit_contact(&contact_payload())
        .await
        .expect("first submission");
    let second = service
        .submit_contact(&contact_payload())
        .await
        .expect("second submission");

    assert_ne!(first.id, second.id);
    assert_eq!(first.details, second.details);
    assert_eq!(repository.contact_count(), 2);
}

#[tokio::test]
async fn validation_errors_skip_the_repository() {
    let (service, repository) = build_service();

    let err = service
        .submit_lead_magnet(&json!({ "firstName": "Marcus" }))
        .await
        .expect_err("validation fails");

    assert!(matches!(err, SubmissionServiceError::Validation(_)));
    assert_eq!(repository.lead_magnet_count(), 0);
}

#[tokio::test]
async fn repository_errors_propagate_unchanged() {
    let service = crate::submissions::SubmissionService::new(std::sync::Arc::new(
        UnavailableRepository,
    ));

    let err = service
        .submit_contact(&contact_payload())
        .await
        .expect_err("store unavailable");

    assert!(matches!(
        err,
        SubmissionServiceError::Repository(RepositoryError::Unavailable(_))
    ));
}

#[tokio::test]
async fn lead_magnet_fields_round_trip_through_the_service() {
    let (service, _) = build_service();

    let record = service
        .submit_lead_magnet(&lead_magnet_payload())
        .await
        .expect("submission succeeds");
    let listed = service
        .lead_magnet_submissions()
        .await
        .expect("listing succeeds");

    assert_eq!(listed, vec![record.clone()]);
    assert_eq!(record.details.first_name, "Marcus");
    assert_eq!(record.details.phone.as_deref(), Some("8325550123"));
}
