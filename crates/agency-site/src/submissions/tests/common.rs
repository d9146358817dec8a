use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::Response;
use chrono::Utc;
use serde_json::{json, Value};

use crate::submissions::domain::{
    ContactSubmission, ContactSubmissionInput, LeadMagnetSubmission, LeadMagnetSubmissionInput,
    RecordId,
};
use crate::submissions::repository::{RepositoryError, SubmissionRepository};
use crate::submissions::{submission_router, ListingAccess, SubmissionService};

pub(super) fn contact_payload() -> Value {
    json!({
        "firstName": "Jane",
        "lastName": "Doe",
        "email": "jane@x.com",
        "phone": "7135550100",
        "businessType": "restaurant",
        "message": ""
    })
}

pub(super) fn lead_magnet_payload() -> Value {
    json!({
        "firstName": "Marcus",
        "lastName": "Lee",
        "email": "marcus@heightsplumbing.com",
        "phone": "8325550123",
        "businessType": "home service",
        "leadMagnetType": "audit",
        "additionalInfo": "https://heightsplumbing.com"
    })
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    contacts: Mutex<Vec<ContactSubmission>>,
    lead_magnets: Mutex<Vec<LeadMagnetSubmission>>,
}

impl MemoryRepository {
    pub(super) fn contact_count(&self) -> usize {
        self.contacts.lock().expect("contacts mutex poisoned").len()
    }

    pub(super) fn lead_magnet_count(&self) -> usize {
        self.lead_magnets
            .lock()
            .expect("lead magnet mutex poisoned")
            .len()
    }
}

impl SubmissionRepository for MemoryRepository {
    fn create_contact_submission(
        &self,
        input: ContactSubmissionInput,
    ) -> Result<ContactSubmission, RepositoryError> {
        let record = ContactSubmission {
            id: RecordId::generate(),
            details: input,
            submitted_at: Utc::now(),
        };
        self.contacts
            .lock()
            .expect("contacts mutex poisoned")
            .push(record.clone());
        Ok(record)
    }

    fn list_contact_submissions(&self) -> Result<Vec<ContactSubmission>, RepositoryError> {
        Ok(self.contacts.lock().expect("contacts mutex poisoned").clone())
    }

    fn create_lead_magnet_submission(
        &self,
        input: LeadMagnetSubmissionInput,
    ) -> Result<LeadMagnetSubmission, RepositoryError> {
        let record = LeadMagnetSubmission {
            id: RecordId::generate(),
            details: input,
            submitted_at: Utc::now(),
        };
        self.lead_magnets
            .lock()
            .expect("lead magnet mutex poisoned")
            .push(record.clone());
        Ok(record)
    }

    fn list_lead_magnet_submissions(&self) -> Result<Vec<LeadMagnetSubmission>, RepositoryError> {
        Ok(self
            .lead_magnets
            .lock()
            .expect("lead magnet mutex poisoned")
            .clone())
    }
}

pub(super) struct UnavailableRepository;

impl SubmissionRepository for UnavailableRepository {
    fn create_contact_submission(
        &self,
        _input: ContactSubmissionInput,
    ) -> Result<ContactSubmission, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    fn list_contact_submissions(&self) -> Result<Vec<ContactSubmission>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    fn create_lead_magnet_submission(
        &self,
        _input: LeadMagnetSubmissionInput,
    ) -> Result<LeadMagnetSubmission, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    fn list_lead_magnet_submissions(&self) -> Result<Vec<LeadMagnetSubmission>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }
}

pub(super) fn build_service() -> (Arc<SubmissionService<MemoryRepository>>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = Arc::new(SubmissionService::new(Arc::clone(&repository)));
    (service, repository)
}

pub(super) fn router_with_access(access: ListingAccess) -> (axum::Router, Arc<MemoryRepository>) {
    let (service, repository) = build_service();
    (submission_router(service, access), repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("valid json body")
}

pub(super) fn assert_validation_failure(status: StatusCode, payload: &Value) {
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["error"], "Validation failed");
    assert!(payload["details"]
        .as_str()
        .unwrap_or_default()
        .starts_with("Validation error"));
}
