use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use super::domain::{ContactSubmission, LeadMagnetSubmission};
use super::repository::{RepositoryError, SubmissionRepository};
use super::validation::{
    validate_contact_submission, validate_lead_magnet_submission, ValidationError,
};

/// Service composing validation with the blocking repository.
///
/// Repository calls run on tokio's blocking pool so SQLite I/O never stalls the request
/// workers.
pub struct SubmissionService<R> {
    repository: Arc<R>,
}

impl<R> SubmissionService<R>
where
    R: SubmissionRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Validate and persist a contact form body.
    pub async fn submit_contact(
        &self,
        payload: &Value,
    ) -> Result<ContactSubmission, SubmissionServiceError> {
        let input = validate_contact_submission(payload)?;
        let repository = Arc::clone(&self.repository);
        let record = run_blocking(move || repository.create_contact_submission(input)).await?;
        info!(id = %record.id, business_type = %record.details.business_type, "contact submission stored");
        Ok(record)
    }

    /// Validate and persist a lead-magnet form body.
    pub async fn submit_lead_magnet(
        &self,
        payload: &Value,
    ) -> Result<LeadMagnetSubmission, SubmissionServiceError> {
        let input = validate_lead_magnet_submission(payload)?;
        if input.kind().is_none() {
            debug!(lead_magnet_type = %input.lead_magnet_type, "unrecognized lead magnet type accepted");
        }
        let repository = Arc::clone(&self.repository);
        let record = run_blocking(move || repository.create_lead_magnet_submission(input)).await?;
        info!(id = %record.id, lead_magnet_type = %record.details.lead_magnet_type, "lead magnet submission stored");
        Ok(record)
    }

    pub async fn contact_submissions(&self) -> Result<Vec<ContactSubmission>, RepositoryError> {
        let repository = Arc::clone(&self.repository);
        run_blocking(move || repository.list_contact_submissions()).await
    }

    pub async fn lead_magnet_submissions(
        &self,
    ) -> Result<Vec<LeadMagnetSubmission>, RepositoryError> {
        let repository = Arc::clone(&self.repository);
        run_blocking(move || repository.list_lead_magnet_submissions()).await
    }
}

async fn run_blocking<T, F>(op: F) -> Result<T, RepositoryError>
where
    F: FnOnce() -> Result<T, RepositoryError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|err| RepositoryError::Unavailable(format!("store task failed: {err}")))?
}

/// Error raised by the submission service.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
