use super::domain::{
    ContactSubmission, ContactSubmissionInput, LeadMagnetSubmission, LeadMagnetSubmissionInput,
    NewUser, RecordId, User,
};

/// Append-only storage for both submission kinds.
///
/// Implementations assign `id` and `submitted_at` and return the stored record.
pub trait SubmissionRepository: Send + Sync {
    fn create_contact_submission(
        &self,
        input: ContactSubmissionInput,
    ) -> Result<ContactSubmission, RepositoryError>;
    fn list_contact_submissions(&self) -> Result<Vec<ContactSubmission>, RepositoryError>;
    fn create_lead_magnet_submission(
        &self,
        input: LeadMagnetSubmissionInput,
    ) -> Result<LeadMagnetSubmission, RepositoryError>;
    fn list_lead_magnet_submissions(&self) -> Result<Vec<LeadMagnetSubmission>, RepositoryError>;
}

/// Account storage. Present in the schema, unused by the HTTP surface.
pub trait UserRepository: Send + Sync {
    fn create_user(&self, user: NewUser) -> Result<User, RepositoryError>;
    fn user(&self, id: &RecordId) -> Result<Option<User>, RepositoryError>;
    fn user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
