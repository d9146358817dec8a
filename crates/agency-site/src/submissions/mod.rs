//! Contact and lead-magnet form intake: schema, validation, storage, and HTTP routes.

pub mod domain;
pub mod repository;
pub mod router;
pub mod schema;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    ContactSubmission, ContactSubmissionInput, LeadMagnetKind, LeadMagnetSubmission,
    LeadMagnetSubmissionInput, NewUser, RecordId, User,
};
pub use repository::{RepositoryError, SubmissionRepository, UserRepository};
pub use router::{submission_router, ListingAccess};
pub use service::{SubmissionService, SubmissionServiceError};
pub use store::{DatabaseLocation, SqliteStore};
pub use validation::{
    validate_contact_submission, validate_lead_magnet_submission, ValidationError,
    ValidationIssue,
};
