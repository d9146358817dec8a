use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use subtle::ConstantTimeEq;
use tracing::{debug, error, warn};

use super::repository::SubmissionRepository;
use super::service::{SubmissionService, SubmissionServiceError};

/// Who may read the stored submissions back over HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingAccess {
    /// Listing routes are not mounted.
    Disabled,
    /// Anyone who knows the URL can list every submission.
    Open,
    /// `Authorization: Bearer <token>` required.
    Bearer(String),
}

impl ListingAccess {
    fn permits(&self, headers: &HeaderMap) -> bool {
        match self {
            ListingAccess::Disabled => false,
            ListingAccess::Open => true,
            ListingAccess::Bearer(expected) => headers
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(bearer_token)
                .is_some_and(|token| bool::from(token.as_bytes().ct_eq(expected.as_bytes()))),
        }
    }
}

/// Token from an `Authorization` value; the scheme name matches case-insensitively.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

pub(crate) struct SubmissionRoutes<R> {
    pub(crate) service: Arc<SubmissionService<R>>,
    pub(crate) access: ListingAccess,
}

impl<R> Clone for SubmissionRoutes<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            access: self.access.clone(),
        }
    }
}

/// Router builder exposing the form endpoints and, when permitted, the listings.
pub fn submission_router<R>(service: Arc<SubmissionService<R>>, access: ListingAccess) -> Router
where
    R: SubmissionRepository + 'static,
{
    let mut router = Router::new()
        .route("/api/contact", post(contact_handler::<R>))
        .route("/api/lead-magnet", post(lead_magnet_handler::<R>));

    if access != ListingAccess::Disabled {
        router = router
            .route(
                "/api/contact-submissions",
                get(contact_listing_handler::<R>),
            )
            .route(
                "/api/lead-magnet-submissions",
                get(lead_magnet_listing_handler::<R>),
            );
    }

    router.with_state(SubmissionRoutes { service, access })
}

pub(crate) async fn contact_handler<R>(
    State(routes): State<SubmissionRoutes<R>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return malformed_body(rejection),
    };

    match routes.service.submit_contact(&payload).await {
        Ok(record) => submitted(record.id.to_string()),
        Err(err) => submission_failed(err, "Failed to submit contact form"),
    }
}

pub(crate) async fn lead_magnet_handler<R>(
    State(routes): State<SubmissionRoutes<R>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return malformed_body(rejection),
    };

    match routes.service.submit_lead_magnet(&payload).await {
        Ok(record) => submitted(record.id.to_string()),
        Err(err) => submission_failed(err, "Failed to submit lead magnet form"),
    }
}

pub(crate) async fn contact_listing_handler<R>(
    State(routes): State<SubmissionRoutes<R>>,
    headers: HeaderMap,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    if !routes.access.permits(&headers) {
        return unauthorized();
    }

    match routes.service.contact_submissions().await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(err) => {
            error!(error = %err, "failed to list contact submissions");
            let payload = json!({ "error": "Failed to fetch contact submissions" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn lead_magnet_listing_handler<R>(
    State(routes): State<SubmissionRoutes<R>>,
    headers: HeaderMap,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    if !routes.access.permits(&headers) {
        return unauthorized();
    }

    match routes.service.lead_magnet_submissions().await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(err) => {
            error!(error = %err, "failed to list lead magnet submissions");
            let payload = json!({ "error": "Failed to fetch lead magnet submissions" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

fn submitted(id: String) -> Response {
    (StatusCode::OK, Json(json!({ "success": true, "id": id }))).into_response()
}

fn submission_failed(err: SubmissionServiceError, failure_message: &str) -> Response {
    match err {
        SubmissionServiceError::Validation(error) => {
            debug!(details = %error, "submission rejected");
            let payload = json!({
                "error": "Validation failed",
                "details": error.message(),
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        SubmissionServiceError::Repository(error) => {
            error!(error = %error, "{failure_message}");
            let payload = json!({ "error": failure_message });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

fn malformed_body(rejection: JsonRejection) -> Response {
    debug!(details = %rejection.body_text(), "submission body could not be parsed");
    let payload = json!({
        "error": "Validation failed",
        "details": rejection.body_text(),
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

fn unauthorized() -> Response {
    warn!("listing request without valid admin token");
    let payload = json!({ "error": "Unauthorized" });
    (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
}
