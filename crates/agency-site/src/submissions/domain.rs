use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schema::{FieldValues, SchemaRecord, TableSpec, CONTACT_SUBMISSIONS, LEAD_MAGNET_SUBMISSIONS};

/// Server-generated identifier shared by submissions and users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub Uuid);

impl RecordId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated body of a contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmissionInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub business_type: String,
    pub message: Option<String>,
}

impl SchemaRecord for ContactSubmissionInput {
    const TABLE: TableSpec = CONTACT_SUBMISSIONS;

    fn from_fields(mut values: FieldValues) -> Self {
        Self {
            first_name: values.take_required("firstName"),
            last_name: values.take_required("lastName"),
            email: values.take_required("email"),
            phone: values.take_required("phone"),
            business_type: values.take_required("businessType"),
            message: values.take_optional("message"),
        }
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "firstName" => Some(&self.first_name),
            "lastName" => Some(&self.last_name),
            "email" => Some(&self.email),
            "phone" => Some(&self.phone),
            "businessType" => Some(&self.business_type),
            "message" => self.message.as_deref(),
            _ => None,
        }
    }
}

/// Stored contact request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: RecordId,
    #[serde(flatten)]
    pub details: ContactSubmissionInput,
    pub submitted_at: DateTime<Utc>,
}

/// Validated body of a lead-magnet request form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadMagnetSubmissionInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub business_type: String,
    pub lead_magnet_type: String,
    pub additional_info: Option<String>,
}

impl LeadMagnetSubmissionInput {
    pub fn kind(&self) -> Option<LeadMagnetKind> {
        LeadMagnetKind::from_label(&self.lead_magnet_type)
    }
}

impl SchemaRecord for LeadMagnetSubmissionInput {
    const TABLE: TableSpec = LEAD_MAGNET_SUBMISSIONS;

    fn from_fields(mut values: FieldValues) -> Self {
        Self {
            first_name: values.take_required("firstName"),
            last_name: values.take_required("lastName"),
            email: values.take_required("email"),
            phone: values.take_optional("phone"),
            business_type: values.take_required("businessType"),
            lead_magnet_type: values.take_required("leadMagnetType"),
            additional_info: values.take_optional("additionalInfo"),
        }
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "firstName" => Some(&self.first_name),
            "lastName" => Some(&self.last_name),
            "email" => Some(&self.email),
            "phone" => self.phone.as_deref(),
            "businessType" => Some(&self.business_type),
            "leadMagnetType" => Some(&self.lead_magnet_type),
            "additionalInfo" => self.additional_info.as_deref(),
            _ => None,
        }
    }
}

/// Stored lead-magnet request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadMagnetSubmission {
    pub id: RecordId,
    #[serde(flatten)]
    pub details: LeadMagnetSubmissionInput,
    pub submitted_at: DateTime<Utc>,
}

/// Downloadable resources offered on the site. Unknown values are still accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadMagnetKind {
    Audit,
    Guide,
    Checklist,
    Calendar,
    Calculator,
}

impl LeadMagnetKind {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Audit,
            Self::Guide,
            Self::Checklist,
            Self::Calendar,
            Self::Calculator,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Audit => "audit",
            Self::Guide => "guide",
            Self::Checklist => "checklist",
            Self::Calendar => "calendar",
            Self::Calculator => "calculator",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ordered()
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(value))
    }
}

/// Account row kept in the schema; no endpoint reads or writes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}
