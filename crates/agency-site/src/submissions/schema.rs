//! Field lists shared by the validators and the SQLite table definitions.
//!
//! Each submission kind is described once by a [`TableSpec`]. The request validator walks the
//! same list the store uses to build `CREATE TABLE`, `INSERT` and `SELECT` statements, so adding
//! or renaming a field touches exactly one place.

use std::collections::BTreeMap;

/// Whether a field must be present and non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// One user-supplied text field: its JSON key and its storage column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub column: &'static str,
    pub presence: Presence,
}

impl FieldSpec {
    const fn required(name: &'static str, column: &'static str) -> Self {
        Self {
            name,
            column,
            presence: Presence::Required,
        }
    }

    const fn optional(name: &'static str, column: &'static str) -> Self {
        Self {
            name,
            column,
            presence: Presence::Optional,
        }
    }

    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }
}

/// A submission table: server-generated `id`, the user fields, and `submitted_at`.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub table: &'static str,
    pub fields: &'static [FieldSpec],
}

pub const ID_COLUMN: &str = "id";
pub const SUBMITTED_AT_COLUMN: &str = "submitted_at";

pub const CONTACT_SUBMISSIONS: TableSpec = TableSpec {
    table: "contact_submissions",
    fields: &[
        FieldSpec::required("firstName", "first_name"),
        FieldSpec::required("lastName", "last_name"),
        FieldSpec::required("email", "email"),
        FieldSpec::required("phone", "phone"),
        FieldSpec::required("businessType", "business_type"),
        FieldSpec::optional("message", "message"),
    ],
};

pub const LEAD_MAGNET_SUBMISSIONS: TableSpec = TableSpec {
    table: "lead_magnet_submissions",
    fields: &[
        FieldSpec::required("firstName", "first_name"),
        FieldSpec::required("lastName", "last_name"),
        FieldSpec::required("email", "email"),
        FieldSpec::optional("phone", "phone"),
        FieldSpec::required("businessType", "business_type"),
        FieldSpec::required("leadMagnetType", "lead_magnet_type"),
        FieldSpec::optional("additionalInfo", "additional_info"),
    ],
};

pub const USERS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY NOT NULL,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL
)";

impl TableSpec {
    pub fn create_table_sql(&self) -> String {
        let mut columns = vec![format!("{ID_COLUMN} TEXT PRIMARY KEY NOT NULL")];
        columns.extend(self.fields.iter().map(|field| match field.presence {
            Presence::Required => format!("{} TEXT NOT NULL", field.column),
            Presence::Optional => format!("{} TEXT", field.column),
        }));
        columns.push(format!("{SUBMITTED_AT_COLUMN} TEXT NOT NULL"));

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            self.table,
            columns.join(",\n    ")
        )
    }

    /// Column order: `id`, every field in declaration order, `submitted_at`.
    pub fn insert_sql(&self) -> String {
        let columns = self.column_names();
        let placeholders = (1..=columns.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders
        )
    }

    /// Same column order as [`TableSpec::insert_sql`].
    pub fn select_sql(&self) -> String {
        format!("SELECT {} FROM {}", self.column_names().join(", "), self.table)
    }

    fn column_names(&self) -> Vec<&'static str> {
        let mut columns = Vec::with_capacity(self.fields.len() + 2);
        columns.push(ID_COLUMN);
        columns.extend(self.fields.iter().map(|field| field.column));
        columns.push(SUBMITTED_AT_COLUMN);
        columns
    }
}

/// Field values keyed by JSON name. Absent optional fields have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues(BTreeMap<&'static str, String>);

impl FieldValues {
    pub fn insert(&mut self, name: &'static str, value: String) {
        self.0.insert(name, value);
    }

    /// Required fields are guaranteed present once the values passed validation or came
    /// from a `NOT NULL` column; an empty string is returned otherwise.
    pub fn take_required(&mut self, name: &str) -> String {
        self.0.remove(name).unwrap_or_default()
    }

    pub fn take_optional(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }
}

/// Typed submission bodies that can be built from, and read back as, a field list.
pub trait SchemaRecord: Sized {
    const TABLE: TableSpec;

    fn from_fields(values: FieldValues) -> Self;

    fn field(&self, name: &str) -> Option<&str>;
}
