//! SQLite-backed persistence for submissions and users.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::{Type, Value as SqlValue};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tracing::info;
use uuid::Uuid;

use super::domain::{
    ContactSubmission, ContactSubmissionInput, LeadMagnetSubmission, LeadMagnetSubmissionInput,
    NewUser, RecordId, User,
};
use super::repository::{RepositoryError, SubmissionRepository, UserRepository};
use super::schema::{
    FieldValues, SchemaRecord, CONTACT_SUBMISSIONS, LEAD_MAGNET_SUBMISSIONS, USERS_TABLE_SQL,
};
use crate::config::DatabaseConfig;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the database lives, parsed from `DATABASE_URL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    Memory,
    File(PathBuf),
}

impl DatabaseLocation {
    /// Accepts `sqlite://path`, `sqlite:path`, `sqlite::memory:`, `:memory:` or a bare path.
    pub fn parse(url: &str) -> Result<Self, RepositoryError> {
        let url = url.trim();
        let rest = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);

        if rest.is_empty() {
            return Err(RepositoryError::Unavailable(
                "database url does not name a database".to_string(),
            ));
        }
        if rest.contains("://") {
            return Err(RepositoryError::Unavailable(format!(
                "unsupported database url '{url}'"
            )));
        }
        if rest == ":memory:" {
            return Ok(Self::Memory);
        }

        Ok(Self::File(PathBuf::from(rest)))
    }
}

/// Pooled SQLite store. Cloning shares the pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteStore {
    /// Opens the pool and creates missing tables. Any failure here is fatal for the service.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, RepositoryError> {
        let location = DatabaseLocation::parse(&config.url)?;
        Self::open(&location, config.pool_size)
    }

    /// Private in-memory database, mostly for tests and demos.
    pub fn in_memory() -> Result<Self, RepositoryError> {
        Self::open(&DatabaseLocation::Memory, 1)
    }

    fn open(location: &DatabaseLocation, pool_size: u32) -> Result<Self, RepositoryError> {
        let builder = Pool::builder().connection_timeout(CHECKOUT_TIMEOUT);

        // Every in-memory connection is its own database, so that pool holds exactly one
        // connection and never recycles it.
        let (manager, builder) = match location {
            DatabaseLocation::Memory => (
                SqliteConnectionManager::memory().with_init(|conn| migrate(conn)),
                builder.max_size(1).idle_timeout(None).max_lifetime(None),
            ),
            DatabaseLocation::File(path) => (
                SqliteConnectionManager::file(path).with_init(|conn| {
                    conn.busy_timeout(BUSY_TIMEOUT)?;
                    conn.query_row("PRAGMA journal_mode = WAL", [], |row| {
                        row.get::<_, String>(0)
                    })?;
                    migrate(conn)
                }),
                builder.max_size(pool_size.max(1)),
            ),
        };

        let pool = builder
            .build(manager)
            .map_err(|err| RepositoryError::Unavailable(format!("failed to open pool: {err}")))?;

        info!(?location, "submission store ready");
        Ok(Self { pool })
    }

    fn with_connection<T>(
        &self,
        op: impl FnOnce(&mut Connection) -> rusqlite::Result<T>,
    ) -> Result<T, RepositoryError> {
        let mut conn = self.pool.get().map_err(|err| {
            RepositoryError::Unavailable(format!("failed to get connection: {err}"))
        })?;
        op(&mut conn).map_err(map_sqlite_error)
    }
}

fn migrate(conn: &mut Connection) -> rusqlite::Result<()> {
    let ddl = [
        USERS_TABLE_SQL.to_string(),
        CONTACT_SUBMISSIONS.create_table_sql(),
        LEAD_MAGNET_SUBMISSIONS.create_table_sql(),
    ];
    conn.execute_batch(&format!("{};", ddl.join(";\n")))
}

fn map_sqlite_error(err: rusqlite::Error) -> RepositoryError {
    match err.sqlite_error_code() {
        Some(rusqlite::ErrorCode::ConstraintViolation) => RepositoryError::Conflict,
        _ => RepositoryError::Unavailable(err.to_string()),
    }
}

fn insert_record<T: SchemaRecord>(
    conn: &Connection,
    input: &T,
) -> rusqlite::Result<(RecordId, DateTime<Utc>)> {
    let id = RecordId::generate();
    let submitted_at = Utc::now().trunc_subsecs(6);

    let mut values = Vec::with_capacity(T::TABLE.fields.len() + 2);
    values.push(SqlValue::Text(id.to_string()));
    values.extend(T::TABLE.fields.iter().map(|field| match input.field(field.name) {
        Some(value) => SqlValue::Text(value.to_string()),
        None => SqlValue::Null,
    }));
    values.push(SqlValue::Text(
        submitted_at.to_rfc3339_opts(SecondsFormat::Micros, true),
    ));

    conn.execute(&T::TABLE.insert_sql(), params_from_iter(values))?;
    Ok((id, submitted_at))
}

fn load_records<T: SchemaRecord>(
    conn: &Connection,
) -> rusqlite::Result<Vec<(RecordId, T, DateTime<Utc>)>> {
    let mut statement = conn.prepare(&T::TABLE.select_sql())?;
    let records = statement
        .query_map([], read_record::<T>)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
}

fn read_record<T: SchemaRecord>(row: &Row<'_>) -> rusqlite::Result<(RecordId, T, DateTime<Utc>)> {
    let id = read_id(row, 0)?;

    let mut values = FieldValues::default();
    for (offset, field) in T::TABLE.fields.iter().enumerate() {
        if let Some(value) = row.get::<_, Option<String>>(offset + 1)? {
            values.insert(field.name, value);
        }
    }

    let timestamp_index = T::TABLE.fields.len() + 1;
    let raw: String = row.get(timestamp_index)?;
    let submitted_at = DateTime::parse_from_rfc3339(&raw)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(timestamp_index, Type::Text, Box::new(err))
        })?;

    Ok((id, T::from_fields(values), submitted_at))
}

fn read_id(row: &Row<'_>, index: usize) -> rusqlite::Result<RecordId> {
    let raw: String = row.get(index)?;
    Uuid::parse_str(&raw)
        .map(RecordId)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err)))
}

fn read_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: read_id(row, 0)?,
        username: row.get(1)?,
        password: row.get(2)?,
    })
}

impl SubmissionRepository for SqliteStore {
    fn create_contact_submission(
        &self,
        input: ContactSubmissionInput,
    ) -> Result<ContactSubmission, RepositoryError> {
        let (id, submitted_at) = self.with_connection(|conn| insert_record(conn, &input))?;
        Ok(ContactSubmission {
            id,
            details: input,
            submitted_at,
        })
    }

    fn list_contact_submissions(&self) -> Result<Vec<ContactSubmission>, RepositoryError> {
        let rows = self.with_connection(|conn| load_records::<ContactSubmissionInput>(conn))?;
        Ok(rows
            .into_iter()
            .map(|(id, details, submitted_at)| ContactSubmission {
                id,
                details,
                submitted_at,
            })
            .collect())
    }

    fn create_lead_magnet_submission(
        &self,
        input: LeadMagnetSubmissionInput,
    ) -> Result<LeadMagnetSubmission, RepositoryError> {
        let (id, submitted_at) = self.with_connection(|conn| insert_record(conn, &input))?;
        Ok(LeadMagnetSubmission {
            id,
            details: input,
            submitted_at,
        })
    }

    fn list_lead_magnet_submissions(&self) -> Result<Vec<LeadMagnetSubmission>, RepositoryError> {
        let rows = self.with_connection(|conn| load_records::<LeadMagnetSubmissionInput>(conn))?;
        Ok(rows
            .into_iter()
            .map(|(id, details, submitted_at)| LeadMagnetSubmission {
                id,
                details,
                submitted_at,
            })
            .collect())
    }
}

impl UserRepository for SqliteStore {
    fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let id = RecordId::generate();
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, password) VALUES (?1, ?2, ?3)",
                params![id.to_string(), user.username, user.password],
            )
        })?;

        Ok(User {
            id,
            username: user.username,
            password: user.password,
        })
    }

    fn user(&self, id: &RecordId) -> Result<Option<User>, RepositoryError> {
        self.with_connection(|conn| {
            conn.query_row(
                "SELECT id, username, password FROM users WHERE id = ?1",
                params![id.to_string()],
                read_user,
            )
            .optional()
        })
    }

    fn user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        self.with_connection(|conn| {
            conn.query_row(
                "SELECT id, username, password FROM users WHERE username = ?1",
                params![username],
                read_user,
            )
            .optional()
        })
    }
}
