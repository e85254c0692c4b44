//! SQLite persistence.
//!
//! A single connection guarded by a mutex. Every operation that moves a
//! default or active flag runs inside one transaction (clear, then set), and
//! partial unique indexes reject a second flagged row outright.

mod directory;
mod legal_documents;
mod templates;

use log::info;
use rusqlite::{Connection, ErrorCode};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

pub use legal_documents::{Activation, NewLegalDocumentVersion};
pub use templates::TemplateWrite;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("stored JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stored value is invalid: {0}")]
    InvalidValue(String),
    #[error("version label '{0}' is already published for this document type")]
    DuplicateLabel(String),
    #[error("database lock poisoned")]
    Lock,
}

impl DbError {
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DbError::Sqlite(rusqlite::Error::SqliteFailure(e, _)) => {
                e.code == ErrorCode::ConstraintViolation
                    && (e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                        || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
            }
            _ => false,
        }
    }
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tenants (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    legal_name TEXT,
    street TEXT,
    postal_code TEXT,
    city TEXT,
    email TEXT,
    phone TEXT,
    website TEXT,
    creditor_id TEXT
);

CREATE TABLE IF NOT EXISTS members (
    id TEXT PRIMARY KEY,
    tenant_id TEXT NOT NULL,
    member_number TEXT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT,
    phone TEXT,
    birth_date TEXT,
    street TEXT,
    postal_code TEXT,
    city TEXT,
    last_active_at INTEGER
);

CREATE INDEX IF NOT EXISTS idx_members_tenant_activity
    ON members(tenant_id, last_active_at DESC);

CREATE TABLE IF NOT EXISTS contracts (
    id TEXT PRIMARY KEY,
    tenant_id TEXT NOT NULL,
    member_id TEXT NOT NULL,
    contract_number TEXT,
    tariff_name TEXT NOT NULL,
    monthly_fee_cents INTEGER NOT NULL DEFAULT 0,
    start_date TEXT,
    end_date TEXT,
    minimum_term_months INTEGER,
    notice_period_months INTEGER,
    iban TEXT,
    mandate_reference TEXT
);

CREATE INDEX IF NOT EXISTS idx_contracts_member ON contracts(member_id, start_date DESC);

CREATE TABLE IF NOT EXISTS document_templates (
    id TEXT PRIMARY KEY,
    tenant_id TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    template_type TEXT NOT NULL,
    version INTEGER NOT NULL DEFAULT 1,
    is_default INTEGER NOT NULL DEFAULT 0,
    structured_content TEXT NOT NULL,
    derived_markup TEXT NOT NULL,
    derived_stylesheet TEXT NOT NULL,
    content_hash TEXT NOT NULL,
    placeholder_schema_snapshot TEXT NOT NULL,
    copied_from TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_document_templates_tenant
    ON document_templates(tenant_id, template_type);

CREATE UNIQUE INDEX IF NOT EXISTS idx_document_templates_single_default
    ON document_templates(tenant_id, template_type) WHERE is_default = 1;

CREATE TABLE IF NOT EXISTS legal_document_versions (
    id TEXT PRIMARY KEY,
    tenant_id TEXT NOT NULL,
    document_type TEXT NOT NULL,
    version_label TEXT NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    valid_from TEXT NOT NULL,
    valid_until TEXT,
    active INTEGER NOT NULL DEFAULT 0,
    copied_from TEXT,
    created_at INTEGER NOT NULL,
    UNIQUE (tenant_id, document_type, version_label)
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_legal_document_versions_single_active
    ON legal_document_versions(tenant_id, document_type) WHERE active = 1;
";

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Opens (or creates) the database file and applies the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let conn = Connection::open(path.as_ref())?;
        info!("Opened database at {}", path.as_ref().display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, DbError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, DbError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Creates missing tables and indexes. Safe to run repeatedly.
    pub fn migrate(&self) -> Result<(), DbError> {
        let conn = self.lock()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DbError> {
        self.conn.lock().map_err(|_| DbError::Lock)
    }

    /// Holds the connection until the guard is dropped.
    #[cfg(test)]
    pub fn hold_connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }
}

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
