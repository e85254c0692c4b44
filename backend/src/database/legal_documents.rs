//! Legal document version store.
//!
//! Rows are append-only: content is never edited and rows are never deleted.
//! Only the `active` flag moves, always as clear-then-set in one transaction.

use super::{now_millis, Database, DbError};
use chrono::NaiveDate;
use common::model::legal::{LegalDocumentType, LegalDocumentVersion};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use uuid::Uuid;

const VERSION_COLUMNS: &str = "id, tenant_id, document_type, version_label, title, content, \
     valid_from, valid_until, active, copied_from, created_at";

/// How a new row relates to the active flag of its pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Take over the active flag.
    Activate,
    /// Become active only if the pair has no active version yet.
    IfNoneActive,
    /// Always land inactive.
    Inactive,
}

#[derive(Debug, Clone)]
pub struct NewLegalDocumentVersion {
    pub tenant_id: String,
    pub document_type: LegalDocumentType,
    pub version_label: String,
    pub title: String,
    pub content: String,
    pub valid_from: NaiveDate,
    pub valid_until: Option<NaiveDate>,
    pub activation: Activation,
    pub copied_from: Option<String>,
}

fn version_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, LegalDocumentVersion)> {
    let document_type: String = row.get(2)?;
    Ok((
        document_type,
        LegalDocumentVersion {
            id: row.get(0)?,
            tenant_id: row.get(1)?,
            // replaced by the parsed value below
            document_type: LegalDocumentType::Other,
            version_label: row.get(3)?,
            title: row.get(4)?,
            content: row.get(5)?,
            valid_from: row.get(6)?,
            valid_until: row.get(7)?,
            active: row.get(8)?,
            copied_from: row.get(9)?,
            created_at: row.get(10)?,
        },
    ))
}

fn with_parsed_type(
    (document_type, mut version): (String, LegalDocumentVersion),
) -> Result<LegalDocumentVersion, DbError> {
    version.document_type = document_type.parse().map_err(DbError::InvalidValue)?;
    Ok(version)
}

fn fetch_version(conn: &Connection, id: &str) -> Result<Option<LegalDocumentVersion>, DbError> {
    let sql = format!(
        "SELECT {} FROM legal_document_versions WHERE id = ?1",
        VERSION_COLUMNS
    );
    conn.query_row(&sql, params![id], version_from_row)
        .optional()?
        .map(with_parsed_type)
        .transpose()
}

fn has_active(
    conn: &Connection,
    tenant_id: &str,
    document_type: LegalDocumentType,
) -> Result<bool, DbError> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM legal_document_versions
             WHERE tenant_id = ?1 AND document_type = ?2 AND active = 1",
            params![tenant_id, document_type.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn clear_active(
    conn: &Connection,
    tenant_id: &str,
    document_type: LegalDocumentType,
) -> Result<(), DbError> {
    conn.execute(
        "UPDATE legal_document_versions SET active = 0
         WHERE tenant_id = ?1 AND document_type = ?2 AND active = 1",
        params![tenant_id, document_type.as_str()],
    )?;
    Ok(())
}

impl Database {
    pub fn insert_legal_document_version(
        &self,
        new: &NewLegalDocumentVersion,
    ) -> Result<LegalDocumentVersion, DbError> {
        let id = Uuid::new_v4().to_string();
        let now = now_millis();

        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let label_taken: Option<i64> = tx
            .query_row(
                "SELECT 1 FROM legal_document_versions
                 WHERE tenant_id = ?1 AND document_type = ?2 AND version_label = ?3",
                params![new.tenant_id, new.document_type.as_str(), new.version_label],
                |row| row.get(0),
            )
            .optional()?;
        if label_taken.is_some() {
            return Err(DbError::DuplicateLabel(new.version_label.clone()));
        }

        let active = match new.activation {
            Activation::Activate => true,
            Activation::IfNoneActive => !has_active(&tx, &new.tenant_id, new.document_type)?,
            Activation::Inactive => false,
        };
        if active {
            clear_active(&tx, &new.tenant_id, new.document_type)?;
        }

        tx.execute(
            "INSERT INTO legal_document_versions (id, tenant_id, document_type, version_label, title,
                 content, valid_from, valid_until, active, copied_from, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                id,
                new.tenant_id,
                new.document_type.as_str(),
                new.version_label,
                new.title,
                new.content,
                new.valid_from,
                new.valid_until,
                active,
                new.copied_from,
                now
            ],
        )?;
        let version = fetch_version(&tx, &id)?
            .ok_or_else(|| DbError::InvalidValue(format!("legal document {} vanished", id)))?;
        tx.commit()?;

        info!(
            "Published {} version '{}' for tenant {} (active: {})",
            new.document_type, new.version_label, new.tenant_id, active
        );
        Ok(version)
    }

    pub fn get_legal_document_version(
        &self,
        id: &str,
    ) -> Result<Option<LegalDocumentVersion>, DbError> {
        let conn = self.lock()?;
        fetch_version(&conn, id)
    }

    /// The row carrying the active flag for the pair, if any.
    pub fn active_legal_document(
        &self,
        tenant_id: &str,
        document_type: LegalDocumentType,
    ) -> Result<Option<LegalDocumentVersion>, DbError> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM legal_document_versions
             WHERE tenant_id = ?1 AND document_type = ?2 AND active = 1",
            VERSION_COLUMNS
        );
        conn.query_row(&sql, params![tenant_id, document_type.as_str()], version_from_row)
            .optional()?
            .map(with_parsed_type)
            .transpose()
    }

    /// All versions of the pair in insertion order.
    pub fn list_legal_document_versions(
        &self,
        tenant_id: &str,
        document_type: LegalDocumentType,
    ) -> Result<Vec<LegalDocumentVersion>, DbError> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM legal_document_versions
             WHERE tenant_id = ?1 AND document_type = ?2
             ORDER BY created_at, rowid",
            VERSION_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![tenant_id, document_type.as_str()], version_from_row)?;

        let mut versions = Vec::new();
        for row in rows {
            versions.push(with_parsed_type(row?)?);
        }
        Ok(versions)
    }

    /// Moves the active flag of the pair onto this version.
    pub fn activate_legal_document_version(
        &self,
        id: &str,
    ) -> Result<Option<LegalDocumentVersion>, DbError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let Some(current) = fetch_version(&tx, id)? else {
            return Ok(None);
        };
        if !current.active {
            clear_active(&tx, &current.tenant_id, current.document_type)?;
            tx.execute(
                "UPDATE legal_document_versions SET active = 1 WHERE id = ?1",
                params![id],
            )?;
        }
        let version = fetch_version(&tx, id)?;
        tx.commit()?;

        info!(
            "Version '{}' is now the active {} of tenant {}",
            current.version_label, current.document_type, current.tenant_id
        );
        Ok(version)
    }
}
