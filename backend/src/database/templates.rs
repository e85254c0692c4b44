//! Template store.
//!
//! Saves always take the whole structured content and regenerate the derived
//! markup, stylesheet, hash and placeholder snapshot inside the same
//! transaction, so the derived columns can never drift from the blocks.

use super::{now_millis, Database, DbError};
use crate::engine::blocks::flatten;
use crate::engine::content_hash;
use common::model::block::StructuredContent;
use common::model::placeholder::catalog;
use common::model::template::{DocumentTemplate, TemplateSummary, TemplateType};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use uuid::Uuid;

const TEMPLATE_COLUMNS: &str = "id, tenant_id, name, description, template_type, version, \
     is_default, structured_content, derived_markup, derived_stylesheet, content_hash, \
     placeholder_schema_snapshot, copied_from, created_at, updated_at";

/// Authoring input for a create or whole-document update.
#[derive(Debug, Clone)]
pub struct TemplateWrite {
    pub tenant_id: String,
    pub name: String,
    pub description: Option<String>,
    pub template_type: TemplateType,
    pub is_default: bool,
    pub structured_content: StructuredContent,
}

/// Raw row, converted outside of rusqlite's row closure so that enum and
/// JSON decoding errors surface as `DbError`.
struct TemplateRow {
    id: String,
    tenant_id: String,
    name: String,
    description: Option<String>,
    template_type: String,
    version: i64,
    is_default: bool,
    structured_content: String,
    derived_markup: String,
    derived_stylesheet: String,
    content_hash: String,
    placeholder_schema_snapshot: String,
    copied_from: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl TemplateRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            tenant_id: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            template_type: row.get(4)?,
            version: row.get(5)?,
            is_default: row.get(6)?,
            structured_content: row.get(7)?,
            derived_markup: row.get(8)?,
            derived_stylesheet: row.get(9)?,
            content_hash: row.get(10)?,
            placeholder_schema_snapshot: row.get(11)?,
            copied_from: row.get(12)?,
            created_at: row.get(13)?,
            updated_at: row.get(14)?,
        })
    }

    fn into_template(self) -> Result<DocumentTemplate, DbError> {
        Ok(DocumentTemplate {
            template_type: self
                .template_type
                .parse()
                .map_err(DbError::InvalidValue)?,
            structured_content: serde_json::from_str(&self.structured_content)?,
            placeholder_schema_snapshot: serde_json::from_str(&self.placeholder_schema_snapshot)?,
            id: self.id,
            tenant_id: self.tenant_id,
            name: self.name,
            description: self.description,
            version: self.version,
            is_default: self.is_default,
            derived_markup: self.derived_markup,
            derived_stylesheet: self.derived_stylesheet,
            content_hash: self.content_hash,
            copied_from: self.copied_from,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Derived columns of a save.
struct Derived {
    structured_json: String,
    markup: String,
    stylesheet: String,
    hash: String,
    snapshot_json: String,
}

fn derive(content: &StructuredContent) -> Result<Derived, DbError> {
    let flattened = flatten(content);
    Ok(Derived {
        structured_json: serde_json::to_string(content)?,
        hash: content_hash(&flattened.markup, &flattened.stylesheet),
        markup: flattened.markup,
        stylesheet: flattened.stylesheet,
        snapshot_json: serde_json::to_string(&catalog())?,
    })
}

fn fetch_template(conn: &Connection, id: &str) -> Result<Option<DocumentTemplate>, DbError> {
    let sql = format!(
        "SELECT {} FROM document_templates WHERE id = ?1",
        TEMPLATE_COLUMNS
    );
    let row = conn
        .query_row(&sql, params![id], TemplateRow::from_row)
        .optional()?;
    row.map(TemplateRow::into_template).transpose()
}

/// Clears the default flag of every other template of the pair.
fn clear_default(
    conn: &Connection,
    tenant_id: &str,
    template_type: TemplateType,
    keep_id: &str,
) -> Result<(), DbError> {
    let cleared = conn.execute(
        "UPDATE document_templates SET is_default = 0
         WHERE tenant_id = ?1 AND template_type = ?2 AND is_default = 1 AND id <> ?3",
        params![tenant_id, template_type.as_str(), keep_id],
    )?;
    if cleared > 0 {
        debug!(
            "Cleared previous default {} template of tenant {}",
            template_type, tenant_id
        );
    }
    Ok(())
}

impl Database {
    pub fn insert_template(&self, write: &TemplateWrite) -> Result<DocumentTemplate, DbError> {
        let derived = derive(&write.structured_content)?;
        let id = Uuid::new_v4().to_string();
        let now = now_millis();

        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if write.is_default {
            clear_default(&tx, &write.tenant_id, write.template_type, &id)?;
        }
        tx.execute(
            "INSERT INTO document_templates (id, tenant_id, name, description, template_type, version,
                 is_default, structured_content, derived_markup, derived_stylesheet, content_hash,
                 placeholder_schema_snapshot, copied_from, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?7, ?8, ?9, ?10, ?11, NULL, ?12, ?12)",
            params![
                id,
                write.tenant_id,
                write.name,
                write.description,
                write.template_type.as_str(),
                write.is_default,
                derived.structured_json,
                derived.markup,
                derived.stylesheet,
                derived.hash,
                derived.snapshot_json,
                now
            ],
        )?;
        let template = fetch_template(&tx, &id)?
            .ok_or_else(|| DbError::InvalidValue(format!("template {} vanished", id)))?;
        tx.commit()?;

        info!(
            "Created {} template {} for tenant {}",
            write.template_type, id, write.tenant_id
        );
        Ok(template)
    }

    /// Replaces a template's content and metadata. Returns `None` when no
    /// template with this id exists for the tenant. The version counter
    /// moves up by one.
    pub fn update_template(
        &self,
        id: &str,
        write: &TemplateWrite,
    ) -> Result<Option<DocumentTemplate>, DbError> {
        let derived = derive(&write.structured_content)?;
        let now = now_millis();

        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if write.is_default {
            clear_default(&tx, &write.tenant_id, write.template_type, id)?;
        }
        let updated = tx.execute(
            "UPDATE document_templates SET
                 name = ?1, description = ?2, template_type = ?3, version = version + 1,
                 is_default = ?4, structured_content = ?5, derived_markup = ?6,
                 derived_stylesheet = ?7, content_hash = ?8, placeholder_schema_snapshot = ?9,
                 updated_at = ?10
             WHERE id = ?11 AND tenant_id = ?12",
            params![
                write.name,
                write.description,
                write.template_type.as_str(),
                write.is_default,
                derived.structured_json,
                derived.markup,
                derived.stylesheet,
                derived.hash,
                derived.snapshot_json,
                now,
                id,
                write.tenant_id
            ],
        )?;
        if updated == 0 {
            return Ok(None);
        }
        let template = fetch_template(&tx, id)?;
        tx.commit()?;

        info!("Updated template {} of tenant {}", id, write.tenant_id);
        Ok(template)
    }

    /// Inserts a verbatim copy of `source` under `target_tenant_id`. The copy
    /// is never the default and remembers where it came from.
    pub fn insert_template_copy(
        &self,
        source: &DocumentTemplate,
        target_tenant_id: &str,
    ) -> Result<DocumentTemplate, DbError> {
        let id = Uuid::new_v4().to_string();
        let now = now_millis();
        let structured_json = serde_json::to_string(&source.structured_content)?;
        let snapshot_json = serde_json::to_string(&source.placeholder_schema_snapshot)?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO document_templates (id, tenant_id, name, description, template_type, version,
                 is_default, structured_content, derived_markup, derived_stylesheet, content_hash,
                 placeholder_schema_snapshot, copied_from, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
            params![
                id,
                target_tenant_id,
                source.name,
                source.description,
                source.template_type.as_str(),
                source.version,
                structured_json,
                source.derived_markup,
                source.derived_stylesheet,
                source.content_hash,
                snapshot_json,
                source.id,
                now
            ],
        )?;
        let template = fetch_template(&conn, &id)?
            .ok_or_else(|| DbError::InvalidValue(format!("template {} vanished", id)))?;
        Ok(template)
    }

    pub fn get_template(&self, id: &str) -> Result<Option<DocumentTemplate>, DbError> {
        let conn = self.lock()?;
        fetch_template(&conn, id)
    }

    /// Templates of a tenant ordered by type, default first, then name.
    pub fn list_templates(
        &self,
        tenant_id: &str,
        template_type: Option<TemplateType>,
        default_only: bool,
    ) -> Result<Vec<TemplateSummary>, DbError> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM document_templates
             WHERE tenant_id = ?1
               AND (?2 IS NULL OR template_type = ?2)
               AND (?3 = 0 OR is_default = 1)
             ORDER BY template_type, is_default DESC, name COLLATE NOCASE, id",
            TEMPLATE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![tenant_id, template_type.map(|t| t.as_str()), default_only],
            TemplateRow::from_row,
        )?;

        let mut summaries = Vec::new();
        for row in rows {
            let template = row?.into_template()?;
            summaries.push(TemplateSummary::from(&template));
        }
        Ok(summaries)
    }

    /// Deletes a template. A deleted default leaves its pair without a default.
    pub fn delete_template(&self, id: &str) -> Result<bool, DbError> {
        let conn = self.lock()?;
        let affected = conn.execute("DELETE FROM document_templates WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Makes a template the default of its (tenant, type) pair, clearing the
    /// previous default in the same transaction.
    pub fn set_default_template(&self, id: &str) -> Result<Option<DocumentTemplate>, DbError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let Some(current) = fetch_template(&tx, id)? else {
            return Ok(None);
        };
        clear_default(&tx, &current.tenant_id, current.template_type, id)?;
        tx.execute(
            "UPDATE document_templates SET is_default = 1 WHERE id = ?1",
            params![id],
        )?;
        let template = fetch_template(&tx, id)?;
        tx.commit()?;

        info!(
            "Template {} is now the default {} template of tenant {}",
            id, current.template_type, current.tenant_id
        );
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::block::Block;

    fn write(tenant: &str, name: &str, template_type: TemplateType, is_default: bool) -> TemplateWrite {
        TemplateWrite {
            tenant_id: tenant.to_string(),
            name: name.to_string(),
            description: None,
            template_type,
            is_default,
            structured_content: StructuredContent {
                blocks: vec![Block::Paragraph {
                    content: format!("{} for {{{{member.fullName}}}}", name),
                }],
                ..Default::default()
            },
        }
    }

    fn defaults(db: &Database, tenant: &str, template_type: TemplateType) -> Vec<String> {
        db.list_templates(tenant, Some(template_type), true)
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect()
    }

    #[test]
    fn test_insert_regenerates_derived_content() {
        let db = Database::open_in_memory().unwrap();
        let template = db
            .insert_template(&write("t1", "Vertrag", TemplateType::Contract, false))
            .unwrap();
        assert_eq!(template.version, 1);
        assert!(template.derived_markup.contains("Vertrag for {{member.fullName}}"));
        assert!(!template.derived_stylesheet.is_empty());
        assert_eq!(
            template.content_hash,
            content_hash(&template.derived_markup, &template.derived_stylesheet)
        );
        assert_eq!(template.placeholder_schema_snapshot, catalog());
        assert_eq!(db.get_template(&template.id).unwrap().unwrap(), template);
    }

    #[test]
    fn test_update_replaces_content_and_bumps_version() {
        let db = Database::open_in_memory().unwrap();
        let created = db
            .insert_template(&write("t1", "Vertrag", TemplateType::Contract, false))
            .unwrap();
        let mut update = write("t1", "Vertrag 2026", TemplateType::Contract, false);
        update.structured_content.blocks = vec![Block::Heading {
            level: 1,
            content: "Neu".to_string(),
        }];
        let updated = db.update_template(&created.id, &update).unwrap().unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(updated.name, "Vertrag 2026");
        assert!(updated.derived_markup.contains(">Neu</h1>"));
        assert!(!updated.derived_markup.contains("Vertrag for"));
        assert_ne!(updated.content_hash, created.content_hash);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[test]
    fn test_update_of_other_tenants_template_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let created = db
            .insert_template(&write("t1", "Vertrag", TemplateType::Contract, false))
            .unwrap();
        let result = db
            .update_template(&created.id, &write("t2", "Hijack", TemplateType::Contract, false))
            .unwrap();
        assert!(result.is_none());
        assert_eq!(db.get_template(&created.id).unwrap().unwrap().name, "Vertrag");
    }

    #[test]
    fn test_default_stays_single_across_operations() {
        let db = Database::open_in_memory().unwrap();
        let a = db
            .insert_template(&write("t1", "A", TemplateType::Contract, true))
            .unwrap();
        assert_eq!(defaults(&db, "t1", TemplateType::Contract), vec![a.id.clone()]);

        let b = db
            .insert_template(&write("t1", "B", TemplateType::Contract, true))
            .unwrap();
        assert_eq!(defaults(&db, "t1", TemplateType::Contract), vec![b.id.clone()]);

        let c = db
            .insert_template(&write("t1", "C", TemplateType::Contract, false))
            .unwrap();
        db.set_default_template(&c.id).unwrap().unwrap();
        assert_eq!(defaults(&db, "t1", TemplateType::Contract), vec![c.id.clone()]);

        db.update_template(&a.id, &write("t1", "A", TemplateType::Contract, true))
            .unwrap()
            .unwrap();
        assert_eq!(defaults(&db, "t1", TemplateType::Contract), vec![a.id.clone()]);

        // other pairs are untouched
        let other_type = db
            .insert_template(&write("t1", "S", TemplateType::SepaMandate, true))
            .unwrap();
        let other_tenant = db
            .insert_template(&write("t2", "A", TemplateType::Contract, true))
            .unwrap();
        assert_eq!(defaults(&db, "t1", TemplateType::Contract), vec![a.id.clone()]);
        assert_eq!(defaults(&db, "t1", TemplateType::SepaMandate), vec![other_type.id]);
        assert_eq!(defaults(&db, "t2", TemplateType::Contract), vec![other_tenant.id]);

        assert!(db.delete_template(&a.id).unwrap());
        assert!(defaults(&db, "t1", TemplateType::Contract).is_empty());
        assert!(!db.delete_template(&a.id).unwrap());
    }

    #[test]
    fn test_unique_index_rejects_second_default() {
        let db = Database::open_in_memory().unwrap();
        let a = db
            .insert_template(&write("t1", "A", TemplateType::Terms, true))
            .unwrap();
        let b = db
            .insert_template(&write("t1", "B", TemplateType::Terms, false))
            .unwrap();
        let conn = db.lock().unwrap();
        let err = conn
            .execute(
                "UPDATE document_templates SET is_default = 1 WHERE id = ?1",
                params![b.id],
            )
            .map_err(DbError::from)
            .unwrap_err();
        assert!(err.is_unique_violation());
        drop(conn);
        assert_eq!(defaults(&db, "t1", TemplateType::Terms), vec![a.id]);
    }

    #[test]
    fn test_list_filters_and_orders() {
        let db = Database::open_in_memory().unwrap();
        db.insert_template(&write("t1", "zeta", TemplateType::Contract, false))
            .unwrap();
        let def = db
            .insert_template(&write("t1", "Omega", TemplateType::Contract, true))
            .unwrap();
        db.insert_template(&write("t1", "alpha", TemplateType::Contract, false))
            .unwrap();
        db.insert_template(&write("t1", "Kündigung", TemplateType::Termination, false))
            .unwrap();
        db.insert_template(&write("t2", "fremd", TemplateType::Contract, false))
            .unwrap();

        let names: Vec<String> = db
            .list_templates("t1", Some(TemplateType::Contract), false)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Omega", "alpha", "zeta"]);
        assert_eq!(db.list_templates("t1", None, false).unwrap().len(), 4);
        let only_defaults = db.list_templates("t1", None, true).unwrap();
        assert_eq!(only_defaults.len(), 1);
        assert_eq!(only_defaults[0].id, def.id);
    }

    #[test]
    fn test_copy_is_verbatim_and_never_default() {
        let db = Database::open_in_memory().unwrap();
        let source = db
            .insert_template(&write("t1", "A", TemplateType::Contract, true))
            .unwrap();
        let copy = db.insert_template_copy(&source, "t2").unwrap();
        assert_ne!(copy.id, source.id);
        assert_eq!(copy.tenant_id, "t2");
        assert!(!copy.is_default);
        assert_eq!(copy.copied_from.as_deref(), Some(source.id.as_str()));
        assert_eq!(copy.structured_content, source.structured_content);
        assert_eq!(copy.derived_markup, source.derived_markup);
        assert_eq!(copy.derived_stylesheet, source.derived_stylesheet);
        assert_eq!(copy.version, source.version);
    }

    #[test]
    fn test_summaries_mirror_stored_templates() {
        let db = Database::open_in_memory().unwrap();
        let stored = db
            .insert_template(&write("t1", "Vertrag", TemplateType::Contract, true))
            .unwrap();
        let updated = db
            .update_template(&stored.id, &write("t1", "Vertrag 2026", TemplateType::Contract, true))
            .unwrap()
            .unwrap();

        let summaries = db.list_templates("t1", None, false).unwrap();
        assert_eq!(summaries, vec![TemplateSummary::from(&updated)]);
        assert_eq!(summaries[0].version, 2);
    }
}
