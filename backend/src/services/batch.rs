//! Batch duplication shared by templates and legal documents.

use crate::database::Database;
use crate::error::ServiceError;
use common::model::copy::{BatchCopyReport, CopyItemResult, CopyStatus};
use log::{info, warn};

/// Runs `copy_one` for every id in order and records each outcome. A failing
/// item does not stop the batch and does not undo earlier copies.
pub fn copy_each(
    entity: &str,
    ids: &[String],
    target_tenant_id: &str,
    mut copy_one: impl FnMut(&str) -> Result<String, ServiceError>,
) -> BatchCopyReport {
    let results = ids
        .iter()
        .map(|source_id| {
            let status = match copy_one(source_id) {
                Ok(new_id) => CopyStatus::Copied { new_id },
                Err(e) => {
                    warn!(
                        "Copying {} {} to tenant {} failed: {}",
                        entity, source_id, target_tenant_id, e
                    );
                    CopyStatus::Failed {
                        kind: e.kind().to_string(),
                        message: e.to_string(),
                    }
                }
            };
            CopyItemResult {
                source_id: source_id.clone(),
                status,
            }
        })
        .collect();

    let report = BatchCopyReport::new(target_tenant_id, results);
    info!(
        "Batch copy of {} to tenant {}: {} copied, {} failed",
        entity, target_tenant_id, report.succeeded, report.failed
    );
    report
}

/// The target of a copy must name an existing tenant.
pub fn check_target_tenant(
    db: &Database,
    target_tenant_id: &str,
) -> Result<(), ServiceError> {
    if target_tenant_id.trim().is_empty() {
        return Err(ServiceError::Validation(
            "target_tenant_id is required".to_string(),
        ));
    }
    if !db.tenant_exists(target_tenant_id)? {
        return Err(ServiceError::not_found("tenant", target_tenant_id));
    }
    Ok(())
}
