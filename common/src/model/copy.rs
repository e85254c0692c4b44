//! Per-item reporting for cross-tenant duplication.
//!
//! A batch copy is a sequence of independent single copies. Every input id
//! gets exactly one `CopyItemResult`, in input order, whatever happened to the
//! items before it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CopyStatus {
    Copied { new_id: String },
    Failed { kind: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyItemResult {
    pub source_id: String,
    #[serde(flatten)]
    pub status: CopyStatus,
}

impl CopyItemResult {
    pub fn is_success(&self) -> bool {
        matches!(self.status, CopyStatus::Copied { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchCopyReport {
    pub target_tenant_id: String,
    pub results: Vec<CopyItemResult>,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchCopyReport {
    pub fn new(target_tenant_id: impl Into<String>, results: Vec<CopyItemResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        let failed = results.len() - succeeded;
        Self {
            target_tenant_id: target_tenant_id.into(),
            results,
            succeeded,
            failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts_and_wire_shape() {
        let report = BatchCopyReport::new(
            "t2",
            vec![
                CopyItemResult {
                    source_id: "a".to_string(),
                    status: CopyStatus::Copied {
                        new_id: "a2".to_string(),
                    },
                },
                CopyItemResult {
                    source_id: "b".to_string(),
                    status: CopyStatus::Failed {
                        kind: "not_found".to_string(),
                        message: "template 'b' not found".to_string(),
                    },
                },
            ],
        );
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);

        let json = serde_json::to_value(&report.results[0]).unwrap();
        assert_eq!(json["source_id"], "a");
        assert_eq!(json["status"], "copied");
        assert_eq!(json["new_id"], "a2");
    }
}
