//! Error taxonomy surfaced by the stores and services.
//!
//! The resolver and renderer never produce these; they degrade to fallback
//! values instead.

use crate::database::DbError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing or malformed input. Nothing was persisted.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// A second default template or active version would have been created.
    #[error("invariant conflict: {0}")]
    InvariantConflict(String),

    #[error(transparent)]
    Database(DbError),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Stable machine-readable name, used in error bodies and copy reports.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation",
            ServiceError::NotFound { .. } => "not_found",
            ServiceError::InvariantConflict(_) => "invariant_conflict",
            ServiceError::Database(_) => "database",
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        if let DbError::DuplicateLabel(_) = e {
            ServiceError::Validation(e.to_string())
        } else if e.is_unique_violation() {
            ServiceError::InvariantConflict(e.to_string())
        } else {
            ServiceError::Database(e)
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::InvariantConflict(_) => StatusCode::CONFLICT,
            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "kind": self.kind(),
            "error": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ServiceError::Validation("name".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::not_found("template", "x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::InvariantConflict("dup".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::from(DbError::Lock).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = ServiceError::not_found("legal document version", "v-1");
        assert_eq!(err.to_string(), "legal document version 'v-1' not found");
        assert_eq!(err.kind(), "not_found");
    }
}
