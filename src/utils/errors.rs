//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::models::transition::TransitionError;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Transition rejected: {0}")]
    Transition(#[from] TransitionError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

fn transition_response(err: TransitionError) -> (StatusCode, ErrorResponse) {
    let message = err.to_string();
    match err {
        TransitionError::InvalidTransition { from, to } => (
            StatusCode::CONFLICT,
            ErrorResponse {
                error: "Invalid Transition".to_string(),
                message,
                details: Some(json!({ "from": from, "to": to })),
                code: Some("INVALID_TRANSITION".to_string()),
            },
        ),
        TransitionError::MissingRequiredField { status, fields } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorResponse {
                error: "Missing Required Field".to_string(),
                message,
                details: Some(json!({ "status": status, "fields": fields })),
                code: Some("MISSING_REQUIRED_FIELD".to_string()),
            },
        ),
        TransitionError::MissingClient { status } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorResponse {
                error: "Missing Client".to_string(),
                message,
                details: Some(json!({ "status": status })),
                code: Some("MISSING_CLIENT".to_string()),
            },
        ),
        TransitionError::EmptyRequest => (
            StatusCode::BAD_REQUEST,
            ErrorResponse {
                error: "Bad Request".to_string(),
                message,
                details: None,
                code: Some("EMPTY_TRANSITION".to_string()),
            },
        ),
        TransitionError::PersistenceFailure(cause) => {
            error!("❌ Persistence failure: {}", cause);
            (
                StatusCode::BAD_GATEWAY,
                ErrorResponse {
                    error: "Persistence Failure".to_string(),
                    message: cause,
                    details: None,
                    code: Some("PERSISTENCE_FAILURE".to_string()),
                },
            )
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database Error".to_string(),
                        message: "An error occurred while accessing the database".to_string(),
                        details: Some(json!({ "sql_error": e.to_string() })),
                        code: Some("DB_ERROR".to_string()),
                    },
                )
            }

            AppError::Storage(msg) => {
                error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Storage Error".to_string(),
                        message: msg,
                        details: None,
                        code: Some("STORAGE_ERROR".to_string()),
                    },
                )
            }

            AppError::Validation(e) => {
                warn!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: "The provided data is invalid".to_string(),
                        details: Some(json!(e)),
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::Transition(e) => {
                warn!("Transition rejected: {}", e);
                transition_response(e)
            }

            AppError::NotFound(msg) => {
                warn!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: Some("NOT_FOUND".to_string()),
                    },
                )
            }

            AppError::Conflict(msg) => {
                warn!("Conflict: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Conflict".to_string(),
                        message: msg,
                        details: None,
                        code: Some("CONFLICT".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} with {} '{}' already exists", resource, field, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::status::{RequiredField, VehicleStatus};

    #[test]
    fn test_transition_status_codes() {
        let invalid = AppError::from(TransitionError::InvalidTransition {
            from: "SOLD".to_string(),
            to: "AVAILABLE".to_string(),
        });
        assert_eq!(invalid.into_response().status(), StatusCode::CONFLICT);

        let missing = AppError::from(TransitionError::MissingRequiredField {
            status: VehicleStatus::InService,
            fields: vec![RequiredField::WorkOrderId],
        });
        assert_eq!(missing.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);

        let persistence = AppError::from(TransitionError::PersistenceFailure("timeout".to_string()));
        assert_eq!(persistence.into_response().status(), StatusCode::BAD_GATEWAY);

        let empty = AppError::from(TransitionError::EmptyRequest);
        assert_eq!(empty.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_helpers() {
        assert!(matches!(not_found_error("Vehicle", "42"), AppError::NotFound(msg) if msg.contains("42")));
        assert!(matches!(
            conflict_error("Vehicle", "vin", "ABC"),
            AppError::Conflict(msg) if msg == "Vehicle with vin 'ABC' already exists"
        ));
    }
}
