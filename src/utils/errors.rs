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

/// SQLSTATE de PostgreSQL para violación de unicidad
const PG_UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE de PostgreSQL para violación de clave foránea
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";
/// SQLSTATE de PostgreSQL para violación de CHECK
const PG_CHECK_VIOLATION: &str = "23514";
/// Índice único que garantiza un solo coche por ruta
pub const ASSIGNED_ROUTE_INDEX: &str = "cars_assigned_route_id_key";

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Protected: {0}")]
    Protected(String),

    #[error("Malformed area: {0}")]
    MalformedArea(String),

    #[error("Assignment conflict: {0}")]
    AssignmentConflict(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: String,
}

impl AppError {
    /// Código estable que acompaña a cada error en la respuesta JSON
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DB_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Protected(_) => "PROTECTED",
            AppError::MalformedArea(_) => "MALFORMED_AREA",
            AppError::AssignmentConflict(_) => "ASSIGNMENT_CONFLICT",
            AppError::InvalidTransition(_) => "INVALID_TRANSITION",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_)
            | AppError::Protected(_)
            | AppError::AssignmentConflict(_)
            | AppError::InvalidTransition(_) => StatusCode::CONFLICT,
            AppError::MalformedArea(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code().to_string();

        let error_response = match self {
            AppError::Database(msg) => {
                error!("Database error: {}", msg);
                ErrorResponse {
                    error: "Database Error".to_string(),
                    message: "An error occurred while accessing the database".to_string(),
                    details: Some(json!({ "sql_error": msg })),
                    code,
                }
            }

            AppError::Validation(e) => {
                warn!("Validation error: {}", e);
                ErrorResponse {
                    error: "Validation Error".to_string(),
                    message: "The provided data is invalid".to_string(),
                    details: Some(json!(e)),
                    code,
                }
            }

            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                ErrorResponse {
                    error: "Internal Server Error".to_string(),
                    message: "An unexpected error occurred".to_string(),
                    details: Some(json!({ "internal_error": msg })),
                    code,
                }
            }

            AppError::NotFound(msg) => simple("Not Found", msg, code),
            AppError::Conflict(msg) => simple("Conflict", msg, code),
            AppError::Protected(msg) => simple("Protected", msg, code),
            AppError::MalformedArea(msg) => simple("Malformed Area", msg, code),
            AppError::AssignmentConflict(msg) => simple("Assignment Conflict", msg, code),
            AppError::InvalidTransition(msg) => simple("Invalid Transition", msg, code),
            AppError::BadRequest(msg) => simple("Bad Request", msg, code),
        };

        (status, Json(error_response)).into_response()
    }
}

fn simple(error: &str, message: String, code: String) -> ErrorResponse {
    warn!("{}: {}", error, message);
    ErrorResponse {
        error: error.to_string(),
        message,
        details: None,
        code,
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Traducir un error de SQLx a la taxonomía de la aplicación.
///
/// Las violaciones de unicidad se convierten en `Conflict` (o en
/// `AssignmentConflict` cuando saltan sobre el índice de ruta asignada) y las
/// de clave foránea en `Protected`.
pub fn map_db_error(e: sqlx::Error, context: &str) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        match db_err.code().as_deref() {
            Some(PG_UNIQUE_VIOLATION) => {
                if db_err.constraint() == Some(ASSIGNED_ROUTE_INDEX) {
                    return AppError::AssignmentConflict(
                        "Route is already assigned to another car".to_string(),
                    );
                }
                return AppError::Conflict(format!("{}: {}", context, db_err.message()));
            }
            Some(PG_FOREIGN_KEY_VIOLATION) => {
                return AppError::Protected(format!("{}: {}", context, db_err.message()));
            }
            Some(PG_CHECK_VIOLATION) => {
                return AppError::BadRequest(format!("{}: {}", context, db_err.message()));
            }
            _ => {}
        }
    }
    AppError::Database(format!("{}: {}", context, e))
}

/// Igual que `map_db_error` pero para INSERT/UPDATE: una clave foránea rota
/// significa que el registro referenciado no existe.
pub fn map_write_error(e: sqlx::Error, context: &str) -> AppError {
    match map_db_error(e, context) {
        AppError::Protected(msg) => AppError::BadRequest(msg),
        other => other,
    }
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} with {} '{}' already exists", resource, field, value))
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}
