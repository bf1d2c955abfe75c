//! # Manejo de errores
//!
//! Jerarquía de errores de la aplicación construida con thiserror. Todos los
//! fallos, incluidos los de validación de entrada, se devuelven como valores
//! `Result` recuperables; nunca se aborta el proceso por entrada inválida.

use actix_web::{HttpResponse, ResponseError};
use std::error::Error;
use thiserror::Error;

/// Tipos de error de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    /// Error de base de datos con contexto de operación
    ///
    /// Se genera desde mongodb::error::Error y mantiene la cadena de errores
    /// original para mejor debugging.
    #[error("Error de base de datos en operación '{operation}': {source}")]
    Database {
        operation: String,
        #[source]
        source: mongodb::error::Error,
    },

    /// Error de validación con campo específico
    #[error("Error de validación en campo '{field}': {message}")]
    ValidationWithField {
        field: String,
        message: String,
    },

    /// Error de validación general
    #[error("Error de validación: {0}")]
    Validation(String),

    /// Error de autenticación (mensaje genérico, sin distinguir campo)
    #[error("No autorizado: {0}")]
    Unauthorized(String),

    /// Error de recurso no encontrado
    #[error("No encontrado: {0}")]
    NotFound(String),

    /// Error interno
    #[error("Error interno: {0}")]
    Internal(String),
}

impl AppError {
    /// Crea un error de base de datos con contexto de operación
    pub fn database(operation: &str, source: mongodb::error::Error) -> Self {
        Self::Database {
            operation: operation.to_string(),
            source,
        }
    }

    /// Crea un error de validación con campo específico
    pub fn validation_field(field: &str, message: &str) -> Self {
        Self::ValidationWithField {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        // Log detallado del error antes de responder
        match self {
            Self::Database { operation, source } => {
                tracing::error!(
                    operation = %operation,
                    error = %source,
                    error_chain = ?source.source(),
                    "Database error occurred"
                );
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Error de base de datos".to_string(),
                    message: "Error interno del servidor".to_string(),
                })
            }
            Self::ValidationWithField { field, message } => {
                tracing::warn!(
                    field = %field,
                    message = %message,
                    "Validation error"
                );
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Error de validación".to_string(),
                    message: format!("Campo '{}': {}", field, message),
                })
            }
            Self::Validation(message) => {
                tracing::warn!(message = %message, "Validation error");
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Error de validación".to_string(),
                    message: message.clone(),
                })
            }
            Self::Unauthorized(message) => {
                tracing::warn!(message = %message, "Unauthorized");
                HttpResponse::Unauthorized().json(ErrorResponse {
                    error: "No autorizado".to_string(),
                    message: message.clone(),
                })
            }
            Self::NotFound(message) => {
                tracing::info!(message = %message, "Resource not found");
                HttpResponse::NotFound().json(ErrorResponse {
                    error: "No encontrado".to_string(),
                    message: message.clone(),
                })
            }
            Self::Internal(message) => {
                tracing::error!(message = %message, "Internal error");
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Error interno".to_string(),
                    message: message.clone(),
                })
            }
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

pub type AppResult<T> = Result<T, AppError>;

// Conversión automática desde mongodb::error::Error
impl From<mongodb::error::Error> for AppError {
    fn from(error: mongodb::error::Error) -> Self {
        Self::Database {
            operation: "database_operation".to_string(),
            source: error,
        }
    }
}
