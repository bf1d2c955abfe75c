//! # API de Usuarios
//!
//! Este módulo maneja el registro y el login de usuarios:
//! - Registro con validación de campos obligatorios
//! - Login con comparación exacta de email y contraseña
//!
//! Las credenciales se guardan y comparan en claro, igual que en la app
//! original. El mensaje de error del login es genérico a propósito: nunca
//! se revela si falló el email o la contraseña.

use actix_web::{post, web, HttpResponse, Responder};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::middleware::ErrorLogExt;
use super::{AppError, AppResult};
use crate::db::{autenticar, MongoRepo, Usuario};

/// Estructura para el registro de usuarios
#[derive(Deserialize)]
struct RegistroUsuario {
    /// Nombre a mostrar
    nombre: String,
    /// Email del usuario (sin comprobación de unicidad)
    email: String,
    /// Contraseña (se guarda en claro)
    password: String,
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

/// Registra un nuevo usuario
///
/// Los tres campos son obligatorios (rechazo si alguno está vacío). No hay
/// comprobación de unicidad de email.
///
/// # Respuesta
///
/// ```json
/// {
///   "message": "Usuario registrado correctamente",
///   "id": "3b4c5d6e-..."
/// }
/// ```
///
/// # Errores
///
/// - `400 Bad Request`: Algún campo obligatorio está vacío
/// - `500 Internal Server Error`: Error de base de datos
#[post("/users/register")]
async fn registrar_usuario(
    repo: web::Data<MongoRepo>,
    data: web::Json<RegistroUsuario>,
) -> AppResult<impl Responder> {
    let usuario = Usuario::registrar(&data.nombre, &data.email, &data.password, Utc::now())?;
    let id = usuario.id.clone();

    repo.usuarios()
        .insert_one(usuario)
        .await
        .log_error_context("inserting new user")
        .map_err(|e| AppError::database("registrar_usuario", e))?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Usuario registrado correctamente",
        "id": id
    })))
}

/// Inicia sesión con email y contraseña
///
/// Recorre la colección completa de usuarios y devuelve la primera
/// coincidencia exacta de email y contraseña (sensible a mayúsculas). Si no
/// hay coincidencia responde con un mensaje genérico.
///
/// # Respuesta
///
/// ```json
/// {
///   "message": "Login exitoso",
///   "id": "3b4c5d6e-...",
///   "nombre": "Ana"
/// }
/// ```
///
/// # Errores
///
/// - `400 Bad Request`: Email o contraseña vacíos
/// - `401 Unauthorized`: Credenciales incorrectas (mensaje genérico)
/// - `500 Internal Server Error`: Error de base de datos
#[post("/users/login")]
async fn login_usuario(
    repo: web::Data<MongoRepo>,
    data: web::Json<LoginRequest>,
) -> AppResult<impl Responder> {
    // Validación básica
    if data.email.is_empty() || data.password.is_empty() {
        return Err(AppError::Validation(
            "Email y contraseña son requeridos".to_string(),
        ));
    }

    let usuarios = repo.usuarios();
    let mut cursor = usuarios
        .find(mongodb::bson::doc! {})
        .await
        .log_error_context("loading users for login")
        .map_err(|e| AppError::database("login_usuario", e))?;

    let mut registrados = Vec::new();

    while cursor
        .advance()
        .await
        .map_err(|e| AppError::Internal(format!("Error iterando cursor: {}", e)))?
    {
        let usuario = cursor
            .deserialize_current()
            .map_err(|e| AppError::Internal(format!("Error deserializando usuario: {}", e)))?;
        registrados.push(usuario);
    }

    match autenticar(&registrados, &data.email, &data.password) {
        Some(usuario) => Ok(HttpResponse::Ok().json(json!({
            "message": "Login exitoso",
            "id": usuario.id,
            "nombre": usuario.nombre
        }))),
        None => Err(AppError::Unauthorized(
            "Correo o contraseña incorrectos".to_string(),
        )),
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(registrar_usuario);
    cfg.service(login_usuario);
}
