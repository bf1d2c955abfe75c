//! # Módulo API
//!
//! Este módulo contiene todas las rutas y controladores de la API REST.
//!
//! ## Módulos principales
//!
//! - [`user`] - Gestión de usuarios (registro, login)
//! - [`reservation`] - Gestión de reservas (crear, listar, consultar, eliminar)
//! - [`errors`] - Manejo de errores de la aplicación

pub mod errors;
mod middleware;
pub mod reservation;
pub mod user;

// Re-exportar tipos comunes para facilitar su uso
pub use errors::{AppError, AppResult, ErrorResponse};

use actix_web::web;

/// Configura todas las rutas de la API
///
/// ## Rutas configuradas
///
/// - `/reservations/*` - Ver [`reservation::routes`]
/// - `/users/*` - Ver [`user::routes`]
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    reservation::routes(cfg);
    user::routes(cfg);
}
