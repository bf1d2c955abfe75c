//! # Catering Reservation Server
//!
//! Servidor web para la gestión de reservas de eventos de catering,
//! construido con Rust, Actix Web y MongoDB.
//!
//! ## Características principales
//!
//! - **Usuarios**: registro y login (credenciales en claro, como la app móvil
//!   a la que reemplaza este backend)
//! - **Reservas**: alta con validación de fechas/horas y cálculo de precio,
//!   listado, consulta y borrado
//! - **API REST**: JSON sobre HTTP, errores estructurados
//!
//! ## Configuración
//!
//! El servidor se configura mediante variables de entorno (archivo `.env`):
//!
//! ```env
//! # Base de datos MongoDB
//! MONGODB_URI=mongodb://localhost:27017
//! MONGODB_DATABASE=catering_reservation
//!
//! # Servidor
//! BIND_ADDRESS=0.0.0.0:8080
//!
//! # Logging
//! RUST_LOG=debug,mongodb=info
//! ```
//!
//! ## Ejecución
//!
//! ```bash
//! # 1. Instalar y ejecutar MongoDB
//! # Local: mongod
//! # Docker: docker run -d --name mongo -p 27017:27017 mongo:latest
//!
//! # 2. Configurar variables de entorno
//! cp .env.example .env
//!
//! # 3. Compilar y ejecutar
//! cargo run
//! ```

use actix_web::{middleware::Logger, web, App, HttpServer};
use std::env;

mod api;
mod db;

/// Función principal que inicia el servidor web
///
/// # Funcionalidad
///
/// 1. Carga variables de entorno desde `.env`
/// 2. Configura el sistema de logging con tracing
/// 3. Establece conexión con MongoDB
/// 4. Crea índices en la base de datos
/// 5. Configura e inicia el servidor HTTP
///
/// # Errores
///
/// Retorna `std::io::Error` si:
/// - No se puede conectar a MongoDB
/// - No se puede bindear al puerto especificado
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    // Configurar sistema de logging con tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("catering_reservation=debug".parse().unwrap())
                .add_directive("mongodb=info".parse().unwrap()),
        )
        .init();

    tracing::info!("Iniciando Catering Reservation Server con MongoDB...");

    // Inicializar conexión a MongoDB
    let mongo_repo = match db::MongoRepo::init().await {
        Ok(repo) => {
            // Intentar crear índices para optimizar consultas
            if let Err(e) = repo.create_indexes().await {
                tracing::warn!("Advertencia creando índices: {}", e);
                // No es un error fatal, continuamos sin índices
            }

            repo
        }
        Err(e) => {
            tracing::error!("Error conectando a MongoDB: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Error de MongoDB: {}", e),
            ));
        }
    };

    // Obtener dirección de bind desde variables de entorno
    let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    tracing::info!("Servidor iniciando en {}", bind_address);

    // Crear y configurar el servidor HTTP
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(mongo_repo.clone()))
            .wrap(Logger::default())
            .configure(api::init_routes)
            .route(
                "/",
                web::get().to(|| async {
                    actix_web::HttpResponse::Ok().json(serde_json::json!({
                        "service": "catering-reservation",
                        "version": env!("CARGO_PKG_VERSION")
                    }))
                }),
            )
    })
    .bind(&bind_address)?
    .run()
    .await
}
