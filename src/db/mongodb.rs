use mongodb::{Client, Collection, Database};
use std::env;

use crate::api::AppError;
use crate::db::models::{Reserva, Usuario};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Clone)]
pub struct MongoRepo {
    pub client: Client,
    pub database: Database,
}

impl MongoRepo {
    pub async fn init() -> Result<MongoRepo> {
        let mongo_uri = env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let client = Client::with_uri_str(&mongo_uri)
            .await
            .map_err(|e| AppError::Internal(format!("Error conectando a MongoDB: {}", e)))?;

        let database_name = env::var("MONGODB_DATABASE")
            .unwrap_or_else(|_| "catering_reservation".to_string());

        let database = client.database(&database_name);

        // Test connection
        database
            .run_command(mongodb::bson::doc! {"ping": 1})
            .await
            .map_err(|e| AppError::Internal(format!("Error validando conexión MongoDB: {}", e)))?;

        tracing::info!("Conexión a MongoDB establecida exitosamente");

        Ok(MongoRepo { client, database })
    }

    pub fn reservas(&self) -> Collection<Reserva> {
        self.database.collection("reservas")
    }

    pub fn usuarios(&self) -> Collection<Usuario> {
        self.database.collection("usuarios")
    }

    // Método para crear índices si es necesario
    pub async fn create_indexes(&self) -> Result<()> {
        use mongodb::bson::doc;
        use mongodb::IndexModel;

        // Índices para reservas: filtros por fecha y orden de inserción
        let reservas = self.reservas();
        let reservation_indexes = vec![
            IndexModel::builder()
                .keys(doc! { "fecha_evento": 1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { "created_at": 1 })
                .build(),
        ];

        reservas
            .create_indexes(reservation_indexes)
            .await
            .map_err(|e| AppError::Internal(format!("Error creando índices reservas: {}", e)))?;

        // Índice para usuarios. Deliberadamente NO único: los emails
        // duplicados están permitidos.
        let usuarios = self.usuarios();
        let user_indexes = vec![IndexModel::builder().keys(doc! { "email": 1 }).build()];

        usuarios
            .create_indexes(user_indexes)
            .await
            .map_err(|e| AppError::Internal(format!("Error creando índices usuarios: {}", e)))?;

        tracing::info!("Índices MongoDB creados exitosamente");
        Ok(())
    }
}
