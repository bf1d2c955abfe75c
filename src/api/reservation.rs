//! # API de Reservas
//!
//! Este módulo maneja todas las operaciones relacionadas con reservas de
//! eventos de catering:
//! - Crear nuevas reservas (con validación de fechas y cálculo de precio)
//! - Listar reservas con filtros opcionales
//! - Consultar una reserva concreta
//! - Eliminar reservas
//!
//! Las reglas de validación y el precio viven en [`crate::db::models`]; aquí
//! solo se parsea la entrada y se habla con la base de datos.

use actix_web::{delete, get, post, web, HttpResponse, Responder};
use chrono::{NaiveDate, NaiveTime, Utc};
use mongodb::bson::doc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::middleware::ErrorLogExt;
use super::{AppError, AppResult};
use crate::db::{MongoRepo, Reserva, TipoServicio};

/// Estructura para crear una nueva reserva
///
/// La tarifa por hora se usa para calcular el precio total pero no se
/// persiste con la reserva.
#[derive(Deserialize)]
struct NuevaReserva {
    /// Tipo de servicio ("Boda", "Empresarial" o "Fiesta")
    tipo_servicio: TipoServicio,
    /// Día del evento (formato YYYY-MM-DD)
    fecha: String,
    /// Hora de inicio (formato HH:MM)
    hora_inicio: String,
    /// Hora de fin (formato HH:MM)
    hora_fin: String,
    /// Número de invitados
    num_invitados: i32,
    /// Tarifa por hora usada para el precio total
    tarifa_hora: f64,
}

/// Estructura de respuesta para una reserva
///
/// Incluye, además de los campos persistidos, los derivados que muestran
/// las pantallas de listado y detalle.
#[derive(Serialize)]
struct ReservaResponse {
    /// ID único de la reserva
    id: String,
    /// Tipo de servicio
    tipo_servicio: &'static str,
    /// Día del evento (YYYY-MM-DD)
    fecha_evento: String,
    /// Día del evento formateado en estilo español, p.ej. "1 jun 2024"
    fecha_formateada: String,
    /// Rango horario, p.ej. "11:00 - 12:30"
    rango_horario: String,
    /// Duración en horas
    duracion_horas: f64,
    /// Número de invitados
    num_invitados: i32,
    /// Precio total calculado en la creación
    precio_total: f64,
    /// Estado de confirmación
    confirmada: bool,
    /// Momento de creación (timestamp unix)
    created_at: i64,
}

/// Parámetros de consulta para listar reservas
#[derive(Deserialize)]
struct ReservaQuery {
    /// Filtrar por día de evento (formato YYYY-MM-DD)
    fecha: Option<String>,
    /// Filtrar por estado de confirmación
    confirmada: Option<bool>,
}

/// Valida y parsea una fecha en formato YYYY-MM-DD
///
/// # Errores
/// - `Validation`: Si el formato de fecha es incorrecto
fn validar_fecha(date_str: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Formato de fecha inválido, use YYYY-MM-DD".to_string()))
}

/// Valida y parsea una hora en formato HH:MM
///
/// # Errores
/// - `Validation`: Si el formato de hora es incorrecto
fn validar_hora(time_str: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time_str, "%H:%M")
        .map_err(|_| AppError::Validation("Formato de hora inválido, use HH:MM".to_string()))
}

/// Valida que un ID de reserva tenga formato UUID
fn validar_id(id: &str) -> AppResult<String> {
    Uuid::parse_str(id)
        .map(|u| u.to_string())
        .map_err(|_| AppError::Validation("ID de reserva inválido".to_string()))
}

/// Convierte el modelo persistido a la respuesta del API
impl From<Reserva> for ReservaResponse {
    fn from(reserva: Reserva) -> Self {
        ReservaResponse {
            fecha_formateada: reserva.fecha_formateada(),
            rango_horario: reserva.rango_horario(),
            duracion_horas: reserva.duracion_horas(),
            id: reserva.id,
            tipo_servicio: reserva.tipo_servicio.as_str(),
            fecha_evento: reserva.fecha_evento,
            num_invitados: reserva.num_invitados,
            precio_total: reserva.precio_total,
            confirmada: reserva.confirmada,
            created_at: reserva.created_at,
        }
    }
}

/// Crea una nueva reserva
///
/// # Validaciones
/// - Fecha con formato YYYY-MM-DD y horas con formato HH:MM
/// - El día del evento no puede haber pasado
/// - La hora de fin debe ser posterior a la de inicio
/// - Si el evento es hoy, la hora de inicio debe ser futura
///
/// El precio total se calcula en el servidor como
/// `horas de duración × tarifa_hora`. La reserva se crea sin confirmar.
///
/// # Respuesta
/// ```json
/// {
///   "message": "Reserva creada correctamente",
///   "id": "3b4c5d6e-...",
///   "precio_total": 400.0
/// }
/// ```
///
/// # Errores
/// - `400 Bad Request`: Datos de validación incorrectos
/// - `500 Internal Server Error`: Error de base de datos
#[post("/reservations")]
async fn crear_reserva(
    repo: web::Data<MongoRepo>,
    data: web::Json<NuevaReserva>,
) -> AppResult<impl Responder> {
    let fecha = validar_fecha(&data.fecha)?;
    let hora_inicio = validar_hora(&data.hora_inicio)?;
    let hora_fin = validar_hora(&data.hora_fin)?;

    let inicio = fecha.and_time(hora_inicio).and_utc();
    let fin = fecha.and_time(hora_fin).and_utc();

    let reserva = Reserva::crear(
        data.tipo_servicio,
        fecha,
        inicio,
        fin,
        data.num_invitados,
        data.tarifa_hora,
        Utc::now(),
    )?;

    let id = reserva.id.clone();
    let precio_total = reserva.precio_total;

    repo.reservas()
        .insert_one(reserva)
        .await
        .log_error_context("inserting new reservation")
        .map_err(|e| AppError::database("crear_reserva", e))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Reserva creada correctamente",
        "id": id,
        "precio_total": precio_total
    })))
}

/// Lista las reservas con filtros opcionales
///
/// Las reservas se devuelven en orden de inserción.
///
/// # Filtros disponibles
/// - `fecha`: Filtrar por día de evento (formato YYYY-MM-DD)
/// - `confirmada`: Filtrar por estado de confirmación
///
/// # Errores
/// - `500 Internal Server Error`: Error de base de datos
#[get("/reservations")]
async fn listar_reservas(
    repo: web::Data<MongoRepo>,
    query: web::Query<ReservaQuery>,
) -> AppResult<impl Responder> {
    // Construir filtro dinámico basado en parámetros
    let mut filter = doc! {};

    if let Some(fecha) = &query.fecha {
        filter.insert("fecha_evento", fecha);
    }

    if let Some(confirmada) = query.confirmada {
        filter.insert("confirmada", confirmada);
    }

    let reservas = repo.reservas();
    let mut cursor = reservas
        .find(filter)
        .await
        .log_error_context("listing reservations")
        .map_err(|e| AppError::database("listar_reservas", e))?;

    let mut results = Vec::new();

    while cursor
        .advance()
        .await
        .map_err(|e| AppError::Internal(format!("Error iterando cursor: {}", e)))?
    {
        let reserva = cursor
            .deserialize_current()
            .map_err(|e| AppError::Internal(format!("Error deserializando reserva: {}", e)))?;
        results.push(ReservaResponse::from(reserva));
    }

    Ok(HttpResponse::Ok().json(results))
}

/// Consulta una reserva concreta por su ID
///
/// # Errores
/// - `400 Bad Request`: ID de reserva inválido
/// - `404 Not Found`: Reserva no encontrada
/// - `500 Internal Server Error`: Error de base de datos
#[get("/reservations/{id}")]
async fn obtener_reserva(
    repo: web::Data<MongoRepo>,
    path: web::Path<String>,
) -> AppResult<impl Responder> {
    let id = validar_id(&path.into_inner())?;

    let reserva = repo
        .reservas()
        .find_one(doc! { "_id": &id })
        .await
        .log_error_context("fetching reservation")
        .map_err(|e| AppError::database("obtener_reserva", e))?
        .ok_or(AppError::NotFound("Reserva no encontrada".to_string()))?;

    Ok(HttpResponse::Ok().json(ReservaResponse::from(reserva)))
}

/// Elimina una reserva
///
/// Eliminar un ID que no existe devuelve 404; no hay efectos en cascada.
/// Si la base de datos falla, la operación aborta y la reserva permanece.
///
/// # Respuesta
/// ```json
/// {
///   "message": "Reserva eliminada correctamente",
///   "id": "3b4c5d6e-..."
/// }
/// ```
///
/// # Errores
/// - `400 Bad Request`: ID de reserva inválido
/// - `404 Not Found`: Reserva no encontrada
/// - `500 Internal Server Error`: Error de base de datos
#[delete("/reservations/{id}")]
async fn eliminar_reserva(
    repo: web::Data<MongoRepo>,
    path: web::Path<String>,
) -> AppResult<impl Responder> {
    let id = validar_id(&path.into_inner())?;

    let result = repo
        .reservas()
        .delete_one(doc! { "_id": &id })
        .await
        .log_error_chain()
        .map_err(|e| AppError::database("eliminar_reserva", e))?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Reserva no encontrada".to_string()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Reserva eliminada correctamente",
        "id": id
    })))
}

/// Configura las rutas relacionadas con reservas
///
/// # Rutas disponibles
/// - `POST /reservations` - Crear nueva reserva
/// - `GET /reservations` - Listar reservas con filtros opcionales
/// - `GET /reservations/{id}` - Consultar una reserva
/// - `DELETE /reservations/{id}` - Eliminar una reserva
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(crear_reserva);
    cfg.service(listar_reservas);
    cfg.service(obtener_reserva);
    cfg.service(eliminar_reserva);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valida_formatos_de_fecha_y_hora() {
        assert!(validar_fecha("2024-06-01").is_ok());
        assert!(validar_fecha("01/06/2024").is_err());
        assert!(validar_fecha("").is_err());

        assert!(validar_hora("09:30").is_ok());
        assert!(validar_hora("9h30").is_err());
    }

    #[test]
    fn valida_formato_de_id() {
        assert!(validar_id("3b241101-e2bb-4255-8caf-4136c566a962").is_ok());
        assert!(validar_id("no-es-un-uuid").is_err());
    }
}
