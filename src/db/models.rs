//! # Modelos de dominio
//!
//! Registros persistidos (`Reserva`, `Usuario`) junto con sus contratos de
//! construcción: toda la validación de fechas/horas y el cálculo de precio
//! viven aquí, con el reloj inyectado (`now`) para poder testearlos de forma
//! determinista. Los handlers HTTP solo parsean la entrada y delegan.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{AppError, AppResult};

/// Tipos de servicio de catering disponibles.
///
/// En la app original el campo era texto libre pero la interfaz lo
/// restringía a estos tres valores, así que aquí es un conjunto cerrado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TipoServicio {
    Boda,
    Empresarial,
    Fiesta,
}

impl TipoServicio {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoServicio::Boda => "Boda",
            TipoServicio::Empresarial => "Empresarial",
            TipoServicio::Fiesta => "Fiesta",
        }
    }
}

/// Reserva de un evento de catering.
///
/// Invariantes garantizados en [`Reserva::crear`] y nunca re-validados
/// después (los campos no cambian tras la construcción):
///
/// 1. El día del evento no es anterior al día actual.
/// 2. La hora de fin es estrictamente posterior a la de inicio.
/// 3. Si el evento es hoy, la hora de inicio es estrictamente futura.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Reserva {
    #[serde(rename = "_id")]
    pub id: String,
    pub tipo_servicio: TipoServicio,
    /// Día del evento en formato YYYY-MM-DD
    pub fecha_evento: String,
    pub hora_inicio: i64, // timestamp unix
    pub hora_fin: i64,    // timestamp unix
    pub num_invitados: i32,
    pub precio_total: f64,
    pub confirmada: bool,
    pub created_at: i64, // timestamp unix
}

const SEGUNDOS_POR_HORA: f64 = 3600.0;

/// Abreviaturas de mes en español (estilo medio de es_ES).
const MESES_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];

impl Reserva {
    /// Construye una reserva validada.
    ///
    /// Las reglas se evalúan en orden y la primera que falla gana:
    ///
    /// 1. Rechazar si el día del evento ya pasó.
    /// 2. Rechazar si `fin <= inicio`.
    /// 3. Si el evento es hoy, rechazar si `inicio <= now`.
    ///
    /// En caso de éxito el precio total se calcula como
    /// `horas de duración × tarifa_hora`, la reserva queda sin confirmar y
    /// `created_at` se estampa con el `now` recibido.
    ///
    /// `now` es el reloj inyectado por el llamante: los handlers pasan
    /// `Utc::now()`, los tests un instante fijo.
    ///
    /// # Errores
    ///
    /// - `Validation`: fecha de evento pasada, rango horario no positivo, o
    ///   reserva para hoy con hora de inicio ya pasada.
    ///
    /// # Nota
    ///
    /// El número de invitados no se valida (la app original tampoco lo
    /// hacía; un valor cero o negativo se acepta tal cual).
    pub fn crear(
        tipo_servicio: TipoServicio,
        fecha_evento: NaiveDate,
        inicio: DateTime<Utc>,
        fin: DateTime<Utc>,
        num_invitados: i32,
        tarifa_hora: f64,
        now: DateTime<Utc>,
    ) -> AppResult<Reserva> {
        let hoy = now.date_naive();

        if fecha_evento < hoy {
            return Err(AppError::Validation(
                "No se pueden crear reservas para fechas pasadas".to_string(),
            ));
        }

        if fin <= inicio {
            return Err(AppError::Validation(
                "La hora de fin debe ser posterior a la hora de inicio".to_string(),
            ));
        }

        if fecha_evento == hoy && inicio <= now {
            return Err(AppError::Validation(
                "Para reservas de hoy, la hora de inicio debe ser futura".to_string(),
            ));
        }

        let duracion_horas = (fin - inicio).num_seconds() as f64 / SEGUNDOS_POR_HORA;

        Ok(Reserva {
            id: Uuid::new_v4().to_string(),
            tipo_servicio,
            fecha_evento: fecha_evento.format("%Y-%m-%d").to_string(),
            hora_inicio: inicio.timestamp(),
            hora_fin: fin.timestamp(),
            num_invitados,
            precio_total: duracion_horas * tarifa_hora,
            confirmada: false,
            created_at: now.timestamp(),
        })
    }

    /// Duración del evento en horas (fracción incluida).
    pub fn duracion_horas(&self) -> f64 {
        (self.hora_fin - self.hora_inicio) as f64 / SEGUNDOS_POR_HORA
    }

    /// Fecha del evento en estilo medio español, p.ej. `1 jun 2024`.
    ///
    /// Si el valor almacenado no parsea (no debería ocurrir, la construcción
    /// lo garantiza) se devuelve tal cual.
    pub fn fecha_formateada(&self) -> String {
        match NaiveDate::parse_from_str(&self.fecha_evento, "%Y-%m-%d") {
            Ok(fecha) => {
                use chrono::Datelike;
                format!(
                    "{} {} {}",
                    fecha.day(),
                    MESES_ES[fecha.month0() as usize],
                    fecha.year()
                )
            }
            Err(_) => self.fecha_evento.clone(),
        }
    }

    /// Rango horario en estilo corto, p.ej. `11:00 - 12:00`.
    pub fn rango_horario(&self) -> String {
        let inicio = Utc
            .timestamp_opt(self.hora_inicio, 0)
            .single()
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_default();
        let fin = Utc
            .timestamp_opt(self.hora_fin, 0)
            .single()
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_default();
        format!("{} - {}", inicio, fin)
    }
}

/// Usuario registrado en la aplicación.
///
/// La contraseña se guarda en claro, igual que en la app original. Es una
/// carencia conocida y documentada, no un descuido.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Usuario {
    #[serde(rename = "_id")]
    pub id: String,
    pub nombre: String,
    pub email: String,
    pub password: String,
    pub fecha_registro: i64, // timestamp unix
}

impl Usuario {
    /// Construye un usuario nuevo.
    ///
    /// Rechaza cualquier campo vacío (comparación exacta, sin recortar
    /// espacios). No hay comprobación de unicidad de email: los duplicados
    /// están permitidos, igual que en la app original.
    pub fn registrar(
        nombre: &str,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Usuario> {
        if nombre.is_empty() {
            return Err(AppError::validation_field("nombre", "El nombre es requerido"));
        }

        if email.is_empty() {
            return Err(AppError::validation_field("email", "El email es requerido"));
        }

        if password.is_empty() {
            return Err(AppError::validation_field(
                "password",
                "La contraseña es requerida",
            ));
        }

        Ok(Usuario {
            id: Uuid::new_v4().to_string(),
            nombre: nombre.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            fecha_registro: now.timestamp(),
        })
    }
}

/// Busca el primer usuario cuyo email y contraseña coincidan exactamente.
///
/// Comparación sensible a mayúsculas, en claro, sobre la colección completa.
/// Devuelve `None` si no hay coincidencia; el handler traduce eso a un error
/// genérico sin distinguir qué campo falló.
pub fn autenticar<'a>(usuarios: &'a [Usuario], email: &str, password: &str) -> Option<&'a Usuario> {
    usuarios
        .iter()
        .find(|u| u.email == email && u.password == password)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fecha(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn instante(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    // now fijo para todos los tests: 2024-06-01 10:00 UTC
    fn ahora() -> DateTime<Utc> {
        instante(2024, 6, 1, 10, 0)
    }

    #[test]
    fn rechaza_fecha_de_evento_pasada() {
        let resultado = Reserva::crear(
            TipoServicio::Boda,
            fecha(2024, 5, 31),
            instante(2024, 5, 31, 12, 0),
            instante(2024, 5, 31, 14, 0),
            50,
            200.0,
            ahora(),
        );

        assert!(matches!(resultado, Err(AppError::Validation(_))));
    }

    #[test]
    fn rechaza_fin_igual_o_anterior_al_inicio() {
        // fin == inicio
        let resultado = Reserva::crear(
            TipoServicio::Fiesta,
            fecha(2024, 6, 10),
            instante(2024, 6, 10, 12, 0),
            instante(2024, 6, 10, 12, 0),
            50,
            200.0,
            ahora(),
        );
        assert!(matches!(resultado, Err(AppError::Validation(_))));

        // fin < inicio
        let resultado = Reserva::crear(
            TipoServicio::Fiesta,
            fecha(2024, 6, 10),
            instante(2024, 6, 10, 12, 0),
            instante(2024, 6, 10, 11, 0),
            50,
            200.0,
            ahora(),
        );
        assert!(matches!(resultado, Err(AppError::Validation(_))));
    }

    #[test]
    fn rechaza_reserva_de_hoy_con_inicio_pasado() {
        // inicio a las 09:00 con now a las 10:00 del mismo día
        let resultado = Reserva::crear(
            TipoServicio::Empresarial,
            fecha(2024, 6, 1),
            instante(2024, 6, 1, 9, 0),
            instante(2024, 6, 1, 12, 0),
            50,
            200.0,
            ahora(),
        );
        assert!(matches!(resultado, Err(AppError::Validation(_))));

        // inicio exactamente en now también se rechaza (estrictamente futura)
        let resultado = Reserva::crear(
            TipoServicio::Empresarial,
            fecha(2024, 6, 1),
            instante(2024, 6, 1, 10, 0),
            instante(2024, 6, 1, 12, 0),
            50,
            200.0,
            ahora(),
        );
        assert!(matches!(resultado, Err(AppError::Validation(_))));
    }

    #[test]
    fn acepta_reserva_de_hoy_con_inicio_futuro() {
        let reserva = Reserva::crear(
            TipoServicio::Boda,
            fecha(2024, 6, 1),
            instante(2024, 6, 1, 11, 0),
            instante(2024, 6, 1, 12, 0),
            75,
            200.0,
            ahora(),
        )
        .unwrap();

        assert_eq!(reserva.duracion_horas(), 1.0);
        assert!((reserva.precio_total - 200.0).abs() < 1e-9);
        assert!(!reserva.confirmada);
        assert_eq!(reserva.created_at, ahora().timestamp());
        assert_eq!(reserva.fecha_evento, "2024-06-01");
    }

    #[test]
    fn acepta_fecha_futura_y_calcula_el_precio() {
        let reserva = Reserva::crear(
            TipoServicio::Fiesta,
            fecha(2024, 7, 15),
            instante(2024, 7, 15, 18, 0),
            instante(2024, 7, 15, 23, 30),
            120,
            150.0,
            ahora(),
        )
        .unwrap();

        assert!((reserva.duracion_horas() - 5.5).abs() < 1e-9);
        assert!((reserva.precio_total - 5.5 * 150.0).abs() < 1e-9);
    }

    #[test]
    fn no_valida_el_numero_de_invitados() {
        // carencia heredada de la app original: cero o negativo se acepta
        let reserva = Reserva::crear(
            TipoServicio::Boda,
            fecha(2024, 6, 10),
            instante(2024, 6, 10, 12, 0),
            instante(2024, 6, 10, 14, 0),
            0,
            200.0,
            ahora(),
        )
        .unwrap();

        assert_eq!(reserva.num_invitados, 0);
    }

    #[test]
    fn los_ids_generados_son_unicos() {
        let a = Reserva::crear(
            TipoServicio::Boda,
            fecha(2024, 6, 10),
            instante(2024, 6, 10, 12, 0),
            instante(2024, 6, 10, 14, 0),
            10,
            100.0,
            ahora(),
        )
        .unwrap();
        let b = Reserva::crear(
            TipoServicio::Boda,
            fecha(2024, 6, 10),
            instante(2024, 6, 10, 12, 0),
            instante(2024, 6, 10, 14, 0),
            10,
            100.0,
            ahora(),
        )
        .unwrap();

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn formatea_fecha_y_rango_horario() {
        let reserva = Reserva::crear(
            TipoServicio::Boda,
            fecha(2024, 6, 1),
            instante(2024, 6, 1, 11, 0),
            instante(2024, 6, 1, 12, 30),
            75,
            200.0,
            ahora(),
        )
        .unwrap();

        assert_eq!(reserva.fecha_formateada(), "1 jun 2024");
        assert_eq!(reserva.rango_horario(), "11:00 - 12:30");
    }

    #[test]
    fn registro_rechaza_campos_vacios() {
        assert!(Usuario::registrar("", "a@b.com", "x", ahora()).is_err());
        assert!(Usuario::registrar("Ana", "", "x", ahora()).is_err());
        assert!(Usuario::registrar("Ana", "a@b.com", "", ahora()).is_err());
    }

    #[test]
    fn registro_valido_estampa_la_fecha_inyectada() {
        let usuario = Usuario::registrar("Ana", "a@b.com", "x", ahora()).unwrap();

        assert_eq!(usuario.nombre, "Ana");
        assert_eq!(usuario.fecha_registro, ahora().timestamp());
    }

    #[test]
    fn registro_permite_emails_duplicados() {
        // sin comprobación de unicidad: dos usuarios con el mismo email
        let a = Usuario::registrar("Ana", "a@b.com", "x", ahora()).unwrap();
        let b = Usuario::registrar("Bea", "a@b.com", "y", ahora()).unwrap();

        assert_eq!(a.email, b.email);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn autenticar_exige_coincidencia_exacta() {
        let usuarios = vec![
            Usuario::registrar("Ana", "ana@mail.com", "secreta", ahora()).unwrap(),
            Usuario::registrar("Bea", "bea@mail.com", "otra", ahora()).unwrap(),
        ];

        let encontrado = autenticar(&usuarios, "bea@mail.com", "otra").unwrap();
        assert_eq!(encontrado.nombre, "Bea");

        // sensible a mayúsculas en ambos campos
        assert!(autenticar(&usuarios, "Bea@mail.com", "otra").is_none());
        assert!(autenticar(&usuarios, "bea@mail.com", "Otra").is_none());
        // contraseña de otro usuario
        assert!(autenticar(&usuarios, "ana@mail.com", "otra").is_none());
    }

    #[test]
    fn autenticar_con_coleccion_vacia_siempre_falla() {
        assert!(autenticar(&[], "a@b.com", "x").is_none());
    }

    #[test]
    fn autenticar_devuelve_la_primera_coincidencia() {
        // emails duplicados permitidos: gana el primero insertado
        let usuarios = vec![
            Usuario::registrar("Ana", "a@b.com", "x", ahora()).unwrap(),
            Usuario::registrar("Bea", "a@b.com", "x", ahora()).unwrap(),
        ];

        let encontrado = autenticar(&usuarios, "a@b.com", "x").unwrap();
        assert_eq!(encontrado.nombre, "Ana");
    }
}
