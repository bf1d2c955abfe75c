// src/db/mod.rs
pub mod models;
pub mod mongodb;

pub use models::{autenticar, Reserva, TipoServicio, Usuario};
pub use mongodb::MongoRepo;
