//! Repositorios
//!
//! Interfaz explícita de acceso a datos. Cada entidad tiene su trait y hay
//! dos implementaciones: `PgRepository` (PostgreSQL vía SQLx, las reglas de
//! borrado y unicidad viven en el esquema) y `MemoryRepository` (mismas
//! reglas aplicadas bajo un único lock, para tests y desarrollo local).

pub mod car_repository;
pub mod car_type_repository;
pub mod memory_repository;
pub mod place_repository;
pub mod route_area_repository;
pub mod route_repository;

pub use car_repository::CarRepository;
pub use car_type_repository::CarTypeRepository;
pub use memory_repository::MemoryRepository;
pub use place_repository::PlaceRepository;
pub use route_area_repository::RouteAreaRepository;
pub use route_repository::RouteRepository;

use sqlx::PgPool;
use std::sync::Arc;

/// Repositorio completo que usan los controladores
pub trait FleetRepository:
    PlaceRepository + CarTypeRepository + CarRepository + RouteRepository + RouteAreaRepository
{
}

impl<T> FleetRepository for T where
    T: PlaceRepository + CarTypeRepository + CarRepository + RouteRepository + RouteAreaRepository
{
}

/// Handle compartido entre handlers
pub type SharedRepository = Arc<dyn FleetRepository>;

/// Implementación sobre PostgreSQL
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
