//! Modelo de CarType
//!
//! Clase de vehículo con los parámetros físicos y de maniobra que la
//! generación de rutas necesita. Mapea a la tabla `car_types`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use uuid::Uuid;

/// Forma de desplazamiento - mapea al ENUM move_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "move_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MoveType {
    #[default]
    Wheels,
    Crawler,
    Other,
}

impl MoveType {
    pub fn label(&self) -> &'static str {
        match self {
            MoveType::Wheels => "Wheels",
            MoveType::Crawler => "Crawler",
            MoveType::Other => "Other",
        }
    }
}

/// CarType principal - mapea exactamente a la tabla car_types
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CarType {
    pub id: Uuid,
    pub type_name: String,
    pub description: String,
    pub width: Option<Decimal>,
    pub height: Option<Decimal>,
    pub length: Option<Decimal>,
    pub move_type: MoveType,
    pub cutting_width: Option<Decimal>,
    pub curvature: Option<Decimal>,
    pub turning_radius: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos para insertar un CarType
#[derive(Debug, Clone, Default)]
pub struct NewCarType {
    pub type_name: String,
    pub description: String,
    pub width: Option<Decimal>,
    pub height: Option<Decimal>,
    pub length: Option<Decimal>,
    pub move_type: MoveType,
    pub cutting_width: Option<Decimal>,
    pub curvature: Option<Decimal>,
    pub turning_radius: Option<Decimal>,
}

/// Cambios parciales sobre un CarType.
/// Los parámetros numéricos sólo se pueden sobrescribir, no borrar.
#[derive(Debug, Clone, Default)]
pub struct CarTypeChanges {
    pub type_name: Option<String>,
    pub description: Option<String>,
    pub width: Option<Decimal>,
    pub height: Option<Decimal>,
    pub length: Option<Decimal>,
    pub move_type: Option<MoveType>,
    pub cutting_width: Option<Decimal>,
    pub curvature: Option<Decimal>,
    pub turning_radius: Option<Decimal>,
}

impl CarType {
    pub fn apply(&mut self, changes: CarTypeChanges) {
        if let Some(type_name) = changes.type_name {
            self.type_name = type_name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(move_type) = changes.move_type {
            self.move_type = move_type;
        }
        self.width = changes.width.or(self.width);
        self.height = changes.height.or(self.height);
        self.length = changes.length.or(self.length);
        self.cutting_width = changes.cutting_width.or(self.cutting_width);
        self.curvature = changes.curvature.or(self.curvature);
        self.turning_radius = changes.turning_radius.or(self.turning_radius);
    }
}

impl fmt::Display for CarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name)
    }
}
