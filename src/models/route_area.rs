//! Modelo de RouteArea
//!
//! Área de trabajo (polígono) que la aplicación de PC usa para generar rutas.
//! Los vértices son AreaPoint ordenados por `sequence_number`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use uuid::Uuid;

use super::geometry::GeoPoint;

/// Estado de la definición del área - mapea al ENUM area_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "area_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AreaStatus {
    #[default]
    Draft,
    Defined,
    Archived,
}

/// RouteArea principal - mapea exactamente a la tabla route_areas
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RouteArea {
    pub id: Uuid,
    pub place_id: Uuid,
    pub name: String,
    pub description: String,
    pub status: AreaStatus,
    pub version: i32,
    pub source_data_hint: String,
    pub generation_parameters: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos para insertar una RouteArea
#[derive(Debug, Clone)]
pub struct NewRouteArea {
    pub place_id: Uuid,
    pub name: String,
    pub description: String,
    pub status: AreaStatus,
    pub source_data_hint: String,
    pub generation_parameters: Option<serde_json::Value>,
}

/// Cambios parciales. `generation_parameters: Some(None)` los borra.
#[derive(Debug, Clone, Default)]
pub struct RouteAreaChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<AreaStatus>,
    pub version: Option<i32>,
    pub source_data_hint: Option<String>,
    pub generation_parameters: Option<Option<serde_json::Value>>,
}

impl RouteArea {
    pub fn apply(&mut self, changes: RouteAreaChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(version) = changes.version {
            self.version = version;
        }
        if let Some(hint) = changes.source_data_hint {
            self.source_data_hint = hint;
        }
        if let Some(params) = changes.generation_parameters {
            self.generation_parameters = params;
        }
    }
}

/// Vértice del polígono - mapea a la tabla area_points
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AreaPoint {
    pub id: Uuid,
    pub area_id: Uuid,
    pub sequence_number: i32,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub altitude: Option<f64>,
}

impl AreaPoint {
    pub fn location(&self) -> Option<GeoPoint> {
        GeoPoint::from_columns(self.longitude, self.latitude, self.altitude)
    }
}

impl fmt::Display for AreaPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point {} for Area {}", self.sequence_number, self.area_id)
    }
}

/// Datos para insertar un AreaPoint
#[derive(Debug, Clone)]
pub struct NewAreaPoint {
    pub sequence_number: i32,
    pub location: GeoPoint,
}

impl NewAreaPoint {
    pub fn into_point(self, area_id: Uuid) -> AreaPoint {
        AreaPoint {
            id: Uuid::new_v4(),
            area_id,
            sequence_number: self.sequence_number,
            longitude: Some(self.location.longitude),
            latitude: Some(self.location.latitude),
            altitude: self.location.altitude,
        }
    }
}
