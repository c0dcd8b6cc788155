//! Modelo de Place
//!
//! Un lugar de trabajo (aeropuerto, campo de golf, granja...) con su centro
//! y el zoom inicial del mapa. Mapea a la tabla `places`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use uuid::Uuid;

/// Zoom por defecto del mapa de un lugar
pub const DEFAULT_INITIAL_ZOOM: i32 = 15;

/// Tipo de lugar - mapea al ENUM place_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "place_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlaceType {
    Airport,
    GolfCourse,
    Farm,
    #[default]
    Other,
}

impl PlaceType {
    pub fn label(&self) -> &'static str {
        match self {
            PlaceType::Airport => "Airport",
            PlaceType::GolfCourse => "Golf course",
            PlaceType::Farm => "Farm",
            PlaceType::Other => "Other",
        }
    }
}

impl fmt::Display for PlaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Place principal - mapea exactamente a la tabla places
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Place {
    pub id: Uuid,
    pub name: String,
    pub place_type: PlaceType,
    pub center_lat: Decimal,
    pub center_lng: Decimal,
    pub initial_zoom: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos para insertar un Place
#[derive(Debug, Clone)]
pub struct NewPlace {
    pub name: String,
    pub place_type: PlaceType,
    pub center_lat: Decimal,
    pub center_lng: Decimal,
    pub initial_zoom: i32,
}

/// Cambios parciales sobre un Place
#[derive(Debug, Clone, Default)]
pub struct PlaceChanges {
    pub name: Option<String>,
    pub place_type: Option<PlaceType>,
    pub center_lat: Option<Decimal>,
    pub center_lng: Option<Decimal>,
    pub initial_zoom: Option<i32>,
}

impl Place {
    pub fn apply(&mut self, changes: PlaceChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(place_type) = changes.place_type {
            self.place_type = place_type;
        }
        if let Some(lat) = changes.center_lat {
            self.center_lat = lat;
        }
        if let Some(lng) = changes.center_lng {
            self.center_lng = lng;
        }
        if let Some(zoom) = changes.initial_zoom {
            self.initial_zoom = zoom;
        }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
