//! Modelo de Route
//!
//! Una ruta pertenece a un Place, está pensada para un CarType y puede venir
//! de una RouteArea. Sus RoutePoint forman el recorrido ordenado por
//! `sequence_number`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use uuid::Uuid;

use super::geometry::GeoPoint;

/// Tipo de ruta - mapea al ENUM route_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "route_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RouteType {
    Automatic,
    #[default]
    PlaceList,
    PlaceListRing,
}

impl RouteType {
    pub fn label(&self) -> &'static str {
        match self {
            RouteType::Automatic => "Automatic Calculation",
            RouteType::PlaceList => "Place List (Line)",
            RouteType::PlaceListRing => "Place List (Ring)",
        }
    }
}

/// Route principal - mapea exactamente a la tabla routes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Route {
    pub id: Uuid,
    pub place_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub car_type_id: Uuid,
    pub route_type: RouteType,
    pub source_area_id: Option<Uuid>,
    pub source_info_text: String,
    pub calculated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos para insertar una Route
#[derive(Debug, Clone)]
pub struct NewRoute {
    pub place_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub car_type_id: Uuid,
    pub route_type: RouteType,
    pub source_area_id: Option<Uuid>,
    pub source_info_text: String,
    pub calculated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct RouteChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub route_type: Option<RouteType>,
    pub source_info_text: Option<String>,
}

impl Route {
    pub fn apply(&mut self, changes: RouteChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(route_type) = changes.route_type {
            self.route_type = route_type;
        }
        if let Some(text) = changes.source_info_text {
            self.source_info_text = text;
        }
    }
}

/// Punto de paso de una ruta - mapea a la tabla route_points
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoutePoint {
    pub id: Uuid,
    pub route_id: Uuid,
    pub sequence_number: i32,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub altitude: Option<f64>,
    pub aux_wp: bool,
    pub heading: Option<i32>,
    pub is_direct_path: bool,
    pub blade_active: bool,
    pub created_at: DateTime<Utc>,
}

impl RoutePoint {
    /// Ubicación completa, si el punto la tiene
    pub fn location(&self) -> Option<GeoPoint> {
        GeoPoint::from_columns(self.longitude, self.latitude, self.altitude)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.location().map(|p| p.longitude)
    }

    pub fn latitude(&self) -> Option<f64> {
        self.location().map(|p| p.latitude)
    }

    /// Altitud sólo cuando el punto es 3-D
    pub fn altitude(&self) -> Option<f64> {
        self.location().and_then(|p| p.altitude)
    }

    pub fn set_coordinates(&mut self, point: GeoPoint) {
        self.longitude = Some(point.longitude);
        self.latitude = Some(point.latitude);
        self.altitude = point.altitude;
    }
}

impl fmt::Display for RoutePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = self
            .location()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        write!(
            f,
            "Point {} for Route {} ({})",
            self.sequence_number, self.route_id, location
        )
    }
}

/// Datos para insertar un RoutePoint
#[derive(Debug, Clone)]
pub struct NewRoutePoint {
    pub sequence_number: i32,
    pub location: Option<GeoPoint>,
    pub aux_wp: bool,
    pub heading: Option<i32>,
    pub is_direct_path: bool,
    pub blade_active: bool,
}

impl NewRoutePoint {
    pub fn into_point(self, route_id: Uuid, created_at: DateTime<Utc>) -> RoutePoint {
        RoutePoint {
            id: Uuid::new_v4(),
            route_id,
            sequence_number: self.sequence_number,
            longitude: self.location.map(|p| p.longitude),
            latitude: self.location.map(|p| p.latitude),
            altitude: self.location.and_then(|p| p.altitude),
            aux_wp: self.aux_wp,
            heading: self.heading,
            is_direct_path: self.is_direct_path,
            blade_active: self.blade_active,
            created_at,
        }
    }
}
