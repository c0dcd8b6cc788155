use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::common::double_option;
use crate::models::{GeoPoint, NewRoutePoint, Route, RouteChanges, RoutePoint, RouteType};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::validate_not_blank;

fn default_true() -> bool {
    true
}

// Punto de ruta tal y como lo envía la aplicación de PC
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RoutePointRequest {
    #[validate(range(min = 0))]
    pub sequence_number: i32,

    pub longitude: Option<f64>,
    pub latitude: Option<f64>,

    pub altitude: Option<f64>,

    #[serde(default)]
    pub aux_wp: bool,

    #[validate(range(min = 0, max = 359))]
    pub heading: Option<i32>,

    #[serde(default = "default_true")]
    pub is_direct_path: bool,

    #[serde(default)]
    pub blade_active: bool,
}

impl RoutePointRequest {
    /// Longitud y latitud van juntas: o están las dos o ninguna.
    /// Los rangos se comprueban al construir el `GeoPoint`.
    pub fn into_new_point(self) -> AppResult<NewRoutePoint> {
        let location = match (self.longitude, self.latitude) {
            (Some(lng), Some(lat)) => Some(
                GeoPoint::new(lng, lat, self.altitude).map_err(AppError::BadRequest)?,
            ),
            (None, None) => None,
            _ => {
                return Err(AppError::BadRequest(format!(
                    "Route point {} must carry both longitude and latitude or neither",
                    self.sequence_number
                )))
            }
        };

        Ok(NewRoutePoint {
            sequence_number: self.sequence_number,
            location,
            aux_wp: self.aux_wp,
            heading: self.heading,
            is_direct_path: self.is_direct_path,
            blade_active: self.blade_active,
        })
    }
}

// Request para crear una ruta con todos sus puntos
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRouteRequest {
    pub place_id: Uuid,
    pub car_type_id: Uuid,

    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub name: String,

    pub description: Option<String>,
    pub route_type: Option<RouteType>,
    pub source_area_id: Option<Uuid>,

    #[serde(default)]
    pub source_info_text: String,

    pub calculated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    #[validate]
    pub points: Vec<RoutePointRequest>,
}

/// Resultado de la generación externa. Siempre crea una ruta nueva.
#[derive(Debug, Deserialize, Validate)]
pub struct ImportRouteRequest {
    pub place_id: Uuid,
    pub car_type_id: Uuid,

    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub name: String,

    pub description: Option<String>,
    pub route_type: Option<RouteType>,
    pub source_area_id: Option<Uuid>,

    #[serde(default)]
    pub source_info_text: String,

    pub calculated_at: Option<DateTime<Utc>>,

    #[validate]
    pub points: Vec<RoutePointRequest>,
}

impl From<ImportRouteRequest> for CreateRouteRequest {
    fn from(request: ImportRouteRequest) -> Self {
        Self {
            place_id: request.place_id,
            car_type_id: request.car_type_id,
            name: request.name,
            description: request.description,
            route_type: Some(request.route_type.unwrap_or(RouteType::Automatic)),
            source_area_id: request.source_area_id,
            source_info_text: request.source_info_text,
            calculated_at: request.calculated_at,
            points: request.points,
        }
    }
}

// Request para actualizar los metadatos de una ruta
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRouteRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    pub route_type: Option<RouteType>,
    pub source_info_text: Option<String>,
}

impl From<UpdateRouteRequest> for RouteChanges {
    fn from(request: UpdateRouteRequest) -> Self {
        Self {
            name: request.name.map(|n| n.trim().to_string()),
            description: request.description,
            route_type: request.route_type,
            source_info_text: request.source_info_text,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PlaceFilterQuery {
    pub place_id: Option<Uuid>,
}

// Response de punto de ruta
#[derive(Debug, Serialize, Deserialize)]
pub struct RoutePointResponse {
    pub id: Uuid,
    pub sequence_number: i32,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub alt: Option<f64>,
    pub aux_wp: bool,
    pub heading: Option<i32>,
    pub is_direct_path: bool,
    pub blade_active: bool,
}

impl From<RoutePoint> for RoutePointResponse {
    fn from(point: RoutePoint) -> Self {
        Self {
            id: point.id,
            sequence_number: point.sequence_number,
            lat: point.latitude(),
            lng: point.longitude(),
            alt: point.altitude(),
            aux_wp: point.aux_wp,
            heading: point.heading,
            is_direct_path: point.is_direct_path,
            blade_active: point.blade_active,
        }
    }
}

// Response de ruta
#[derive(Debug, Serialize, Deserialize)]
pub struct RouteResponse {
    pub id: Uuid,
    pub place_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub car_type_id: Uuid,
    pub route_type: RouteType,
    pub route_type_label: String,
    pub source_area_id: Option<Uuid>,
    pub source_info_text: String,
    pub calculated_at: DateTime<Utc>,
    pub is_in_use: bool,
    pub assigned_car_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<RoutePointResponse>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RouteResponse {
    pub fn new(route: Route, assigned_car_id: Option<Uuid>, points: Option<Vec<RoutePoint>>) -> Self {
        Self {
            id: route.id,
            place_id: route.place_id,
            route_type_label: route.route_type.label().to_string(),
            name: route.name,
            description: route.description,
            car_type_id: route.car_type_id,
            route_type: route.route_type,
            source_area_id: route.source_area_id,
            source_info_text: route.source_info_text,
            calculated_at: route.calculated_at,
            is_in_use: assigned_car_id.is_some(),
            assigned_car_id,
            points: points.map(|p| p.into_iter().map(RoutePointResponse::from).collect()),
            created_at: route.created_at,
            updated_at: route.updated_at,
        }
    }
}
