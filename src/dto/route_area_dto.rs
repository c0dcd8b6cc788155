use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::common::double_option;
use crate::models::{AreaPoint, AreaStatus, GeoPoint, NewAreaPoint, NewRouteArea, RouteArea, RouteAreaChanges};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{validate_generation_parameters, validate_not_blank};

// Vértice de un área
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AreaPointRequest {
    #[validate(range(min = 0))]
    pub sequence_number: i32,
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: Option<f64>,
}

impl AreaPointRequest {
    pub fn into_new_point(self) -> AppResult<NewAreaPoint> {
        let location = GeoPoint::new(self.longitude, self.latitude, self.altitude)
            .map_err(|e| AppError::BadRequest(format!("Area point {}: {}", self.sequence_number, e)))?;
        Ok(NewAreaPoint {
            sequence_number: self.sequence_number,
            location,
        })
    }
}

// Request para crear un área
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRouteAreaRequest {
    pub place_id: Uuid,

    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub status: Option<AreaStatus>,

    #[serde(default)]
    pub source_data_hint: String,

    #[validate(custom = "validate_generation_parameters")]
    pub generation_parameters: Option<serde_json::Value>,

    #[serde(default)]
    #[validate]
    pub points: Vec<AreaPointRequest>,
}

impl CreateRouteAreaRequest {
    pub fn into_parts(self) -> (NewRouteArea, Vec<AreaPointRequest>) {
        let area = NewRouteArea {
            place_id: self.place_id,
            name: self.name.trim().to_string(),
            description: self.description,
            status: self.status.unwrap_or_default(),
            source_data_hint: self.source_data_hint,
            generation_parameters: self.generation_parameters,
        };
        (area, self.points)
    }
}

// Request para actualizar un área. `generation_parameters: null` los borra.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRouteAreaRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<AreaStatus>,

    #[validate(range(min = 1))]
    pub version: Option<i32>,

    pub source_data_hint: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub generation_parameters: Option<Option<serde_json::Value>>,
}

impl TryFrom<UpdateRouteAreaRequest> for RouteAreaChanges {
    type Error = AppError;

    fn try_from(request: UpdateRouteAreaRequest) -> AppResult<Self> {
        if let Some(Some(params)) = &request.generation_parameters {
            if !params.is_object() {
                return Err(AppError::BadRequest(
                    "generation_parameters must be a JSON object".to_string(),
                ));
            }
        }

        Ok(Self {
            name: request.name.map(|n| n.trim().to_string()),
            description: request.description,
            status: request.status,
            version: request.version,
            source_data_hint: request.source_data_hint,
            generation_parameters: request.generation_parameters,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReplaceAreaPointsRequest {
    #[validate]
    pub points: Vec<AreaPointRequest>,
}

// Response de vértice
#[derive(Debug, Serialize, Deserialize)]
pub struct AreaPointResponse {
    pub id: Uuid,
    pub sequence_number: i32,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub alt: Option<f64>,
}

impl From<AreaPoint> for AreaPointResponse {
    fn from(point: AreaPoint) -> Self {
        Self {
            id: point.id,
            sequence_number: point.sequence_number,
            lat: point.latitude,
            lng: point.longitude,
            alt: point.altitude,
        }
    }
}

// Response de área
#[derive(Debug, Serialize, Deserialize)]
pub struct RouteAreaResponse {
    pub id: Uuid,
    pub place_id: Uuid,
    pub name: String,
    pub description: String,
    pub status: AreaStatus,
    pub version: i32,
    pub source_data_hint: String,
    pub generation_parameters: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<AreaPointResponse>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RouteAreaResponse {
    pub fn new(area: RouteArea, points: Option<Vec<AreaPoint>>) -> Self {
        Self {
            id: area.id,
            place_id: area.place_id,
            name: area.name,
            description: area.description,
            status: area.status,
            version: area.version,
            source_data_hint: area.source_data_hint,
            generation_parameters: area.generation_parameters,
            points: points.map(|p| p.into_iter().map(AreaPointResponse::from).collect()),
            created_at: area.created_at,
            updated_at: area.updated_at,
        }
    }
}
