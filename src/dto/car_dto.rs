use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::common::double_option;
use crate::models::{AssignmentStatus, Car, CarChanges, NewCar};
use crate::utils::validation::validate_not_blank;

// Request para crear un coche
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCarRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub name: String,
    pub car_type_id: Option<Uuid>,
    pub base_place_id: Option<Uuid>,
}

impl From<CreateCarRequest> for NewCar {
    fn from(request: CreateCarRequest) -> Self {
        Self {
            name: request.name.trim().to_string(),
            car_type_id: request.car_type_id,
            base_place_id: request.base_place_id,
        }
    }
}

// Request para actualizar un coche. `null` explícito borra la referencia.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCarRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub car_type_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "double_option")]
    pub base_place_id: Option<Option<Uuid>>,
}

impl From<UpdateCarRequest> for CarChanges {
    fn from(request: UpdateCarRequest) -> Self {
        Self {
            name: request.name.map(|n| n.trim().to_string()),
            car_type_id: request.car_type_id,
            base_place_id: request.base_place_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignRouteRequest {
    pub route_id: Uuid,
    pub at: Option<DateTime<Utc>>,
}

/// Cuerpo opcional de start / complete / fail
#[derive(Debug, Default, Deserialize)]
pub struct StatusEventRequest {
    pub at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CarListQuery {
    pub assigned_route: Option<Uuid>,
}

// Response de coche
#[derive(Debug, Serialize, Deserialize)]
pub struct CarResponse {
    pub id: Uuid,
    pub name: String,
    pub car_type_id: Option<Uuid>,
    pub base_place_id: Option<Uuid>,
    pub assigned_route_id: Option<Uuid>,
    pub assignment_status: AssignmentStatus,
    pub assignment_status_label: String,
    pub assigned_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Car> for CarResponse {
    fn from(car: Car) -> Self {
        Self {
            id: car.id,
            assignment_status_label: car.assignment_status.label().to_string(),
            name: car.name,
            car_type_id: car.car_type_id,
            base_place_id: car.base_place_id,
            assigned_route_id: car.assigned_route_id,
            assignment_status: car.assignment_status,
            assigned_at: car.assigned_at,
            started_at: car.started_at,
            completed_at: car.completed_at,
            created_at: car.created_at,
            updated_at: car.updated_at,
        }
    }
}
