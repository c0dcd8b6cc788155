use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{CarType, CarTypeChanges, MoveType, NewCarType};
use crate::utils::validation::{validate_curvature, validate_non_negative_decimal, validate_not_blank};

// Request para crear un tipo de vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCarTypeRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub type_name: String,

    #[serde(default)]
    pub description: String,

    #[validate(custom = "validate_non_negative_decimal")]
    pub width: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub height: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub length: Option<Decimal>,

    pub move_type: Option<MoveType>,

    #[validate(custom = "validate_non_negative_decimal")]
    pub cutting_width: Option<Decimal>,
    #[validate(custom = "validate_curvature")]
    pub curvature: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub turning_radius: Option<Decimal>,
}

impl From<CreateCarTypeRequest> for NewCarType {
    fn from(request: CreateCarTypeRequest) -> Self {
        Self {
            type_name: request.type_name.trim().to_string(),
            description: request.description,
            width: request.width,
            height: request.height,
            length: request.length,
            move_type: request.move_type.unwrap_or_default(),
            cutting_width: request.cutting_width,
            curvature: request.curvature,
            turning_radius: request.turning_radius,
        }
    }
}

// Request para actualizar un tipo de vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCarTypeRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub type_name: Option<String>,
    pub description: Option<String>,

    #[validate(custom = "validate_non_negative_decimal")]
    pub width: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub height: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub length: Option<Decimal>,

    pub move_type: Option<MoveType>,

    #[validate(custom = "validate_non_negative_decimal")]
    pub cutting_width: Option<Decimal>,
    #[validate(custom = "validate_curvature")]
    pub curvature: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub turning_radius: Option<Decimal>,
}

impl From<UpdateCarTypeRequest> for CarTypeChanges {
    fn from(request: UpdateCarTypeRequest) -> Self {
        Self {
            type_name: request.type_name.map(|n| n.trim().to_string()),
            description: request.description,
            width: request.width,
            height: request.height,
            length: request.length,
            move_type: request.move_type,
            cutting_width: request.cutting_width,
            curvature: request.curvature,
            turning_radius: request.turning_radius,
        }
    }
}

// Response de tipo de vehículo
#[derive(Debug, Serialize, Deserialize)]
pub struct CarTypeResponse {
    pub id: Uuid,
    pub type_name: String,
    pub description: String,
    pub width: Option<Decimal>,
    pub height: Option<Decimal>,
    pub length: Option<Decimal>,
    pub move_type: MoveType,
    pub move_type_label: String,
    pub cutting_width: Option<Decimal>,
    pub curvature: Option<Decimal>,
    pub turning_radius: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CarType> for CarTypeResponse {
    fn from(car_type: CarType) -> Self {
        Self {
            id: car_type.id,
            move_type_label: car_type.move_type.label().to_string(),
            type_name: car_type.type_name,
            description: car_type.description,
            width: car_type.width,
            height: car_type.height,
            length: car_type.length,
            move_type: car_type.move_type,
            cutting_width: car_type.cutting_width,
            curvature: car_type.curvature,
            turning_radius: car_type.turning_radius,
            created_at: car_type.created_at,
            updated_at: car_type.updated_at,
        }
    }
}
