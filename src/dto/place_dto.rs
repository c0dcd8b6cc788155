use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{NewPlace, Place, PlaceChanges, PlaceType};
use crate::models::place::DEFAULT_INITIAL_ZOOM;
use crate::utils::validation::{validate_latitude_decimal, validate_longitude_decimal, validate_not_blank};

// Request para crear un lugar
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlaceRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub name: String,

    pub place_type: Option<PlaceType>,

    #[validate(custom = "validate_latitude_decimal")]
    pub center_lat: Decimal,

    #[validate(custom = "validate_longitude_decimal")]
    pub center_lng: Decimal,

    #[validate(range(min = 0, max = 22))]
    pub initial_zoom: Option<i32>,
}

impl From<CreatePlaceRequest> for NewPlace {
    fn from(request: CreatePlaceRequest) -> Self {
        Self {
            name: request.name.trim().to_string(),
            place_type: request.place_type.unwrap_or_default(),
            center_lat: request.center_lat,
            center_lng: request.center_lng,
            initial_zoom: request.initial_zoom.unwrap_or(DEFAULT_INITIAL_ZOOM),
        }
    }
}

// Request para actualizar un lugar
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePlaceRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub name: Option<String>,

    pub place_type: Option<PlaceType>,

    #[validate(custom = "validate_latitude_decimal")]
    pub center_lat: Option<Decimal>,

    #[validate(custom = "validate_longitude_decimal")]
    pub center_lng: Option<Decimal>,

    #[validate(range(min = 0, max = 22))]
    pub initial_zoom: Option<i32>,
}

impl From<UpdatePlaceRequest> for PlaceChanges {
    fn from(request: UpdatePlaceRequest) -> Self {
        Self {
            name: request.name.map(|n| n.trim().to_string()),
            place_type: request.place_type,
            center_lat: request.center_lat,
            center_lng: request.center_lng,
            initial_zoom: request.initial_zoom,
        }
    }
}

// Response de lugar
#[derive(Debug, Serialize, Deserialize)]
pub struct PlaceResponse {
    pub id: Uuid,
    pub name: String,
    pub place_type: PlaceType,
    pub place_type_label: String,
    pub center_lat: Decimal,
    pub center_lng: Decimal,
    pub initial_zoom: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Place> for PlaceResponse {
    fn from(place: Place) -> Self {
        Self {
            id: place.id,
            place_type_label: place.place_type.label().to_string(),
            name: place.name,
            place_type: place.place_type,
            center_lat: place.center_lat,
            center_lng: place.center_lng,
            initial_zoom: place.initial_zoom,
            created_at: place.created_at,
            updated_at: place.updated_at,
        }
    }
}
