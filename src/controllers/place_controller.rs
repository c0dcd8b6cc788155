use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::place_dto::{CreatePlaceRequest, PlaceResponse, UpdatePlaceRequest};
use crate::models::AreaStatus;
use crate::repositories::SharedRepository;
use crate::services::geojson_export::{area_to_feature, FeatureCollection};
use crate::utils::errors::{not_found_error, AppResult};

pub struct PlaceController {
    repository: SharedRepository,
}

impl PlaceController {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }

    pub async fn create(&self, request: CreatePlaceRequest) -> AppResult<ApiResponse<PlaceResponse>> {
        request.validate()?;

        let place = self.repository.create_place(request.into()).await?;
        info!("📍 Lugar '{}' creado ({})", place.name, place.place_type);

        Ok(ApiResponse::success_with_message(
            place.into(),
            "Place created".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<PlaceResponse> {
        let place = self
            .repository
            .find_place(id)
            .await?
            .ok_or_else(|| not_found_error("Place", &id.to_string()))?;
        Ok(place.into())
    }

    pub async fn list(&self) -> AppResult<Vec<PlaceResponse>> {
        let places = self.repository.list_places().await?;
        Ok(places.into_iter().map(PlaceResponse::from).collect())
    }

    pub async fn update(&self, id: Uuid, request: UpdatePlaceRequest) -> AppResult<ApiResponse<PlaceResponse>> {
        request.validate()?;

        let place = self.repository.update_place(id, request.into()).await?;
        Ok(ApiResponse::success_with_message(
            place.into(),
            "Place updated".to_string(),
        ))
    }

    /// Borra el lugar junto con sus rutas y áreas
    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        self.repository.delete_place(id).await?;
        info!("🗑️ Lugar {} eliminado", id);
        Ok(ApiResponse::message("Place deleted".to_string()))
    }

    /// FeatureCollection con las áreas `defined` del lugar.
    /// Las áreas sin vértices no aportan feature.
    pub async fn export_route_areas(&self, place_id: Uuid) -> AppResult<FeatureCollection> {
        let place = self
            .repository
            .find_place(place_id)
            .await?
            .ok_or_else(|| not_found_error("Place", &place_id.to_string()))?;

        let areas = self.repository.list_route_areas(Some(place_id)).await?;

        let mut features = Vec::new();
        for area in areas.iter().filter(|a| a.status == AreaStatus::Defined) {
            let points = self.repository.list_area_points(area.id).await?;
            if let Some(feature) = area_to_feature(area, &place.name, &points)? {
                features.push(feature);
            }
        }

        info!("🗺️ Exportadas {} áreas de '{}'", features.len(), place.name);
        Ok(FeatureCollection::new(features))
    }
}
