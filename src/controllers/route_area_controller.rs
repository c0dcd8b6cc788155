use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::route_area_dto::{
    AreaPointRequest, CreateRouteAreaRequest, ReplaceAreaPointsRequest, RouteAreaResponse,
    UpdateRouteAreaRequest,
};
use crate::models::{NewAreaPoint, RouteArea, RouteAreaChanges};
use crate::repositories::SharedRepository;
use crate::services::geojson_export::{area_to_feature, Feature};
use crate::utils::errors::{not_found_error, AppResult};
use crate::utils::validation::ensure_unique_sequences;

pub struct RouteAreaController {
    repository: SharedRepository,
}

fn to_new_points(points: Vec<AreaPointRequest>) -> AppResult<Vec<NewAreaPoint>> {
    ensure_unique_sequences(points.iter().map(|p| p.sequence_number), "Area point")?;
    points.into_iter().map(AreaPointRequest::into_new_point).collect()
}

impl RouteAreaController {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }

    pub async fn create(&self, request: CreateRouteAreaRequest) -> AppResult<ApiResponse<RouteAreaResponse>> {
        request.validate()?;

        let (area, points) = request.into_parts();
        let points = to_new_points(points)?;
        let area = self.repository.create_route_area(area, points).await?;
        let points = self.repository.list_area_points(area.id).await?;

        Ok(ApiResponse::success_with_message(
            RouteAreaResponse::new(area, Some(points)),
            "Route area created".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<RouteAreaResponse> {
        let area = self.find(id).await?;
        let points = self.repository.list_area_points(id).await?;
        Ok(RouteAreaResponse::new(area, Some(points)))
    }

    pub async fn list(&self, place_id: Option<Uuid>) -> AppResult<Vec<RouteAreaResponse>> {
        let areas = self.repository.list_route_areas(place_id).await?;
        Ok(areas
            .into_iter()
            .map(|a| RouteAreaResponse::new(a, None))
            .collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateRouteAreaRequest,
    ) -> AppResult<ApiResponse<RouteAreaResponse>> {
        request.validate()?;

        let changes = RouteAreaChanges::try_from(request)?;
        let area = self.repository.update_route_area(id, changes).await?;
        Ok(ApiResponse::success_with_message(
            RouteAreaResponse::new(area, None),
            "Route area updated".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        self.repository.delete_route_area(id).await?;
        info!("🗑️ Área {} eliminada", id);
        Ok(ApiResponse::message("Route area deleted".to_string()))
    }

    /// Sustituye todos los vértices y sube la versión del área
    pub async fn replace_points(
        &self,
        id: Uuid,
        request: ReplaceAreaPointsRequest,
    ) -> AppResult<ApiResponse<RouteAreaResponse>> {
        request.validate()?;

        let points = to_new_points(request.points)?;
        let area = self.repository.replace_area_points(id, points).await?;
        let points = self.repository.list_area_points(id).await?;

        Ok(ApiResponse::success_with_message(
            RouteAreaResponse::new(area, Some(points)),
            "Route area points replaced".to_string(),
        ))
    }

    /// `None` si el área no tiene vértices
    pub async fn export_geojson(&self, id: Uuid) -> AppResult<Option<Feature>> {
        let area = self.find(id).await?;
        let place_name = self
            .repository
            .find_place(area.place_id)
            .await?
            .map(|p| p.name)
            .unwrap_or_default();
        let points = self.repository.list_area_points(id).await?;

        area_to_feature(&area, &place_name, &points)
    }

    async fn find(&self, id: Uuid) -> AppResult<RouteArea> {
        self.repository
            .find_route_area(id)
            .await?
            .ok_or_else(|| not_found_error("RouteArea", &id.to_string()))
    }
}
