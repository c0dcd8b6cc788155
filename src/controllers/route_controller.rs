use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::route_dto::{CreateRouteRequest, ImportRouteRequest, RouteResponse, UpdateRouteRequest};
use crate::models::{NewRoute, NewRoutePoint, Route};
use crate::repositories::SharedRepository;
use crate::utils::errors::{bad_request_error, not_found_error, AppResult};
use crate::utils::validation::ensure_unique_sequences;

pub struct RouteController {
    repository: SharedRepository,
}

impl RouteController {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }

    pub async fn create(&self, request: CreateRouteRequest) -> AppResult<ApiResponse<RouteResponse>> {
        request.validate()?;
        let response = self.create_with_points(request).await?;
        Ok(ApiResponse::success_with_message(
            response,
            "Route created".to_string(),
        ))
    }

    /// Ruta generada por la aplicación externa; siempre es una ruta nueva
    pub async fn import(&self, request: ImportRouteRequest) -> AppResult<ApiResponse<RouteResponse>> {
        request.validate()?;
        if request.points.is_empty() {
            return Err(bad_request_error("Imported route has no points"));
        }

        let response = self.create_with_points(request.into()).await?;
        info!(
            "📥 Ruta '{}' importada con {} puntos",
            response.name,
            response.points.as_ref().map_or(0, Vec::len)
        );
        Ok(ApiResponse::success_with_message(
            response,
            "Route imported".to_string(),
        ))
    }

    /// Ruta con sus puntos, `is_in_use` y el coche asignado
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<RouteResponse> {
        let route = self.find(id).await?;
        let points = self.repository.list_route_points(id).await?;
        let car = self.repository.find_car_by_assigned_route(id).await?;
        Ok(RouteResponse::new(route, car.map(|c| c.id), Some(points)))
    }

    pub async fn list(&self, place_id: Option<Uuid>) -> AppResult<Vec<RouteResponse>> {
        let routes = self.repository.list_routes(place_id).await?;

        let mut responses = Vec::with_capacity(routes.len());
        for route in routes {
            let car = self.repository.find_car_by_assigned_route(route.id).await?;
            responses.push(RouteResponse::new(route, car.map(|c| c.id), None));
        }
        Ok(responses)
    }

    pub async fn update(&self, id: Uuid, request: UpdateRouteRequest) -> AppResult<ApiResponse<RouteResponse>> {
        request.validate()?;

        let route = self.repository.update_route(id, request.into()).await?;
        let car = self.repository.find_car_by_assigned_route(id).await?;
        Ok(ApiResponse::success_with_message(
            RouteResponse::new(route, car.map(|c| c.id), None),
            "Route updated".to_string(),
        ))
    }

    /// Borra la ruta y sus puntos; el coche que la tenía queda sin ruta
    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        self.repository.delete_route(id).await?;
        info!("🗑️ Ruta {} eliminada", id);
        Ok(ApiResponse::message("Route deleted".to_string()))
    }

    async fn find(&self, id: Uuid) -> AppResult<Route> {
        self.repository
            .find_route(id)
            .await?
            .ok_or_else(|| not_found_error("Route", &id.to_string()))
    }

    async fn create_with_points(&self, request: CreateRouteRequest) -> AppResult<RouteResponse> {
        ensure_unique_sequences(request.points.iter().map(|p| p.sequence_number), "Route point")?;

        if let Some(area_id) = request.source_area_id {
            let area = self
                .repository
                .find_route_area(area_id)
                .await?
                .ok_or_else(|| bad_request_error(&format!("RouteArea '{}' does not exist", area_id)))?;
            if area.place_id != request.place_id {
                return Err(bad_request_error(&format!(
                    "RouteArea '{}' belongs to a different place",
                    area_id
                )));
            }
        }

        let points = request
            .points
            .into_iter()
            .map(|p| p.into_new_point())
            .collect::<AppResult<Vec<NewRoutePoint>>>()?;

        let route = self
            .repository
            .create_route(
                NewRoute {
                    place_id: request.place_id,
                    name: request.name.trim().to_string(),
                    description: request.description,
                    car_type_id: request.car_type_id,
                    route_type: request.route_type.unwrap_or_default(),
                    source_area_id: request.source_area_id,
                    source_info_text: request.source_info_text,
                    calculated_at: request.calculated_at.unwrap_or_else(Utc::now),
                },
                points,
            )
            .await?;

        let points = self.repository.list_route_points(route.id).await?;
        Ok(RouteResponse::new(route, None, Some(points)))
    }
}
