use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::car_dto::{AssignRouteRequest, CarResponse, CreateCarRequest, StatusEventRequest, UpdateCarRequest};
use crate::dto::common::ApiResponse;
use crate::models::Car;
use crate::repositories::SharedRepository;
use crate::services::assignment::{transition, AssignmentEvent};
use crate::utils::errors::{not_found_error, AppResult};

pub struct CarController {
    repository: SharedRepository,
}

impl CarController {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }

    pub async fn create(&self, request: CreateCarRequest) -> AppResult<ApiResponse<CarResponse>> {
        request.validate()?;

        let car = self.repository.create_car(request.into()).await?;
        info!("🚗 Coche '{}' creado", car.name);

        Ok(ApiResponse::success_with_message(
            car.into(),
            "Car created".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<CarResponse> {
        Ok(self.find(id).await?.into())
    }

    pub async fn list(&self) -> AppResult<Vec<CarResponse>> {
        let cars = self.repository.list_cars().await?;
        Ok(cars.into_iter().map(CarResponse::from).collect())
    }

    /// Coche que tiene asignada la ruta (lista vacía si ninguno)
    pub async fn find_by_assigned_route(&self, route_id: Uuid) -> AppResult<Vec<CarResponse>> {
        let car = self.repository.find_car_by_assigned_route(route_id).await?;
        Ok(car.into_iter().map(CarResponse::from).collect())
    }

    pub async fn update(&self, id: Uuid, request: UpdateCarRequest) -> AppResult<ApiResponse<CarResponse>> {
        request.validate()?;

        let car = self.repository.update_car(id, request.into()).await?;
        Ok(ApiResponse::success_with_message(
            car.into(),
            "Car updated".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        self.repository.delete_car(id).await?;
        info!("🗑️ Coche {} eliminado", id);
        Ok(ApiResponse::message("Car deleted".to_string()))
    }

    /// Asignar una ruta. Si otro coche la tiene devuelve `AssignmentConflict`.
    pub async fn assign(&self, id: Uuid, request: AssignRouteRequest) -> AppResult<ApiResponse<CarResponse>> {
        let at = request.at.unwrap_or_else(Utc::now);
        let car = self.repository.assign_route(id, request.route_id, at).await?;

        Ok(ApiResponse::success_with_message(
            car.into(),
            format!("Route {} assigned", request.route_id),
        ))
    }

    pub async fn release(&self, id: Uuid) -> AppResult<ApiResponse<CarResponse>> {
        let car = self.apply_event(id, AssignmentEvent::Release).await?;
        Ok(ApiResponse::success_with_message(
            car.into(),
            "Route released".to_string(),
        ))
    }

    pub async fn start(&self, id: Uuid, request: StatusEventRequest) -> AppResult<ApiResponse<CarResponse>> {
        let at = request.at.unwrap_or_else(Utc::now);
        let car = self.apply_event(id, AssignmentEvent::Start { at }).await?;
        Ok(ApiResponse::success_with_message(
            car.into(),
            "Route started".to_string(),
        ))
    }

    pub async fn complete(&self, id: Uuid, request: StatusEventRequest) -> AppResult<ApiResponse<CarResponse>> {
        let at = request.at.unwrap_or_else(Utc::now);
        let car = self.apply_event(id, AssignmentEvent::Complete { at }).await?;
        Ok(ApiResponse::success_with_message(
            car.into(),
            "Route completed".to_string(),
        ))
    }

    pub async fn fail(&self, id: Uuid, request: StatusEventRequest) -> AppResult<ApiResponse<CarResponse>> {
        let at = request.at.unwrap_or_else(Utc::now);
        let car = self.apply_event(id, AssignmentEvent::Fail { at }).await?;
        warn!("⚠️ Ruta {:?} fallida en el coche '{}'", car.assigned_route_id, car.name);
        Ok(ApiResponse::success_with_message(
            car.into(),
            "Route marked as failed".to_string(),
        ))
    }

    async fn find(&self, id: Uuid) -> AppResult<Car> {
        self.repository
            .find_car(id)
            .await?
            .ok_or_else(|| not_found_error("Car", &id.to_string()))
    }

    /// Calcula el siguiente estado y lo guarda sólo si nadie lo cambió antes
    async fn apply_event(&self, id: Uuid, event: AssignmentEvent) -> AppResult<Car> {
        let car = self.find(id).await?;
        let next = transition(&car.assignment(), event)?;
        let saved = self
            .repository
            .save_assignment(id, car.assignment_status, next)
            .await?;

        info!(
            "🔄 Coche '{}': {} -> {}",
            saved.name, car.assignment_status, saved.assignment_status
        );
        Ok(saved)
    }
}
