use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::car_type_dto::{CarTypeResponse, CreateCarTypeRequest, UpdateCarTypeRequest};
use crate::dto::common::ApiResponse;
use crate::repositories::SharedRepository;
use crate::utils::errors::{not_found_error, AppResult};

pub struct CarTypeController {
    repository: SharedRepository,
}

impl CarTypeController {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }

    pub async fn create(&self, request: CreateCarTypeRequest) -> AppResult<ApiResponse<CarTypeResponse>> {
        request.validate()?;

        let car_type = self.repository.create_car_type(request.into()).await?;
        info!("🚜 Tipo de vehículo '{}' creado", car_type);

        Ok(ApiResponse::success_with_message(
            car_type.into(),
            "Car type created".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<CarTypeResponse> {
        let car_type = self
            .repository
            .find_car_type(id)
            .await?
            .ok_or_else(|| not_found_error("CarType", &id.to_string()))?;
        Ok(car_type.into())
    }

    pub async fn list(&self) -> AppResult<Vec<CarTypeResponse>> {
        let car_types = self.repository.list_car_types().await?;
        Ok(car_types.into_iter().map(CarTypeResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateCarTypeRequest,
    ) -> AppResult<ApiResponse<CarTypeResponse>> {
        request.validate()?;

        let car_type = self.repository.update_car_type(id, request.into()).await?;
        Ok(ApiResponse::success_with_message(
            car_type.into(),
            "Car type updated".to_string(),
        ))
    }

    /// Falla con `Protected` mientras alguna ruta o coche lo use
    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        self.repository.delete_car_type(id).await?;
        info!("🗑️ Tipo de vehículo {} eliminado", id);
        Ok(ApiResponse::message("Car type deleted".to_string()))
    }
}
