use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::car_type_controller::CarTypeController;
use crate::dto::car_type_dto::{CarTypeResponse, CreateCarTypeRequest, UpdateCarTypeRequest};
use crate::dto::common::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_car_type_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_car_types).post(create_car_type))
        .route("/:id", get(get_car_type).put(update_car_type).delete(delete_car_type))
}

async fn create_car_type(
    State(state): State<AppState>,
    Json(request): Json<CreateCarTypeRequest>,
) -> Result<Json<ApiResponse<CarTypeResponse>>, AppError> {
    let controller = CarTypeController::new(state.repository.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn get_car_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CarTypeResponse>>, AppError> {
    let controller = CarTypeController::new(state.repository.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn list_car_types(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CarTypeResponse>>>, AppError> {
    let controller = CarTypeController::new(state.repository.clone());
    let response = controller.list().await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn update_car_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCarTypeRequest>,
) -> Result<Json<ApiResponse<CarTypeResponse>>, AppError> {
    let controller = CarTypeController::new(state.repository.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_car_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = CarTypeController::new(state.repository.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}
