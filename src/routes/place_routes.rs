use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::place_controller::PlaceController;
use crate::dto::common::ApiResponse;
use crate::dto::place_dto::{CreatePlaceRequest, PlaceResponse, UpdatePlaceRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_place_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_places).post(create_place))
        .route("/:id", get(get_place).put(update_place).delete(delete_place))
        .route("/:id/route-areas/export", get(export_route_areas))
}

async fn create_place(
    State(state): State<AppState>,
    Json(request): Json<CreatePlaceRequest>,
) -> Result<Json<ApiResponse<PlaceResponse>>, AppError> {
    let controller = PlaceController::new(state.repository.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn get_place(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PlaceResponse>>, AppError> {
    let controller = PlaceController::new(state.repository.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn list_places(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PlaceResponse>>>, AppError> {
    let controller = PlaceController::new(state.repository.clone());
    let response = controller.list().await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn update_place(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePlaceRequest>,
) -> Result<Json<ApiResponse<PlaceResponse>>, AppError> {
    let controller = PlaceController::new(state.repository.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_place(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = PlaceController::new(state.repository.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

// GeoJSON sin envolver, para la aplicación de PC
async fn export_route_areas(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let controller = PlaceController::new(state.repository.clone());
    let collection = controller.export_route_areas(id).await?;
    Ok(([(header::CONTENT_TYPE, "application/geo+json")], Json(collection)))
}
