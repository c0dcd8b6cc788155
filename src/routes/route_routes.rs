use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::route_controller::RouteController;
use crate::dto::common::ApiResponse;
use crate::dto::route_dto::{
    CreateRouteRequest, ImportRouteRequest, PlaceFilterQuery, RouteResponse, UpdateRouteRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_routes).post(create_route))
        .route("/import", post(import_route))
        .route("/:id", get(get_route).put(update_route).delete(delete_route))
}

async fn create_route(
    State(state): State<AppState>,
    Json(request): Json<CreateRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.repository.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn import_route(
    State(state): State<AppState>,
    Json(request): Json<ImportRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.repository.clone());
    let response = controller.import(request).await?;
    Ok(Json(response))
}

async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.repository.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn list_routes(
    State(state): State<AppState>,
    Query(query): Query<PlaceFilterQuery>,
) -> Result<Json<ApiResponse<Vec<RouteResponse>>>, AppError> {
    let controller = RouteController::new(state.repository.clone());
    let response = controller.list(query.place_id).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.repository.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = RouteController::new(state.repository.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}
