use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::route_area_controller::RouteAreaController;
use crate::dto::common::ApiResponse;
use crate::dto::route_area_dto::{
    CreateRouteAreaRequest, ReplaceAreaPointsRequest, RouteAreaResponse, UpdateRouteAreaRequest,
};
use crate::dto::route_dto::PlaceFilterQuery;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_route_area_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_route_areas).post(create_route_area))
        .route(
            "/:id",
            get(get_route_area).put(update_route_area).delete(delete_route_area),
        )
        .route("/:id/points", put(replace_area_points))
        .route("/:id/geojson", get(export_geojson))
}

async fn create_route_area(
    State(state): State<AppState>,
    Json(request): Json<CreateRouteAreaRequest>,
) -> Result<Json<ApiResponse<RouteAreaResponse>>, AppError> {
    let controller = RouteAreaController::new(state.repository.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn get_route_area(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RouteAreaResponse>>, AppError> {
    let controller = RouteAreaController::new(state.repository.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn list_route_areas(
    State(state): State<AppState>,
    Query(query): Query<PlaceFilterQuery>,
) -> Result<Json<ApiResponse<Vec<RouteAreaResponse>>>, AppError> {
    let controller = RouteAreaController::new(state.repository.clone());
    let response = controller.list(query.place_id).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn update_route_area(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRouteAreaRequest>,
) -> Result<Json<ApiResponse<RouteAreaResponse>>, AppError> {
    let controller = RouteAreaController::new(state.repository.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_route_area(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = RouteAreaController::new(state.repository.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

async fn replace_area_points(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ReplaceAreaPointsRequest>,
) -> Result<Json<ApiResponse<RouteAreaResponse>>, AppError> {
    let controller = RouteAreaController::new(state.repository.clone());
    let response = controller.replace_points(id, request).await?;
    Ok(Json(response))
}

// 204 si el área todavía no tiene vértices
async fn export_geojson(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let controller = RouteAreaController::new(state.repository.clone());
    let response = match controller.export_geojson(id).await? {
        Some(feature) => (
            [(header::CONTENT_TYPE, "application/geo+json")],
            Json(feature),
        )
            .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    };
    Ok(response)
}
