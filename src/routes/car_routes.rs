use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::car_controller::CarController;
use crate::dto::car_dto::{
    AssignRouteRequest, CarListQuery, CarResponse, CreateCarRequest, StatusEventRequest,
    UpdateCarRequest,
};
use crate::dto::common::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_car_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cars).post(create_car))
        .route("/:id", get(get_car).put(update_car).delete(delete_car))
        .route("/:id/assign", post(assign_route))
        .route("/:id/release", post(release_route))
        .route("/:id/start", post(start_route))
        .route("/:id/complete", post(complete_route))
        .route("/:id/fail", post(fail_route))
}

async fn create_car(
    State(state): State<AppState>,
    Json(request): Json<CreateCarRequest>,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    let controller = CarController::new(state.repository.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    let controller = CarController::new(state.repository.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(response)))
}

// ?assigned_route=<id> filtra por la ruta asignada
async fn list_cars(
    State(state): State<AppState>,
    Query(query): Query<CarListQuery>,
) -> Result<Json<ApiResponse<Vec<CarResponse>>>, AppError> {
    let controller = CarController::new(state.repository.clone());
    let response = match query.assigned_route {
        Some(route_id) => controller.find_by_assigned_route(route_id).await?,
        None => controller.list().await?,
    };
    Ok(Json(ApiResponse::success(response)))
}

async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCarRequest>,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    let controller = CarController::new(state.repository.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = CarController::new(state.repository.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

async fn assign_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignRouteRequest>,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    let controller = CarController::new(state.repository.clone());
    let response = controller.assign(id, request).await?;
    Ok(Json(response))
}

async fn release_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    let controller = CarController::new(state.repository.clone());
    let response = controller.release(id).await?;
    Ok(Json(response))
}

// El cuerpo es opcional: sin `at` se usa la hora actual
async fn start_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    let request = parse_status_event(&body)?;
    let controller = CarController::new(state.repository.clone());
    let response = controller.start(id, request).await?;
    Ok(Json(response))
}

async fn complete_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    let request = parse_status_event(&body)?;
    let controller = CarController::new(state.repository.clone());
    let response = controller.complete(id, request).await?;
    Ok(Json(response))
}

async fn fail_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    let request = parse_status_event(&body)?;
    let controller = CarController::new(state.repository.clone());
    let response = controller.fail(id, request).await?;
    Ok(Json(response))
}

// Cuerpo vacío => valores por defecto; cuerpo presente pero inválido => 400
fn parse_status_event(body: &[u8]) -> Result<StatusEventRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(StatusEventRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid status event body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_event() {
        assert!(parse_status_event(b"").unwrap().at.is_none());
        assert!(parse_status_event(b"  \n").unwrap().at.is_none());
        assert!(parse_status_event(b"{}").unwrap().at.is_none());

        let request = parse_status_event(br#"{"at": "2026-01-01T09:00:00Z"}"#).unwrap();
        assert!(request.at.is_some());

        assert!(matches!(
            parse_status_event(br#"{"at": "not-a-timestamp"}"#),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(parse_status_event(b"garbage"), Err(AppError::BadRequest(_))));
    }
}
