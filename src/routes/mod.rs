//! Routers de Axum
//!
//! Un router por recurso, montados bajo `/api`, más las páginas web.

pub mod car_routes;
pub mod car_type_routes;
pub mod place_routes;
pub mod route_area_routes;
pub mod route_routes;
pub mod web_routes;

use axum::Router;

use crate::state::AppState;

/// Router de la API REST
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/places", place_routes::create_place_router())
        .nest("/car-types", car_type_routes::create_car_type_router())
        .nest("/cars", car_routes::create_car_router())
        .nest("/routes", route_routes::create_route_router())
        .nest("/route-areas", route_area_routes::create_route_area_router())
}

/// Aplicación completa con el estado ya inyectado
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(web_routes::create_web_router())
        .nest("/api", create_api_router())
        .with_state(state)
}
