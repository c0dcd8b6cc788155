//! Controladores
//!
//! Orquestan validación, repositorio y servicios para cada recurso de la API.

pub mod car_controller;
pub mod car_type_controller;
pub mod place_controller;
pub mod route_area_controller;
pub mod route_controller;
