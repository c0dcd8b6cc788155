pub mod car_dto;
pub mod car_type_dto;
pub mod common;
pub mod place_dto;
pub mod route_area_dto;
pub mod route_dto;

pub use common::ApiResponse;
