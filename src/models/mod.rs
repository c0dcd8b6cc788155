//! Modelos de datos
//!
//! Structs que mapean las tablas de PostgreSQL y los enums cerrados del
//! dominio (tipo de lugar, tipo de movimiento, tipo de ruta, estado del área
//! y estado de la asignación).

pub mod car;
pub mod car_type;
pub mod geometry;
pub mod place;
pub mod route;
pub mod route_area;

pub use car::{AssignmentState, AssignmentStatus, Car, CarChanges, NewCar};
pub use car_type::{CarType, CarTypeChanges, MoveType, NewCarType};
pub use geometry::GeoPoint;
pub use place::{NewPlace, Place, PlaceChanges, PlaceType};
pub use route::{NewRoute, NewRoutePoint, Route, RouteChanges, RoutePoint, RouteType};
pub use route_area::{
    AreaPoint, AreaStatus, NewAreaPoint, NewRouteArea, RouteArea, RouteAreaChanges,
};
