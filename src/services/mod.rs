//! Services module
//!
//! Lógica de dominio sin acceso a datos: la máquina de estados de la
//! asignación de rutas y la exportación GeoJSON de las áreas.

pub mod assignment;
pub mod geojson_export;

pub use assignment::{transition, AssignmentEvent};
pub use geojson_export::{area_to_feature, Feature, FeatureCollection};
