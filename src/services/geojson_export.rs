//! Exportación de RouteArea a GeoJSON
//!
//! Convierte un área y sus vértices en un `Feature` de tipo `Polygon` para la
//! aplicación de PC que genera las rutas. Los parámetros de generación se
//! pasan tal cual, sin imponer ningún esquema.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::models::{AreaPoint, GeoPoint, RouteArea};
use crate::utils::errors::{AppError, AppResult};

/// Geometría Polygon: lista de anillos de pares `[lng, lat]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

impl PolygonGeometry {
    pub fn new(ring: Vec<[f64; 2]>) -> Self {
        Self {
            kind: "Polygon".to_string(),
            coordinates: vec![ring],
        }
    }

    /// Anillo exterior
    pub fn exterior(&self) -> &[[f64; 2]] {
        self.coordinates.first().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Propiedades que acompañan al polígono exportado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaProperties {
    pub area_id: Uuid,
    pub area_name: String,
    pub place_name: String,
    pub description: String,
    pub version: i32,
    pub source_data_hint: String,
    pub generation_parameters: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: PolygonGeometry,
    pub properties: AreaProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }
}

/// Construir el anillo del polígono a partir de los vértices.
///
/// Los vértices se ordenan por `sequence_number`. Con más de dos puntos el
/// anillo se cierra repitiendo el primero, salvo que ya esté cerrado.
pub fn build_ring(area: &RouteArea, points: &[AreaPoint]) -> AppResult<Vec<[f64; 2]>> {
    let mut ordered: Vec<&AreaPoint> = points.iter().collect();
    ordered.sort_by_key(|p| p.sequence_number);

    let mut ring = Vec::with_capacity(ordered.len() + 1);
    for point in ordered {
        let location = point.location().ok_or_else(|| {
            AppError::MalformedArea(format!(
                "Area '{}' vertex {} has no coordinate",
                area.name, point.sequence_number
            ))
        })?;
        GeoPoint::new(location.longitude, location.latitude, location.altitude).map_err(|e| {
            AppError::MalformedArea(format!(
                "Area '{}' vertex {}: {}",
                area.name, point.sequence_number, e
            ))
        })?;
        ring.push(location.lng_lat());
    }

    if ring.len() > 2 && ring.first() != ring.last() {
        ring.push(ring[0]);
    }
    Ok(ring)
}

/// Exportar un área como `Feature`.
///
/// Un área sin vértices no produce feature (`Ok(None)`); un vértice sin
/// coordenadas hace fallar la exportación con `MalformedArea`.
pub fn area_to_feature(
    area: &RouteArea,
    place_name: &str,
    points: &[AreaPoint],
) -> AppResult<Option<Feature>> {
    if points.is_empty() {
        debug!("📭 Área {} sin vértices, no se exporta", area.id);
        return Ok(None);
    }

    let ring = build_ring(area, points)?;

    Ok(Some(Feature {
        kind: "Feature".to_string(),
        geometry: PolygonGeometry::new(ring),
        properties: AreaProperties {
            area_id: area.id,
            area_name: area.name.clone(),
            place_name: place_name.to_string(),
            description: area.description.clone(),
            version: area.version,
            source_data_hint: area.source_data_hint.clone(),
            generation_parameters: area.generation_parameters.clone(),
        },
    }))
}
