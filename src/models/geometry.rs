//! Primitivas geométricas
//!
//! Coordenadas WGS84 (SRID 4326) con altitud opcional. Un punto sin altitud
//! es un punto 2-D: la altitud se reporta como ausente, nunca como cero.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::validation::validate_coordinates;

/// Identificador del sistema de referencia usado en todas las coordenadas
pub const SRID_WGS84: i32 = 4326;

/// Punto geográfico (longitud, latitud, altitud opcional)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

impl GeoPoint {
    /// Crear un punto validando los rangos de longitud y latitud
    pub fn new(longitude: f64, latitude: f64, altitude: Option<f64>) -> Result<Self, String> {
        validate_coordinates(latitude, longitude)
            .map_err(|_| format!("invalid coordinate ({}, {})", longitude, latitude))?;
        if let Some(alt) = altitude {
            if !alt.is_finite() {
                return Err(format!("invalid altitude {}", alt));
            }
        }
        Ok(Self {
            longitude,
            latitude,
            altitude,
        })
    }

    /// Punto 2-D
    pub fn flat(longitude: f64, latitude: f64) -> Result<Self, String> {
        Self::new(longitude, latitude, None)
    }

    /// Armar un punto a partir de columnas que pueden ser NULL.
    /// Devuelve `None` si falta la longitud o la latitud.
    pub fn from_columns(
        longitude: Option<f64>,
        latitude: Option<f64>,
        altitude: Option<f64>,
    ) -> Option<Self> {
        match (longitude, latitude) {
            (Some(longitude), Some(latitude)) => Some(Self {
                longitude,
                latitude,
                altitude,
            }),
            _ => None,
        }
    }

    pub fn has_z(&self) -> bool {
        self.altitude.is_some()
    }

    /// Par `[lng, lat]` tal como lo espera GeoJSON
    pub fn lng_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lat: {:.6}, Lng: {:.6}", self.latitude, self.longitude)?;
        if let Some(alt) = self.altitude {
            write!(f, ", Alt: {:.2}m", alt)?;
        }
        Ok(())
    }
}
