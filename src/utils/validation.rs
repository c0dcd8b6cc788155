//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! que no se pueden expresar con los atributos de `validator`.

use std::collections::HashSet;

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::utils::errors::{AppError, AppResult};

/// Decimales que guardan las columnas NUMERIC del esquema
pub const COORDINATE_SCALE: u32 = 8;
pub const DIMENSION_SCALE: u32 = 3;
pub const CURVATURE_SCALE: u32 = 4;

fn check_scale(value: &Decimal, max_scale: u32, code: &'static str) -> Result<(), ValidationError> {
    if value.normalize().scale() > max_scale {
        let mut error = ValidationError::new(code);
        error.add_param("value".into(), &value.to_string());
        error.add_param("max_decimal_places".into(), &max_scale);
        return Err(error);
    }
    Ok(())
}

/// Nombres obligatorios: sólo espacios cuenta como vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Validar formato de coordenadas GPS
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), ValidationError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &lat);
        error.add_param("range".into(), &"-90.0 to 90.0".to_string());
        return Err(error);
    }

    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &lng);
        error.add_param("range".into(), &"-180.0 to 180.0".to_string());
        return Err(error);
    }

    Ok(())
}

/// Latitud del centro de un lugar
pub fn validate_latitude_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::from(-90) || *value > Decimal::from(90) {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &value.to_string());
        error.add_param("range".into(), &"-90.0 to 90.0".to_string());
        return Err(error);
    }
    check_scale(value, COORDINATE_SCALE, "latitude_scale")
}

/// Longitud del centro de un lugar
pub fn validate_longitude_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::from(-180) || *value > Decimal::from(180) {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &value.to_string());
        error.add_param("range".into(), &"-180.0 to 180.0".to_string());
        return Err(error);
    }
    check_scale(value, COORDINATE_SCALE, "longitude_scale")
}

/// Validar que un decimal (dimensiones, radio de giro...) no sea negativo
pub fn validate_non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    check_scale(value, DIMENSION_SCALE, "dimension_scale")
}

/// Curvatura (1/m), puede ser negativa
pub fn validate_curvature(value: &Decimal) -> Result<(), ValidationError> {
    check_scale(value, CURVATURE_SCALE, "curvature_scale")
}

/// Los parámetros de generación se pasan tal cual a la aplicación de PC,
/// pero deben ser un objeto JSON.
pub fn validate_generation_parameters(value: &serde_json::Value) -> Result<(), ValidationError> {
    if !value.is_object() {
        let mut error = ValidationError::new("generation_parameters");
        error.add_param("expected".into(), &"JSON object".to_string());
        return Err(error);
    }
    Ok(())
}

/// Comprobar que los números de secuencia de un lote no se repiten
pub fn ensure_unique_sequences<I>(sequences: I, what: &str) -> AppResult<()>
where
    I: IntoIterator<Item = i32>,
{
    let mut seen = HashSet::new();
    for seq in sequences {
        if seq < 0 {
            return Err(AppError::BadRequest(format!(
                "{} sequence_number must be non-negative, got {}",
                what, seq
            )));
        }
        if !seen.insert(seq) {
            return Err(AppError::Conflict(format!(
                "{} sequence_number {} is duplicated",
                what, seq
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(35.0, 139.0).is_ok());
        assert!(validate_coordinates(91.0, 139.0).is_err());
        assert!(validate_coordinates(35.0, -181.0).is_err());
        assert!(validate_coordinates(f64::NAN, 139.0).is_err());
    }

    #[test]
    fn test_validate_center_decimals() {
        assert!(validate_latitude_decimal(&Decimal::new(35681236, 6)).is_ok());
        assert!(validate_latitude_decimal(&Decimal::new(901, 1)).is_err());
        assert!(validate_longitude_decimal(&Decimal::new(139767125, 6)).is_ok());
        assert!(validate_longitude_decimal(&Decimal::new(-1801, 1)).is_err());
    }

    #[test]
    fn test_validate_non_negative_decimal() {
        assert!(validate_non_negative_decimal(&Decimal::new(150, 2)).is_ok());
        assert!(validate_non_negative_decimal(&Decimal::ZERO).is_ok());
        assert!(validate_non_negative_decimal(&Decimal::new(-1, 0)).is_err());
        assert!(validate_non_negative_decimal(&Decimal::new(12345, 4)).is_err());
        // ceros a la derecha no cuentan
        assert!(validate_non_negative_decimal(&Decimal::new(15000, 4)).is_ok());
    }

    #[test]
    fn test_decimal_scale_matches_columns() {
        assert!(validate_curvature(&Decimal::new(125, 4)).is_ok());
        assert!(validate_curvature(&Decimal::new(-125, 4)).is_ok());
        assert!(validate_curvature(&Decimal::new(12345, 5)).is_err());
        assert!(validate_latitude_decimal(&Decimal::new(3568123612, 8)).is_ok());
        assert!(validate_latitude_decimal(&Decimal::new(35681236123, 9)).is_err());
        assert!(validate_longitude_decimal(&Decimal::new(139767125001, 9)).is_err());
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Field A").is_ok());
        assert!(validate_not_blank(" x ").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("\t\n").is_err());
    }

    #[test]
    fn test_validate_generation_parameters() {
        assert!(validate_generation_parameters(&json!({"offset": 0.5})).is_ok());
        assert!(validate_generation_parameters(&json!([1, 2])).is_err());
        assert!(validate_generation_parameters(&json!("medium")).is_err());
    }

    #[test]
    fn test_ensure_unique_sequences() {
        assert!(ensure_unique_sequences(vec![0, 1, 2], "Route point").is_ok());
        assert!(matches!(
            ensure_unique_sequences(vec![0, 1, 1], "Route point"),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            ensure_unique_sequences(vec![-1], "Area point"),
            Err(AppError::BadRequest(_))
        ));
    }
}
