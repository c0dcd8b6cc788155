//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.
//! Todas las variables tienen un valor por defecto válido para desarrollo local.

use anyhow::{bail, Context};
use std::env;
use std::str::FromStr;

/// Backend de persistencia
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => bail!("STORAGE_BACKEND must be 'postgres' or 'memory', got '{}'", other),
        }
    }
}

/// Valores iniciales del mapa en la página web
#[derive(Debug, Clone, PartialEq)]
pub struct MapDefaults {
    pub google_maps_api_key: String,
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: i32,
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub storage_backend: StorageBackend,
    pub log_level: Option<String>,
    pub map: MapDefaults,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 8000,
            host: "0.0.0.0".to_string(),
            cors_origins: vec!["*".to_string()],
            storage_backend: StorageBackend::Postgres,
            log_level: None,
            map: MapDefaults {
                google_maps_api_key: String::new(),
                center_lat: 35.681236,
                center_lng: 139.767125,
                zoom: 14,
            },
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} must be valid: {}", name, e)),
        _ => Ok(default),
    }
}

impl EnvironmentConfig {
    /// Leer la configuración desde el entorno (ya cargado con dotenvy)
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let cors_origins = match env::var("CORS_ORIGINS") {
            Ok(raw) if !raw.trim().is_empty() => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            _ => defaults.cors_origins,
        };

        let config = Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_var("PORT", defaults.port)?,
            host: env::var("HOST").unwrap_or(defaults.host),
            cors_origins,
            storage_backend: parse_var("STORAGE_BACKEND", defaults.storage_backend)
                .context("Invalid storage backend")?,
            log_level: env::var("LOG_LEVEL").ok().filter(|l| !l.trim().is_empty()),
            map: MapDefaults {
                google_maps_api_key: env::var("GOOGLE_MAPS_API_KEY").unwrap_or_default(),
                center_lat: parse_var("MAP_DEFAULT_LAT", defaults.map.center_lat)?,
                center_lng: parse_var("MAP_DEFAULT_LNG", defaults.map.center_lng)?,
                zoom: parse_var("MAP_DEFAULT_ZOOM", defaults.map.zoom)?,
            },
        };

        if !(-90.0..=90.0).contains(&config.map.center_lat)
            || !(-180.0..=180.0).contains(&config.map.center_lng)
        {
            bail!(
                "MAP_DEFAULT_LAT/MAP_DEFAULT_LNG out of range: {}, {}",
                config.map.center_lat,
                config.map.center_lng
            );
        }

        Ok(config)
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Nivel de log: LOG_LEVEL o según el entorno
    pub fn log_level(&self) -> &str {
        match &self.log_level {
            Some(level) => level,
            None if self.is_development() => "debug",
            None => "info",
        }
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
