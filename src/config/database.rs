//! Configuración de base de datos
//!
//! Este módulo maneja la conexión y configuración de PostgreSQL con SQLx.

use anyhow::Context;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Configuración de la base de datos
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl DatabaseConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL must be set when STORAGE_BACKEND=postgres")?;

        let max_connections = match std::env::var("DB_MAX_CONNECTIONS") {
            Ok(v) => v.parse().context("DB_MAX_CONNECTIONS must be a valid number")?,
            Err(_) => 20,
        };
        let min_connections = match std::env::var("DB_MIN_CONNECTIONS") {
            Ok(v) => v.parse().context("DB_MIN_CONNECTIONS must be a valid number")?,
            Err(_) => 5,
        };

        Ok(Self {
            url,
            max_connections,
            min_connections: min_connections.min(max_connections),
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(3600),
        })
    }

    /// Crear un nuevo pool de conexiones
    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .connect(&self.url)
            .await
    }
}
