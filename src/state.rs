//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use crate::config::environment::EnvironmentConfig;
use crate::repositories::SharedRepository;

#[derive(Clone)]
pub struct AppState {
    pub repository: SharedRepository,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(repository: SharedRepository, config: EnvironmentConfig) -> Self {
        Self { repository, config }
    }
}
