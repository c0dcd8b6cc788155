//! Middleware del sistema
//!
//! Por ahora sólo CORS; el logging de peticiones lo hace `TraceLayer` en main.

pub mod cors;

pub use cors::*;
