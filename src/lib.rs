//! Fleet route manager
//!
//! Backend para gestionar lugares, tipos de vehículo, coches, rutas y áreas
//! de trabajo, exportar las áreas como GeoJSON para la aplicación de PC que
//! genera las rutas, y seguir la asignación de rutas a coches.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
