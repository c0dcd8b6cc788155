//! Modelo de Car
//!
//! Un vehículo concreto. Puede tener tipo, base (Place) y como mucho una
//! ruta asignada. El progreso de la asignación se guarda en el propio coche.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use uuid::Uuid;

/// Estado de la asignación - mapea al ENUM assignment_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash, Default)]
#[sqlx(type_name = "assignment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    #[default]
    None,
    Assigned,
    InProgress,
    Completed,
    Failed,
}

impl AssignmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AssignmentStatus::None => "None",
            AssignmentStatus::Assigned => "Assigned",
            AssignmentStatus::InProgress => "In Progress",
            AssignmentStatus::Completed => "Completed",
            AssignmentStatus::Failed => "Failed",
        }
    }

    /// Estados finales de una ejecución
    pub fn is_terminal(&self) -> bool {
        matches!(self, AssignmentStatus::Completed | AssignmentStatus::Failed)
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Car principal - mapea exactamente a la tabla cars
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Car {
    pub id: Uuid,
    pub name: String,
    pub car_type_id: Option<Uuid>,
    pub base_place_id: Option<Uuid>,
    pub assigned_route_id: Option<Uuid>,
    pub assignment_status: AssignmentStatus,
    pub assigned_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos para insertar un Car
#[derive(Debug, Clone)]
pub struct NewCar {
    pub name: String,
    pub car_type_id: Option<Uuid>,
    pub base_place_id: Option<Uuid>,
}

/// Cambios parciales sobre un Car. `Some(None)` borra la referencia.
#[derive(Debug, Clone, Default)]
pub struct CarChanges {
    pub name: Option<String>,
    pub car_type_id: Option<Option<Uuid>>,
    pub base_place_id: Option<Option<Uuid>>,
}

/// Campos de asignación que se escriben juntos
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentState {
    pub assigned_route_id: Option<Uuid>,
    pub assignment_status: AssignmentStatus,
    pub assigned_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Car {
    pub fn apply(&mut self, changes: CarChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(car_type_id) = changes.car_type_id {
            self.car_type_id = car_type_id;
        }
        if let Some(base_place_id) = changes.base_place_id {
            self.base_place_id = base_place_id;
        }
    }

    pub fn assignment(&self) -> AssignmentState {
        AssignmentState {
            assigned_route_id: self.assigned_route_id,
            assignment_status: self.assignment_status,
            assigned_at: self.assigned_at,
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }

    pub fn set_assignment(&mut self, state: AssignmentState) {
        self.assigned_route_id = state.assigned_route_id;
        self.assignment_status = state.assignment_status;
        self.assigned_at = state.assigned_at;
        self.started_at = state.started_at;
        self.completed_at = state.completed_at;
    }
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.assignment_status)
    }
}
