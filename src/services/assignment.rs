//! Máquina de estados de la asignación de rutas a coches
//!
//! none → assigned → in_progress → {completed, failed}. `Release` vuelve a
//! `none` desde cualquier estado y un coche en estado final puede recibir una
//! nueva ruta. Las marcas de tiempo las fijan las transiciones y deben quedar
//! ordenadas: `assigned_at ≤ started_at ≤ completed_at`.
//!
//! Start, complete y fail exigen que la ruta siga asignada. Si la ruta se
//! borró a mitad de la ejecución, el único evento posible es `Release`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{AssignmentState, AssignmentStatus};
use crate::utils::errors::{AppError, AppResult};

/// Eventos que mueven la asignación de un coche
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssignmentEvent {
    Assign { route_id: Uuid, at: DateTime<Utc> },
    Start { at: DateTime<Utc> },
    Complete { at: DateTime<Utc> },
    Fail { at: DateTime<Utc> },
    Release,
}

impl AssignmentEvent {
    fn name(&self) -> &'static str {
        match self {
            AssignmentEvent::Assign { .. } => "assign",
            AssignmentEvent::Start { .. } => "start",
            AssignmentEvent::Complete { .. } => "complete",
            AssignmentEvent::Fail { .. } => "fail",
            AssignmentEvent::Release => "release",
        }
    }
}

/// Estado inicial de un coche sin ruta
pub fn unassigned() -> AssignmentState {
    AssignmentState {
        assigned_route_id: None,
        assignment_status: AssignmentStatus::None,
        assigned_at: None,
        started_at: None,
        completed_at: None,
    }
}

/// Aplicar un evento al estado actual.
///
/// No comprueba la exclusividad de la ruta: eso lo hace el repositorio dentro
/// de la misma transacción que escribe el nuevo estado.
pub fn transition(current: &AssignmentState, event: AssignmentEvent) -> AppResult<AssignmentState> {
    use AssignmentStatus as S;

    let next = match (current.assignment_status, event) {
        (S::None | S::Completed | S::Failed, AssignmentEvent::Assign { route_id, at }) => {
            AssignmentState {
                assigned_route_id: Some(route_id),
                assignment_status: S::Assigned,
                assigned_at: Some(at),
                started_at: None,
                completed_at: None,
            }
        }
        (S::Assigned, AssignmentEvent::Start { at }) => {
            require_route(current)?;
            AssignmentState {
                assignment_status: S::InProgress,
                started_at: Some(at),
                ..current.clone()
            }
        }
        (S::InProgress, AssignmentEvent::Complete { at }) => {
            require_route(current)?;
            AssignmentState {
                assignment_status: S::Completed,
                completed_at: Some(at),
                ..current.clone()
            }
        }
        (S::InProgress, AssignmentEvent::Fail { at }) => {
            require_route(current)?;
            AssignmentState {
                assignment_status: S::Failed,
                completed_at: Some(at),
                ..current.clone()
            }
        }
        (_, AssignmentEvent::Release) => unassigned(),
        (status, event) => {
            return Err(AppError::InvalidTransition(format!(
                "Cannot {} a car whose assignment is '{}'",
                event.name(),
                status
            )))
        }
    };

    validate_timeline(&next)?;
    Ok(next)
}

fn require_route(state: &AssignmentState) -> AppResult<()> {
    if state.assigned_route_id.is_none() {
        return Err(AppError::InvalidTransition(
            "Car has no assigned route".to_string(),
        ));
    }
    Ok(())
}

/// Comprobar que las marcas de tiempo presentes están en orden
pub fn validate_timeline(state: &AssignmentState) -> AppResult<()> {
    let stamps = [
        ("assigned_at", state.assigned_at),
        ("started_at", state.started_at),
        ("completed_at", state.completed_at),
    ];
    let present: Vec<(&str, DateTime<Utc>)> = stamps
        .iter()
        .filter_map(|(name, at)| at.map(|at| (*name, at)))
        .collect();

    for pair in present.windows(2) {
        let (earlier_name, earlier) = pair[0];
        let (later_name, later) = pair[1];
        if later < earlier {
            return Err(AppError::InvalidTransition(format!(
                "{} ({}) is before {} ({})",
                later_name,
                later.to_rfc3339(),
                earlier_name,
                earlier.to_rfc3339()
            )));
        }
    }
    Ok(())
}
