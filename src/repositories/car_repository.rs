use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use super::PgRepository;
use crate::models::{AssignmentState, AssignmentStatus, Car, CarChanges, NewCar};
use crate::services::assignment::{self, AssignmentEvent};
use crate::utils::errors::{map_db_error, map_write_error, not_found_error, AppError, AppResult};

#[async_trait]
pub trait CarRepository: Send + Sync {
    async fn create_car(&self, car: NewCar) -> AppResult<Car>;
    async fn find_car(&self, id: Uuid) -> AppResult<Option<Car>>;
    async fn list_cars(&self) -> AppResult<Vec<Car>>;
    async fn update_car(&self, id: Uuid, changes: CarChanges) -> AppResult<Car>;
    async fn delete_car(&self, id: Uuid) -> AppResult<()>;

    /// El coche que tiene asignada la ruta, si lo hay
    async fn find_car_by_assigned_route(&self, route_id: Uuid) -> AppResult<Option<Car>>;

    /// Asignar una ruta a un coche de forma atómica.
    ///
    /// Comprueba que ningún otro coche tenga la ruta y escribe el nuevo estado
    /// en la misma unidad atómica; si otro coche la tiene devuelve
    /// `AssignmentConflict`.
    async fn assign_route(&self, car_id: Uuid, route_id: Uuid, at: DateTime<Utc>) -> AppResult<Car>;

    /// Guardar un estado de asignación calculado a partir de `expected`.
    /// No puede apuntar a una ruta distinta de la actual (eso es `assign_route`).
    async fn save_assignment(
        &self,
        car_id: Uuid,
        expected: AssignmentStatus,
        next: AssignmentState,
    ) -> AppResult<Car>;
}

#[async_trait]
impl CarRepository for PgRepository {
    async fn create_car(&self, car: NewCar) -> AppResult<Car> {
        let now = Utc::now();
        sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars (id, name, car_type_id, base_place_id, assignment_status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 'none', $5, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(car.name)
        .bind(car.car_type_id)
        .bind(car.base_place_id)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_write_error(e, "Error creating car"))
    }

    async fn find_car(&self, id: Uuid) -> AppResult<Option<Car>> {
        sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| map_db_error(e, "Error finding car"))
    }

    async fn list_cars(&self) -> AppResult<Vec<Car>> {
        sqlx::query_as::<_, Car>("SELECT * FROM cars ORDER BY name")
            .fetch_all(self.pool())
            .await
            .map_err(|e| map_db_error(e, "Error listing cars"))
    }

    async fn update_car(&self, id: Uuid, changes: CarChanges) -> AppResult<Car> {
        let mut current = self
            .find_car(id)
            .await?
            .ok_or_else(|| not_found_error("Car", &id.to_string()))?;
        current.apply(changes);

        sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars
            SET name = $2, car_type_id = $3, base_place_id = $4, updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(current.name)
        .bind(current.car_type_id)
        .bind(current.base_place_id)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_write_error(e, "Error updating car"))
    }

    async fn delete_car(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| map_db_error(e, "Error deleting car"))?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Car", &id.to_string()));
        }
        Ok(())
    }

    async fn find_car_by_assigned_route(&self, route_id: Uuid) -> AppResult<Option<Car>> {
        sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE assigned_route_id = $1")
            .bind(route_id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| map_db_error(e, "Error finding car by assigned route"))
    }

    async fn assign_route(&self, car_id: Uuid, route_id: Uuid, at: DateTime<Utc>) -> AppResult<Car> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| map_db_error(e, "Error starting assignment transaction"))?;

        // Bloquear la fila de la ruta serializa a todos los que intentan asignarla
        let route: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM routes WHERE id = $1 FOR UPDATE")
            .bind(route_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "Error locking route"))?;
        if route.is_none() {
            return Err(not_found_error("Route", &route_id.to_string()));
        }

        let car = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1 FOR UPDATE")
            .bind(car_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "Error locking car"))?
            .ok_or_else(|| not_found_error("Car", &car_id.to_string()))?;

        let holder: Option<(Uuid, String)> = sqlx::query_as(
            "SELECT id, name FROM cars WHERE assigned_route_id = $1 AND id <> $2",
        )
        .bind(route_id)
        .bind(car_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_db_error(e, "Error checking route holder"))?;

        if let Some((_, holder_name)) = holder {
            warn!("🚫 Ruta {} ya asignada a '{}'", route_id, holder_name);
            return Err(AppError::AssignmentConflict(format!(
                "Route '{}' is already assigned to car '{}'",
                route_id, holder_name
            )));
        }

        let next = assignment::transition(&car.assignment(), AssignmentEvent::Assign { route_id, at })?;

        let updated = sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars
            SET assigned_route_id = $2, assignment_status = $3, assigned_at = $4,
                started_at = $5, completed_at = $6, updated_at = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(car_id)
        .bind(next.assigned_route_id)
        .bind(next.assignment_status)
        .bind(next.assigned_at)
        .bind(next.started_at)
        .bind(next.completed_at)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_db_error(e, "Error assigning route"))?;

        tx.commit()
            .await
            .map_err(|e| map_db_error(e, "Error committing assignment"))?;

        info!("✅ Ruta {} asignada al coche '{}'", route_id, updated.name);
        Ok(updated)
    }

    async fn save_assignment(
        &self,
        car_id: Uuid,
        expected: AssignmentStatus,
        next: AssignmentState,
    ) -> AppResult<Car> {
        let updated = sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars
            SET assigned_route_id = $2, assignment_status = $3, assigned_at = $4,
                started_at = $5, completed_at = $6, updated_at = $7
            WHERE id = $1
              AND assignment_status = $8
              AND ($2::uuid IS NULL OR assigned_route_id = $2)
            RETURNING *
            "#,
        )
        .bind(car_id)
        .bind(next.assigned_route_id)
        .bind(next.assignment_status)
        .bind(next.assigned_at)
        .bind(next.started_at)
        .bind(next.completed_at)
        .bind(Utc::now())
        .bind(expected)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_db_error(e, "Error saving assignment"))?;

        match updated {
            Some(car) => Ok(car),
            None => match self.find_car(car_id).await? {
                Some(_) => Err(AppError::InvalidTransition(format!(
                    "Assignment of car '{}' changed concurrently",
                    car_id
                ))),
                None => Err(not_found_error("Car", &car_id.to_string())),
            },
        }
    }
}
