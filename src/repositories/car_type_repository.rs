use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::PgRepository;
use crate::models::{CarType, CarTypeChanges, NewCarType};
use crate::utils::errors::{map_db_error, not_found_error, AppError, AppResult};

#[async_trait]
pub trait CarTypeRepository: Send + Sync {
    async fn create_car_type(&self, car_type: NewCarType) -> AppResult<CarType>;
    async fn find_car_type(&self, id: Uuid) -> AppResult<Option<CarType>>;
    async fn list_car_types(&self) -> AppResult<Vec<CarType>>;
    async fn update_car_type(&self, id: Uuid, changes: CarTypeChanges) -> AppResult<CarType>;
    /// Falla con `Protected` mientras alguna ruta o coche lo use
    async fn delete_car_type(&self, id: Uuid) -> AppResult<()>;
}

#[async_trait]
impl CarTypeRepository for PgRepository {
    async fn create_car_type(&self, car_type: NewCarType) -> AppResult<CarType> {
        let now = Utc::now();
        sqlx::query_as::<_, CarType>(
            r#"
            INSERT INTO car_types (
                id, type_name, description, width, height, length, move_type,
                cutting_width, curvature, turning_radius, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(car_type.type_name)
        .bind(car_type.description)
        .bind(car_type.width)
        .bind(car_type.height)
        .bind(car_type.length)
        .bind(car_type.move_type)
        .bind(car_type.cutting_width)
        .bind(car_type.curvature)
        .bind(car_type.turning_radius)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_db_error(e, "Error creating car type"))
    }

    async fn find_car_type(&self, id: Uuid) -> AppResult<Option<CarType>> {
        sqlx::query_as::<_, CarType>("SELECT * FROM car_types WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| map_db_error(e, "Error finding car type"))
    }

    async fn list_car_types(&self) -> AppResult<Vec<CarType>> {
        sqlx::query_as::<_, CarType>("SELECT * FROM car_types ORDER BY type_name")
            .fetch_all(self.pool())
            .await
            .map_err(|e| map_db_error(e, "Error listing car types"))
    }

    async fn update_car_type(&self, id: Uuid, changes: CarTypeChanges) -> AppResult<CarType> {
        let mut current = self
            .find_car_type(id)
            .await?
            .ok_or_else(|| not_found_error("CarType", &id.to_string()))?;
        current.apply(changes);

        sqlx::query_as::<_, CarType>(
            r#"
            UPDATE car_types
            SET type_name = $2, description = $3, width = $4, height = $5, length = $6,
                move_type = $7, cutting_width = $8, curvature = $9, turning_radius = $10,
                updated_at = $11
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(current.type_name)
        .bind(current.description)
        .bind(current.width)
        .bind(current.height)
        .bind(current.length)
        .bind(current.move_type)
        .bind(current.cutting_width)
        .bind(current.curvature)
        .bind(current.turning_radius)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_db_error(e, "Error updating car type"))
    }

    async fn delete_car_type(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM car_types WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| match map_db_error(e, "Error deleting car type") {
                AppError::Protected(_) => AppError::Protected(format!(
                    "CarType '{}' is still referenced by routes or cars",
                    id
                )),
                other => other,
            })?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("CarType", &id.to_string()));
        }
        Ok(())
    }
}
