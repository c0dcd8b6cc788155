use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use super::PgRepository;
use crate::models::{AreaPoint, NewAreaPoint, NewRouteArea, RouteArea, RouteAreaChanges};
use crate::utils::errors::{map_db_error, map_write_error, not_found_error, AppResult};

#[async_trait]
pub trait RouteAreaRepository: Send + Sync {
    /// Crear el área (versión 1) con sus vértices iniciales
    async fn create_route_area(&self, area: NewRouteArea, points: Vec<NewAreaPoint>) -> AppResult<RouteArea>;
    async fn find_route_area(&self, id: Uuid) -> AppResult<Option<RouteArea>>;
    async fn list_route_areas(&self, place_id: Option<Uuid>) -> AppResult<Vec<RouteArea>>;
    async fn update_route_area(&self, id: Uuid, changes: RouteAreaChanges) -> AppResult<RouteArea>;
    /// Borra el área y sus vértices; las rutas generadas pierden `source_area_id`
    async fn delete_route_area(&self, id: Uuid) -> AppResult<()>;
    /// Vértices ordenados por número de secuencia
    async fn list_area_points(&self, area_id: Uuid) -> AppResult<Vec<AreaPoint>>;
    /// Sustituir todos los vértices del área e incrementar su versión
    async fn replace_area_points(&self, area_id: Uuid, points: Vec<NewAreaPoint>) -> AppResult<RouteArea>;
}

#[async_trait]
impl RouteAreaRepository for PgRepository {
    async fn create_route_area(&self, area: NewRouteArea, points: Vec<NewAreaPoint>) -> AppResult<RouteArea> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| map_db_error(e, "Error starting area transaction"))?;

        let now = Utc::now();
        let created = sqlx::query_as::<_, RouteArea>(
            r#"
            INSERT INTO route_areas (
                id, place_id, name, description, status, version,
                source_data_hint, generation_parameters, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, 1, $6, $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(area.place_id)
        .bind(area.name)
        .bind(area.description)
        .bind(area.status)
        .bind(area.source_data_hint)
        .bind(area.generation_parameters)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Error creating route area"))?;

        for point in points {
            insert_area_point(&mut tx, point.into_point(created.id)).await?;
        }

        tx.commit()
            .await
            .map_err(|e| map_db_error(e, "Error committing route area"))?;

        info!("📐 Área '{}' creada", created.name);
        Ok(created)
    }

    async fn find_route_area(&self, id: Uuid) -> AppResult<Option<RouteArea>> {
        sqlx::query_as::<_, RouteArea>("SELECT * FROM route_areas WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| map_db_error(e, "Error finding route area"))
    }

    async fn list_route_areas(&self, place_id: Option<Uuid>) -> AppResult<Vec<RouteArea>> {
        sqlx::query_as::<_, RouteArea>(
            r#"
            SELECT * FROM route_areas
            WHERE ($1::uuid IS NULL OR place_id = $1)
            ORDER BY place_id, updated_at DESC
            "#,
        )
        .bind(place_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| map_db_error(e, "Error listing route areas"))
    }

    async fn update_route_area(&self, id: Uuid, changes: RouteAreaChanges) -> AppResult<RouteArea> {
        let mut current = self
            .find_route_area(id)
            .await?
            .ok_or_else(|| not_found_error("RouteArea", &id.to_string()))?;
        current.apply(changes);

        sqlx::query_as::<_, RouteArea>(
            r#"
            UPDATE route_areas
            SET name = $2, description = $3, status = $4, version = $5,
                source_data_hint = $6, generation_parameters = $7, updated_at = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(current.name)
        .bind(current.description)
        .bind(current.status)
        .bind(current.version)
        .bind(current.source_data_hint)
        .bind(current.generation_parameters)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_write_error(e, "Error updating route area"))
    }

    async fn delete_route_area(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM route_areas WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| map_db_error(e, "Error deleting route area"))?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("RouteArea", &id.to_string()));
        }
        Ok(())
    }

    async fn list_area_points(&self, area_id: Uuid) -> AppResult<Vec<AreaPoint>> {
        sqlx::query_as::<_, AreaPoint>(
            "SELECT * FROM area_points WHERE area_id = $1 ORDER BY sequence_number",
        )
        .bind(area_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| map_db_error(e, "Error listing area points"))
    }

    async fn replace_area_points(&self, area_id: Uuid, points: Vec<NewAreaPoint>) -> AppResult<RouteArea> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| map_db_error(e, "Error starting area transaction"))?;

        let area = sqlx::query_as::<_, RouteArea>(
            r#"
            UPDATE route_areas
            SET version = version + 1, updated_at = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(area_id)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_db_error(e, "Error bumping area version"))?
        .ok_or_else(|| not_found_error("RouteArea", &area_id.to_string()))?;

        sqlx::query("DELETE FROM area_points WHERE area_id = $1")
            .bind(area_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "Error clearing area points"))?;

        let count = points.len();
        for point in points {
            insert_area_point(&mut tx, point.into_point(area_id)).await?;
        }

        tx.commit()
            .await
            .map_err(|e| map_db_error(e, "Error committing area points"))?;

        info!("📐 Área '{}' v{} con {} vértices", area.name, area.version, count);
        Ok(area)
    }
}

async fn insert_area_point(tx: &mut Transaction<'_, Postgres>, row: AreaPoint) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO area_points (id, area_id, sequence_number, longitude, latitude, altitude)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(row.id)
    .bind(row.area_id)
    .bind(row.sequence_number)
    .bind(row.longitude)
    .bind(row.latitude)
    .bind(row.altitude)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_write_error(e, "Error creating area point"))?;
    Ok(())
}
