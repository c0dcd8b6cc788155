use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::PgRepository;
use crate::models::{NewRoute, NewRoutePoint, Route, RouteChanges, RoutePoint};
use crate::utils::errors::{map_db_error, map_write_error, not_found_error, AppResult};

#[async_trait]
pub trait RouteRepository: Send + Sync {
    /// Crear la ruta y todos sus puntos en una sola transacción
    async fn create_route(&self, route: NewRoute, points: Vec<NewRoutePoint>) -> AppResult<Route>;
    async fn find_route(&self, id: Uuid) -> AppResult<Option<Route>>;
    async fn list_routes(&self, place_id: Option<Uuid>) -> AppResult<Vec<Route>>;
    async fn update_route(&self, id: Uuid, changes: RouteChanges) -> AppResult<Route>;
    /// Borra la ruta y sus puntos; el coche que la tuviera se queda sin ruta
    async fn delete_route(&self, id: Uuid) -> AppResult<()>;
    /// Puntos ordenados por número de secuencia
    async fn list_route_points(&self, route_id: Uuid) -> AppResult<Vec<RoutePoint>>;
}

#[async_trait]
impl RouteRepository for PgRepository {
    async fn create_route(&self, route: NewRoute, points: Vec<NewRoutePoint>) -> AppResult<Route> {
        let now = Utc::now();
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| map_db_error(e, "Error starting route transaction"))?;

        let created = sqlx::query_as::<_, Route>(
            r#"
            INSERT INTO routes (
                id, place_id, name, description, car_type_id, route_type,
                source_area_id, source_info_text, calculated_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(route.place_id)
        .bind(route.name)
        .bind(route.description)
        .bind(route.car_type_id)
        .bind(route.route_type)
        .bind(route.source_area_id)
        .bind(route.source_info_text)
        .bind(route.calculated_at)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Error creating route"))?;

        let count = points.len();
        for point in points {
            let row = point.into_point(created.id, now);
            sqlx::query(
                r#"
                INSERT INTO route_points (
                    id, route_id, sequence_number, longitude, latitude, altitude,
                    aux_wp, heading, is_direct_path, blade_active, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(row.id)
            .bind(row.route_id)
            .bind(row.sequence_number)
            .bind(row.longitude)
            .bind(row.latitude)
            .bind(row.altitude)
            .bind(row.aux_wp)
            .bind(row.heading)
            .bind(row.is_direct_path)
            .bind(row.blade_active)
            .bind(row.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, "Error creating route point"))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_db_error(e, "Error committing route"))?;

        info!("🛣️ Ruta '{}' creada con {} puntos", created.name, count);
        Ok(created)
    }

    async fn find_route(&self, id: Uuid) -> AppResult<Option<Route>> {
        sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| map_db_error(e, "Error finding route"))
    }

    async fn list_routes(&self, place_id: Option<Uuid>) -> AppResult<Vec<Route>> {
        sqlx::query_as::<_, Route>(
            r#"
            SELECT * FROM routes
            WHERE ($1::uuid IS NULL OR place_id = $1)
            ORDER BY calculated_at DESC
            "#,
        )
        .bind(place_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| map_db_error(e, "Error listing routes"))
    }

    async fn update_route(&self, id: Uuid, changes: RouteChanges) -> AppResult<Route> {
        let mut current = self
            .find_route(id)
            .await?
            .ok_or_else(|| not_found_error("Route", &id.to_string()))?;
        current.apply(changes);

        sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes
            SET name = $2, description = $3, route_type = $4, source_info_text = $5, updated_at = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(current.name)
        .bind(current.description)
        .bind(current.route_type)
        .bind(current.source_info_text)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_write_error(e, "Error updating route"))
    }

    async fn delete_route(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM routes WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| map_db_error(e, "Error deleting route"))?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Route", &id.to_string()));
        }
        Ok(())
    }

    async fn list_route_points(&self, route_id: Uuid) -> AppResult<Vec<RoutePoint>> {
        sqlx::query_as::<_, RoutePoint>(
            "SELECT * FROM route_points WHERE route_id = $1 ORDER BY sequence_number",
        )
        .bind(route_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| map_db_error(e, "Error listing route points"))
    }
}
