use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::PgRepository;
use crate::models::{NewPlace, Place, PlaceChanges};
use crate::utils::errors::{map_db_error, map_write_error, not_found_error, AppResult};

#[async_trait]
pub trait PlaceRepository: Send + Sync {
    async fn create_place(&self, place: NewPlace) -> AppResult<Place>;
    async fn find_place(&self, id: Uuid) -> AppResult<Option<Place>>;
    async fn list_places(&self) -> AppResult<Vec<Place>>;
    async fn update_place(&self, id: Uuid, changes: PlaceChanges) -> AppResult<Place>;
    /// Borra el lugar junto con sus rutas y áreas; los coches basados
    /// en él quedan sin base.
    async fn delete_place(&self, id: Uuid) -> AppResult<()>;
}

#[async_trait]
impl PlaceRepository for PgRepository {
    async fn create_place(&self, place: NewPlace) -> AppResult<Place> {
        let now = Utc::now();
        sqlx::query_as::<_, Place>(
            r#"
            INSERT INTO places (id, name, place_type, center_lat, center_lng, initial_zoom, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(place.name)
        .bind(place.place_type)
        .bind(place.center_lat)
        .bind(place.center_lng)
        .bind(place.initial_zoom)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_write_error(e, "Error creating place"))
    }

    async fn find_place(&self, id: Uuid) -> AppResult<Option<Place>> {
        sqlx::query_as::<_, Place>("SELECT * FROM places WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| map_db_error(e, "Error finding place"))
    }

    async fn list_places(&self) -> AppResult<Vec<Place>> {
        sqlx::query_as::<_, Place>("SELECT * FROM places ORDER BY name")
            .fetch_all(self.pool())
            .await
            .map_err(|e| map_db_error(e, "Error listing places"))
    }

    async fn update_place(&self, id: Uuid, changes: PlaceChanges) -> AppResult<Place> {
        let mut current = self
            .find_place(id)
            .await?
            .ok_or_else(|| not_found_error("Place", &id.to_string()))?;
        current.apply(changes);

        sqlx::query_as::<_, Place>(
            r#"
            UPDATE places
            SET name = $2, place_type = $3, center_lat = $4, center_lng = $5, initial_zoom = $6, updated_at = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(current.name)
        .bind(current.place_type)
        .bind(current.center_lat)
        .bind(current.center_lng)
        .bind(current.initial_zoom)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_db_error(e, "Error updating place"))
    }

    async fn delete_place(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM places WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| map_db_error(e, "Error deleting place"))?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Place", &id.to_string()));
        }
        Ok(())
    }
}
