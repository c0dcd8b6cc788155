//! Repositorio en memoria
//!
//! Aplica las mismas reglas que el esquema de PostgreSQL (unicidad, borrado
//! en cascada, set-null y protect) con todo el estado detrás de un único
//! `RwLock`, de modo que cada operación es atómica.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{CarRepository, CarTypeRepository, PlaceRepository, RouteAreaRepository, RouteRepository};
use crate::models::{
    AreaPoint, AssignmentState, AssignmentStatus, Car, CarChanges, CarType, CarTypeChanges,
    NewAreaPoint, NewCar, NewCarType, NewPlace, NewRoute, NewRoutePoint, NewRouteArea, Place,
    PlaceChanges, Route, RouteArea, RouteAreaChanges, RouteChanges, RoutePoint,
};
use crate::services::assignment::{self, AssignmentEvent};
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};
use crate::utils::validation::ensure_unique_sequences;

#[derive(Default)]
struct MemoryState {
    places: HashMap<Uuid, Place>,
    car_types: HashMap<Uuid, CarType>,
    cars: HashMap<Uuid, Car>,
    routes: HashMap<Uuid, Route>,
    route_points: HashMap<Uuid, Vec<RoutePoint>>,
    route_areas: HashMap<Uuid, RouteArea>,
    area_points: HashMap<Uuid, Vec<AreaPoint>>,
}

impl MemoryState {
    fn require_place(&self, id: Uuid) -> AppResult<()> {
        if self.places.contains_key(&id) {
            Ok(())
        } else {
            Err(missing_reference("Place", id))
        }
    }

    fn require_car_type(&self, id: Uuid) -> AppResult<()> {
        if self.car_types.contains_key(&id) {
            Ok(())
        } else {
            Err(missing_reference("CarType", id))
        }
    }

    fn check_car_refs(&self, car_type_id: Option<Uuid>, base_place_id: Option<Uuid>) -> AppResult<()> {
        if let Some(id) = car_type_id {
            self.require_car_type(id)?;
        }
        if let Some(id) = base_place_id {
            self.require_place(id)?;
        }
        Ok(())
    }

    fn check_car_name(&self, name: &str, except: Option<Uuid>) -> AppResult<()> {
        if self.cars.values().any(|c| c.name == name && Some(c.id) != except) {
            return Err(conflict_error("Car", "name", name));
        }
        Ok(())
    }

    fn check_type_name(&self, type_name: &str, except: Option<Uuid>) -> AppResult<()> {
        if self
            .car_types
            .values()
            .any(|t| t.type_name == type_name && Some(t.id) != except)
        {
            return Err(conflict_error("CarType", "type_name", type_name));
        }
        Ok(())
    }

    fn check_area_name(&self, place_id: Uuid, name: &str, except: Option<Uuid>) -> AppResult<()> {
        if self
            .route_areas
            .values()
            .any(|a| a.place_id == place_id && a.name == name && Some(a.id) != except)
        {
            return Err(conflict_error("RouteArea", "name", name));
        }
        Ok(())
    }

    /// Borrar una ruta: cascada a sus puntos, set-null en el coche asignado
    fn remove_route(&mut self, id: Uuid) -> Option<Route> {
        let route = self.routes.remove(&id)?;
        self.route_points.remove(&id);
        for car in self.cars.values_mut() {
            if car.assigned_route_id == Some(id) {
                car.assigned_route_id = None;
                car.updated_at = Utc::now();
            }
        }
        Some(route)
    }

    /// Borrar un área: cascada a sus vértices, set-null en las rutas generadas
    fn remove_area(&mut self, id: Uuid) -> Option<RouteArea> {
        let area = self.route_areas.remove(&id)?;
        self.area_points.remove(&id);
        for route in self.routes.values_mut() {
            if route.source_area_id == Some(id) {
                route.source_area_id = None;
                route.updated_at = Utc::now();
            }
        }
        Some(area)
    }
}

fn missing_reference(resource: &str, id: Uuid) -> AppError {
    AppError::BadRequest(format!("{} '{}' does not exist", resource, id))
}

/// Repositorio en memoria con la misma semántica que `PgRepository`
#[derive(Default)]
pub struct MemoryRepository {
    state: RwLock<MemoryState>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlaceRepository for MemoryRepository {
    async fn create_place(&self, place: NewPlace) -> AppResult<Place> {
        let now = Utc::now();
        let created = Place {
            id: Uuid::new_v4(),
            name: place.name,
            place_type: place.place_type,
            center_lat: place.center_lat,
            center_lng: place.center_lng,
            initial_zoom: place.initial_zoom,
            created_at: now,
            updated_at: now,
        };
        self.state.write().await.places.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_place(&self, id: Uuid) -> AppResult<Option<Place>> {
        Ok(self.state.read().await.places.get(&id).cloned())
    }

    async fn list_places(&self) -> AppResult<Vec<Place>> {
        let mut places: Vec<Place> = self.state.read().await.places.values().cloned().collect();
        places.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(places)
    }

    async fn update_place(&self, id: Uuid, changes: PlaceChanges) -> AppResult<Place> {
        let mut state = self.state.write().await;
        let place = state
            .places
            .get_mut(&id)
            .ok_or_else(|| not_found_error("Place", &id.to_string()))?;
        place.apply(changes);
        place.updated_at = Utc::now();
        Ok(place.clone())
    }

    async fn delete_place(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.places.remove(&id).is_none() {
            return Err(not_found_error("Place", &id.to_string()));
        }

        let route_ids: Vec<Uuid> = state
            .routes
            .values()
            .filter(|r| r.place_id == id)
            .map(|r| r.id)
            .collect();
        for route_id in &route_ids {
            state.remove_route(*route_id);
        }

        let area_ids: Vec<Uuid> = state
            .route_areas
            .values()
            .filter(|a| a.place_id == id)
            .map(|a| a.id)
            .collect();
        for area_id in &area_ids {
            state.remove_area(*area_id);
        }

        for car in state.cars.values_mut() {
            if car.base_place_id == Some(id) {
                car.base_place_id = None;
                car.updated_at = Utc::now();
            }
        }

        debug!(
            "🗑️ Place {} borrado ({} rutas, {} áreas)",
            id,
            route_ids.len(),
            area_ids.len()
        );
        Ok(())
    }
}

#[async_trait]
impl CarTypeRepository for MemoryRepository {
    async fn create_car_type(&self, car_type: NewCarType) -> AppResult<CarType> {
        let mut state = self.state.write().await;
        state.check_type_name(&car_type.type_name, None)?;

        let now = Utc::now();
        let created = CarType {
            id: Uuid::new_v4(),
            type_name: car_type.type_name,
            description: car_type.description,
            width: car_type.width,
            height: car_type.height,
            length: car_type.length,
            move_type: car_type.move_type,
            cutting_width: car_type.cutting_width,
            curvature: car_type.curvature,
            turning_radius: car_type.turning_radius,
            created_at: now,
            updated_at: now,
        };
        state.car_types.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_car_type(&self, id: Uuid) -> AppResult<Option<CarType>> {
        Ok(self.state.read().await.car_types.get(&id).cloned())
    }

    async fn list_car_types(&self) -> AppResult<Vec<CarType>> {
        let mut types: Vec<CarType> = self.state.read().await.car_types.values().cloned().collect();
        types.sort_by(|a, b| a.type_name.cmp(&b.type_name));
        Ok(types)
    }

    async fn update_car_type(&self, id: Uuid, changes: CarTypeChanges) -> AppResult<CarType> {
        let mut state = self.state.write().await;
        if let Some(type_name) = &changes.type_name {
            state.check_type_name(type_name, Some(id))?;
        }
        let car_type = state
            .car_types
            .get_mut(&id)
            .ok_or_else(|| not_found_error("CarType", &id.to_string()))?;
        car_type.apply(changes);
        car_type.updated_at = Utc::now();
        Ok(car_type.clone())
    }

    async fn delete_car_type(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.car_types.contains_key(&id) {
            return Err(not_found_error("CarType", &id.to_string()));
        }

        let used_by_routes = state.routes.values().any(|r| r.car_type_id == id);
        let used_by_cars = state.cars.values().any(|c| c.car_type_id == Some(id));
        if used_by_routes || used_by_cars {
            return Err(AppError::Protected(format!(
                "CarType '{}' is still referenced by routes or cars",
                id
            )));
        }

        state.car_types.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl CarRepository for MemoryRepository {
    async fn create_car(&self, car: NewCar) -> AppResult<Car> {
        let mut state = self.state.write().await;
        state.check_car_name(&car.name, None)?;
        state.check_car_refs(car.car_type_id, car.base_place_id)?;

        let now = Utc::now();
        let created = Car {
            id: Uuid::new_v4(),
            name: car.name,
            car_type_id: car.car_type_id,
            base_place_id: car.base_place_id,
            assigned_route_id: None,
            assignment_status: AssignmentStatus::None,
            assigned_at: None,
            started_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        state.cars.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_car(&self, id: Uuid) -> AppResult<Option<Car>> {
        Ok(self.state.read().await.cars.get(&id).cloned())
    }

    async fn list_cars(&self) -> AppResult<Vec<Car>> {
        let mut cars: Vec<Car> = self.state.read().await.cars.values().cloned().collect();
        cars.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(cars)
    }

    async fn update_car(&self, id: Uuid, changes: CarChanges) -> AppResult<Car> {
        let mut state = self.state.write().await;
        let mut car = state
            .cars
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found_error("Car", &id.to_string()))?;
        car.apply(changes);

        state.check_car_name(&car.name, Some(id))?;
        state.check_car_refs(car.car_type_id, car.base_place_id)?;

        car.updated_at = Utc::now();
        state.cars.insert(id, car.clone());
        Ok(car)
    }

    async fn delete_car(&self, id: Uuid) -> AppResult<()> {
        match self.state.write().await.cars.remove(&id) {
            Some(_) => Ok(()),
            None => Err(not_found_error("Car", &id.to_string())),
        }
    }

    async fn find_car_by_assigned_route(&self, route_id: Uuid) -> AppResult<Option<Car>> {
        Ok(self
            .state
            .read()
            .await
            .cars
            .values()
            .find(|c| c.assigned_route_id == Some(route_id))
            .cloned())
    }

    async fn assign_route(&self, car_id: Uuid, route_id: Uuid, at: DateTime<Utc>) -> AppResult<Car> {
        let mut state = self.state.write().await;

        if !state.routes.contains_key(&route_id) {
            return Err(not_found_error("Route", &route_id.to_string()));
        }
        let current = state
            .cars
            .get(&car_id)
            .map(Car::assignment)
            .ok_or_else(|| not_found_error("Car", &car_id.to_string()))?;

        if let Some(holder) = state
            .cars
            .values()
            .find(|c| c.assigned_route_id == Some(route_id) && c.id != car_id)
        {
            warn!("🚫 Ruta {} ya asignada a '{}'", route_id, holder.name);
            return Err(AppError::AssignmentConflict(format!(
                "Route '{}' is already assigned to car '{}'",
                route_id, holder.name
            )));
        }

        let next = assignment::transition(&current, AssignmentEvent::Assign { route_id, at })?;
        let car = state
            .cars
            .get_mut(&car_id)
            .ok_or_else(|| not_found_error("Car", &car_id.to_string()))?;
        car.set_assignment(next);
        car.updated_at = Utc::now();
        Ok(car.clone())
    }

    async fn save_assignment(
        &self,
        car_id: Uuid,
        expected: AssignmentStatus,
        next: AssignmentState,
    ) -> AppResult<Car> {
        let mut state = self.state.write().await;
        let car = state
            .cars
            .get_mut(&car_id)
            .ok_or_else(|| not_found_error("Car", &car_id.to_string()))?;

        let route_matches = next.assigned_route_id.is_none()
            || next.assigned_route_id == car.assigned_route_id;
        if car.assignment_status != expected || !route_matches {
            return Err(AppError::InvalidTransition(format!(
                "Assignment of car '{}' changed concurrently",
                car_id
            )));
        }

        car.set_assignment(next);
        car.updated_at = Utc::now();
        Ok(car.clone())
    }
}

#[async_trait]
impl RouteRepository for MemoryRepository {
    async fn create_route(&self, route: NewRoute, points: Vec<NewRoutePoint>) -> AppResult<Route> {
        let mut state = self.state.write().await;
        state.require_place(route.place_id)?;
        state.require_car_type(route.car_type_id)?;
        if let Some(area_id) = route.source_area_id {
            if !state.route_areas.contains_key(&area_id) {
                return Err(missing_reference("RouteArea", area_id));
            }
        }
        ensure_unique_sequences(points.iter().map(|p| p.sequence_number), "Route point")?;

        let now = Utc::now();
        let created = Route {
            id: Uuid::new_v4(),
            place_id: route.place_id,
            name: route.name,
            description: route.description,
            car_type_id: route.car_type_id,
            route_type: route.route_type,
            source_area_id: route.source_area_id,
            source_info_text: route.source_info_text,
            calculated_at: route.calculated_at,
            created_at: now,
            updated_at: now,
        };

        let mut rows: Vec<RoutePoint> = points
            .into_iter()
            .map(|p| p.into_point(created.id, now))
            .collect();
        rows.sort_by_key(|p| p.sequence_number);

        state.route_points.insert(created.id, rows);
        state.routes.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_route(&self, id: Uuid) -> AppResult<Option<Route>> {
        Ok(self.state.read().await.routes.get(&id).cloned())
    }

    async fn list_routes(&self, place_id: Option<Uuid>) -> AppResult<Vec<Route>> {
        let mut routes: Vec<Route> = self
            .state
            .read()
            .await
            .routes
            .values()
            .filter(|r| place_id.map_or(true, |p| r.place_id == p))
            .cloned()
            .collect();
        routes.sort_by(|a, b| b.calculated_at.cmp(&a.calculated_at));
        Ok(routes)
    }

    async fn update_route(&self, id: Uuid, changes: RouteChanges) -> AppResult<Route> {
        let mut state = self.state.write().await;
        let route = state
            .routes
            .get_mut(&id)
            .ok_or_else(|| not_found_error("Route", &id.to_string()))?;
        route.apply(changes);
        route.updated_at = Utc::now();
        Ok(route.clone())
    }

    async fn delete_route(&self, id: Uuid) -> AppResult<()> {
        match self.state.write().await.remove_route(id) {
            Some(_) => Ok(()),
            None => Err(not_found_error("Route", &id.to_string())),
        }
    }

    async fn list_route_points(&self, route_id: Uuid) -> AppResult<Vec<RoutePoint>> {
        Ok(self
            .state
            .read()
            .await
            .route_points
            .get(&route_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl RouteAreaRepository for MemoryRepository {
    async fn create_route_area(&self, area: NewRouteArea, points: Vec<NewAreaPoint>) -> AppResult<RouteArea> {
        let mut state = self.state.write().await;
        state.require_place(area.place_id)?;
        state.check_area_name(area.place_id, &area.name, None)?;
        ensure_unique_sequences(points.iter().map(|p| p.sequence_number), "Area point")?;

        let now = Utc::now();
        let created = RouteArea {
            id: Uuid::new_v4(),
            place_id: area.place_id,
            name: area.name,
            description: area.description,
            status: area.status,
            version: 1,
            source_data_hint: area.source_data_hint,
            generation_parameters: area.generation_parameters,
            created_at: now,
            updated_at: now,
        };
        if !points.is_empty() {
            let mut rows: Vec<AreaPoint> = points.into_iter().map(|p| p.into_point(created.id)).collect();
            rows.sort_by_key(|p| p.sequence_number);
            state.area_points.insert(created.id, rows);
        }
        state.route_areas.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_route_area(&self, id: Uuid) -> AppResult<Option<RouteArea>> {
        Ok(self.state.read().await.route_areas.get(&id).cloned())
    }

    async fn list_route_areas(&self, place_id: Option<Uuid>) -> AppResult<Vec<RouteArea>> {
        let mut areas: Vec<RouteArea> = self
            .state
            .read()
            .await
            .route_areas
            .values()
            .filter(|a| place_id.map_or(true, |p| a.place_id == p))
            .cloned()
            .collect();
        areas.sort_by(|a, b| {
            a.place_id
                .cmp(&b.place_id)
                .then_with(|| b.updated_at.cmp(&a.updated_at))
        });
        Ok(areas)
    }

    async fn update_route_area(&self, id: Uuid, changes: RouteAreaChanges) -> AppResult<RouteArea> {
        let mut state = self.state.write().await;
        let mut area = state
            .route_areas
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found_error("RouteArea", &id.to_string()))?;
        area.apply(changes);
        state.check_area_name(area.place_id, &area.name, Some(id))?;

        area.updated_at = Utc::now();
        state.route_areas.insert(id, area.clone());
        Ok(area)
    }

    async fn delete_route_area(&self, id: Uuid) -> AppResult<()> {
        match self.state.write().await.remove_area(id) {
            Some(_) => Ok(()),
            None => Err(not_found_error("RouteArea", &id.to_string())),
        }
    }

    async fn list_area_points(&self, area_id: Uuid) -> AppResult<Vec<AreaPoint>> {
        Ok(self
            .state
            .read()
            .await
            .area_points
            .get(&area_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_area_points(&self, area_id: Uuid, points: Vec<NewAreaPoint>) -> AppResult<RouteArea> {
        let mut state = self.state.write().await;
        if !state.route_areas.contains_key(&area_id) {
            return Err(not_found_error("RouteArea", &area_id.to_string()));
        }
        ensure_unique_sequences(points.iter().map(|p| p.sequence_number), "Area point")?;

        let mut rows: Vec<AreaPoint> = points.into_iter().map(|p| p.into_point(area_id)).collect();
        rows.sort_by_key(|p| p.sequence_number);
        state.area_points.insert(area_id, rows);

        let area = state
            .route_areas
            .get_mut(&area_id)
            .ok_or_else(|| not_found_error("RouteArea", &area_id.to_string()))?;
        area.version += 1;
        area.updated_at = Utc::now();
        Ok(area.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AreaStatus, GeoPoint, PlaceType, RouteType};
    use rust_decimal::Decimal;
    use std::sync::Arc;

    async fn seed_place(repo: &MemoryRepository, name: &str) -> Place {
        repo.create_place(NewPlace {
            name: name.to_string(),
            place_type: PlaceType::Farm,
            center_lat: Decimal::new(350, 1),
            center_lng: Decimal::new(1390, 1),
            initial_zoom: 15,
        })
        .await
        .unwrap()
    }

    async fn seed_car_type(repo: &MemoryRepository, type_name: &str) -> CarType {
        repo.create_car_type(NewCarType {
            type_name: type_name.to_string(),
            ..Default::default()
        })
        .await
        .unwrap()
    }

    async fn seed_route(repo: &MemoryRepository, place: &Place, car_type: &CarType, area: Option<Uuid>) -> Route {
        repo.create_route(
            NewRoute {
                place_id: place.id,
                name: "R1".to_string(),
                description: None,
                car_type_id: car_type.id,
                route_type: RouteType::Automatic,
                source_area_id: area,
                source_info_text: String::new(),
                calculated_at: Utc::now(),
            },
            vec![
                NewRoutePoint {
                    sequence_number: 2,
                    location: Some(GeoPoint::flat(139.01, 35.0).unwrap()),
                    aux_wp: false,
                    heading: Some(90),
                    is_direct_path: true,
                    blade_active: true,
                },
                NewRoutePoint {
                    sequence_number: 1,
                    location: Some(GeoPoint::new(139.0, 35.0, Some(12.0)).unwrap()),
                    aux_wp: false,
                    heading: None,
                    is_direct_path: true,
                    blade_active: false,
                },
            ],
        )
        .await
        .unwrap()
    }

    async fn seed_car(repo: &MemoryRepository, name: &str, car_type: Option<Uuid>, base: Option<Uuid>) -> Car {
        repo.create_car(NewCar {
            name: name.to_string(),
            car_type_id: car_type,
            base_place_id: base,
        })
        .await
        .unwrap()
    }

    async fn seed_area(repo: &MemoryRepository, place: &Place, name: &str) -> RouteArea {
        repo.create_route_area(NewRouteArea {
            place_id: place.id,
            name: name.to_string(),
            description: String::new(),
            status: AreaStatus::Draft,
            source_data_hint: String::new(),
            generation_parameters: None,
        }, Vec::new())
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_route_points_are_ordered() {
        let repo = MemoryRepository::new();
        let place = seed_place(&repo, "Field A").await;
        let car_type = seed_car_type(&repo, "mower").await;
        let route = seed_route(&repo, &place, &car_type, None).await;

        let points = repo.list_route_points(route.id).await.unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].sequence_number, 1);
        assert_eq!(points[0].altitude(), Some(12.0));
        assert_eq!(points[1].altitude(), None);
    }

    #[tokio::test]
    async fn test_duplicate_route_sequence_rejected() {
        let repo = MemoryRepository::new();
        let place = seed_place(&repo, "Field A").await;
        let car_type = seed_car_type(&repo, "mower").await;
        let point = NewRoutePoint {
            sequence_number: 1,
            location: None,
            aux_wp: false,
            heading: None,
            is_direct_path: true,
            blade_active: false,
        };
        let result = repo
            .create_route(
                NewRoute {
                    place_id: place.id,
                    name: "dup".to_string(),
                    description: None,
                    car_type_id: car_type.id,
                    route_type: RouteType::PlaceList,
                    source_area_id: None,
                    source_info_text: String::new(),
                    calculated_at: Utc::now(),
                },
                vec![point.clone(), point],
            )
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert!(repo.list_routes(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unique_names() {
        let repo = MemoryRepository::new();
        let place = seed_place(&repo, "Field A").await;
        seed_car_type(&repo, "mower").await;
        let dup = repo
            .create_car_type(NewCarType {
                type_name: "mower".to_string(),
                ..Default::default()
            })
            .await;
        assert!(matches!(dup, Err(AppError::Conflict(_))));

        seed_area(&repo, &place, "Zone1").await;
        let dup_area = repo
            .create_route_area(NewRouteArea {
                place_id: place.id,
                name: "Zone1".to_string(),
                description: String::new(),
                status: AreaStatus::Draft,
                source_data_hint: String::new(),
                generation_parameters: None,
            }, Vec::new())
            .await;
        assert!(matches!(dup_area, Err(AppError::Conflict(_))));

        // mismo nombre en otro lugar está permitido
        let other = seed_place(&repo, "Field B").await;
        assert!(repo
            .create_route_area(NewRouteArea {
                place_id: other.id,
                name: "Zone1".to_string(),
                description: String::new(),
                status: AreaStatus::Draft,
                source_data_hint: String::new(),
                generation_parameters: None,
            }, Vec::new())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_delete_place_cascades() {
        let repo = MemoryRepository::new();
        let place = seed_place(&repo, "Field A").await;
        let car_type = seed_car_type(&repo, "mower").await;
        let area = seed_area(&repo, &place, "Zone1").await;
        let route = seed_route(&repo, &place, &car_type, Some(area.id)).await;
        let car = seed_car(&repo, "X", Some(car_type.id), Some(place.id)).await;
        repo.assign_route(car.id, route.id, Utc::now()).await.unwrap();

        repo.delete_place(place.id).await.unwrap();

        assert!(repo.find_route(route.id).await.unwrap().is_none());
        assert!(repo.find_route_area(area.id).await.unwrap().is_none());
        assert!(repo.list_route_points(route.id).await.unwrap().is_empty());
        let car = repo.find_car(car.id).await.unwrap().unwrap();
        assert_eq!(car.base_place_id, None);
        assert_eq!(car.assigned_route_id, None);
    }

    #[tokio::test]
    async fn test_delete_area_nulls_source() {
        let repo = MemoryRepository::new();
        let place = seed_place(&repo, "Field A").await;
        let car_type = seed_car_type(&repo, "mower").await;
        let area = seed_area(&repo, &place, "Zone1").await;
        let route = seed_route(&repo, &place, &car_type, Some(area.id)).await;

        repo.delete_route_area(area.id).await.unwrap();

        let route = repo.find_route(route.id).await.unwrap().unwrap();
        assert_eq!(route.source_area_id, None);
    }

    #[tokio::test]
    async fn test_delete_car_type_is_protected() {
        let repo = MemoryRepository::new();
        let place = seed_place(&repo, "Field A").await;
        let used_by_route = seed_car_type(&repo, "mower").await;
        let used_by_car = seed_car_type(&repo, "tractor").await;
        let unused = seed_car_type(&repo, "drone").await;
        seed_route(&repo, &place, &used_by_route, None).await;
        seed_car(&repo, "X", Some(used_by_car.id), None).await;

        assert!(matches!(
            repo.delete_car_type(used_by_route.id).await,
            Err(AppError::Protected(_))
        ));
        assert!(matches!(
            repo.delete_car_type(used_by_car.id).await,
            Err(AppError::Protected(_))
        ));
        repo.delete_car_type(unused.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_route_releases_car() {
        let repo = MemoryRepository::new();
        let place = seed_place(&repo, "Field A").await;
        let car_type = seed_car_type(&repo, "mower").await;
        let route = seed_route(&repo, &place, &car_type, None).await;
        let car = seed_car(&repo, "X", None, None).await;
        repo.assign_route(car.id, route.id, Utc::now()).await.unwrap();

        repo.delete_route(route.id).await.unwrap();

        let car = repo.find_car(car.id).await.unwrap().unwrap();
        assert_eq!(car.assigned_route_id, None);
    }

    #[tokio::test]
    async fn test_concurrent_assignment_single_winner() {
        let repo = Arc::new(MemoryRepository::new());
        let place = seed_place(&repo, "Field A").await;
        let car_type = seed_car_type(&repo, "mower").await;
        let route = seed_route(&repo, &place, &car_type, None).await;
        let x = seed_car(&repo, "X", None, None).await.id;
        let y = seed_car(&repo, "Y", None, None).await.id;

        let (rx, ry) = {
            let (a, b) = (repo.clone(), repo.clone());
            let route_id = route.id;
            tokio::join!(
                tokio::spawn(async move { a.assign_route(x, route_id, Utc::now()).await }),
                tokio::spawn(async move { b.assign_route(y, route_id, Utc::now()).await })
            )
        };
        let (rx, ry) = (rx.unwrap(), ry.unwrap());

        assert!(rx.is_ok() ^ ry.is_ok());
        let loser = if rx.is_ok() { ry } else { rx };
        assert!(matches!(loser, Err(AppError::AssignmentConflict(_))));

        let holder = repo.find_car_by_assigned_route(route.id).await.unwrap().unwrap();
        assert!(holder.id == x || holder.id == y);
        let holders = repo
            .list_cars()
            .await
            .unwrap()
            .into_iter()
            .filter(|c| c.assigned_route_id == Some(route.id))
            .count();
        assert_eq!(holders, 1);
    }

    #[tokio::test]
    async fn test_save_assignment_detects_stale_status() {
        let repo = MemoryRepository::new();
        let car = seed_car(&repo, "X", None, None).await;
        let result = repo
            .save_assignment(car.id, AssignmentStatus::Assigned, assignment::unassigned())
            .await;
        assert!(matches!(result, Err(AppError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn test_replace_area_points_bumps_version() {
        let repo = MemoryRepository::new();
        let place = seed_place(&repo, "Field A").await;
        let area = seed_area(&repo, &place, "Zone1").await;
        assert_eq!(area.version, 1);

        let updated = repo
            .replace_area_points(
                area.id,
                vec![
                    NewAreaPoint { sequence_number: 2, location: GeoPoint::flat(139.01, 35.0).unwrap() },
                    NewAreaPoint { sequence_number: 1, location: GeoPoint::flat(139.0, 35.0).unwrap() },
                ],
            )
            .await
            .unwrap();
        assert_eq!(updated.version, 2);

        let points = repo.list_area_points(area.id).await.unwrap();
        assert_eq!(points.iter().map(|p| p.sequence_number).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_car_references_must_exist() {
        let repo = MemoryRepository::new();
        let result = repo
            .create_car(NewCar {
                name: "ghost".to_string(),
                car_type_id: Some(Uuid::new_v4()),
                base_place_id: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
