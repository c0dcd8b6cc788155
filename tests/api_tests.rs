use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use fleet_route_manager::config::environment::EnvironmentConfig;
use fleet_route_manager::repositories::MemoryRepository;
use fleet_route_manager::routes::create_app;
use fleet_route_manager::state::AppState;

fn create_test_app() -> Router {
    let state = AppState::new(Arc::new(MemoryRepository::new()), EnvironmentConfig::default());
    create_app(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_place(app: &Router, name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/places",
        Some(json!({
            "name": name,
            "place_type": "farm",
            "center_lat": 35.681236,
            "center_lng": 139.767125
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_car_type(app: &Router, name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/car-types",
        Some(json!({"type_name": name, "move_type": "crawler", "cutting_width": 1.5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_car(app: &Router, name: &str, car_type_id: Option<&str>, base_place_id: Option<&str>) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/cars",
        Some(json!({"name": name, "car_type_id": car_type_id, "base_place_id": base_place_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_route(app: &Router, place_id: &str, car_type_id: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/routes",
        Some(json!({
            "place_id": place_id,
            "car_type_id": car_type_id,
            "name": name,
            "points": [
                {"sequence_number": 0, "longitude": 139.0, "latitude": 35.0},
                {"sequence_number": 1, "longitude": 139.001, "latitude": 35.0, "blade_active": true},
                {"sequence_number": 2, "aux_wp": true}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["data"]["id"].as_str().unwrap().to_string()
}

fn square_points() -> Value {
    json!([
        {"sequence_number": 0, "longitude": 139.0, "latitude": 35.0},
        {"sequence_number": 1, "longitude": 139.001, "latitude": 35.0},
        {"sequence_number": 2, "longitude": 139.001, "latitude": 35.001},
        {"sequence_number": 3, "longitude": 139.0, "latitude": 35.001}
    ])
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_place_defaults_and_validation() {
    let app = create_test_app();
    let place_id = create_place(&app, "Field A").await;

    let (status, body) = send(&app, Method::GET, &format!("/api/places/{}", place_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["initial_zoom"], 15);
    assert_eq!(body["data"]["place_type_label"], "Farm");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/places",
        Some(json!({"name": "Nowhere", "center_lat": 91.0, "center_lng": 0.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_area_geojson_export() {
    let app = create_test_app();
    let place_id = create_place(&app, "Field A").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/route-areas",
        Some(json!({
            "place_id": place_id,
            "name": "Zone1",
            "status": "defined",
            "generation_parameters": {"offset": 0.5, "pattern": "spiral"},
            "points": square_points()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["version"], 1);
    let area_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, feature) = send(
        &app,
        Method::GET,
        &format!("/api/route-areas/{}/geojson", area_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feature["type"], "Feature");
    assert_eq!(feature["geometry"]["type"], "Polygon");

    let ring = feature["geometry"]["coordinates"][0].as_array().unwrap();
    assert_eq!(ring.len(), 5);
    assert_eq!(ring[0], ring[4]);
    assert_eq!(ring[1], json!([139.001, 35.0]));

    assert_eq!(feature["properties"]["area_name"], "Zone1");
    assert_eq!(feature["properties"]["place_name"], "Field A");
    assert_eq!(feature["properties"]["version"], 1);
    assert_eq!(
        feature["properties"]["generation_parameters"],
        json!({"offset": 0.5, "pattern": "spiral"})
    );
}

#[tokio::test]
async fn test_empty_area_returns_no_content() {
    let app = create_test_app();
    let place_id = create_place(&app, "Field A").await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/route-areas",
        Some(json!({"place_id": place_id, "name": "Empty", "status": "defined"})),
    )
    .await;
    let area_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/route-areas/{}/geojson", area_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_place_export_only_includes_defined_areas_with_vertices() {
    let app = create_test_app();
    let place_id = create_place(&app, "Field A").await;

    for (name, status, points) in [
        ("Zone1", "defined", square_points()),
        ("Zone2", "draft", square_points()),
        ("Zone3", "defined", json!([])),
    ] {
        let (code, body) = send(
            &app,
            Method::POST,
            "/api/route-areas",
            Some(json!({"place_id": place_id, "name": name, "status": status, "points": points})),
        )
        .await;
        assert_eq!(code, StatusCode::OK, "{}", body);
    }

    let (status, collection) = send(
        &app,
        Method::GET,
        &format!("/api/places/{}/route-areas/export", place_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(collection["type"], "FeatureCollection");

    let features = collection["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["properties"]["area_name"], "Zone1");
}

#[tokio::test]
async fn test_replace_area_points_bumps_version() {
    let app = create_test_app();
    let place_id = create_place(&app, "Field A").await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/route-areas",
        Some(json!({"place_id": place_id, "name": "Zone1"})),
    )
    .await;
    let area_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/route-areas/{}/points", area_id),
        Some(json!({"points": square_points()})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["version"], 2);
    assert_eq!(body["data"]["points"].as_array().unwrap().len(), 4);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/route-areas/{}/points", area_id),
        Some(json!({"points": [
            {"sequence_number": 0, "longitude": 139.0, "latitude": 35.0},
            {"sequence_number": 0, "longitude": 139.1, "latitude": 35.1}
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_route_detail_with_points() {
    let app = create_test_app();
    let place_id = create_place(&app, "Field A").await;
    let car_type_id = create_car_type(&app, "Mower").await;
    let route_id = create_route(&app, &place_id, &car_type_id, "R1").await;

    let (status, body) = send(&app, Method::GET, &format!("/api/routes/{}", route_id), None).await;
    assert_eq!(status, StatusCode::OK);

    let route = &body["data"];
    assert_eq!(route["route_type"], "place_list");
    assert_eq!(route["is_in_use"], false);

    let points = route["points"].as_array().unwrap();
    assert_eq!(points.len(), 3);
    assert_eq!(points[1]["blade_active"], true);
    assert_eq!(points[0]["is_direct_path"], true);
    assert_eq!(points[2]["lat"], Value::Null);
}

#[tokio::test]
async fn test_route_duplicate_sequence_rejected() {
    let app = create_test_app();
    let place_id = create_place(&app, "Field A").await;
    let car_type_id = create_car_type(&app, "Mower").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/routes",
        Some(json!({
            "place_id": place_id,
            "car_type_id": car_type_id,
            "name": "Broken",
            "points": [
                {"sequence_number": 1, "longitude": 139.0, "latitude": 35.0},
                {"sequence_number": 1, "longitude": 139.1, "latitude": 35.1}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (_, body) = send(&app, Method::GET, "/api/routes", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_import_route() {
    let app = create_test_app();
    let place_id = create_place(&app, "Field A").await;
    let other_place_id = create_place(&app, "Field B").await;
    let car_type_id = create_car_type(&app, "Mower").await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/route-areas",
        Some(json!({"place_id": place_id, "name": "Zone1", "status": "defined", "points": square_points()})),
    )
    .await;
    let area_id = body["data"]["id"].as_str().unwrap().to_string();

    let payload = |place: &str| {
        json!({
            "place_id": place,
            "car_type_id": car_type_id,
            "name": "Generated",
            "source_area_id": area_id,
            "source_info_text": "generator v2",
            "points": [
                {"sequence_number": 0, "longitude": 139.0, "latitude": 35.0, "heading": 90},
                {"sequence_number": 1, "longitude": 139.0005, "latitude": 35.0, "heading": 90}
            ]
        })
    };

    let (status, body) = send(&app, Method::POST, "/api/routes/import", Some(payload(&place_id))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["route_type"], "automatic");
    assert_eq!(body["data"]["source_area_id"], area_id.as_str());
    assert_eq!(body["data"]["points"].as_array().unwrap().len(), 2);

    // Cada importación crea una ruta nueva
    let (status, _) = send(&app, Method::POST, "/api/routes/import", Some(payload(&place_id))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, Method::GET, &format!("/api/routes?place_id={}", place_id), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // El área de origen debe pertenecer al mismo lugar
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/routes/import",
        Some(payload(&other_place_id)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_assignment_conflict_and_lifecycle() {
    let app = create_test_app();
    let place_id = create_place(&app, "Field A").await;
    let car_type_id = create_car_type(&app, "Mower").await;
    let route_id = create_route(&app, &place_id, &car_type_id, "R1").await;
    let x = create_car(&app, "X", Some(&car_type_id), Some(&place_id)).await;
    let y = create_car(&app, "Y", Some(&car_type_id), None).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/cars/{}/assign", x),
        Some(json!({"route_id": route_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["assignment_status"], "assigned");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/cars/{}/assign", y),
        Some(json!({"route_id": route_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ASSIGNMENT_CONFLICT");

    let (_, body) = send(&app, Method::GET, &format!("/api/routes/{}", route_id), None).await;
    assert_eq!(body["data"]["is_in_use"], true);
    assert_eq!(body["data"]["assigned_car_id"], x.as_str());

    let (_, body) = send(&app, Method::GET, &format!("/api/cars?assigned_route={}", route_id), None).await;
    assert_eq!(body["data"][0]["id"], x.as_str());

    // No se puede completar sin haber empezado
    let (status, body) = send(&app, Method::POST, &format!("/api/cars/{}/complete", x), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");

    let (status, body) = send(&app, Method::POST, &format!("/api/cars/{}/start", x), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["assignment_status"], "in_progress");

    let (status, body) = send(&app, Method::POST, &format!("/api/cars/{}/complete", x), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["assignment_status"], "completed");
    assert!(body["data"]["completed_at"].is_string());

    let (status, body) = send(&app, Method::POST, &format!("/api/cars/{}/release", x), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["assignment_status"], "none");
    assert_eq!(body["data"]["assigned_route_id"], Value::Null);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/cars/{}/assign", y),
        Some(json!({"route_id": route_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_car_type_delete_is_protected() {
    let app = create_test_app();
    let place_id = create_place(&app, "Field A").await;
    let car_type_id = create_car_type(&app, "Mower").await;
    let route_id = create_route(&app, &place_id, &car_type_id, "R1").await;

    let (status, body) = send(&app, Method::DELETE, &format!("/api/car-types/{}", car_type_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "PROTECTED");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/routes/{}", route_id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/car-types/{}", car_type_id), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_place_delete_cascades() {
    let app = create_test_app();
    let place_id = create_place(&app, "Field A").await;
    let car_type_id = create_car_type(&app, "Mower").await;
    let route_id = create_route(&app, &place_id, &car_type_id, "R1").await;
    let car_id = create_car(&app, "X", Some(&car_type_id), Some(&place_id)).await;

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/cars/{}/assign", car_id),
        Some(json!({"route_id": route_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/places/{}", place_id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, &format!("/api/routes/{}", route_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, &format!("/api/cars/{}", car_id), None).await;
    assert_eq!(body["data"]["base_place_id"], Value::Null);
    assert_eq!(body["data"]["assigned_route_id"], Value::Null);
    assert_eq!(body["data"]["car_type_id"], car_type_id.as_str());
}

#[tokio::test]
async fn test_duplicate_names_conflict() {
    let app = create_test_app();
    create_car_type(&app, "Mower").await;

    let (status, body) = send(&app, Method::POST, "/api/car-types", Some(json!({"type_name": "Mower"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    create_car(&app, "X", None, None).await;
    let (status, _) = send(&app, Method::POST, "/api/cars", Some(json!({"name": "X"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_map_page_uses_place_center() {
    let app = create_test_app();
    let place_id = create_place(&app, "Field A").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/map?place_id={}", place_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Field A"));
    assert!(html.contains("lat: 35.681236"));
    assert!(html.contains("zoom: 15"));
}

#[tokio::test]
async fn test_blank_names_are_rejected() {
    let app = create_test_app();
    let place_id = create_place(&app, "Field A").await;
    let car_type_id = create_car_type(&app, "Mower").await;
    let car_id = create_car(&app, "X", Some(&car_type_id), None).await;
    let route_id = create_route(&app, &place_id, &car_type_id, "R1").await;

    let creates = [
        (
            "/api/places",
            json!({"name": "   ", "center_lat": 35.0, "center_lng": 139.0}),
        ),
        ("/api/car-types", json!({"type_name": " \t "})),
        ("/api/cars", json!({"name": "  "})),
        (
            "/api/routes",
            json!({"place_id": place_id, "car_type_id": car_type_id, "name": "   "}),
        ),
        (
            "/api/routes/import",
            json!({
                "place_id": place_id,
                "car_type_id": car_type_id,
                "name": " ",
                "points": [{"sequence_number": 0, "longitude": 139.0, "latitude": 35.0}]
            }),
        ),
        ("/api/route-areas", json!({"place_id": place_id, "name": "   "})),
    ];
    for (uri, payload) in creates {
        let (status, body) = send(&app, Method::POST, uri, Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} accepted a blank name", uri);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    let updates = [
        (format!("/api/places/{}", place_id), json!({"name": "  "})),
        (format!("/api/car-types/{}", car_type_id), json!({"type_name": "  "})),
        (format!("/api/cars/{}", car_id), json!({"name": "  "})),
        (format!("/api/routes/{}", route_id), json!({"name": "  "})),
    ];
    for (uri, payload) in updates {
        let (status, _) = send(&app, Method::PUT, &uri, Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} accepted a blank name", uri);
    }

    // Nada se guardó con nombre vacío
    let (_, body) = send(&app, Method::GET, "/api/places", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], "Field A");
    let (_, body) = send(&app, Method::GET, &format!("/api/cars/{}", car_id), None).await;
    assert_eq!(body["data"]["name"], "X");
}

#[tokio::test]
async fn test_status_event_body_must_parse() {
    let app = create_test_app();
    let place_id = create_place(&app, "Field A").await;
    let car_type_id = create_car_type(&app, "Mower").await;
    let route_id = create_route(&app, &place_id, &car_type_id, "R1").await;
    let car_id = create_car(&app, "X", Some(&car_type_id), None).await;

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/cars/{}/assign", car_id),
        Some(json!({"route_id": route_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/cars/{}/start", car_id),
        Some(json!({"at": "not-a-timestamp"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/cars/{}/start", car_id))
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // El coche sigue asignado, sin arrancar
    let (_, body) = send(&app, Method::GET, &format!("/api/cars/{}", car_id), None).await;
    assert_eq!(body["data"]["assignment_status"], "assigned");
    assert_eq!(body["data"]["started_at"], Value::Null);
}

#[tokio::test]
async fn test_status_timestamps_must_be_ordered() {
    let app = create_test_app();
    let place_id = create_place(&app, "Field A").await;
    let car_type_id = create_car_type(&app, "Mower").await;
    let route_id = create_route(&app, &place_id, &car_type_id, "R1").await;
    let car_id = create_car(&app, "X", Some(&car_type_id), None).await;

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/cars/{}/assign", car_id),
        Some(json!({"route_id": route_id, "at": "2026-01-01T09:00:00Z"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/cars/{}/start", car_id),
        Some(json!({"at": "2026-01-01T08:59:59Z"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/cars/{}/start", car_id),
        Some(json!({"at": "2026-01-01T09:30:00Z"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["started_at"], "2026-01-01T09:30:00Z");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/cars/{}/complete", car_id),
        Some(json!({"at": "2026-01-01T09:00:00Z"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/cars/{}/fail", car_id),
        Some(json!({"at": "2026-01-01T10:00:00Z"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["assignment_status"], "failed");
}

#[tokio::test]
async fn test_car_with_deleted_route_can_only_be_released() {
    let app = create_test_app();
    let place_id = create_place(&app, "Field A").await;
    let car_type_id = create_car_type(&app, "Mower").await;
    let route_id = create_route(&app, &place_id, &car_type_id, "R1").await;
    let car_id = create_car(&app, "X", Some(&car_type_id), None).await;

    send(
        &app,
        Method::POST,
        &format!("/api/cars/{}/assign", car_id),
        Some(json!({"route_id": route_id})),
    )
    .await;
    let (status, _) = send(&app, Method::POST, &format!("/api/cars/{}/start", car_id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/routes/{}", route_id), None).await;
    assert_eq!(status, StatusCode::OK);

    for action in ["complete", "fail"] {
        let (status, body) =
            send(&app, Method::POST, &format!("/api/cars/{}/{}", car_id, action), None).await;
        assert_eq!(status, StatusCode::CONFLICT, "{} on an orphaned run", action);
        assert_eq!(body["code"], "INVALID_TRANSITION");
    }

    let (status, body) = send(&app, Method::POST, &format!("/api/cars/{}/release", car_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["assignment_status"], "none");
}

#[tokio::test]
async fn test_car_type_decimal_scale_is_checked() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/car-types",
        Some(json!({"type_name": "Steep", "curvature": 0.0125, "turning_radius": 2.5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["curvature"], "0.0125");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/car-types",
        Some(json!({"type_name": "Fine", "curvature": 0.00125})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/places",
        Some(json!({"name": "Precise", "center_lat": 35.6812361234, "center_lng": 139.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
