//! Páginas web mínimas: portada, mapa y health check

use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};

#[derive(Debug, Deserialize)]
pub struct MapQuery {
    pub place_id: Option<Uuid>,
}

pub fn create_web_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/map", get(map_view))
        .route("/health", get(health_check))
}

async fn index() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Fleet Route Manager</title></head>
<body>
  <h1>Fleet Route Manager</h1>
  <ul>
    <li><a href="/map">Map</a></li>
    <li><a href="/api/places">Places</a></li>
    <li><a href="/api/routes">Routes</a></li>
    <li><a href="/api/cars">Cars</a></li>
  </ul>
</body>
</html>"#,
    )
}

/// Mapa centrado en la configuración por defecto o en el lugar indicado
async fn map_view(
    State(state): State<AppState>,
    Query(query): Query<MapQuery>,
) -> Result<Html<String>, AppError> {
    let defaults = &state.config.map;
    let (title, lat, lng, zoom) = match query.place_id {
        Some(id) => {
            let place = state
                .repository
                .find_place(id)
                .await?
                .ok_or_else(|| not_found_error("Place", &id.to_string()))?;
            (
                place.name.clone(),
                place.center_lat.to_string(),
                place.center_lng.to_string(),
                place.initial_zoom,
            )
        }
        None => (
            "Map".to_string(),
            defaults.center_lat.to_string(),
            defaults.center_lng.to_string(),
            defaults.zoom,
        ),
    };

    Ok(Html(render_map_page(
        &title,
        &defaults.google_maps_api_key,
        &lat,
        &lng,
        zoom,
    )))
}

fn render_map_page(title: &str, api_key: &str, lat: &str, lng: &str, zoom: i32) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
  <div id="map"></div>
  <script>
    function initMap() {{
      new google.maps.Map(document.getElementById("map"), {{
        center: {{ lat: {lat}, lng: {lng} }},
        zoom: {zoom},
        mapTypeId: "satellite"
      }});
    }}
  </script>
  <script async src="https://maps.googleapis.com/maps/api/js?key={api_key}&callback=initMap"></script>
</body>
</html>"#,
        title = escape_html(title),
        api_key = escape_html(api_key),
        lat = lat,
        lng = lng,
        zoom = zoom,
    )
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "service": "fleet-route-manager",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
