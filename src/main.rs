use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use fleet_route_manager::config::database::DatabaseConfig;
use fleet_route_manager::config::environment::{EnvironmentConfig, StorageBackend};
use fleet_route_manager::database::DatabaseConnection;
use fleet_route_manager::middleware::cors::cors_middleware_with_origins;
use fleet_route_manager::repositories::{MemoryRepository, PgRepository, SharedRepository};
use fleet_route_manager::routes::create_app;
use fleet_route_manager::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    let level = tracing::Level::from_str(config.log_level()).unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚜 Fleet Route Manager");
    info!("================================================");
    info!("🌍 Entorno: {}", config.environment);

    // Inicializar persistencia
    let repository: SharedRepository = match config.storage_backend {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let db_connection = match DatabaseConnection::connect(&db_config).await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {:#}", e);
                    return Err(e);
                }
            };
            info!("✅ PostgreSQL conectado");
            Arc::new(PgRepository::new(db_connection.into_pool()))
        }
        StorageBackend::Memory => {
            warn!("⚠️ Usando almacenamiento en memoria: los datos se pierden al reiniciar");
            Arc::new(MemoryRepository::new())
        }
    };

    let addr: SocketAddr = config.server_url().parse()?;
    let cors = cors_middleware_with_origins(&config.cors_origins);

    let app = create_app(AppState::new(repository, config))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  / - Portada");
    info!("   GET  /map?place_id= - Mapa");
    info!("   GET  /health - Health check");
    info!("📍 Places:");
    info!("   GET|POST /api/places, GET|PUT|DELETE /api/places/:id");
    info!("   GET  /api/places/:id/route-areas/export - FeatureCollection de áreas definidas");
    info!("🚜 Car types:");
    info!("   GET|POST /api/car-types, GET|PUT|DELETE /api/car-types/:id");
    info!("🚗 Cars:");
    info!("   GET|POST /api/cars (?assigned_route=), GET|PUT|DELETE /api/cars/:id");
    info!("   POST /api/cars/:id/{{assign,release,start,complete,fail}}");
    info!("🛣️ Routes:");
    info!("   GET|POST /api/routes (?place_id=), POST /api/routes/import");
    info!("   GET|PUT|DELETE /api/routes/:id");
    info!("📐 Route areas:");
    info!("   GET|POST /api/route-areas (?place_id=), GET|PUT|DELETE /api/route-areas/:id");
    info!("   PUT  /api/route-areas/:id/points, GET /api/route-areas/:id/geojson");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
