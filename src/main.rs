use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};
use dotenvy::dotenv;

use dealership_vehicles::cache::{CacheConfig, CacheOperations, CachedVehicleStore, MemoryCache, RedisClient};
use dealership_vehicles::config::{DatabaseConfig, EnvironmentConfig};
use dealership_vehicles::database::DatabaseConnection;
use dealership_vehicles::repositories::{PgVehicleRepository, VehicleStore};
use dealership_vehicles::services::VehicleEventBus;
use dealership_vehicles::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();
    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚘 Dealership Vehicles - API de inventario y garantías");
    info!("=====================================================");
    info!("🌍 Entorno: {}", config.environment);
    if config.is_production() && config.cors_origins.is_empty() {
        warn!("⚠️ CORS_ORIGINS vacío en producción, se permite cualquier origen");
    }

    // Inicializar base de datos
    let db_config = DatabaseConfig::from_env()?;
    let db_connection = match DatabaseConnection::connect(&db_config).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };
    let repository: Arc<dyn VehicleStore> =
        Arc::new(PgVehicleRepository::new(db_connection.pool().clone()));

    // Inicializar cache (Redis si está configurado, si no en memoria)
    let cache_config = CacheConfig {
        redis_url: config.redis_url.clone(),
        default_ttl: config.cache_ttl_seconds,
        ..CacheConfig::default()
    };
    let cache: Arc<dyn CacheOperations> = match &cache_config.redis_url {
        Some(url) => match RedisClient::new(url).await {
            Ok(client) => Arc::new(client),
            Err(e) => {
                error!("❌ Error conectando a Redis: {}", e);
                return Err(anyhow::anyhow!("Error de Redis: {}", e));
            }
        },
        None => {
            warn!("⚠️ REDIS_URL no definida, usando cache en memoria");
            Arc::new(MemoryCache::new())
        }
    };
    let store: Arc<dyn VehicleStore> = Arc::new(CachedVehicleStore::new(repository, cache, cache_config));

    // Observador de eventos de vehículos
    let events = VehicleEventBus::default();
    let mut receiver = events.subscribe();
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => info!("📣 Evento de vehículo: {:?}", event),
                Err(RecvError::Lagged(skipped)) => warn!("⚠️ {} eventos descartados", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_app(AppState::new(config, store, events));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🚗 Endpoints - Vehicle:");
    info!("   POST /api/vehicle - Registrar llegada");
    info!("   GET  /api/vehicle - Listar vehículos");
    info!("   GET  /api/vehicle/:id - Obtener vehículo");
    info!("   GET  /api/vehicle/vin/:vin - Obtener vehículo por VIN");
    info!("   GET  /api/vehicle/:id/moves - Movimientos permitidos");
    info!("   POST /api/vehicle/:id/transition - Mover / cambiar estado");
    info!("   POST /api/vehicle/:id/receive - Recibir coche pedido");
    info!("   GET  /api/vehicle/:id/warranty - Estado de garantía");
    info!("   PUT  /api/vehicle/:id/warranty - Editar garantías");

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
            Ok(mut stream) => {
                stream.recv().await;
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
