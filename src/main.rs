use anyhow::Result;
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use dotenvy::dotenv;

use km_rodado::config::{DatabaseConfig, EnvironmentConfig, StoreBackend};
use km_rodado::routes::create_app_router;
use km_rodado::services::{spawn_selection_reconciler, SyncLayer, TripForm};
use km_rodado::state::AppState;
use km_rodado::store::{DocumentStore, MemoryDocumentStore, PgDocumentStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging: RUST_LOG tiene prioridad sobre LOG_LEVEL
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🚐 KM Rodado - Registro de viagens");
    info!("================================================");
    if config.is_development() {
        debug!("Configuración: {:?}", config);
    }

    // Almacén de documentos
    let store: Arc<dyn DocumentStore> = match config.store_backend {
        StoreBackend::Memory => {
            if config.is_production() {
                error!("❌ Almacén en memoria en producción: los datos se pierden al reiniciar");
            } else {
                warn!("⚠️ Usando almacén en memoria: los datos se pierden al reiniciar");
            }
            Arc::new(MemoryDocumentStore::new())
        }
        StoreBackend::Postgres => {
            let database = DatabaseConfig::from_env()?;
            let pool = match database.create_pool().await {
                Ok(pool) => pool,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };
            let store = PgDocumentStore::new(pool);
            store.migrate().await?;
            info!("✅ PostgreSQL conectado");
            Arc::new(store)
        }
    };

    // Sincronización con el almacén
    let sync = Arc::new(SyncLayer::new(store));
    sync.start().await?;

    let state = AppState::new(config.clone(), Arc::clone(&sync), TripForm::with_default_checklist(Utc::now()));

    // Plantilla del checklist desde el modelo persistido, si existe
    match state.checklist_model.template().await {
        Ok(Some(template)) => {
            info!("📋 Checklist inicial desde el modelo ({} elementos)", template.len());
            state.form.lock().await.replace_checklist(template);
        }
        Ok(None) => info!("📋 Checklist inicial por defecto"),
        Err(e) => warn!("⚠️ No se pudo leer el modelo de checklist: {}", e),
    }

    let reconciler = spawn_selection_reconciler(
        Arc::clone(&state.form),
        sync.watch_drivers(),
        sync.watch_vehicles(),
        sync.watch_plates(),
    );

    let app = create_app_router(state);

    let addr: SocketAddr = config.server_url().parse()?;
    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health");
    info!("   GET|POST /api/drivers, DELETE /api/drivers/:id");
    info!("   GET|POST /api/vehicles, DELETE /api/vehicles/:id");
    info!("   GET|POST /api/plates, DELETE /api/plates/:id");
    info!("   GET  /api/trips, GET|DELETE /api/trips/:id, GET /api/trips/:id/export");
    info!("   GET|PATCH /api/form, POST /api/form/submit");
    info!("   POST /api/form/checklist, PATCH|DELETE /api/form/checklist/:id, POST /api/form/checklist/check-all");
    info!("   GET|POST /api/checklist-model, PUT|DELETE /api/checklist-model/:id");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
    }

    reconciler.abort();
    sync.shutdown();
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
