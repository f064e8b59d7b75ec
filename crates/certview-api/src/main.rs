//! # certview-api — Binary Entry Point
//!
//! Starts the Axum HTTP server. Binds to `PORT` (default 8080).
//! Without `MONGODB_URL` the server runs against an in-memory store,
//! optionally seeded from `CERTVIEW_SEED_FILE`.

use std::sync::Arc;

use certview_api::state::{AppConfig, AppState, LogFormat};
use certview_service::CertificateService;
use certview_store::{ConfigError, MemoryStore, MongoStore, StoreConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env();
    init_tracing(config.log_format);

    let metrics = certview_api::middleware::metrics::install_recorder().map_err(|e| {
        tracing::error!("Failed to install metrics recorder: {e}");
        e
    })?;

    let service = build_service(&config).await.map_err(|e| {
        tracing::error!("Certificate store initialization failed: {e}");
        e
    })?;

    let port = config.port;
    let state = AppState::with_service(config, service).with_metrics(metrics);
    let app = certview_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("certview API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn build_service(
    config: &AppConfig,
) -> Result<CertificateService, Box<dyn std::error::Error>> {
    match StoreConfig::from_env() {
        Ok(store_config) => {
            tracing::debug!(config = ?store_config, "store configuration loaded");
            let store = Arc::new(MongoStore::connect(&store_config).await?);
            Ok(CertificateService::with_store(
                store,
                store_config.query_timeout(),
            ))
        }
        Err(ConfigError::MissingUrl) => {
            tracing::warn!("MONGODB_URL not set. Serving certificates from an in-memory store.");
            let deadline = certview_store::config::query_timeout_from_env()?;
            let store = match &config.seed_file {
                Some(path) => {
                    let raw = std::fs::read_to_string(path)?;
                    let store = MemoryStore::from_json_seed(serde_json::from_str(&raw)?)?;
                    tracing::info!(
                        path = %path.display(),
                        certificates = store.certificate_count(),
                        profiles = store.profile_count(),
                        "in-memory store seeded"
                    );
                    store
                }
                None => MemoryStore::new(),
            };
            Ok(CertificateService::with_store(
                Arc::new(store),
                deadline,
            ))
        }
        Err(e) => Err(e.into()),
    }
}
