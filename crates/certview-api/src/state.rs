//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. Holds the certificate service (which owns the
//! injected store) and, when a recorder is installed, the Prometheus handle
//! used to render `/metrics`.

use std::path::PathBuf;
use std::sync::Arc;

use certview_service::CertificateService;
use certview_store::MemoryStore;
use metrics_exporter_prometheus::PrometheusHandle;

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Interpret `LOG_FORMAT`. Anything other than `json` is text.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    pub log_format: LogFormat,
    /// JSON seed for the in-memory store, used only when no MongoDB URL is
    /// configured.
    pub seed_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            log_format: LogFormat::Text,
            seed_file: None,
        }
    }
}

impl AppConfig {
    /// Read `PORT` (default 8080), `LOG_FORMAT`, and `CERTVIEW_SEED_FILE`.
    ///
    /// An unparseable `PORT` falls back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            log_format: lookup("LOG_FORMAT")
                .map(|f| LogFormat::parse(&f))
                .unwrap_or_default(),
            seed_file: lookup("CERTVIEW_SEED_FILE")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub service: CertificateService,
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("service", &self.service)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl AppState {
    /// State over an empty in-memory store with default configuration.
    pub fn new() -> Self {
        Self::with_memory_store(MemoryStore::new())
    }

    /// State over the given in-memory store.
    pub fn with_memory_store(store: MemoryStore) -> Self {
        let service =
            CertificateService::with_store(Arc::new(store), CertificateService::DEFAULT_DEADLINE);
        Self::with_service(AppConfig::default(), service)
    }

    pub fn with_service(config: AppConfig, service: CertificateService) -> Self {
        Self {
            config,
            service,
            metrics: None,
        }
    }

    /// Attach the handle `/metrics` renders from.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
