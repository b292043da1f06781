use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use trainer_registry::config::AppConfig;
use trainer_registry::trainers::{InMemoryTrainerStore, TrainerService};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type RegistryService = TrainerService<InMemoryTrainerStore>;

/// Fresh in-memory registry honoring the configured validation policy.
pub(crate) fn registry_service(config: &AppConfig) -> Arc<RegistryService> {
    Arc::new(TrainerService::new(
        Arc::new(InMemoryTrainerStore::default()),
        config.validation,
    ))
}
