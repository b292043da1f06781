use crate::cli::ServeArgs;
use crate::infra::{registry_service, AppState};
use crate::routes::with_trainer_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use trainer_registry::config::AppConfig;
use trainer_registry::error::AppError;
use trainer_registry::telemetry;
use trainer_registry::trainers::import::{load_submissions, seed};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = registry_service(&config);
    if let Some(path) = args.seed.take() {
        let submissions = load_submissions(&path)?;
        seed(&service, submissions);
    }

    let app = with_trainer_routes(service, config.paging)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "trainer registry ready");

    axum::serve(listener, app).await?;
    Ok(())
}
