use crate::cli::ServeArgs;
use crate::infra::{load_configured_catalog, AppState};
use crate::routes::with_service_routes;
use admit_advisor::config::AppConfig;
use admit_advisor::error::AppError;
use admit_advisor::telemetry;
use admit_advisor::workflows::admission::RecommendationService;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

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

    let catalog = load_configured_catalog(&config.advisor)?;
    info!(
        source = catalog.source.label(),
        inventory_rows = catalog.inventory.len(),
        history_records = catalog.history.len(),
        "catalog ready"
    );
    let service = Arc::new(RecommendationService::new(
        Arc::new(catalog.inventory),
        Arc::new(catalog.history),
        config.advisor.settings(),
    ));

    let app = with_service_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "admission advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}
