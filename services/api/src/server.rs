use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_site_routes;
use agency_site::config::AppConfig;
use agency_site::error::AppError;
use agency_site::submissions::{ListingAccess, SqliteStore, SubmissionService};
use agency_site::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let store = SqliteStore::connect(&config.database)?;
    info!(pool_size = config.database.pool_size, "submission store opened");

    let access = config.admin.listing_access();
    match &access {
        ListingAccess::Disabled => info!("submission listing routes disabled"),
        ListingAccess::Open => warn!("submission listing routes are open to anyone"),
        ListingAccess::Bearer(_) => info!("submission listing routes require the admin token"),
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(SubmissionService::new(Arc::new(store)));
    let app = with_site_routes(service, access)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "agency site backend ready");

    axum::serve(listener, app).await?;
    Ok(())
}
