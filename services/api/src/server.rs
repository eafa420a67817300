use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use recruitment_apk::config::AppConfig;
use recruitment_apk::error::AppError;
use recruitment_apk::intake::SubmissionService;
use recruitment_apk::ratelimit::SlidingWindowLimiter;
use recruitment_apk::sinks::{CsvBackupStore, HttpMailNotifier, PipedriveClient};
use recruitment_apk::telemetry;

use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_intake_routes;

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

    let backup = Arc::new(CsvBackupStore::new(config.intake.csv_path.clone()));
    let notifier = config
        .intake
        .mail_relay_url
        .clone()
        .map(|url| Arc::new(HttpMailNotifier::new(url, config.intake.admin_email.clone())));
    let crm = config
        .pipedrive
        .clone()
        .map(|settings| Arc::new(PipedriveClient::new(settings)));
    let limiter = Arc::new(SlidingWindowLimiter::new(
        config.intake.rate_limit.max_requests as usize,
        Duration::from_secs(config.intake.rate_limit.window_secs),
    ));

    if notifier.is_none() {
        info!("mail relay not configured; notification sink disabled");
    }
    if crm.is_none() {
        info!("pipedrive token not configured; crm sink disabled");
    }

    let submission_service = Arc::new(SubmissionService::new(backup, notifier, crm));

    let app = with_intake_routes(submission_service, limiter)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "recruitment apk intake service ready");

    // Per-connection peer addresses feed the rate limiter.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
