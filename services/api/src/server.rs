use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryContactRepository};
use crate::routes::{cors_layer, with_operational_routes};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use gtdn::ares::{ares_router, AresHttpClient, AresService};
use gtdn::cache::{CacheService, CacheStore, MemoryCacheStore};
use gtdn::config::AppConfig;
use gtdn::contacts::{contacts_router, ContactService, SmtpMailer, TurnstileVerifier};
use gtdn::error::AppError;
use gtdn::justice::{justice_router, JusticeHttpClient, JusticeService};
use gtdn::telemetry;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::default());

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        cache: CacheService::new("health", Duration::from_secs(60), store.clone()),
    };

    let ares_service = Arc::new(AresService::new(
        Arc::new(AresHttpClient::new(&config.ares)?),
        store.clone(),
        &config.ares,
    ));
    let justice_service = Arc::new(JusticeService::new(
        Arc::new(JusticeHttpClient::new(&config.justice)?),
        store,
        &config.justice,
    ));

    let mailer = SmtpMailer::new(&config.mail)
        .map_err(|err| AppError::Internal(format!("mail transport: {err}")))?;
    let captcha = TurnstileVerifier::new(&config.turnstile)
        .map_err(|err| AppError::Internal(format!("captcha client: {err}")))?;
    let contact_service = Arc::new(ContactService::new(
        Arc::new(InMemoryContactRepository::default()),
        Arc::new(mailer),
        Arc::new(captcha),
    ));

    let app = with_operational_routes(
        ares_router(ares_service)
            .merge(justice_router(justice_service))
            .merge(contacts_router(contact_service)),
    )
    .layer(Extension(app_state))
    .layer(cors_layer(&config.server, config.environment))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "GTDN registry API ready");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
