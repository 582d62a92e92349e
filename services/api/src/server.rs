use crate::cli::ServeArgs;
use crate::infra::{seed_sample_data, AppState, InMemoryApplicationRepository};
use crate::routes::with_application_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use telco_admin::config::{AppConfig, ConfigError};
use telco_admin::error::AppError;
use telco_admin::telemetry;
use telco_admin::workflows::applications::{ApplicationListService, ApplicationRouterState};
use telco_admin::workflows::orders::{
    run_order_worker, B2bOrderGateway, FixtureOrderGateway, MpscOrderQueue, NbnOrderService,
    OrderDispatcher, OrderGateway,
};
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryApplicationRepository::default());
    if args.seed {
        seed_sample_data(&repository);
        info!("seeded sample applications");
    }

    let gateway: Arc<dyn OrderGateway> = if config.nbn.use_real_request {
        let endpoint = config
            .nbn
            .endpoint
            .clone()
            .ok_or(AppError::Config(ConfigError::MissingEndpoint))?;
        info!(%endpoint, "placing nbn orders against the b2b endpoint");
        Arc::new(B2bOrderGateway::new(endpoint))
    } else {
        info!(path = %config.nbn.fixture_path().display(), "replaying nbn fixture responses");
        Arc::new(FixtureOrderGateway::from_config(&config.nbn))
    };

    let (queue, jobs) = MpscOrderQueue::channel();
    let order_service = Arc::new(NbnOrderService::new(repository.clone(), gateway));
    tokio::spawn(run_order_worker(jobs, order_service));

    let router_state = Arc::new(ApplicationRouterState {
        listing: ApplicationListService::new(repository.clone()),
        dispatcher: OrderDispatcher::new(repository, Arc::new(queue)),
    });

    let app = with_application_routes(router_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "telco admin service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
