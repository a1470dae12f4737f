use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qbee_core::validators::quality::QualityBackend;
use qbee_notify::WebhookDispatcher;
use qbee_review::{ContentFetcher, HttpQualityBackend, ReviewService, ValidatorPipeline};
use qbee_worker::{ReviewWorker, WorkerConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qbee_worker=debug,qbee_review=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = qbee_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    qbee_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database connection established");

    let fetcher = ContentFetcher::with_pg_sources(pool.clone());

    let pipeline = match HttpQualityBackend::from_env() {
        Some(backend) => {
            tracing::info!(model = backend.model(), "Generative quality check enabled");
            Arc::new(ValidatorPipeline::with_quality(Arc::new(backend)))
        }
        None => {
            tracing::info!("No quality backend configured, running structural checks only");
            Arc::new(ValidatorPipeline::structural_only())
        }
    };

    let service = Arc::new(ReviewService::new(
        pool,
        fetcher,
        WebhookDispatcher::new(),
    ));

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received SIGINT, finishing current job then stopping");
            signal_cancel.cancel();
        }
    });

    ReviewWorker::new(service, pipeline, config).run(cancel).await;

    tracing::info!("Worker stopped");
}
