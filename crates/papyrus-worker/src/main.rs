use std::env;

use papyrus_storage::store::S3Store;
use papyrus_worker::config::Settings;
use papyrus_worker::queue::QueuePoller;
use papyrus_worker::routes;
use papyrus_worker::state::AppState;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let settings = Settings::from_env()?;
    tracing::info!(
        bucket = %settings.bucket,
        region = %settings.region,
        policy = ?settings.match_policy,
        max_workers = settings.max_workers,
        "starting papyrus worker"
    );

    let s3 = papyrus_storage::client::build_client(Some(&settings.region)).await;
    let store = S3Store::new(s3, settings.bucket.clone(), settings.url_style());
    let queue_url = settings.queue_url.clone();
    let bind_addr = settings.bind_addr;
    let state = AppState::new(store, settings)?;

    let app = routes::router(state.clone());

    if env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
        return lambda_http::run(app).await.map_err(|e| eyre::eyre!(e));
    }

    let (stop_tx, stop_rx) = watch::channel(false);

    let poller = match queue_url {
        Some(queue_url) => {
            let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(state.settings.region.clone()))
                .load()
                .await;
            let sqs = aws_sdk_sqs::Client::new(&config);
            let mut stop = stop_rx;
            Some(tokio::spawn(QueuePoller::new(sqs, queue_url, state).run(
                async move {
                    let _ = stop.wait_for(|stopped| *stopped).await;
                },
            )))
        }
        None => None,
    };

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %bind_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            let _ = stop_tx.send(true);
        })
        .await?;

    if let Some(poller) = poller {
        poller.await?;
    }
    tracing::info!("shutdown complete");
    Ok(())
}
