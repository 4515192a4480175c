use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use rider_registry::api;
use rider_registry::config::Config;
use rider_registry::documents::{DocumentStore, LocalDocumentStore};
use rider_registry::error::AppError;
use rider_registry::notify::{run_notification_worker, DisabledMailer, Mailer, SmtpMailer};
use rider_registry::state::{AppState, Settings};
use rider_registry::store::{MemoryRiderStore, RiderStore};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    let riders: Arc<dyn RiderStore> = Arc::new(MemoryRiderStore::new());
    let documents: Arc<dyn DocumentStore> =
        Arc::new(LocalDocumentStore::open(&config.upload_dir).await?);

    let mailer: Arc<dyn Mailer> = match &config.mail {
        Some(mail) => {
            let mailer = SmtpMailer::new(mail)
                .map_err(|err| AppError::Internal(format!("mail transport: {err}")))?;
            tracing::info!(smtp_host = %mail.smtp_host, smtp_port = mail.smtp_port, "mail transport ready");
            Arc::new(mailer)
        }
        None => {
            tracing::warn!("MAIL_ID/MAIL_PASSWORD not set; notification emails are disabled");
            Arc::new(DisabledMailer)
        }
    };

    if config.auth_token.is_some() {
        tracing::info!("bearer auth enabled for registration");
    }

    let (app_state, notification_rx) = AppState::new(
        Settings::from(&config),
        riders,
        documents,
        config.notification_queue_size,
    );
    let shared_state = Arc::new(app_state);

    let worker = tokio::spawn(run_notification_worker(
        mailer,
        notification_rx,
        shared_state.metrics.clone(),
    ));

    let app = api::rest::router(shared_state.clone());

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(
        http_port = config.http_port,
        upload_dir = %config.upload_dir.display(),
        max_distance_meters = config.nearest_max_distance_meters,
        "http server started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")))?;

    // Closing the last sender lets the worker drain the queue and exit.
    drop(shared_state);
    if let Err(err) = worker.await {
        tracing::error!(error = %err, "notification worker panicked");
    }

    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
