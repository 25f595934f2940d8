use crate::clients::telegram::TelegramClient;
use crate::clients::terminal::HttpTerminalApi;
use crate::cron::start_cron_jobs;
use crate::workers::update_poller;
use crate::{config::AppConfig, http::routes::create_routes, state::AppState};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::watch, task::JoinHandle};
use tracing::{info, warn};

pub async fn start_http_server(
    config: AppConfig,
    shutdown_rx: watch::Receiver<()>,
) -> Result<
    JoinHandle<Result<(), Box<dyn std::error::Error + Send + Sync>>>,
    Box<dyn std::error::Error + Send + Sync>,
> {
    let http_addr = config.http_addr();
    let listener = TcpListener::bind(http_addr.clone()).await?;
    info!("🚀 Starting terminal order bot on {:?}", http_addr);

    let terminal = Arc::new(HttpTerminalApi::new(&config.terminal)?);
    let telegram = Arc::new(TelegramClient::new(&config.telegram));
    info!("✅ terminal API at {}", config.terminal.base_url);

    let app_state = Arc::new(AppState::new(
        config.clone(),
        terminal,
        telegram.clone(),
    ));

    if config.telegram.polling {
        telegram.delete_webhook().await?;
        tokio::spawn(update_poller::run(
            app_state.clone(),
            telegram.clone(),
            shutdown_rx.clone(),
        ));
    } else if let Some(url) = config.telegram.webhook_url.as_deref() {
        telegram
            .set_webhook(url, config.telegram.webhook_secret.as_deref())
            .await?;
        info!("✅ webhook registered at {}", url);
    } else {
        warn!("neither polling nor webhook_url configured, no updates will arrive");
    }

    let scheduler = start_cron_jobs(app_state.clone()).await?;

    let http_server = tokio::spawn(async move {
        let _scheduler = scheduler;
        run_http_server(listener, shutdown_rx, app_state).await
    });

    Ok(http_server)
}

pub async fn run_http_server(
    listener: TcpListener,
    mut shutdown_rx: watch::Receiver<()>,
    app_state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = create_routes(app_state);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            shutdown_rx.changed().await.ok();
            tracing::info!("🚦 Gracefully shutting down all connections, ");
        })
        .await?;

    Ok(())
}
