use tokio::{signal, sync::watch};
use tracing::info;

use terminal_order_bot::{
    config::AppConfig, http::http_server::start_http_server, utils::logging::setup_logging,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = AppConfig::new()?;
    let _guards = setup_logging(&config.log.dir, "terminal-order-bot", &config.log.level)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(());

    tokio::spawn({
        let shutdown_tx = shutdown_tx.clone();
        async move {
            if signal::ctrl_c().await.is_ok() {
                info!("🛑 Received Ctrl+C. Triggering shutdown...");
                let _ = shutdown_tx.send(());
            }
        }
    });

    let server = start_http_server(config, shutdown_rx).await?;

    if let Err(e) = server.await? {
        tracing::error!("💥 Server crashed: {:?}", e);
        let _ = shutdown_tx.send(());
    }

    Ok(())
}
