use crate::clients::telegram::TelegramClient;
use crate::models::events::{InboundEvent, UserId};
use crate::models::telegram::Update;
use crate::services::dispatch::handle_event;
use crate::state::AppState;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Long-polls `getUpdates` until shutdown.
pub async fn run(
    app_state: Arc<AppState>,
    client: Arc<TelegramClient>,
    mut shutdown_rx: watch::Receiver<()>,
) {
    let timeout = app_state.config.telegram.poll_timeout_secs;
    let mut offset = 0;
    info!("📡 long polling started (timeout {}s)", timeout);

    loop {
        let polled = tokio::select! {
            _ = shutdown_rx.changed() => {
                info!("🛑 long polling stopped");
                break;
            }
            polled = client.get_updates(offset, timeout) => polled,
        };

        let updates = match polled {
            Ok(updates) => updates,
            Err(e) => {
                error!("getUpdates failed: {}", e);
                sleep(RETRY_DELAY).await;
                continue;
            }
        };
        if let Some(last) = updates.last() {
            offset = last.update_id + 1;
        }

        process_batch(app_state.clone(), updates).await;
    }
}

/// Users run concurrently, each user's events in arrival order. The whole batch finishes before the
/// next poll, so ordering also holds across batches.
pub async fn process_batch(app_state: Arc<AppState>, updates: Vec<Update>) {
    let mut queues: HashMap<UserId, Vec<InboundEvent>> = HashMap::new();
    for event in updates.into_iter().filter_map(InboundEvent::from_update) {
        queues.entry(event.user_id()).or_default().push(event);
    }

    let mut tasks = JoinSet::new();
    for (user_id, events) in queues {
        let app_state = app_state.clone();
        tasks.spawn(async move {
            for event in events {
                if let Err(e) = handle_event(&app_state, event).await {
                    error!(user_id, "event failed: {:#}", e);
                }
            }
        });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            warn!("event task aborted: {}", e);
        }
    }
}
