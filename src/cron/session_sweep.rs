use crate::state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub async fn run(state: Arc<AppState>) {
    let ttl = Duration::from_secs(state.config.session.ttl_secs);
    let evicted = state.sessions.evict_idle(ttl);
    if evicted > 0 {
        info!(
            target: "cron",
            "🧹 session sweep evicted {} idle sessions, {} remain",
            evicted,
            state.sessions.len()
        );
    }
}
