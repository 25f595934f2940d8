use crate::models::events::InboundEvent;
use crate::models::telegram::Update;
use crate::services::dispatch::handle_event;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Handles the update inline so one user's events are applied in delivery order. Always answers
/// 200: a failed update is logged, not redelivered.
pub async fn telegram_webhook(
    State(app_state): State<Arc<AppState>>,
    Json(update): Json<Update>,
) -> impl IntoResponse {
    let update_id = update.update_id;
    info!(target: "webhook", "🟢 update received | update_id: {}", update_id);

    match InboundEvent::from_update(update) {
        Some(event) => {
            if let Err(e) = handle_event(&app_state, event).await {
                error!(target: "webhook", "update {} failed: {:#}", update_id, e);
            }
        }
        None => debug!(target: "webhook", "update {} ignored", update_id),
    }

    Json(json!({ "ok": true }))
}
