use crate::middleware::secret_token::secret_token_auth;
use crate::services::webhook::telegram_webhook;
use crate::state::AppState;

use axum::{middleware, routing::post, Router};
use std::sync::Arc;

pub fn routes(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/telegram/webhook", post(telegram_webhook))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            secret_token_auth,
        ))
        .with_state(app_state)
}
