use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::state::AppState;

pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Rejects webhook calls that do not carry the secret registered with `setWebhook`.
pub async fn secret_token_auth(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = state.config.telegram.webhook_secret.as_deref() else {
        return next.run(req).await;
    };

    let provided = req
        .headers()
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(token) if token == expected => next.run(req).await,
        _ => {
            warn!("webhook call with missing or wrong secret token");
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Unauthorized",
                    "message": "Invalid or missing secret token"
                })),
            )
                .into_response()
        }
    }
}
