pub mod telegram;
use crate::models::webhook::HealthResponse;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use chrono::Utc;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

async fn health_check(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "OK",
        timestamp: Utc::now().to_rfc3339(),
        active_sessions: app_state.sessions.len(),
    };

    Json(response)
}

pub fn create_routes(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    Router::new()
        .route("/", get(health_check))
        .with_state(app_state.clone())
        .merge(telegram::routes(app_state))
        .layer(cors)
}
