use axum::{
    body::Bytes,
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use terminal_order_bot::clients::error::ApiError;
use terminal_order_bot::clients::terminal::{HttpTerminalApi, ServiceQuery, TerminalApi};
use terminal_order_bot::config::TerminalConfig;
use terminal_order_bot::models::terminal::{ContainerRegistration, ServiceRef};
use tokio::net::TcpListener;

async fn customers(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({
        "count": 17,
        "results": [
            { "id": 1, "name": format!("offset {} limit {}", params["offset"], params["limit"]) }
        ]
    }))
}

async fn services(
    Path(company): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let size = params.get("container_size").cloned().unwrap_or_default();
    let state = params.get("container_state").cloned().unwrap_or_default();
    Json(json!({
        "count": 1,
        "results": [
            { "id": company, "service_type": { "name": format!("{}/{}", size, state) } }
        ]
    }))
}

async fn register(Json(payload): Json<Value>) -> impl IntoResponse {
    if payload["container_name"] == "TGHU1234567" {
        (StatusCode::CREATED, Json(json!({ "id": 10 })))
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "container_name": ["exists"] })),
        )
    }
}

async fn upload(body: Bytes) -> StatusCode {
    if body.windows(9).any(|w| w == b"photo.jpg") {
        StatusCode::CREATED
    } else {
        StatusCode::BAD_REQUEST
    }
}

async fn broken() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn media() -> &'static [u8] {
    b"\xff\xd8jpeg"
}

async fn spawn_terminal() -> HttpTerminalApi {
    let router = Router::new()
        .route("/api/customers/list/", get(customers))
        .route(
            "/api/customers/contracts/services/by_company/active/{company}/",
            get(services),
        )
        .route("/api/containers/container_visit_register/", post(register))
        .route(
            "/api/containers/files/container_visit/{id}/image/create/",
            post(upload),
        )
        .route(
            "/api/containers/files/container_visit/{id}/images/download/",
            get(broken),
        )
        .route("/media/photos/a.jpg", get(media));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    HttpTerminalApi::new(&TerminalConfig {
        base_url: format!("http://{}/api/", addr),
        media_base_url: format!("http://{}", addr),
        timeout_secs: 5,
    })
    .unwrap()
}

fn registration(container_name: &str) -> ContainerRegistration {
    ContainerRegistration {
        container_size: "20".to_string(),
        container_name: container_name.to_string(),
        container_state: "loaded".to_string(),
        product_name: "САХАР".to_string(),
        company_id: 4,
        container_owner: "Иванов".to_string(),
        transport_type: "auto".to_string(),
        transport_number: "01A123BC".to_string(),
        entry_time: "2026-10-18".to_string(),
        services: vec![ServiceRef { id: 3 }],
    }
}

#[tokio::test]
async fn list_queries_carry_offset_and_limit() {
    let api = spawn_terminal().await;

    let page = api.list_customers(16, 8).await.unwrap();
    assert_eq!(page.count, 17);
    assert_eq!(page.results[0].name, "offset 16 limit 8");
}

#[tokio::test]
async fn service_filters_are_sent_only_when_known() {
    let api = spawn_terminal().await;

    let mut query = ServiceQuery {
        offset: 0,
        limit: 40,
        customer_id: 4,
        container_size: Some("40HC".to_string()),
        container_state: Some("empty".to_string()),
    };
    let page = api.list_services(&query).await.unwrap();
    assert_eq!(page.results[0].id, 4);
    assert_eq!(page.results[0].service_type.name, "40HC/empty");

    query.container_state = None;
    let page = api.list_services(&query).await.unwrap();
    assert_eq!(page.results[0].service_type.name, "40HC/");
}

#[tokio::test]
async fn registration_success_requires_created_status() {
    let api = spawn_terminal().await;

    let outcome = api
        .register_container(&registration("TGHU1234567"))
        .await
        .unwrap();
    assert!(outcome.created);
    assert_eq!(outcome.body["id"], 10);

    let outcome = api
        .register_container(&registration("MSCU7654321"))
        .await
        .unwrap();
    assert!(!outcome.created);
    assert_eq!(outcome.body["container_name"][0], "exists");
}

#[tokio::test]
async fn uploads_and_media_downloads() {
    let api = spawn_terminal().await;

    assert!(api.upload_photo(2, b"jpeg".to_vec()).await.unwrap());
    assert_eq!(
        api.download_media("/media/photos/a.jpg").await.unwrap(),
        b"\xff\xd8jpeg".to_vec()
    );
}

#[tokio::test]
async fn error_statuses_surface_as_api_errors() {
    let api = spawn_terminal().await;

    match api.fetch_photos(2).await {
        Err(ApiError::Status { status, body, .. }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected a status error, got {:?}", other),
    }
}
