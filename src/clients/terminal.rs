use crate::clients::error::ApiError;
use crate::config::TerminalConfig;
use crate::models::terminal::{
    ContainerRecord, ContainerRegistration, Customer, Document, Paginated, Photo,
    RegistrationOutcome, Service, Statistics,
};
use crate::utils::http_client::{get_bytes, get_json, post_json, post_multipart};
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, StatusCode,
};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceQuery {
    pub offset: u64,
    pub limit: u64,
    pub customer_id: i64,
    pub container_size: Option<String>,
    pub container_state: Option<String>,
}

/// Operations of the container terminal service the bot depends on.
#[async_trait]
pub trait TerminalApi: Send + Sync {
    async fn list_customers(&self, offset: u64, limit: u64)
        -> Result<Paginated<Customer>, ApiError>;

    async fn list_services(&self, query: &ServiceQuery) -> Result<Paginated<Service>, ApiError>;

    async fn find_container(
        &self,
        container_name: &str,
    ) -> Result<Paginated<ContainerRecord>, ApiError>;

    async fn register_container(
        &self,
        payload: &ContainerRegistration,
    ) -> Result<RegistrationOutcome, ApiError>;

    async fn upload_photo(&self, container_id: i64, bytes: Vec<u8>) -> Result<bool, ApiError>;

    async fn upload_document(
        &self,
        container_id: i64,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<bool, ApiError>;

    async fn fetch_photos(&self, container_id: i64) -> Result<Vec<Photo>, ApiError>;

    async fn fetch_documents(&self, container_id: i64) -> Result<Vec<Document>, ApiError>;

    async fn fetch_statistics(&self) -> Result<Statistics, ApiError>;

    /// Downloads a file path returned by `fetch_photos`/`fetch_documents`.
    async fn download_media(&self, path: &str) -> Result<Vec<u8>, ApiError>;
}

pub struct HttpTerminalApi {
    client: Client,
    base_url: String,
    media_base_url: String,
}

impl HttpTerminalApi {
    pub fn new(config: &TerminalConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::transport(&config.base_url, e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            media_base_url: config.media_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn upload(&self, url: &str, part: Part) -> Result<bool, ApiError> {
        let form = Form::new().part("file", part);
        let (status, _) = post_multipart(&self.client, url, form).await?;
        Ok(status == StatusCode::CREATED)
    }
}

#[async_trait]
impl TerminalApi for HttpTerminalApi {
    async fn list_customers(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Paginated<Customer>, ApiError> {
        let query = [("offset", offset.to_string()), ("limit", limit.to_string())];
        get_json(&self.client, &self.url("customers/list/"), &query).await
    }

    async fn list_services(&self, query: &ServiceQuery) -> Result<Paginated<Service>, ApiError> {
        let url = self.url(&format!(
            "customers/contracts/services/by_company/active/{}/",
            query.customer_id
        ));

        let mut params = vec![
            ("offset", query.offset.to_string()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(size) = query.container_size.as_deref().filter(|s| !s.is_empty()) {
            params.push(("container_size", size.to_string()));
        }
        if let Some(state) = query.container_state.as_deref().filter(|s| !s.is_empty()) {
            params.push(("container_state", state.to_string()));
        }

        get_json(&self.client, &url, &params).await
    }

    async fn find_container(
        &self,
        container_name: &str,
    ) -> Result<Paginated<ContainerRecord>, ApiError> {
        let query = [("container_name", container_name.to_string())];
        get_json(
            &self.client,
            &self.url("containers/containers_visit_list/"),
            &query,
        )
        .await
    }

    async fn register_container(
        &self,
        payload: &ContainerRegistration,
    ) -> Result<RegistrationOutcome, ApiError> {
        let url = self.url("containers/container_visit_register/");
        let (status, body) = post_json(&self.client, &url, payload).await?;
        info!(
            "container {} registration answered {}",
            payload.container_name, status
        );

        Ok(RegistrationOutcome {
            created: status == StatusCode::CREATED,
            body,
        })
    }

    async fn upload_photo(&self, container_id: i64, bytes: Vec<u8>) -> Result<bool, ApiError> {
        let url = self.url(&format!(
            "containers/files/container_visit/{}/image/create/",
            container_id
        ));
        let part = Part::bytes(bytes)
            .file_name("photo.jpg")
            .mime_str("image/jpeg")
            .map_err(|e| ApiError::transport(&url, e))?;
        self.upload(&url, part).await
    }

    async fn upload_document(
        &self,
        container_id: i64,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<bool, ApiError> {
        let url = self.url(&format!(
            "containers/files/container_visit/{}/document/create/",
            container_id
        ));
        let part = Part::bytes(bytes).file_name(filename.to_string());
        self.upload(&url, part).await
    }

    async fn fetch_photos(&self, container_id: i64) -> Result<Vec<Photo>, ApiError> {
        let url = self.url(&format!(
            "containers/files/container_visit/{}/images/download/",
            container_id
        ));
        get_json(&self.client, &url, &[]).await
    }

    async fn fetch_documents(&self, container_id: i64) -> Result<Vec<Document>, ApiError> {
        let url = self.url(&format!(
            "containers/files/container_visit/{}/documents/download/",
            container_id
        ));
        get_json(&self.client, &url, &[]).await
    }

    async fn fetch_statistics(&self) -> Result<Statistics, ApiError> {
        get_json(
            &self.client,
            &self.url("containers/container_visit_statistics/"),
            &[],
        )
        .await
    }

    async fn download_media(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let url = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.media_base_url, path.trim_start_matches('/'))
        };
        get_bytes(&self.client, &url).await
    }
}
