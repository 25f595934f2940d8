use crate::clients::error::ApiError;
use reqwest::{multipart::Form, Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{error, info};

pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    query: &[(&str, String)],
) -> Result<T, ApiError> {
    info!("Sending GET request to {}", url);

    let res = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| ApiError::transport(url, e))?;

    let res = ensure_success(url, res).await?;
    let bytes = res.bytes().await.map_err(|e| ApiError::transport(url, e))?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::decode(url, e))
}

/// Posts a JSON body and hands back the status with whatever the server answered.
/// Only transport failures are errors; callers decide which statuses count as success.
pub async fn post_json<P: Serialize + ?Sized>(
    client: &Client,
    url: &str,
    payload: &P,
) -> Result<(StatusCode, Value), ApiError> {
    info!("Sending POST request to {}", url);

    let res = client
        .post(url)
        .json(payload)
        .send()
        .await
        .map_err(|e| ApiError::transport(url, e))?;

    read_body(url, res).await
}

pub async fn post_multipart(
    client: &Client,
    url: &str,
    form: Form,
) -> Result<(StatusCode, Value), ApiError> {
    info!("Sending multipart POST request to {}", url);

    let res = client
        .post(url)
        .multipart(form)
        .send()
        .await
        .map_err(|e| ApiError::transport(url, e))?;

    read_body(url, res).await
}

pub async fn get_bytes(client: &Client, url: &str) -> Result<Vec<u8>, ApiError> {
    info!("Downloading {}", url);

    let res = client
        .get(url)
        .send()
        .await
        .map_err(|e| ApiError::transport(url, e))?;

    let res = ensure_success(url, res).await?;
    let bytes = res.bytes().await.map_err(|e| ApiError::transport(url, e))?;
    Ok(bytes.to_vec())
}

async fn ensure_success(url: &str, res: Response) -> Result<Response, ApiError> {
    if res.status().is_success() {
        return Ok(res);
    }

    let status = res.status();
    let body = res.text().await.unwrap_or_default();
    error!("❌ Error response: status={}, body={}", status, body);
    Err(ApiError::Status {
        url: url.to_string(),
        status,
        body,
    })
}

async fn read_body(url: &str, res: Response) -> Result<(StatusCode, Value), ApiError> {
    let status = res.status();
    let text = res.text().await.map_err(|e| ApiError::transport(url, e))?;

    if status.is_success() {
        info!("✅ {} response", status);
    } else {
        error!("❌ Error response: status={}, body={}", status, text);
    }

    let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
    Ok((status, body))
}
