use crate::clients::error::ApiError;
use crate::config::TelegramConfig;
use crate::conversation::keyboards::{InlineKeyboard, ReplyMarkup};
use crate::models::events::{ChatId, MessageRef};
use crate::models::telegram::{ApiResponse, File, Message, Update};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, RequestBuilder,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const FILE_DOWNLOAD: &str = "file download";

/// Outbound side of the chat platform. Everything the flows need to talk back to a user.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        markup: Option<ReplyMarkup>,
    ) -> anyhow::Result<MessageRef>;

    async fn edit_message(
        &self,
        chat_id: ChatId,
        message: MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> anyhow::Result<()>;

    /// Stops the button spinner, optionally showing a short toast to the user.
    async fn answer_callback(&self, callback_id: &str, notice: Option<&str>)
        -> anyhow::Result<()>;

    async fn send_photo(&self, chat_id: ChatId, bytes: Vec<u8>, filename: &str)
        -> anyhow::Result<()>;

    async fn send_document(
        &self,
        chat_id: ChatId,
        bytes: Vec<u8>,
        filename: &str,
    ) -> anyhow::Result<()>;

    async fn download_file(&self, file_id: &str) -> anyhow::Result<Vec<u8>>;
}

pub struct TelegramClient {
    client: Client,
    api_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            client: Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, payload: Value) -> Result<T, ApiError> {
        let request = self
            .client
            .post(self.method_url(method))
            .timeout(REQUEST_TIMEOUT)
            .json(&payload);
        self.execute(method, request).await
    }

    async fn call_multipart<T: DeserializeOwned>(
        &self,
        method: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let request = self
            .client
            .post(self.method_url(method))
            .timeout(REQUEST_TIMEOUT)
            .multipart(form);
        self.execute(method, request).await
    }

    // The method URL embeds the bot token; reqwest errors are stripped of it before they leave here.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        debug!("Calling Telegram {}", method);

        let res = request
            .send()
            .await
            .map_err(|e| ApiError::transport(method, e.without_url()))?;
        let bytes = res
            .bytes()
            .await
            .map_err(|e| ApiError::transport(method, e.without_url()))?;
        let envelope: ApiResponse<T> =
            serde_json::from_slice(&bytes).map_err(|e| ApiError::decode(method, e))?;

        match envelope.result {
            Some(result) if envelope.ok => Ok(result),
            _ => {
                let description = envelope
                    .description
                    .unwrap_or_else(|| "no description".to_string());
                error!("❌ Telegram {} rejected: {}", method, description);
                Err(ApiError::Rejected {
                    method: method.to_string(),
                    description,
                })
            }
        }
    }

    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>, ApiError> {
        let request = self
            .client
            .post(self.method_url("getUpdates"))
            .timeout(Duration::from_secs(timeout_secs + 10))
            .json(&json!({
                "offset": offset,
                "timeout": timeout_secs,
                "allowed_updates": ["message", "callback_query"],
            }));
        self.execute("getUpdates", request).await
    }

    pub async fn set_webhook(&self, url: &str, secret: Option<&str>) -> Result<bool, ApiError> {
        let mut payload = json!({
            "url": url,
            "allowed_updates": ["message", "callback_query"],
        });
        if let Some(secret) = secret {
            payload["secret_token"] = json!(secret);
        }
        self.call("setWebhook", payload).await
    }

    pub async fn delete_webhook(&self) -> Result<bool, ApiError> {
        self.call("deleteWebhook", json!({})).await
    }
}

fn is_not_modified(err: &ApiError) -> bool {
    matches!(err, ApiError::Rejected { description, .. } if description.contains("message is not modified"))
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        markup: Option<ReplyMarkup>,
    ) -> anyhow::Result<MessageRef> {
        let mut payload = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(markup) = markup {
            payload["reply_markup"] = serde_json::to_value(markup)?;
        }

        let message: Message = self.call("sendMessage", payload).await?;
        Ok(MessageRef(message.message_id))
    }

    async fn edit_message(
        &self,
        chat_id: ChatId,
        message: MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> anyhow::Result<()> {
        let mut payload = json!({
            "chat_id": chat_id,
            "message_id": message.0,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(keyboard) = keyboard {
            payload["reply_markup"] = serde_json::to_value(keyboard)?;
        }

        // Editing returns the message, or `true` for inline messages.
        match self.call::<Value>("editMessageText", payload).await {
            Ok(_) => Ok(()),
            Err(e) if is_not_modified(&e) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        notice: Option<&str>,
    ) -> anyhow::Result<()> {
        let mut payload = json!({ "callback_query_id": callback_id });
        if let Some(text) = notice {
            payload["text"] = json!(text);
        }
        let _: bool = self.call("answerCallbackQuery", payload).await?;
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        bytes: Vec<u8>,
        filename: &str,
    ) -> anyhow::Result<()> {
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("photo", Part::bytes(bytes).file_name(filename.to_string()));
        let _: Message = self.call_multipart("sendPhoto", form).await?;
        Ok(())
    }

    async fn send_document(
        &self,
        chat_id: ChatId,
        bytes: Vec<u8>,
        filename: &str,
    ) -> anyhow::Result<()> {
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("document", Part::bytes(bytes).file_name(filename.to_string()));
        let _: Message = self.call_multipart("sendDocument", form).await?;
        Ok(())
    }

    async fn download_file(&self, file_id: &str) -> anyhow::Result<Vec<u8>> {
        let file: File = self.call("getFile", json!({ "file_id": file_id })).await?;
        let path = file
            .file_path
            .with_context(|| format!("file {} has no download path", file_id))?;

        let url = format!("{}/file/bot{}/{}", self.api_url, self.token, path);
        let bytes = self
            .client
            .get(url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| ApiError::transport(FILE_DOWNLOAD, e.without_url()))?
            .bytes()
            .await
            .map_err(|e| ApiError::transport(FILE_DOWNLOAD, e.without_url()))?;

        Ok(bytes.to_vec())
    }
}
