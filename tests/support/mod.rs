#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use terminal_order_bot::clients::error::ApiError;
use terminal_order_bot::clients::telegram::ChatTransport;
use terminal_order_bot::clients::terminal::{ServiceQuery, TerminalApi};
use terminal_order_bot::config::AppConfig;
use terminal_order_bot::conversation::keyboards::{InlineKeyboard, ReplyMarkup};
use terminal_order_bot::models::events::{
    Attachment, AttachmentEvent, ButtonEvent, ChatId, InboundEvent, MessageRef, TextEvent, UserId,
};
use terminal_order_bot::models::terminal::{
    Company, ContainerInfo, ContainerRecord, ContainerRegistration, Customer, Document, Paginated,
    Photo, RegistrationOutcome, Service, ServiceType, Statistics,
};
use terminal_order_bot::services::dispatch::handle_event;
use terminal_order_bot::state::AppState;
use terminal_order_bot::store::sessions::Flow;

pub const USER: UserId = 501;
pub const ADMIN_CHAT: ChatId = 9000;
pub const TOKEN: &str = "1:test";

const CONFIG: &str = r#"
    [http]
    address = "127.0.0.1"
    port = "0"

    [telegram]
    token = "1:test"
    admin_chat_id = 9000

    [terminal]
    base_url = "http://terminal.invalid/"
    media_base_url = "http://media.invalid"

    [session]
    ttl_secs = 600

    [cron.session_sweep]
    seconds = 60

    [log]
    dir = "logs"
"#;

pub fn unavailable() -> ApiError {
    ApiError::Status {
        url: "http://terminal.invalid/".to_string(),
        status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        body: "down".to_string(),
    }
}

pub fn customer(id: i64) -> Customer {
    Customer {
        id,
        name: format!("Customer {}", id),
    }
}

pub fn service(id: i64, name: &str) -> Service {
    Service {
        id,
        service_type: ServiceType {
            name: name.to_string(),
        },
    }
}

pub fn visit(id: i64, name: &str, exit_time: Option<&str>) -> ContainerRecord {
    ContainerRecord {
        id,
        container: ContainerInfo {
            name: name.to_string(),
            size: Some("40HC".to_string()),
        },
        exit_time: exit_time.map(str::to_string),
        entry_time: Some("2026-10-01".to_string()),
        container_state: Some("loaded".to_string()),
        company: Some(Company {
            name: "Customer 1".to_string(),
        }),
        services: Vec::new(),
        images: Vec::new(),
        documents: Vec::new(),
    }
}

/// In-memory terminal service recording every mutating call.
#[derive(Default)]
pub struct FakeTerminal {
    pub customers: Mutex<Vec<Customer>>,
    pub services: Mutex<Vec<Service>>,
    pub containers: Mutex<HashMap<String, Vec<ContainerRecord>>>,
    pub photos: Mutex<Vec<Photo>>,
    pub documents: Mutex<Vec<Document>>,
    pub customers_down: AtomicBool,
    pub refuse_registration: AtomicBool,
    pub service_queries: Mutex<Vec<ServiceQuery>>,
    pub registrations: Mutex<Vec<ContainerRegistration>>,
    pub uploads: Mutex<Vec<(i64, Vec<u8>, Option<String>)>>,
}

impl FakeTerminal {
    pub fn with_customers(count: i64) -> Self {
        let terminal = Self::default();
        *terminal.customers.lock().unwrap() = (1..=count).map(customer).collect();
        terminal
    }
}

fn page<T: Clone>(items: &[T], offset: u64, limit: u64) -> Paginated<T> {
    Paginated {
        results: items
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect(),
        count: items.len() as u64,
    }
}

#[async_trait]
impl TerminalApi for FakeTerminal {
    async fn list_customers(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Paginated<Customer>, ApiError> {
        if self.customers_down.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(page(&self.customers.lock().unwrap(), offset, limit))
    }

    async fn list_services(&self, query: &ServiceQuery) -> Result<Paginated<Service>, ApiError> {
        self.service_queries.lock().unwrap().push(query.clone());
        Ok(page(
            &self.services.lock().unwrap(),
            query.offset,
            query.limit,
        ))
    }

    async fn find_container(
        &self,
        container_name: &str,
    ) -> Result<Paginated<ContainerRecord>, ApiError> {
        let visits = self
            .containers
            .lock()
            .unwrap()
            .get(container_name)
            .cloned()
            .unwrap_or_default();
        Ok(page(&visits, 0, 100))
    }

    async fn register_container(
        &self,
        payload: &ContainerRegistration,
    ) -> Result<RegistrationOutcome, ApiError> {
        self.registrations.lock().unwrap().push(payload.clone());
        if self.refuse_registration.load(Ordering::SeqCst) {
            return Ok(RegistrationOutcome {
                created: false,
                body: json!({"container_name": ["already registered"]}),
            });
        }
        Ok(RegistrationOutcome {
            created: true,
            body: json!({"id": 77, "container_name": payload.container_name}),
        })
    }

    async fn upload_photo(&self, container_id: i64, bytes: Vec<u8>) -> Result<bool, ApiError> {
        self.uploads.lock().unwrap().push((container_id, bytes, None));
        Ok(true)
    }

    async fn upload_document(
        &self,
        container_id: i64,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<bool, ApiError> {
        self.uploads
            .lock()
            .unwrap()
            .push((container_id, bytes, Some(filename.to_string())));
        Ok(true)
    }

    async fn fetch_photos(&self, _container_id: i64) -> Result<Vec<Photo>, ApiError> {
        Ok(self.photos.lock().unwrap().clone())
    }

    async fn fetch_documents(&self, _container_id: i64) -> Result<Vec<Document>, ApiError> {
        Ok(self.documents.lock().unwrap().clone())
    }

    async fn fetch_statistics(&self) -> Result<Statistics, ApiError> {
        Ok(Statistics {
            total_containers: 10,
            loaded_containers: 6,
            empty_containers: 4,
            total_active_containers: 8,
            total_dispatched_containers: 2,
            new_arrived_containers: 1,
        })
    }

    async fn download_media(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        Ok(path.as_bytes().to_vec())
    }
}

/// Everything the bot sent back to the chat platform.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Message {
        chat_id: ChatId,
        text: String,
        markup: Option<ReplyMarkup>,
    },
    Edit {
        message: MessageRef,
        text: String,
        keyboard: Option<InlineKeyboard>,
    },
    Answer {
        callback_id: String,
        text: Option<String>,
    },
    Photo {
        filename: String,
    },
    Document {
        filename: String,
    },
}

#[derive(Default)]
pub struct FakeTransport {
    pub sent: Mutex<Vec<Sent>>,
    pub downloads_down: AtomicBool,
    next_message: AtomicI64,
}

impl FakeTransport {
    pub fn take(&self) -> Vec<Sent> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }
}

#[async_trait]
impl ChatTransport for FakeTransport {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        markup: Option<ReplyMarkup>,
    ) -> anyhow::Result<MessageRef> {
        self.sent.lock().unwrap().push(Sent::Message {
            chat_id,
            text: text.to_string(),
            markup,
        });
        Ok(MessageRef(self.next_message.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn edit_message(
        &self,
        _chat_id: ChatId,
        message: MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(Sent::Edit {
            message,
            text: text.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(Sent::Answer {
            callback_id: callback_id.to_string(),
            text: text.map(str::to_string),
        });
        Ok(())
    }

    async fn send_photo(
        &self,
        _chat_id: ChatId,
        _bytes: Vec<u8>,
        filename: &str,
    ) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(Sent::Photo {
            filename: filename.to_string(),
        });
        Ok(())
    }

    async fn send_document(
        &self,
        _chat_id: ChatId,
        _bytes: Vec<u8>,
        filename: &str,
    ) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(Sent::Document {
            filename: filename.to_string(),
        });
        Ok(())
    }

    async fn download_file(&self, file_id: &str) -> anyhow::Result<Vec<u8>> {
        if self.downloads_down.load(Ordering::SeqCst) {
            anyhow::bail!("getFile failed for http://api.invalid/bot{}/getFile", TOKEN);
        }
        Ok(format!("file:{}", file_id).into_bytes())
    }
}

pub struct Harness {
    pub app: AppState,
    pub terminal: Arc<FakeTerminal>,
    pub transport: Arc<FakeTransport>,
    next_callback: AtomicI64,
}

impl Harness {
    pub fn new(terminal: FakeTerminal) -> Self {
        let config = AppConfig::from_toml_str(CONFIG).expect("test config");
        let terminal = Arc::new(terminal);
        let transport = Arc::new(FakeTransport::default());
        let app = AppState::new(config, terminal.clone(), transport.clone());
        Self {
            app,
            terminal,
            transport,
            next_callback: AtomicI64::new(0),
        }
    }

    pub async fn text(&self, text: &str) -> Vec<Sent> {
        let event = InboundEvent::Text(TextEvent {
            user_id: USER,
            chat_id: USER,
            text: text.to_string(),
        });
        handle_event(&self.app, event).await.expect("text handled");
        self.transport.take()
    }

    /// Presses a button on the wizard message (message id 1).
    pub async fn press(&self, data: &str) -> Vec<Sent> {
        let id = self.next_callback.fetch_add(1, Ordering::SeqCst);
        let event = InboundEvent::Button(ButtonEvent {
            user_id: USER,
            chat_id: USER,
            callback_id: format!("cb{}", id),
            message: Some(MessageRef(1)),
            data: data.to_string(),
        });
        handle_event(&self.app, event).await.expect("button handled");
        self.transport.take()
    }

    pub async fn attach(&self, attachment: Attachment) -> Vec<Sent> {
        let event = InboundEvent::Attachment(AttachmentEvent {
            user_id: USER,
            chat_id: USER,
            attachment,
        });
        handle_event(&self.app, event).await.expect("attachment handled");
        self.transport.take()
    }

    pub async fn flow(&self) -> Flow {
        self.app.sessions.lock(USER).await.flow.clone()
    }
}

/// Text of every message or edit, in order.
pub fn texts(sent: &[Sent]) -> Vec<String> {
    sent.iter()
        .filter_map(|s| match s {
            Sent::Message { text, .. } | Sent::Edit { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

/// Last screen shown, either a new message or an edit.
pub fn last_screen(sent: &[Sent]) -> String {
    texts(sent).pop().unwrap_or_default()
}

pub fn toasts(sent: &[Sent]) -> Vec<String> {
    sent.iter()
        .filter_map(|s| match s {
            Sent::Answer {
                text: Some(text), ..
            } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

pub fn keyboard(sent: &[Sent]) -> Option<InlineKeyboard> {
    sent.iter().rev().find_map(|s| match s {
        Sent::Edit { keyboard, .. } => keyboard.clone(),
        Sent::Message {
            markup: Some(ReplyMarkup::Inline(keyboard)),
            ..
        } => Some(keyboard.clone()),
        _ => None,
    })
}
