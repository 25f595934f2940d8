use crate::clients::telegram::ChatTransport;
use crate::clients::terminal::TerminalApi;
use crate::config::AppConfig;
use crate::store::sessions::SessionStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<SessionStore>,
    pub terminal: Arc<dyn TerminalApi>,
    pub transport: Arc<dyn ChatTransport>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        terminal: Arc<dyn TerminalApi>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            sessions: Arc::new(SessionStore::new()),
            terminal,
            transport,
        }
    }
}
