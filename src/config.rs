use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::{env, process};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HttpConfig {
    pub address: String,
    pub port: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TelegramConfig {
    pub token: String,
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub webhook_secret: Option<String>,
    /// Chat that receives the raw registration response of every submitted order.
    #[serde(default)]
    pub admin_chat_id: Option<i64>,
    #[serde(default)]
    pub polling: bool,
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TerminalConfig {
    pub base_url: String,
    /// Host serving the image/document paths returned by the files endpoints.
    pub media_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionConfig {
    pub ttl_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JobSchedule {
    pub seconds: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CronConfig {
    pub session_sweep: JobSchedule,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogConfig {
    pub dir: String,
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub debug: bool,
    pub http: HttpConfig,
    pub telegram: TelegramConfig,
    pub terminal: TerminalConfig,
    pub session: SessionConfig,
    pub cron: CronConfig,
    pub log: LogConfig,
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout_secs() -> u64 {
    30
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let args: Vec<String> = env::args().collect();
        if args.len() < 2 {
            eprintln!("❌ Error: Configuration path not provided. Usage: terminal-order-bot <config_path>");
            process::exit(1);
        }
        Self::load(&args[1])
    }

    pub fn load(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path))
            .build()?
            .try_deserialize()
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http.address, self.http.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [http]
        address = "127.0.0.1"
        port = "8080"

        [telegram]
        token = "42:abc"

        [terminal]
        base_url = "https://terminal.example/"
        media_base_url = "https://media.example"

        [session]
        ttl_secs = 600

        [cron.session_sweep]
        seconds = 120

        [log]
        dir = "logs"
    "#;

    #[test]
    fn fills_defaults_for_optional_settings() {
        let config = AppConfig::from_toml_str(MINIMAL).unwrap();

        assert!(!config.debug);
        assert_eq!(config.telegram.api_url, "https://api.telegram.org");
        assert_eq!(config.telegram.poll_timeout_secs, 30);
        assert!(!config.telegram.polling);
        assert!(config.telegram.webhook_secret.is_none());
        assert!(config.telegram.admin_chat_id.is_none());
        assert_eq!(config.terminal.timeout_secs, 30);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.http_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn rejects_missing_sections() {
        let err = AppConfig::from_toml_str("[http]\naddress = \"x\"\nport = \"1\"\n");
        assert!(err.is_err());
    }
}
