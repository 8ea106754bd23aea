use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::OnceLock;
use url::Url;

// Global configuration instance
static CONFIG: OnceLock<Settings> = OnceLock::new();

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,     // Remote API origin, e.g. http://localhost:8080
    pub timeout_secs: u64,    // Per-request timeout
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SessionConfig {
    pub file: String,         // Path of the persisted session record
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LogConfig {
    pub level: String,
}

impl Settings {
    pub fn global() -> &'static Settings {
        CONFIG.get_or_init(|| {
            Self::init().unwrap_or_else(|e| {
                panic!("Failed to initialize config: {}", e);
            })
        })
    }

    fn init() -> anyhow::Result<Self> {
        let default_config = Settings {
            api: ApiConfig {
                base_url: "http://localhost:8080".to_string(),
                timeout_secs: 5,
            },
            session: SessionConfig {
                file: "session.json".to_string(),
            },
            log: LogConfig {
                level: "info".to_string(),
            },
        };

        // Read the config file, or create it from defaults when absent
        let config = match fs::read_to_string("config.toml") {
            Ok(content) => {
                let config: Settings = toml::from_str(&content)?;
                config
            }
            Err(_) => {
                let content = toml::to_string_pretty(&default_config)?;
                fs::write("config.toml", content)?;
                default_config
            }
        };

        // Reject a base URL the HTTP client could not use
        Url::parse(&config.api.base_url)
            .map_err(|e| anyhow::anyhow!("invalid api.base_url '{}': {}", config.api.base_url, e))?;

        Ok(config)
    }
}

pub fn base_url() -> &'static str {
    &Settings::global().api.base_url
}

pub fn session_file() -> &'static str {
    &Settings::global().session.file
}

pub fn request_timeout_secs() -> u64 {
    Settings::global().api.timeout_secs
}
