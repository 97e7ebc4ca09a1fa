use crate::error::{AssistantError, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_EXECUTION_HOST: &str = "127.0.0.1";
pub const DEFAULT_EXECUTION_PORT: u16 = 8000;
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_DIALECT: &str = "postgresql";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// process-wide settings, read once at startup
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub execution_url: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub model: String,
    pub dialect: String,
    pub request_timeout: Duration,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            execution_url: execution_url(DEFAULT_EXECUTION_HOST, DEFAULT_EXECUTION_PORT),
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            dialect: DEFAULT_DIALECT.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

pub fn execution_url(host: &str, port: u16) -> String {
    format!("http://{}:{}", host, port)
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

impl AssistantConfig {
    /// load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(non_empty)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let execution_url = match lookup("MCP_URL") {
            Some(url) => url,
            None => {
                let host = lookup("MCP_HOST").unwrap_or_else(|| DEFAULT_EXECUTION_HOST.to_string());
                let port = match lookup("MCP_PORT") {
                    Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                        AssistantError::Config(format!("invalid MCP_PORT {:?}: {}", raw, e))
                    })?,
                    None => DEFAULT_EXECUTION_PORT,
                };
                execution_url(&host, port)
            }
        };

        let request_timeout = match lookup("DBASSIST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.trim().parse::<u64>().map_err(|e| {
                AssistantError::Config(format!("invalid DBASSIST_TIMEOUT_SECS {:?}: {}", raw, e))
            })?),
            None => defaults.request_timeout,
        };

        Ok(Self {
            execution_url,
            openai_api_key: lookup("OPENAI_API_KEY"),
            openai_base_url: lookup("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            model: lookup("OPENAI_MODEL").unwrap_or(defaults.model),
            dialect: lookup("DBASSIST_DIALECT").unwrap_or(defaults.dialect),
            request_timeout,
        })
    }
}
