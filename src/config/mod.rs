pub mod remote_config;

use crate::cli::Args;
use log::{ info, error };
use std::time::Duration;
use thiserror::Error;
use url::Url;

use self::remote_config::RemoteConfigClient;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid URL '{0}': {1}")]
    InvalidUrl(String, url::ParseError),
    #[error("Config request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Config endpoint returned status {0}")]
    Status(u16),
    #[error("Invalid JSON from config endpoint: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

/// Everything the chat endpoint client needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub base_url: String,
    pub chat_path: String,
    pub api_key: Option<String>,
    pub request_timeout: Duration,
}

impl ChatConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            chat_path: "/chat".to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Resolves `value` against `origin`. Absolute URLs win, relative ones are joined.
pub fn resolve_base_url(origin: &str, value: &str) -> Result<String, ConfigError> {
    let origin_url = Url::parse(origin)
        .map_err(|e| ConfigError::InvalidUrl(origin.to_string(), e))?;
    let resolved = origin_url
        .join(value.trim())
        .map_err(|e| ConfigError::InvalidUrl(value.to_string(), e))?;
    Ok(resolved.as_str().trim_end_matches('/').to_string())
}

pub async fn initialize_chat_config(args: &Args) -> Result<ChatConfig, ConfigError> {
    let origin = resolve_base_url(&args.origin, "")?;

    let base_url = match args.api_base_url.as_deref().filter(|u| !u.trim().is_empty()) {
        Some(explicit) => {
            info!("Using configured API base URL: {}", explicit);
            resolve_base_url(&origin, explicit)?
        }
        None => {
            let remote_client = RemoteConfigClient::new(Duration::from_secs(args.request_timeout_secs));
            match remote_client.fetch_api_base_url(&origin, &args.config_path).await {
                Ok(Some(discovered)) => {
                    info!("Discovered API base URL: {}", discovered);
                    resolve_base_url(&origin, &discovered)?
                }
                Ok(None) => {
                    info!("Config endpoint provided no API base URL. Falling back to origin: {}", origin);
                    origin.clone()
                }
                Err(e) => {
                    error!("Failed to fetch remote config: {}. Falling back to origin: {}", e, origin);
                    origin.clone()
                }
            }
        }
    };

    Ok(ChatConfig {
        base_url,
        chat_path: args.chat_path.clone(),
        api_key: args.api_key.clone().filter(|k| !k.is_empty()),
        request_timeout: Duration::from_secs(args.request_timeout_secs),
    })
}
