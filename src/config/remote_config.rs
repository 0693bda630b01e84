use crate::config::ConfigError;
use log::debug;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize, Debug)]
struct RemoteConfig {
    #[serde(default)]
    api_base_url: Option<String>,
}

/// Client for the optional `GET /api/config` endpoint served next to the widget.
pub struct RemoteConfigClient {
    client: reqwest::Client,
}

impl RemoteConfigClient {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        RemoteConfigClient { client }
    }

    /// `Ok(None)` when the endpoint answered but carried no usable base URL.
    pub async fn fetch_api_base_url(
        &self,
        origin: &str,
        config_path: &str
    ) -> Result<Option<String>, ConfigError> {
        let url = format!("{}/{}", origin.trim_end_matches('/'), config_path.trim_start_matches('/'));
        debug!("Fetching remote config from {}", url);

        let resp = self.client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send().await?;

        match resp.status() {
            reqwest::StatusCode::OK => {
                let body_text = resp.text().await?;
                let config: RemoteConfig = serde_json::from_str(&body_text)?;
                Ok(config.api_base_url.filter(|u| !u.trim().is_empty()))
            }
            s => Err(ConfigError::Status(s.as_u16())),
        }
    }
}
