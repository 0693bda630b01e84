use async_trait::async_trait;
use log::{ debug, info };
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE } };
use std::error::Error as StdError;

use super::{ ChatEndpoint, EndpointResponse };
use crate::config::ChatConfig;
use crate::error::{ ChatError, HttpFailure };
use crate::models::chat::{ ChatRequest, HealthStatus };

pub struct HttpChatEndpoint {
    http: HttpClient,
    base_url: String,
    chat_path: String,
}

impl HttpChatEndpoint {
    pub fn new(config: &ChatConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", key))
                    .map_err(|e| format!("Invalid API key format: {}", e))?
            );
        }

        let http = HttpClient::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Box::new(e) as Box<dyn StdError + Send + Sync>)?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            chat_path: config.chat_path.clone(),
        })
    }

    fn url_for(&self, route: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), route.trim_start_matches('/'))
    }
}

#[async_trait]
impl ChatEndpoint for HttpChatEndpoint {
    async fn post_question(&self, question: &str) -> Result<EndpointResponse, ChatError> {
        let url = self.url_for(&self.chat_path);
        info!("Sending question to {}", url);

        let resp = self.http
            .post(&url)
            .json(&ChatRequest { question })
            .send().await?;

        let status = resp.status().as_u16();
        debug!("Response status: {}", status);
        let body = resp.text().await?;
        debug!("Response body: {}", body);

        Ok(EndpointResponse { status, body })
    }

    async fn health(&self) -> Result<HealthStatus, ChatError> {
        let resp = self.http.get(self.url_for("/health")).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ChatError::from(HttpFailure::from_status(status.as_u16(), None)));
        }
        let health = resp.json::<HealthStatus>().await?;
        Ok(health)
    }

    fn describe(&self) -> String {
        self.url_for(&self.chat_path)
    }
}
