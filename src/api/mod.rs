pub mod assets;
pub mod generate;
pub mod prompt;

use crate::{
    config::ApiConfig,
    error::{LogoError, Result},
    models::{
        error_message_from_body, DownloadRequest, GenerationRequest, GenerationResult,
        ImprovedPrompt,
    },
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything the orchestrator needs from the generation service.
#[async_trait]
pub trait LogoApi: Send + Sync {
    async fn submit_generation(&self, request: &GenerationRequest) -> Result<GenerationResult>;

    async fn improve_prompt(&self, request: &GenerationRequest) -> Result<ImprovedPrompt>;

    /// Reachability only. Never fails.
    async fn check_health(&self) -> bool;

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>>;

    async fn download(&self, request: &DownloadRequest) -> Result<Vec<u8>>;
}

/// HTTP transport for the logo service. One attempt per call, no retries.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LogoError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_http_client(http, &config.base_url))
    }

    pub fn with_http_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn network_error(context: &str, e: reqwest::Error) -> LogoError {
    LogoError::Network(format!("{}: {}", context, e))
}

/// Message for a non-success response: the body's `detail`/`error` string,
/// or `default` when the body has none.
async fn failure_message(response: Response, default: &str) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = error_message_from_body(&body).unwrap_or_else(|| default.to_string());
    log::error!("Service returned HTTP {}: {}", status.as_u16(), message);
    message
}

#[async_trait]
impl LogoApi for ApiClient {
    async fn submit_generation(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        ApiClient::submit_generation(self, request).await
    }

    async fn improve_prompt(&self, request: &GenerationRequest) -> Result<ImprovedPrompt> {
        ApiClient::improve_prompt(self, request).await
    }

    async fn check_health(&self) -> bool {
        let result = self
            .http
            .get(self.url("health"))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                log::debug!("Health check against {} failed: {}", self.base_url, e);
                false
            }
        }
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        ApiClient::fetch_image(self, url).await
    }

    async fn download(&self, request: &DownloadRequest) -> Result<Vec<u8>> {
        ApiClient::download(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_urls_are_normalized() {
        let client = ApiClient::new(&ApiConfig::new().with_base_url("http://logos.test/")).unwrap();
        assert_eq!(client.base_url(), "http://logos.test");
        assert_eq!(client.url("generate"), "http://logos.test/api/generate");
        assert_eq!(client.url("/improve-prompt"), "http://logos.test/api/improve-prompt");
    }

    #[tokio::test]
    async fn health_check_on_unreachable_host_is_false() {
        let client = ApiClient::new(&ApiConfig::new().with_base_url("http://127.0.0.1:9")).unwrap();
        assert!(!client.check_health().await);
    }
}
