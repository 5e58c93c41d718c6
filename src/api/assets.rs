use crate::{
    api::{failure_message, network_error, ApiClient},
    error::{LogoError, Result},
    models::{builtin_styles, DownloadRequest, StyleInfo, StylesResponse},
};

pub const DOWNLOAD_FAILED: &str = "Failed to download logo";

impl ApiClient {
    /// `POST /api/download`: server-side resize and background handling.
    pub async fn download(&self, request: &DownloadRequest) -> Result<Vec<u8>> {
        log::info!(
            "Downloading {}px logo (transparent: {})",
            request.size.pixels(),
            request.transparent
        );

        let response = self
            .http
            .post(self.url("download"))
            .json(request)
            .send()
            .await
            .map_err(|e| LogoError::DownloadFailed(e.to_string()))?;

        if !response.status().is_success() {
            let message = failure_message(response, DOWNLOAD_FAILED).await;
            return Err(LogoError::DownloadFailed(message));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LogoError::DownloadFailed(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// Fetch the raw bytes behind a generated image location.
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| LogoError::DownloadFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LogoError::DownloadFailed(format!(
                "Image request returned HTTP {}",
                response.status().as_u16()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LogoError::DownloadFailed(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// `GET /api/styles`, falling back to the built-in presets when the
    /// service does not list any.
    pub async fn list_styles(&self) -> Result<Vec<StyleInfo>> {
        let response = self
            .http
            .get(self.url("styles"))
            .send()
            .await
            .map_err(|e| network_error("Failed to fetch styles", e))?;

        if !response.status().is_success() {
            let message = failure_message(response, "Failed to fetch styles").await;
            return Err(LogoError::RequestFailed(message));
        }

        let body: StylesResponse = response
            .json()
            .await
            .map_err(|e| LogoError::Response(format!("Invalid styles response: {}", e)))?;

        if body.styles.is_empty() {
            return Ok(builtin_styles());
        }
        Ok(body.styles)
    }
}
