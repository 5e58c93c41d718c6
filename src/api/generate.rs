use crate::{
    api::{failure_message, network_error, ApiClient},
    error::{LogoError, Result},
    logger,
    models::{GenerateResponseBody, GenerationRequest, GenerationResult},
};

pub const GENERATE_FAILED: &str = "Failed to generate logo";

impl ApiClient {
    /// `POST /api/generate`.
    ///
    /// A non-success status fails with [`LogoError::RequestFailed`]. A
    /// success status whose body reports `success: false` comes back as a
    /// [`GenerationResult`] carrying the error message.
    pub async fn submit_generation(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let _timer = logger::timer("generate");
        log::info!(
            "Generating {} logo for '{}' ({})",
            if request.preview_mode { "preview" } else { "full" },
            request.business_name,
            request.style
        );

        let response = self
            .http
            .post(self.url("generate"))
            .json(request)
            .send()
            .await
            .map_err(|e| network_error("Generation request failed", e))?;

        if !response.status().is_success() {
            let message = failure_message(response, GENERATE_FAILED).await;
            return Err(LogoError::RequestFailed(message));
        }

        let body: GenerateResponseBody = response
            .json()
            .await
            .map_err(|e| LogoError::Response(format!("Invalid generation response: {}", e)))?;

        let result = body.into_result(request.preview_mode, GENERATE_FAILED);
        match &result.error_message {
            Some(message) => log::warn!("Generation reported failure: {}", message),
            None => log::info!(
                "Received {} logo(s), generation {}",
                result.urls.len(),
                result.generation_id
            ),
        }
        Ok(result)
    }
}
