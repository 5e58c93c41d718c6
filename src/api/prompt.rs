use crate::{
    api::{failure_message, network_error, ApiClient},
    error::{LogoError, Result},
    models::{GenerationRequest, ImprovePromptResponseBody, ImprovedPrompt},
};

pub const IMPROVE_FAILED: &str = "Failed to improve prompt";

impl ApiClient {
    /// `POST /api/improve-prompt`. Only name, style and description are sent.
    pub async fn improve_prompt(&self, request: &GenerationRequest) -> Result<ImprovedPrompt> {
        log::info!("Requesting an improved prompt for '{}'", request.business_name);

        let response = self
            .http
            .post(self.url("improve-prompt"))
            .json(&request.improve_body())
            .send()
            .await
            .map_err(|e| network_error("Prompt improvement request failed", e))?;

        if !response.status().is_success() {
            let message = failure_message(response, IMPROVE_FAILED).await;
            return Err(LogoError::RequestFailed(message));
        }

        let body: ImprovePromptResponseBody = response
            .json()
            .await
            .map_err(|e| LogoError::Response(format!("Invalid improve-prompt response: {}", e)))?;

        into_improved(body)
    }
}

fn into_improved(body: ImprovePromptResponseBody) -> Result<ImprovedPrompt> {
    let text = body.improved_prompt.filter(|t| !t.trim().is_empty());
    match (body.success, text) {
        (true, Some(text)) => Ok(ImprovedPrompt {
            text,
            preview_url: body.preview_url.filter(|u| !u.is_empty()),
        }),
        _ => Err(LogoError::RequestFailed(
            body.error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| IMPROVE_FAILED.to_string()),
        )),
    }
}
