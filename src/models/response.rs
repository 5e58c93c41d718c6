use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NO_LOGO_RETURNED: &str = "No logo returned";

/// Raw body of `POST /api/generate`.
///
/// Older servers answer with a single `logo_url`, newer ones with
/// `logo_urls`. Both shapes collapse into [`GenerationResult::urls`] here and
/// nowhere else.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponseBody {
    pub success: bool,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub logo_urls: Option<Vec<String>>,
    #[serde(default)]
    pub generation_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl GenerateResponseBody {
    pub fn into_result(self, preview: bool, default_error: &str) -> GenerationResult {
        let generation_id = self.generation_id.unwrap_or_default();

        if !self.success {
            let message = self
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| default_error.to_string());
            return GenerationResult::failed(generation_id, message, preview);
        }

        let urls: Vec<String> = match (self.logo_urls, self.logo_url) {
            (Some(urls), _) if !urls.is_empty() => urls,
            (_, Some(url)) => vec![url],
            _ => Vec::new(),
        };
        let urls: Vec<String> = urls.into_iter().filter(|u| !u.is_empty()).collect();

        if urls.is_empty() {
            return GenerationResult::failed(generation_id, NO_LOGO_RETURNED, preview);
        }

        // Preview mode is a single lower-fidelity image.
        let urls = if preview { urls.into_iter().take(1).collect() } else { urls };

        GenerationResult {
            urls,
            generation_id,
            error_message: None,
            preview,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    pub urls: Vec<String>,
    pub generation_id: String,
    pub error_message: Option<String>,
    pub preview: bool,
}

impl GenerationResult {
    pub fn failed(
        generation_id: impl Into<String>,
        message: impl Into<String>,
        preview: bool,
    ) -> Self {
        Self {
            urls: Vec::new(),
            generation_id: generation_id.into(),
            error_message: Some(message.into()),
            preview,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error_message.is_none() && !self.urls.is_empty()
    }

    pub fn first_url(&self) -> Option<&str> {
        self.urls.first().map(String::as_str)
    }
}

/// Raw body of `POST /api/improve-prompt`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImprovePromptResponseBody {
    pub success: bool,
    #[serde(default)]
    pub improved_prompt: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImprovedPrompt {
    pub text: String,
    pub preview_url: Option<String>,
}

/// Pull a human-readable message out of an error body.
///
/// Looks for a string `detail` first, then a string `error`. Anything else,
/// including unparsable bodies and structured validation details, yields
/// `None` so the caller can fall back to its generic message.
pub fn error_message_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["detail", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(String::from)
}
