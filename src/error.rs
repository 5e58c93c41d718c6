use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogoError {
    /// A required form field is missing; the request never reaches the network.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The service answered with a failure. The message is shown to the user as-is.
    #[error("{0}")]
    RequestFailed(String),

    #[error("Malformed persisted state: {0}")]
    MalformedPersistedState(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Response error: {0}")]
    Response(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LogoError {
    /// Text suitable for inline display next to the form.
    pub fn user_message(&self) -> String {
        match self {
            LogoError::RequestFailed(msg) | LogoError::DownloadFailed(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LogoError>;
