//! Client for an AI logo generation service.
//!
//! [`ApiClient`] talks to the service, [`LogoForm`] turns raw form input into
//! a [`GenerationRequest`], [`HistoryStore`] keeps the last twenty logos, and
//! [`GenerationOrchestrator`] ties them together as a small state machine
//! covering previews, prompt improvement and full generation.

pub mod api;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod storage;

pub use api::{ApiClient, LogoApi};
pub use config::{ApiConfig, Config, HistoryConfig};
pub use error::{LogoError, Result};
pub use models::{
    DownloadOutcome, DownloadSize, GenerationRequest, GenerationResult, HistoryEntry,
    ImprovedPrompt, LogoFilter, LogoForm, LogoResolution, LogoSize, LogoStyle, StyleInfo,
};
pub use orchestrator::{GenerationOrchestrator, GenerationState, LoadingKind, LoadingStage, Ticket};
pub use storage::{FileStore, HistoryStore, KeyValueStore, MemoryStore};
