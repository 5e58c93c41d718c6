use crate::error::LogoError;
use crate::models::LogoStyle;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<LogoStyle> for StyleInfo {
    fn from(style: LogoStyle) -> Self {
        Self {
            id: style.as_str().to_string(),
            name: style.display_name().to_string(),
            description: style.description().to_string(),
        }
    }
}

/// Built-in presets used when the service cannot list its own.
pub fn builtin_styles() -> Vec<StyleInfo> {
    LogoStyle::ALL.into_iter().map(StyleInfo::from).collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct StylesResponse {
    pub styles: Vec<StyleInfo>,
}

/// Pixel edge of a downloaded square logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl DownloadSize {
    pub fn pixels(&self) -> u32 {
        match self {
            DownloadSize::Small => 256,
            DownloadSize::Medium => 512,
            DownloadSize::Large => 1024,
        }
    }

    pub fn from_pixels(pixels: u32) -> Option<Self> {
        match pixels {
            256 => Some(DownloadSize::Small),
            512 => Some(DownloadSize::Medium),
            1024 => Some(DownloadSize::Large),
            _ => None,
        }
    }

    pub fn file_name(&self) -> String {
        format!("logo_{}px.png", self.pixels())
    }
}

impl FromStr for DownloadSize {
    type Err = LogoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .trim_end_matches("px")
            .parse()
            .ok()
            .and_then(DownloadSize::from_pixels)
            .ok_or_else(|| LogoError::Validation(format!("Download size must be 256, 512 or 1024, got {}", s)))
    }
}

impl Serialize for DownloadSize {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.pixels())
    }
}

/// Body of `POST /api/download`.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadRequest {
    pub image_base64: String,
    pub size: DownloadSize,
    pub transparent: bool,
}

/// What the caller should do with a downloaded logo.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadOutcome {
    /// Processed image bytes, ready to be written under `file_name`.
    Saved { bytes: Vec<u8>, file_name: String },
    /// The download failed; open the image location directly instead.
    OpenDirect(String),
}
