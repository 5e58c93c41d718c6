use crate::error::{LogoError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogoStyle {
    Minimalist,
    #[default]
    Modern,
    Classic,
    Playful,
    Professional,
    Vintage,
}

impl LogoStyle {
    pub const ALL: [LogoStyle; 6] = [
        LogoStyle::Minimalist,
        LogoStyle::Modern,
        LogoStyle::Classic,
        LogoStyle::Playful,
        LogoStyle::Professional,
        LogoStyle::Vintage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogoStyle::Minimalist => "minimalist",
            LogoStyle::Modern => "modern",
            LogoStyle::Classic => "classic",
            LogoStyle::Playful => "playful",
            LogoStyle::Professional => "professional",
            LogoStyle::Vintage => "vintage",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LogoStyle::Minimalist => "Minimalist",
            LogoStyle::Modern => "Modern",
            LogoStyle::Classic => "Classic",
            LogoStyle::Playful => "Playful",
            LogoStyle::Professional => "Professional",
            LogoStyle::Vintage => "Vintage",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            LogoStyle::Minimalist => "Clean lines, simple shapes, plenty of whitespace",
            LogoStyle::Modern => "Sleek contemporary look with bold geometry",
            LogoStyle::Classic => "Timeless serif lettering and balanced emblems",
            LogoStyle::Playful => "Bright colors, rounded forms, friendly character",
            LogoStyle::Professional => "Corporate polish that reads as trustworthy",
            LogoStyle::Vintage => "Retro textures and badge-style compositions",
        }
    }
}

impl fmt::Display for LogoStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogoStyle {
    type Err = LogoError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        LogoStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == wanted)
            .ok_or_else(|| LogoError::Validation(format!("Unknown style: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LogoSize {
    #[serde(rename = "1024x1024")]
    Square,
    #[serde(rename = "1792x1024")]
    Landscape,
    #[serde(rename = "1024x1792")]
    Portrait,
}

impl LogoSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogoSize::Square => "1024x1024",
            LogoSize::Landscape => "1792x1024",
            LogoSize::Portrait => "1024x1792",
        }
    }
}

impl FromStr for LogoSize {
    type Err = LogoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1024x1024" | "square" => Ok(LogoSize::Square),
            "1792x1024" | "landscape" => Ok(LogoSize::Landscape),
            "1024x1792" | "portrait" => Ok(LogoSize::Portrait),
            other => Err(LogoError::Validation(format!("Unknown size: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LogoResolution {
    Standard,
    High,
    Hd,
}

impl FromStr for LogoResolution {
    type Err = LogoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(LogoResolution::Standard),
            "high" => Ok(LogoResolution::High),
            "hd" => Ok(LogoResolution::Hd),
            other => Err(LogoError::Validation(format!("Unknown resolution: {}", other))),
        }
    }
}

/// Filter tags. Ordering follows declaration order so the wire list is stable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogoFilter {
    Vibrant,
    Muted,
    Monochrome,
    Gradient,
    Neon,
    Pastel,
    Bold,
    Soft,
}

impl FromStr for LogoFilter {
    type Err = LogoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vibrant" => Ok(LogoFilter::Vibrant),
            "muted" => Ok(LogoFilter::Muted),
            "monochrome" => Ok(LogoFilter::Monochrome),
            "gradient" => Ok(LogoFilter::Gradient),
            "neon" => Ok(LogoFilter::Neon),
            "pastel" => Ok(LogoFilter::Pastel),
            "bold" => Ok(LogoFilter::Bold),
            "soft" => Ok(LogoFilter::Soft),
            other => Err(LogoError::Validation(format!("Unknown filter: {}", other))),
        }
    }
}

/// Body of `POST /api/generate`.
///
/// Built only through [`LogoForm::build`], which guarantees a non-empty
/// business name and strips size/resolution from preview requests.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GenerationRequest {
    pub business_name: String,
    pub style: LogoStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<LogoSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<LogoResolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<BTreeSet<LogoFilter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transparency: Option<bool>,
    pub preview_mode: bool,
}

impl GenerationRequest {
    /// Same request with a replacement description, used when an improved
    /// prompt is accepted.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        let trimmed = description.trim();
        self.description = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    pub fn as_full(mut self) -> Self {
        self.preview_mode = false;
        self
    }

    pub fn improve_body(&self) -> ImprovePromptRequest {
        ImprovePromptRequest {
            business_name: self.business_name.clone(),
            style: self.style,
            description: self.description.clone(),
        }
    }
}

/// Body of `POST /api/improve-prompt`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImprovePromptRequest {
    pub business_name: String,
    pub style: LogoStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Raw form fields as the user typed them.
#[derive(Debug, Clone, Default)]
pub struct LogoForm {
    pub business_name: String,
    pub style: LogoStyle,
    pub description: String,
    pub size: Option<LogoSize>,
    pub resolution: Option<LogoResolution>,
    pub filters: BTreeSet<LogoFilter>,
    pub transparency: Option<bool>,
    pub preview_mode: bool,
}

impl LogoForm {
    pub fn new(business_name: impl Into<String>) -> Self {
        Self {
            business_name: business_name.into(),
            ..Default::default()
        }
    }

    pub fn with_style(mut self, style: LogoStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_size(mut self, size: LogoSize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_resolution(mut self, resolution: LogoResolution) -> Self {
        self.resolution = Some(resolution);
        self
    }

    pub fn with_filter(mut self, filter: LogoFilter) -> Self {
        self.filters.insert(filter);
        self
    }

    pub fn with_transparency(mut self, transparent: bool) -> Self {
        self.transparency = Some(transparent);
        self
    }

    pub fn preview(mut self, preview: bool) -> Self {
        self.preview_mode = preview;
        self
    }

    /// Whether the submit action should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.business_name.trim().is_empty()
    }

    pub fn build(&self) -> Result<GenerationRequest> {
        if !self.can_submit() {
            return Err(LogoError::Validation("Business name is required".into()));
        }

        let description = Some(self.description.trim())
            .filter(|d| !d.is_empty())
            .map(String::from);
        let filters = Some(self.filters.clone()).filter(|f| !f.is_empty());

        // The service ignores or rejects sizing on preview requests.
        let (size, resolution) = if self.preview_mode {
            (None, None)
        } else {
            (self.size, self.resolution)
        };

        Ok(GenerationRequest {
            business_name: self.business_name.trim().to_string(),
            style: self.style,
            description,
            size,
            resolution,
            filters,
            transparency: self.transparency,
            preview_mode: self.preview_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_business_name_is_rejected() {
        for name in ["", "   ", "\t\n"] {
            let form = LogoForm::new(name);
            assert!(!form.can_submit());
            assert!(matches!(form.build(), Err(LogoError::Validation(_))));
        }
    }

    #[test]
    fn preview_requests_drop_size_and_resolution() {
        let request = LogoForm::new("Acme")
            .with_size(LogoSize::Landscape)
            .with_resolution(LogoResolution::Hd)
            .preview(true)
            .build()
            .unwrap();

        assert!(request.preview_mode);
        assert_eq!(request.size, None);
        assert_eq!(request.resolution, None);

        let wire = serde_json::to_value(&request).unwrap();
        assert!(wire.get("size").is_none());
        assert!(wire.get("resolution").is_none());
    }

    #[test]
    fn full_request_wire_shape() {
        let request = LogoForm::new("  Test Company ")
            .with_style(LogoStyle::Modern)
            .with_description(" A tech startup ")
            .with_size(LogoSize::Landscape)
            .with_resolution(LogoResolution::High)
            .with_filter(LogoFilter::Gradient)
            .with_filter(LogoFilter::Vibrant)
            .with_filter(LogoFilter::Gradient)
            .with_transparency(true)
            .build()
            .unwrap();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "business_name": "Test Company",
                "style": "modern",
                "description": "A tech startup",
                "size": "1792x1024",
                "resolution": "high",
                "filters": ["vibrant", "gradient"],
                "transparency": true,
                "preview_mode": false
            })
        );
    }

    #[test]
    fn empty_optionals_are_omitted() {
        let request = LogoForm::new("Acme").with_description("   ").build().unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "business_name": "Acme", "style": "modern", "preview_mode": false })
        );
    }

    #[test]
    fn parses_cli_values() {
        assert_eq!("Vintage".parse::<LogoStyle>().unwrap(), LogoStyle::Vintage);
        assert_eq!("1024x1792".parse::<LogoSize>().unwrap(), LogoSize::Portrait);
        assert_eq!("hd".parse::<LogoResolution>().unwrap(), LogoResolution::Hd);
        assert_eq!("neon".parse::<LogoFilter>().unwrap(), LogoFilter::Neon);
        assert!("grunge".parse::<LogoStyle>().is_err());
    }

    #[test]
    fn improve_body_carries_name_style_and_description() {
        let request = LogoForm::new("Acme")
            .with_style(LogoStyle::Playful)
            .with_description("bakery")
            .with_size(LogoSize::Square)
            .build()
            .unwrap();
        assert_eq!(
            serde_json::to_value(request.improve_body()).unwrap(),
            json!({ "business_name": "Acme", "style": "playful", "description": "bakery" })
        );
    }
}
