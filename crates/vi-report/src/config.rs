//! Report configuration types.

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use vi_annotate::{DiagramFrame, LabelOffset};

/// Legal footer printed on every page when the company does not set its own.
pub const DEFAULT_DISCLAIMER: &str = "Este informe refleja el estado del vehículo al momento de la \
inspección, según lo observable sin desmontar piezas. No constituye garantía sobre fallas ocultas \
ni sobre el comportamiento futuro del vehículo.";

/// Company branding and contact data printed on the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanySettings {
    /// Company name.
    pub name: String,
    /// Tax identifier (NIT).
    pub tax_id: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    /// Logo image reference.
    pub logo: Option<String>,
    /// Watermark image reference.
    pub watermark: Option<String>,
    /// Legal footer text.
    pub disclaimer: Option<String>,
}

impl CompanySettings {
    /// Create settings for a company name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the logo reference.
    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    /// Set the watermark reference.
    pub fn with_watermark(mut self, watermark: impl Into<String>) -> Self {
        self.watermark = Some(watermark.into());
        self
    }

    /// Footer text, falling back to the built-in disclaimer.
    pub fn disclaimer_text(&self) -> &str {
        match self.disclaimer.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => DEFAULT_DISCLAIMER,
        }
    }

    /// Load settings from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Role an image plays in the report; selects its optimization profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageRole {
    Logo,
    Watermark,
    Photo,
    Diagram,
}

impl std::fmt::Display for ImageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageRole::Logo => write!(f, "logo"),
            ImageRole::Watermark => write!(f, "watermark"),
            ImageRole::Photo => write!(f, "photo"),
            ImageRole::Diagram => write!(f, "diagram"),
        }
    }
}

/// Bounding box and JPEG quality for one image role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageProfile {
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG quality, 1-100.
    pub quality: u8,
}

impl ImageProfile {
    pub const fn new(max_width: u32, max_height: u32, quality: u8) -> Self {
        Self {
            max_width,
            max_height,
            quality,
        }
    }
}

/// Optimization profiles per image role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageLimits {
    #[serde(default = "default_logo_profile")]
    pub logo: ImageProfile,
    #[serde(default = "default_watermark_profile")]
    pub watermark: ImageProfile,
    #[serde(default = "default_photo_profile")]
    pub photo: ImageProfile,
    #[serde(default = "default_diagram_profile")]
    pub diagram: ImageProfile,
    /// Sources above this size are refused before decoding.
    #[serde(default = "default_max_source_bytes")]
    pub max_source_bytes: usize,
}

fn default_logo_profile() -> ImageProfile {
    ImageProfile::new(400, 200, 90)
}

fn default_watermark_profile() -> ImageProfile {
    ImageProfile::new(600, 400, 50)
}

fn default_photo_profile() -> ImageProfile {
    ImageProfile::new(800, 600, 85)
}

fn default_diagram_profile() -> ImageProfile {
    ImageProfile::new(800, 600, 90)
}

fn default_max_source_bytes() -> usize {
    15 * 1024 * 1024
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            logo: default_logo_profile(),
            watermark: default_watermark_profile(),
            photo: default_photo_profile(),
            diagram: default_diagram_profile(),
            max_source_bytes: default_max_source_bytes(),
        }
    }
}

impl ImageLimits {
    /// Profile for a role.
    pub fn profile(&self, role: ImageRole) -> ImageProfile {
        match role {
            ImageRole::Logo => self.logo,
            ImageRole::Watermark => self.watermark,
            ImageRole::Photo => self.photo,
            ImageRole::Diagram => self.diagram,
        }
    }
}

/// Complete report configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Custom report title.
    pub title: Option<String>,
    /// Image optimization profiles.
    #[serde(default)]
    pub images: ImageLimits,
    /// Rendered diagram size used to place tire labels.
    #[serde(default)]
    pub diagram_frame: DiagramFrame,
    /// Label offset from each tire reading dot.
    #[serde(default)]
    pub label_offset: LabelOffset,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: None,
            images: ImageLimits::default(),
            diagram_frame: DiagramFrame::default(),
            label_offset: LabelOffset::default(),
        }
    }
}

impl ReportConfig {
    /// Create a new report configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replace the image profiles.
    pub fn with_images(mut self, images: ImageLimits) -> Self {
        self.images = images;
        self
    }

    /// Set the diagram frame used for leader lines.
    pub fn with_diagram_frame(mut self, frame: DiagramFrame) -> Self {
        self.diagram_frame = frame;
        self
    }

    /// Check values that would make image optimization meaningless.
    pub fn validate(&self) -> Result<()> {
        for role in [
            ImageRole::Logo,
            ImageRole::Watermark,
            ImageRole::Photo,
            ImageRole::Diagram,
        ] {
            let profile = self.images.profile(role);
            if profile.max_width == 0 || profile.max_height == 0 {
                return Err(ReportError::InvalidConfig(format!(
                    "{} bounding box must be non-zero",
                    role
                )));
            }
            if !(1..=100).contains(&profile.quality) {
                return Err(ReportError::InvalidConfig(format!(
                    "{} quality must be within 1-100, got {}",
                    role, profile.quality
                )));
            }
        }
        if self.diagram_frame.width <= 0.0 || self.diagram_frame.height <= 0.0 {
            return Err(ReportError::InvalidConfig(
                "diagram frame must have positive size".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ReportConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_keys_are_ignored() {
        let parsed = ReportConfig::from_json(r#"{"schema_version": "1.0.0", "title": "X"}"#).unwrap();
        assert_eq!(parsed.title.as_deref(), Some("X"));
        assert!(!parsed.to_json().unwrap().contains("schema_version"));
    }

    #[test]
    fn test_default_config() {
        let config = ReportConfig::default();
        assert!(config.title.is_none());
        assert_eq!(config.diagram_frame, DiagramFrame::default());
        assert_eq!(config.images.logo, ImageProfile::new(400, 200, 90));
        assert_eq!(config.images.watermark.max_width, 600);
        assert!(config.images.watermark.quality < config.images.photo.quality);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = ReportConfig::new().with_title("Informe");
        let json = config.to_json().unwrap();
        let parsed = ReportConfig::from_json(&json).unwrap();
        assert_eq!(parsed.title.as_deref(), Some("Informe"));
        assert_eq!(parsed.label_offset, LabelOffset::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"images": {"photo": {"max_width": 1024, "max_height": 768, "quality": 70}}}"#;
        let parsed = ReportConfig::from_json(json).unwrap();
        assert_eq!(parsed.images.photo.max_width, 1024);
        assert_eq!(parsed.images.logo, ImageProfile::new(400, 200, 90));
    }

    #[test]
    fn test_invalid_quality_rejected() {
        let mut config = ReportConfig::default();
        config.images.photo.quality = 0;
        assert!(matches!(
            config.validate(),
            Err(ReportError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_disclaimer_fallback() {
        let mut settings = CompanySettings::new("Taller");
        assert_eq!(settings.disclaimer_text(), DEFAULT_DISCLAIMER);
        settings.disclaimer = Some("  ".to_string());
        assert_eq!(settings.disclaimer_text(), DEFAULT_DISCLAIMER);
        settings.disclaimer = Some("Texto legal".to_string());
        assert_eq!(settings.disclaimer_text(), "Texto legal");
    }
}
