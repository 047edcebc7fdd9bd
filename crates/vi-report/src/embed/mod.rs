//! Image embedding: reference parsing, byte sources, optimization.
//!
//! Every image in a report goes through [`ImagePipeline::resolve`], which
//! never fails: unresolvable references come back as
//! [`EmbeddedImage::Placeholder`] together with an [`ImageResolutionWarning`].

pub mod mime;
pub mod pipeline;
pub mod source;

pub use pipeline::{ImagePipeline, Resolution};
pub use source::{FsImageSource, ImageSource};

use crate::error::ImageError;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where an image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Nothing to embed.
    Empty,
    /// Bytes already carried inline (from a `data:` URI).
    Inline {
        data: Vec<u8>,
        declared_mime: Option<String>,
    },
    /// Local file.
    File(PathBuf),
    /// `http(s)` URL.
    Remote(String),
}

impl ImageRef {
    /// Classify a reference string.
    ///
    /// Fails only for malformed `data:` URIs.
    pub fn parse(reference: &str) -> Result<Self, ImageError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Ok(ImageRef::Empty);
        }
        if let Some(rest) = reference.strip_prefix("data:") {
            return parse_data_uri(rest);
        }
        let lower = reference.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(ImageRef::Remote(reference.to_string()));
        }
        let path = reference.strip_prefix("file://").unwrap_or(reference);
        Ok(ImageRef::File(PathBuf::from(path)))
    }

    /// Parse an optional reference; `None` is [`ImageRef::Empty`].
    pub fn parse_opt(reference: Option<&str>) -> Result<Self, ImageError> {
        match reference {
            Some(r) => Self::parse(r),
            None => Ok(ImageRef::Empty),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ImageRef::Empty)
    }

    /// Short description for logs; never includes inline payloads.
    pub fn describe(&self) -> String {
        match self {
            ImageRef::Empty => "empty".to_string(),
            ImageRef::Inline { data, .. } => format!("inline ({} bytes)", data.len()),
            ImageRef::File(path) => path.display().to_string(),
            ImageRef::Remote(url) => url.clone(),
        }
    }
}

fn parse_data_uri(rest: &str) -> Result<ImageRef, ImageError> {
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImageError::InlineData("missing ',' separator".to_string()))?;
    let declared = header
        .split(';')
        .next()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string);
    let data = if header.contains(";base64") {
        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        base64::engine::general_purpose::STANDARD
            .decode(cleaned.as_bytes())
            .map_err(|e| ImageError::InlineData(e.to_string()))?
    } else {
        payload.as_bytes().to_vec()
    };
    Ok(ImageRef::Inline {
        data,
        declared_mime: declared,
    })
}

/// A renderable image, or the "no image" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmbeddedImage {
    Resolved {
        mime: String,
        #[serde(with = "base64_bytes")]
        data: Vec<u8>,
    },
    Placeholder,
}

impl EmbeddedImage {
    pub fn new(mime: impl Into<String>, data: Vec<u8>) -> Self {
        EmbeddedImage::Resolved {
            mime: mime.into(),
            data,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, EmbeddedImage::Placeholder)
    }

    pub fn mime(&self) -> Option<&str> {
        match self {
            EmbeddedImage::Resolved { mime, .. } => Some(mime),
            EmbeddedImage::Placeholder => None,
        }
    }

    pub fn data(&self) -> Option<&[u8]> {
        match self {
            EmbeddedImage::Resolved { data, .. } => Some(data),
            EmbeddedImage::Placeholder => None,
        }
    }

    /// `data:` URI for inline embedding.
    pub fn data_uri(&self) -> Option<String> {
        match self {
            EmbeddedImage::Resolved { mime, data } => Some(format!(
                "data:{};base64,{}",
                mime,
                base64::engine::general_purpose::STANDARD.encode(data)
            )),
            EmbeddedImage::Placeholder => None,
        }
    }
}

mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(text.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

/// A slot that degraded to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResolutionWarning {
    /// Report slot, e.g. `vehicle_photo` or `photo:3`.
    pub slot: String,
    pub reason: String,
}

impl std::fmt::Display for ImageResolutionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.slot, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference_kinds() {
        assert_eq!(ImageRef::parse("").unwrap(), ImageRef::Empty);
        assert_eq!(ImageRef::parse("   ").unwrap(), ImageRef::Empty);
        assert_eq!(ImageRef::parse_opt(None).unwrap(), ImageRef::Empty);
        assert_eq!(
            ImageRef::parse("https://cdn.example.com/a.png").unwrap(),
            ImageRef::Remote("https://cdn.example.com/a.png".to_string())
        );
        assert_eq!(
            ImageRef::parse("file:///tmp/a.jpg").unwrap(),
            ImageRef::File(PathBuf::from("/tmp/a.jpg"))
        );
        assert_eq!(
            ImageRef::parse("photos/1.jpg").unwrap(),
            ImageRef::File(PathBuf::from("photos/1.jpg"))
        );
    }

    #[test]
    fn test_parse_base64_data_uri() {
        let r = ImageRef::parse("data:image/png;base64,AAEC").unwrap();
        assert_eq!(
            r,
            ImageRef::Inline {
                data: vec![0, 1, 2],
                declared_mime: Some("image/png".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_plain_data_uri() {
        let r = ImageRef::parse("data:image/svg+xml,<svg/>").unwrap();
        match r {
            ImageRef::Inline { data, declared_mime } => {
                assert_eq!(data, b"<svg/>");
                assert_eq!(declared_mime.as_deref(), Some("image/svg+xml"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_malformed_data_uri() {
        assert!(matches!(
            ImageRef::parse("data:image/png;base64"),
            Err(ImageError::InlineData(_))
        ));
        assert!(matches!(
            ImageRef::parse("data:image/png;base64,@@@"),
            Err(ImageError::InlineData(_))
        ));
    }

    #[test]
    fn test_embedded_image_data_uri() {
        let img = EmbeddedImage::new("image/png", vec![0, 1, 2]);
        assert_eq!(img.data_uri().as_deref(), Some("data:image/png;base64,AAEC"));
        assert!(EmbeddedImage::Placeholder.data_uri().is_none());
    }

    #[test]
    fn test_embedded_image_serde() {
        let img = EmbeddedImage::new("image/jpeg", vec![255, 216]);
        let json = serde_json::to_string(&img).unwrap();
        assert!(json.contains("\"kind\":\"resolved\""));
        let back: EmbeddedImage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, img);
    }
}
