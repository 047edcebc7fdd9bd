//! Reference resolution and size/quality reduction.

use super::mime::{self, MIME_JPEG, MIME_PNG, MIME_SVG};
use super::source::ImageSource;
use super::{EmbeddedImage, ImageRef};
use crate::config::{ImageLimits, ImageProfile, ImageRole};
use crate::error::ImageError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

/// Outcome of resolving one reference.
///
/// `error` is set whenever `image` is a placeholder because something went
/// wrong; an empty reference yields a placeholder with no error.
#[derive(Debug)]
pub struct Resolution {
    pub image: EmbeddedImage,
    pub error: Option<ImageError>,
}

impl Resolution {
    /// Nothing to embed; not an error.
    pub fn missing() -> Self {
        Self {
            image: EmbeddedImage::Placeholder,
            error: None,
        }
    }

    fn failed(error: ImageError) -> Self {
        Self {
            image: EmbeddedImage::Placeholder,
            error: Some(error),
        }
    }
}

/// Turns image references into embeddable images.
pub struct ImagePipeline<S> {
    source: Arc<S>,
    limits: ImageLimits,
}

impl<S> Clone for ImagePipeline<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            limits: self.limits.clone(),
        }
    }
}

impl<S: ImageSource> ImagePipeline<S> {
    pub fn new(source: S, limits: ImageLimits) -> Self {
        Self {
            source: Arc::new(source),
            limits,
        }
    }

    pub fn limits(&self) -> &ImageLimits {
        &self.limits
    }

    /// Resolve a reference, never failing.
    pub async fn resolve(&self, reference: &ImageRef, role: ImageRole) -> Resolution {
        match self.try_resolve(reference, role).await {
            Ok(Some(image)) => Resolution { image, error: None },
            Ok(None) => Resolution::missing(),
            Err(err) => Resolution::failed(err),
        }
    }

    /// Resolve a reference; `Ok(None)` means there was nothing to embed.
    pub async fn try_resolve(
        &self,
        reference: &ImageRef,
        role: ImageRole,
    ) -> Result<Option<EmbeddedImage>, ImageError> {
        match reference {
            ImageRef::Empty => Ok(None),
            ImageRef::Inline {
                data,
                declared_mime,
            } => pass_through(data, declared_mime.as_deref()).map(Some),
            ImageRef::File(path) => {
                let data = self.source.read_file(path).await?;
                self.embed_bytes(data, role).await.map(Some)
            }
            ImageRef::Remote(url) => {
                let data = self.source.fetch_remote(url).await?;
                self.embed_bytes(data, role).await.map(Some)
            }
        }
    }

    /// Optimize raw bytes for `role`.
    ///
    /// Decodable rasters are fitted into the role's bounding box and
    /// re-encoded; SVG passes through unchanged. Anything else is rejected,
    /// whatever the file extension claims.
    pub async fn embed_bytes(
        &self,
        data: Vec<u8>,
        role: ImageRole,
    ) -> Result<EmbeddedImage, ImageError> {
        if data.is_empty() {
            return Err(ImageError::Empty);
        }
        if data.len() > self.limits.max_source_bytes {
            return Err(ImageError::TooLarge {
                size: data.len(),
                limit: self.limits.max_source_bytes,
            });
        }
        let format = match mime::sniff_format(&data) {
            Some(format) if mime::is_decodable(format) => format,
            _ if mime::is_svg(&data) => return Ok(EmbeddedImage::new(MIME_SVG, data)),
            _ => return Err(ImageError::UnsupportedFormat),
        };
        let profile = self.limits.profile(role);
        let original = data.len();
        let image = tokio::task::spawn_blocking(move || optimize(&data, format, profile)).await??;
        debug!(
            role = %role,
            format = ?format,
            original_bytes = original,
            embedded_bytes = image.data().map_or(0, <[u8]>::len),
            "image optimized"
        );
        Ok(image)
    }
}

/// Inline payloads are embedded as carried; the declared type only labels
/// bytes that match no signature.
fn pass_through(data: &[u8], hint: Option<&str>) -> Result<EmbeddedImage, ImageError> {
    if data.is_empty() {
        return Err(ImageError::Empty);
    }
    let mime = mime::detect_mime(data, hint).ok_or(ImageError::UnsupportedFormat)?;
    Ok(EmbeddedImage::new(mime, data.to_vec()))
}

/// Decode, fit into the profile's box and re-encode.
///
/// Images with an alpha channel stay PNG so transparent logos keep their
/// background; everything else becomes JPEG at the profile quality.
pub fn optimize(
    data: &[u8],
    format: ImageFormat,
    profile: ImageProfile,
) -> Result<EmbeddedImage, ImageError> {
    let decoded = image::load_from_memory_with_format(data, format)?;
    let fitted = fit_within(decoded, profile.max_width, profile.max_height);

    let mut out = Vec::new();
    if fitted.color().has_alpha() {
        fitted.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
        return Ok(EmbeddedImage::new(MIME_PNG, out));
    }
    let rgb = DynamicImage::ImageRgb8(fitted.to_rgb8());
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, profile.quality))?;
    Ok(EmbeddedImage::new(MIME_JPEG, out))
}

fn fit_within(image: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    let (width, height) = image.dimensions();
    if width <= max_width && height <= max_height {
        return image;
    }
    image.resize(max_width, max_height, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
        use crate::embed::FsImageSource;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 30, 30]));
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    fn pipeline() -> ImagePipeline<FsImageSource> {
        ImagePipeline::new(FsImageSource::default(), ImageLimits::default())
    }

    #[test]
    fn test_optimize_downscales_into_box() {
        let profile = ImageProfile::new(800, 600, 85);
        let out = optimize(&png_bytes(1600, 1200), ImageFormat::Png, profile)
            .unwrap();
        assert_eq!(out.mime(), Some(MIME_JPEG));
        let decoded = image::load_from_memory(out.data().unwrap()).unwrap();
        assert_eq!(decoded.dimensions(), (800, 600));
    }

    #[test]
    fn test_optimize_keeps_aspect_ratio() {
        let out = optimize(&png_bytes(1000, 200), ImageFormat::Png, ImageProfile::new(400, 200, 90))
            .unwrap();
        let decoded = image::load_from_memory(out.data().unwrap()).unwrap();
        assert_eq!(decoded.dimensions(), (400, 80));
    }

    #[test]
    fn test_optimize_keeps_alpha_as_png() {
        let img = RgbaImage::from_pixel(50, 50, Rgba([0, 0, 0, 0]));
        let mut png = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        let out = optimize(&png, ImageFormat::Png, ImageProfile::new(400, 200, 90)).unwrap();
        assert_eq!(out.mime(), Some(MIME_PNG));
    }

    #[test]
    fn test_optimize_rejects_corrupt_data() {
        let mut bytes = png_bytes(10, 10);
        bytes.truncate(20);
        assert!(matches!(
            optimize(&bytes, ImageFormat::Png, ImageProfile::new(10, 10, 80)),
            Err(ImageError::Codec(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_reference_is_not_an_error() {
        let res = pipeline().resolve(&ImageRef::Empty, ImageRole::Photo).await;
        assert!(res.image.is_placeholder());
        assert!(res.error.is_none());
    }

    #[tokio::test]
    async fn test_inline_passes_through_with_sniffed_mime() {
        let png = png_bytes(4, 4);
        let reference = ImageRef::Inline {
            data: png.clone(),
            declared_mime: Some("image/jpeg".to_string()),
        };
        let res = pipeline().resolve(&reference, ImageRole::Photo).await;
        assert_eq!(res.image.mime(), Some(MIME_PNG));
        assert_eq!(res.image.data(), Some(png.as_slice()));
    }

    #[tokio::test]
    async fn test_unrecognized_inline_fails() {
        let reference = ImageRef::Inline {
            data: b"not an image".to_vec(),
            declared_mime: None,
        };
        let res = pipeline().resolve(&reference, ImageRole::Logo).await;
        assert!(res.image.is_placeholder());
        assert!(matches!(res.error, Some(ImageError::UnsupportedFormat)));
    }

    #[tokio::test]
    async fn test_file_extension_does_not_vouch_for_bytes() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, b"this is not an image at all").unwrap();

        let res = pipeline().resolve(&ImageRef::File(path), ImageRole::Photo).await;
        assert!(res.image.is_placeholder());
        assert!(matches!(res.error, Some(ImageError::UnsupportedFormat)));
    }

    #[tokio::test]
    async fn test_webp_is_reencoded() {
        let mut webp = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(1200, 300, Rgb([10, 10, 10])))
            .write_to(&mut Cursor::new(&mut webp), ImageFormat::WebP)
            .unwrap();
        let image = pipeline().embed_bytes(webp, ImageRole::Photo).await.unwrap();
        let decoded = image::load_from_memory(image.data().unwrap()).unwrap();
        assert_eq!(decoded.dimensions(), (800, 200));
    }

    #[tokio::test]
    async fn test_svg_bytes_pass_through() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"/>"#.to_vec();
        let image = pipeline()
            .embed_bytes(svg.clone(), ImageRole::Logo)
            .await
            .unwrap();
        assert_eq!(image.mime(), Some(MIME_SVG));
        assert_eq!(image.data(), Some(svg.as_slice()));
    }

    #[tokio::test]
    async fn test_source_size_limit() {
        let limits = ImageLimits {
            max_source_bytes: 8,
            ..ImageLimits::default()
        };
        let pipeline = ImagePipeline::new(FsImageSource::default(), limits);
        let err = pipeline
            .embed_bytes(png_bytes(4, 4), ImageRole::Photo)
            .await
            .unwrap_err();
        assert!(matches!(err, ImageError::TooLarge { .. }));
    }
}
