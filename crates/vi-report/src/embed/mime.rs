//! Content-based MIME detection.
//!
//! The bytes decide first. A declared `data:` URI type is only consulted for
//! inline payloads that match no known signature.

use image::ImageFormat;

pub const MIME_PNG: &str = "image/png";
pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_SVG: &str = "image/svg+xml";
pub const MIME_GIF: &str = "image/gif";
pub const MIME_WEBP: &str = "image/webp";

/// Format detected from the bytes, if any.
pub fn sniff_format(data: &[u8]) -> Option<ImageFormat> {
    image::guess_format(data).ok()
}

/// True when the bytes look like an SVG document.
pub fn is_svg(data: &[u8]) -> bool {
    let head = &data[..data.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

/// MIME type for a raster format we know how to label.
pub fn format_mime(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Png => Some(MIME_PNG),
        ImageFormat::Jpeg => Some(MIME_JPEG),
        ImageFormat::Gif => Some(MIME_GIF),
        ImageFormat::WebP => Some(MIME_WEBP),
        _ => None,
    }
}

/// Formats the pipeline can decode, resize and re-encode.
pub fn is_decodable(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif | ImageFormat::WebP
    )
}

/// Resolve the MIME type: content first, then the declared hint.
pub fn detect_mime(data: &[u8], hint: Option<&str>) -> Option<String> {
    if let Some(mime) = sniff_format(data).and_then(format_mime) {
        return Some(mime.to_string());
    }
    if is_svg(data) {
        return Some(MIME_SVG.to_string());
    }
    hint.map(normalize_declared)
        .filter(|mime| mime.starts_with("image/"))
}

/// Normalize a declared MIME type (`image/jpg` → `image/jpeg`, case, parameters).
pub fn normalize_declared(mime: &str) -> String {
    let base = mime.split(';').next().unwrap_or(mime).trim().to_ascii_lowercase();
    match base.as_str() {
        "image/jpg" | "image/pjpeg" => MIME_JPEG.to_string(),
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10];

    #[test]
    fn test_content_beats_hint() {
        assert_eq!(detect_mime(PNG_MAGIC, Some("image/jpeg")).as_deref(), Some(MIME_PNG));
        assert_eq!(detect_mime(JPEG_MAGIC, Some("image/png")).as_deref(), Some(MIME_JPEG));
    }

    #[test]
    fn test_svg_detection() {
        assert!(is_svg(b"<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>"));
        assert!(is_svg(b"<?xml version=\"1.0\"?>\n<svg></svg>"));
        assert!(!is_svg(b"<html></html>"));
        assert_eq!(detect_mime(b"  <svg/>", None).as_deref(), Some(MIME_SVG));
    }

    #[test]
    fn test_hint_fallback_and_normalization() {
        assert_eq!(detect_mime(b"????", Some("image/JPG")).as_deref(), Some(MIME_JPEG));
        assert_eq!(detect_mime(b"????", Some("text/plain")), None);
        assert_eq!(detect_mime(b"????", None), None);
        assert_eq!(normalize_declared("image/png;charset=x"), "image/png");
    }

    #[test]
    fn test_decodable_formats() {
        assert!(is_decodable(ImageFormat::WebP));
        assert!(is_decodable(ImageFormat::Gif));
        assert!(!is_decodable(ImageFormat::Tiff));
    }
}
