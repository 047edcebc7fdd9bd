//! Annotated diagram images.
//!
//! A diagram image is either the snapshot the UI captured of its live overlay
//! (base silhouette with markers baked in) or a synthesized placeholder naming
//! the body style. The choice is made once, by [`select_renderer`], based on
//! whether a usable snapshot exists.

use crate::config::ImageRole;
use crate::embed::mime::MIME_SVG;
use crate::embed::{EmbeddedImage, ImagePipeline, ImageSource};
use crate::record::BodyStyle;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Which diagram is being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramKind {
    Body,
    Tires,
}

impl DiagramKind {
    pub fn title(&self) -> &'static str {
        match self {
            DiagramKind::Body => "Diagrama de carrocería",
            DiagramKind::Tires => "Diagrama de llantas",
        }
    }

    pub fn slot(&self) -> &'static str {
        match self {
            DiagramKind::Body => "body_diagram",
            DiagramKind::Tires => "tire_diagram",
        }
    }
}

/// Snapshot-capture collaborator.
///
/// Returns the raster of the currently rendered annotated diagram, or `None`
/// when no capture is available.
pub trait SnapshotCapture: Send + Sync + 'static {
    fn capture(&self, kind: DiagramKind) -> impl Future<Output = Option<Vec<u8>>> + Send;
}

/// Capture collaborator with nothing captured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSnapshots;

impl SnapshotCapture for NoSnapshots {
    async fn capture(&self, _kind: DiagramKind) -> Option<Vec<u8>> {
        None
    }
}

/// Snapshots captured earlier and held in memory.
#[derive(Debug, Clone, Default)]
pub struct StoredSnapshots {
    snapshots: HashMap<DiagramKind, Vec<u8>>,
}

impl StoredSnapshots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(mut self, kind: DiagramKind, data: Vec<u8>) -> Self {
        self.snapshots.insert(kind, data);
        self
    }
}

impl SnapshotCapture for StoredSnapshots {
    async fn capture(&self, kind: DiagramKind) -> Option<Vec<u8>> {
        self.snapshots.get(&kind).cloned()
    }
}

/// A produced diagram image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramImage {
    pub image: EmbeddedImage,
    /// True when the image is a placeholder without the annotations drawn in.
    pub synthesized: bool,
    /// Why a snapshot could not be used, when it existed but failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

/// Produces the image for a diagram.
pub trait DiagramRenderer: Send + Sync {
    fn render(
        &self,
        kind: DiagramKind,
        body_style: BodyStyle,
    ) -> impl Future<Output = DiagramImage> + Send;
}

/// Uses a captured snapshot, normalized through the embedding pipeline.
pub struct SnapshotRenderer<S> {
    snapshot: Vec<u8>,
    pipeline: ImagePipeline<S>,
}

impl<S: ImageSource> SnapshotRenderer<S> {
    pub fn new(snapshot: Vec<u8>, pipeline: ImagePipeline<S>) -> Self {
        Self { snapshot, pipeline }
    }
}

impl<S: ImageSource> DiagramRenderer for SnapshotRenderer<S> {
    async fn render(&self, kind: DiagramKind, body_style: BodyStyle) -> DiagramImage {
        match self
            .pipeline
            .embed_bytes(self.snapshot.clone(), ImageRole::Diagram)
            .await
        {
            Ok(image) => DiagramImage {
                image,
                synthesized: false,
                fallback_reason: None,
            },
            Err(err) => {
                let mut placeholder = PlaceholderRenderer.render(kind, body_style).await;
                placeholder.fallback_reason = Some(err.to_string());
                placeholder
            }
        }
    }
}

/// Synthesizes a labelled placeholder; never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRenderer;

const PLACEHOLDER_WIDTH: u32 = 800;
const PLACEHOLDER_HEIGHT: u32 = 600;

impl PlaceholderRenderer {
    /// SVG document naming the body style and diagram.
    pub fn svg(kind: DiagramKind, body_style: BodyStyle) -> String {
        let (w, h) = (PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT);
        format!(
            concat!(
                r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"##,
                r##"<rect x="2" y="2" width="{rw}" height="{rh}" rx="24" fill="#F5F5F5" stroke="#BDBDBD" stroke-width="4"/>"##,
                r##"<text x="{cx}" y="{ty}" font-family="Arial, Helvetica, sans-serif" font-size="64" font-weight="bold" fill="#616161" text-anchor="middle">{style}</text>"##,
                r##"<text x="{cx}" y="{sy}" font-family="Arial, Helvetica, sans-serif" font-size="28" fill="#9E9E9E" text-anchor="middle">{title}</text>"##,
                "</svg>"
            ),
            w = w,
            h = h,
            rw = w - 4,
            rh = h - 4,
            cx = w / 2,
            ty = h / 2,
            sy = h / 2 + 56,
            style = body_style.display_name(),
            title = kind.title(),
        )
    }
}

impl DiagramRenderer for PlaceholderRenderer {
    async fn render(&self, kind: DiagramKind, body_style: BodyStyle) -> DiagramImage {
        DiagramImage {
            image: EmbeddedImage::new(MIME_SVG, Self::svg(kind, body_style).into_bytes()),
            synthesized: true,
            fallback_reason: None,
        }
    }
}

/// Renderer chosen by snapshot availability.
pub enum SelectedRenderer<S> {
    Snapshot(SnapshotRenderer<S>),
    Placeholder(PlaceholderRenderer),
}

impl<S: ImageSource> DiagramRenderer for SelectedRenderer<S> {
    async fn render(&self, kind: DiagramKind, body_style: BodyStyle) -> DiagramImage {
        match self {
            SelectedRenderer::Snapshot(r) => r.render(kind, body_style).await,
            SelectedRenderer::Placeholder(r) => r.render(kind, body_style).await,
        }
    }
}

/// Pick the snapshot renderer for a non-empty snapshot, the placeholder otherwise.
pub fn select_renderer<S: ImageSource>(
    snapshot: Option<Vec<u8>>,
    pipeline: ImagePipeline<S>,
) -> SelectedRenderer<S> {
    match snapshot {
        Some(data) if !data.is_empty() => {
            SelectedRenderer::Snapshot(SnapshotRenderer::new(data, pipeline))
        }
        _ => SelectedRenderer::Placeholder(PlaceholderRenderer),
    }
}

/// Ask the capture collaborator for a snapshot and render the diagram.
pub async fn produce_diagram<S: ImageSource, C: SnapshotCapture>(
    capture: Arc<C>,
    pipeline: ImagePipeline<S>,
    kind: DiagramKind,
    body_style: BodyStyle,
) -> DiagramImage {
    let snapshot = capture.capture(kind).await;
    debug!(
        diagram = kind.slot(),
        captured = snapshot.as_ref().is_some_and(|s| !s.is_empty()),
        "diagram snapshot requested"
    );
    select_renderer(snapshot, pipeline)
        .render(kind, body_style)
        .await
}
