//! Report composer.
//!
//! One call turns an inspection record plus company settings into an ordered
//! list of self-contained sections. All images are resolved concurrently
//! first; sections are only assembled once every resolution has finished or
//! degraded to a placeholder.

use crate::config::{CompanySettings, ImageRole, ReportConfig};
use crate::diagram::{
    produce_diagram, DiagramImage, DiagramKind, NoSnapshots, PlaceholderRenderer, SnapshotCapture,
};
use crate::embed::mime::MIME_SVG;
use crate::embed::{
    EmbeddedImage, FsImageSource, ImagePipeline, ImageRef, ImageResolutionWarning, ImageSource,
    Resolution,
};
use crate::error::{ImageError, ReportError, Result};
use crate::record::{BodyStyle, InspectionPhoto, InspectionRecord};
use crate::sections::photos::{paginate, sort_photos};
use crate::sections::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Finished report, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedReport {
    pub title: String,
    /// Suggested output file name, e.g. `inspeccion_ABC123_20240315.pdf`.
    pub file_name: String,
    /// Drawn behind every page; a placeholder means no watermark.
    pub watermark: EmbeddedImage,
    /// Legal disclaimer repeated on every page.
    pub footer: String,
    pub sections: Vec<ReportSection>,
    /// Slots that degraded to placeholders.
    pub warnings: Vec<ImageResolutionWarning>,
}

impl ComposedReport {
    /// Sections of one kind, in report order.
    pub fn sections_of(&self, kind: SectionKind) -> impl Iterator<Item = &ReportSection> + '_ {
        self.sections.iter().filter(move |s| s.kind() == kind)
    }

    /// First section of `kind`.
    pub fn find(&self, kind: SectionKind) -> Option<&ReportSection> {
        self.sections_of(kind).next()
    }

    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.find(kind).is_some()
    }

    /// Serialize the section list to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Composer lifecycle for a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ComposePhase {
    Idle,
    Collecting,
    Assembling,
    Done,
}

impl ComposePhase {
    fn advance(&mut self, next: ComposePhase) {
        debug_assert!(
            next as u8 == *self as u8 + 1,
            "compose phase {:?} cannot follow {:?}",
            next,
            self
        );
        debug!(from = ?*self, to = ?next, "compose phase");
        *self = next;
    }
}

/// An image slot filled during collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Slot {
    Logo,
    Watermark,
    VehiclePhoto,
    Diagram(DiagramKind),
    /// Index into the sorted photo list.
    Photo(usize),
}

impl Slot {
    fn name(&self, photos: &[&InspectionPhoto]) -> String {
        match self {
            Slot::Logo => "logo".to_string(),
            Slot::Watermark => "watermark".to_string(),
            Slot::VehiclePhoto => "vehicle_photo".to_string(),
            Slot::Diagram(kind) => kind.slot().to_string(),
            Slot::Photo(i) => format!("photo:{}", photos[*i].label),
        }
    }
}

enum Outcome {
    Image(Resolution),
    Diagram(DiagramImage),
}

/// Collected images, keyed by slot.
struct Collected<'a> {
    outcomes: BTreeMap<Slot, Outcome>,
    photos: Vec<&'a InspectionPhoto>,
    warnings: Vec<ImageResolutionWarning>,
}

impl Collected<'_> {
    fn image(&mut self, slot: Slot) -> EmbeddedImage {
        match self.outcomes.remove(&slot) {
            Some(Outcome::Image(resolution)) => resolution.image,
            _ => EmbeddedImage::Placeholder,
        }
    }

    fn diagram(&mut self, kind: DiagramKind) -> DiagramImage {
        match self.outcomes.remove(&Slot::Diagram(kind)) {
            Some(Outcome::Diagram(diagram)) => diagram,
            _ => DiagramImage {
                image: EmbeddedImage::Placeholder,
                synthesized: true,
                fallback_reason: None,
            },
        }
    }
}

/// Builds [`ComposedReport`]s.
pub struct ReportComposer<S, C> {
    config: ReportConfig,
    pipeline: ImagePipeline<S>,
    capture: Arc<C>,
}

impl ReportComposer<FsImageSource, NoSnapshots> {
    /// Filesystem images, no diagram snapshots.
    pub fn with_defaults(config: ReportConfig) -> Self {
        let source = FsImageSource::new(config.images.max_source_bytes);
        Self::new(config, source, NoSnapshots)
    }
}

impl<S: ImageSource, C: SnapshotCapture> ReportComposer<S, C> {
    pub fn new(config: ReportConfig, source: S, capture: C) -> Self {
        let pipeline = ImagePipeline::new(source, config.images.clone());
        Self {
            config,
            pipeline,
            capture: Arc::new(capture),
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Compose the report for `record`.
    ///
    /// Fails only when no record is supplied. Image problems become
    /// placeholders plus entries in [`ComposedReport::warnings`].
    pub async fn compose(
        &self,
        record: Option<&InspectionRecord>,
        settings: &CompanySettings,
    ) -> Result<ComposedReport> {
        let record = record.ok_or(ReportError::MissingInspection)?;
        let mut phase = ComposePhase::Idle;

        phase.advance(ComposePhase::Collecting);
        let mut collected = self.collect(record, settings).await;

        phase.advance(ComposePhase::Assembling);
        let watermark = collected.image(Slot::Watermark);
        let sections = self.assemble(record, settings, &mut collected);
        let report = ComposedReport {
            title: self.title(record),
            file_name: report_file_name(record),
            watermark,
            footer: settings.disclaimer_text().to_string(),
            sections,
            warnings: collected.warnings,
        };

        phase.advance(ComposePhase::Done);
        info!(
            inspection = %record.id,
            sections = report.sections.len(),
            warnings = report.warnings.len(),
            file_name = %report.file_name,
            "Report composed"
        );
        Ok(report)
    }

    fn title(&self, record: &InspectionRecord) -> String {
        self.config.title.clone().unwrap_or_else(|| {
            format!(
                "Informe de inspección vehicular {}",
                record.vehicle.plate.trim().to_uppercase()
            )
        })
    }

    async fn collect<'a>(
        &self,
        record: &'a InspectionRecord,
        settings: &CompanySettings,
    ) -> Collected<'a> {
        let photos = sort_photos(&record.photos);
        let mut requests: Vec<(Slot, Option<&str>, ImageRole)> = vec![
            (Slot::Logo, settings.logo.as_deref(), ImageRole::Logo),
            (
                Slot::Watermark,
                settings.watermark.as_deref(),
                ImageRole::Watermark,
            ),
            (
                Slot::VehiclePhoto,
                record.vehicle_photo.as_deref(),
                ImageRole::Photo,
            ),
        ];
        requests.extend(
            photos
                .iter()
                .enumerate()
                .map(|(i, p)| (Slot::Photo(i), Some(p.image.as_str()), ImageRole::Photo)),
        );

        let mut outcomes = BTreeMap::new();
        let mut pending = Vec::new();
        let mut tasks: JoinSet<(Slot, Outcome)> = JoinSet::new();
        for (slot, reference, role) in requests {
            let reference = match ImageRef::parse_opt(reference) {
                Ok(reference) => reference,
                Err(err) => {
                    outcomes.insert(
                        slot,
                        Outcome::Image(Resolution {
                            image: EmbeddedImage::Placeholder,
                            error: Some(err),
                        }),
                    );
                    continue;
                }
            };
            if reference.is_empty() {
                outcomes.insert(slot, Outcome::Image(Resolution::missing()));
                continue;
            }
            debug!(slot = %slot.name(&photos), source = %reference.describe(), "resolving image");
            let pipeline = self.pipeline.clone();
            pending.push(slot);
            tasks.spawn(async move {
                let resolution = pipeline.resolve(&reference, role).await;
                (slot, Outcome::Image(resolution))
            });
        }

        let style = record.vehicle.body_style;
        let mut diagrams = Vec::new();
        if !record.damage_points().is_empty() {
            diagrams.push(DiagramKind::Body);
        }
        if !record.tire_measurements().is_empty() {
            diagrams.push(DiagramKind::Tires);
        }
        for kind in diagrams {
            let capture = Arc::clone(&self.capture);
            let pipeline = self.pipeline.clone();
            pending.push(Slot::Diagram(kind));
            tasks.spawn(async move {
                let diagram = produce_diagram(capture, pipeline, kind, style).await;
                (Slot::Diagram(kind), Outcome::Diagram(diagram))
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, outcome)) => {
                    outcomes.insert(slot, outcome);
                }
                Err(err) => warn!(error = %err, "image task failed"),
            }
        }
        for slot in pending {
            outcomes
                .entry(slot)
                .or_insert_with(|| lost_outcome(slot, style));
        }

        let mut warnings = Vec::new();
        for (slot, outcome) in &outcomes {
            let reason = match outcome {
                Outcome::Image(resolution) => resolution.error.as_ref().map(|e| e.to_string()),
                Outcome::Diagram(diagram) => diagram.fallback_reason.clone(),
            };
            if let Some(reason) = reason {
                let warning = ImageResolutionWarning {
                    slot: slot.name(&photos),
                    reason,
                };
                warn!(
                    slot = %warning.slot,
                    reason = %warning.reason,
                    "image replaced by placeholder"
                );
                warnings.push(warning);
            }
        }

        Collected {
            outcomes,
            photos,
            warnings,
        }
    }

    fn assemble(
        &self,
        record: &InspectionRecord,
        settings: &CompanySettings,
        collected: &mut Collected<'_>,
    ) -> Vec<ReportSection> {
        let mut sections = vec![
            ReportSection::Header(HeaderSection::new(
                settings,
                collected.image(Slot::Logo),
                &record.id,
                record.inspector.as_deref(),
            )),
            ReportSection::Ingress(IngressSection::new(record.ingress_at)),
            ReportSection::VehicleIdentity(VehicleIdentitySection::from_vehicle(&record.vehicle)),
            ReportSection::VehiclePhoto(VehiclePhotoSection {
                image: collected.image(Slot::VehiclePhoto),
            }),
            ReportSection::SuggestedPrice(SuggestedPriceSection::new(record.suggested_price)),
        ];

        if let Some(history) = &record.history {
            sections.push(ReportSection::History(HistorySection::from_history(history)));
        }
        if let Some(diagnosis) = DiagnosisSection::from_suggestions(&record.diagnosis) {
            sections.push(ReportSection::Diagnosis(diagnosis));
        }
        sections.extend(
            ChecklistPage::group(&record.checklist)
                .into_iter()
                .map(ReportSection::Checklist),
        );

        let points = record.damage_points();
        if !points.is_empty() {
            let notes = record.body.as_ref().and_then(|b| b.notes.as_deref());
            sections.push(ReportSection::BodyDiagram(BodyDiagramSection::new(
                record.vehicle.body_style,
                collected.diagram(DiagramKind::Body),
                points,
                notes,
            )));
        }

        let measurements = record.tire_measurements();
        if !measurements.is_empty() {
            sections.push(ReportSection::TireDiagram(TireDiagramSection::new(
                collected.diagram(DiagramKind::Tires),
                &measurements,
                self.config.diagram_frame,
                self.config.label_offset,
            )));
        }
        if let Some(tires) = &record.tires {
            if let Some(battery) = &tires.battery {
                sections.push(ReportSection::Battery(battery.into()));
            }
            if let Some(brake_fluid) = &tires.brake_fluid {
                sections.push(ReportSection::BrakeFluid(brake_fluid.into()));
            }
        }

        let slots: Vec<PhotoSlot> = (0..collected.photos.len())
            .map(|i| {
                let photo = collected.photos[i];
                PhotoSlot {
                    label: photo.label.clone(),
                    description: photo.description.clone(),
                    image: collected.image(Slot::Photo(i)),
                }
            })
            .collect();
        sections.extend(paginate(slots).into_iter().map(ReportSection::Photos));

        sections.push(ReportSection::Verdict(VerdictSection::new(
            record.verdict.as_ref(),
            record.inspector.as_deref(),
        )));
        sections
    }
}

/// Stand-in for a slot whose task died before reporting back.
fn lost_outcome(slot: Slot, style: BodyStyle) -> Outcome {
    let reason = "image task ended without a result";
    match slot {
        Slot::Diagram(kind) => Outcome::Diagram(DiagramImage {
            image: EmbeddedImage::new(
                MIME_SVG,
                PlaceholderRenderer::svg(kind, style).into_bytes(),
            ),
            synthesized: true,
            fallback_reason: Some(reason.to_string()),
        }),
        _ => Outcome::Image(Resolution {
            image: EmbeddedImage::Placeholder,
            error: Some(ImageError::Worker(reason.to_string())),
        }),
    }
}

/// `inspeccion_<PLATE>_<YYYYMMDD>.pdf`, keeping only alphanumerics of the plate.
pub fn report_file_name(record: &InspectionRecord) -> String {
    let plate: String = record
        .vehicle
        .plate
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_uppercase();
    format!(
        "inspeccion_{}_{}.pdf",
        plate,
        record.ingress_at.format("%Y%m%d")
    )
}

/// Compose with default configuration, filesystem images and no snapshots.
pub async fn compose_report(
    record: Option<&InspectionRecord>,
    settings: &CompanySettings,
) -> Result<ComposedReport> {
    ReportComposer::with_defaults(ReportConfig::default())
        .compose(record, settings)
        .await
}
