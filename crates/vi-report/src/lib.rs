//! Inspection report composer.
//!
//! Turns a completed vehicle inspection into an ordered list of
//! self-contained report sections, with every image resolved, size-reduced
//! and embedded inline.
//!
//! # Features
//!
//! - **Never aborts on images**: unreadable or undecodable images become
//!   placeholders and are reported as [`ImageResolutionWarning`]s
//! - **Concurrent resolution**: logo, watermark, photos and diagram snapshots
//!   are resolved in parallel before any section is assembled
//! - **Role-based optimization**: each image is fitted into the bounding box
//!   and quality of its role (logo, watermark, photo, diagram)
//! - **Print-ready HTML**: [`HtmlRenderer`] lays the sections out as A4 pages
//!
//! # Sections
//!
//! Header, ingress, vehicle identity, vehicle photo, suggested price,
//! RUNT history, diagnosis, one checklist page per category, body diagram,
//! tire diagram, battery, brake fluid, photo pages (two per page), verdict.
//!
//! # Example
//!
//! ```no_run
//! use vi_report::{compose_report, CompanySettings, HtmlRenderer, InspectionRecord};
//!
//! # async fn run(json: &str) -> vi_report::Result<()> {
//! let record = InspectionRecord::from_json(json)?;
//! let settings = CompanySettings::new("Autos del Valle").with_logo("assets/logo.png");
//! let report = compose_report(Some(&record), &settings).await?;
//! let html = HtmlRenderer::new().render(&report);
//! # let _ = html;
//! # Ok(())
//! # }
//! ```

pub mod composer;
pub mod config;
pub mod diagram;
pub mod embed;
pub mod error;
pub mod html;
pub mod record;
pub mod sections;

pub use composer::{compose_report, report_file_name, ComposePhase, ComposedReport, ReportComposer};
pub use config::{CompanySettings, ImageLimits, ImageProfile, ImageRole, ReportConfig};
pub use diagram::{
    select_renderer, DiagramImage, DiagramKind, DiagramRenderer, NoSnapshots,
    PlaceholderRenderer, SnapshotCapture, SnapshotRenderer, StoredSnapshots,
};
pub use embed::{
    EmbeddedImage, FsImageSource, ImagePipeline, ImageRef, ImageResolutionWarning, ImageSource,
};
pub use error::{ImageError, ReportError, Result};
pub use html::HtmlRenderer;
pub use record::InspectionRecord;
pub use sections::{ReportSection, SectionKind};
