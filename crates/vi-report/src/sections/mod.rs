//! Report section data structures.
//!
//! Each section is a self-contained value: everything a renderer needs,
//! images included, is carried inline.

pub mod checklist;
pub mod diagrams;
pub mod header;
pub mod history;
pub mod photos;
pub mod vehicle;
pub mod verdict;

pub use checklist::{ChecklistPage, ChecklistRow, DiagnosisSection, StatusCounts};
pub use diagrams::{
    BatterySection, BodyDiagramSection, BrakeFluidSection, DamageRow, TireDiagramSection,
    TireRow,
};
pub use header::{HeaderSection, IngressSection};
pub use history::HistorySection;
pub use photos::{PhotoPage, PhotoSlot};
pub use vehicle::{GridRow, SuggestedPriceSection, VehicleIdentitySection, VehiclePhotoSection};
pub use verdict::VerdictSection;

use crate::embed::EmbeddedImage;
use serde::{Deserialize, Serialize};

/// Section discriminant, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    Ingress,
    VehicleIdentity,
    VehiclePhoto,
    SuggestedPrice,
    History,
    Diagnosis,
    Checklist,
    BodyDiagram,
    TireDiagram,
    Battery,
    BrakeFluid,
    Photos,
    Verdict,
}

/// One unit of the composed report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum ReportSection {
    Header(HeaderSection),
    Ingress(IngressSection),
    VehicleIdentity(VehicleIdentitySection),
    VehiclePhoto(VehiclePhotoSection),
    SuggestedPrice(SuggestedPriceSection),
    History(HistorySection),
    Diagnosis(DiagnosisSection),
    Checklist(ChecklistPage),
    BodyDiagram(BodyDiagramSection),
    TireDiagram(TireDiagramSection),
    Battery(BatterySection),
    BrakeFluid(BrakeFluidSection),
    Photos(PhotoPage),
    Verdict(VerdictSection),
}

impl ReportSection {
    pub fn kind(&self) -> SectionKind {
        match self {
            ReportSection::Header(_) => SectionKind::Header,
            ReportSection::Ingress(_) => SectionKind::Ingress,
            ReportSection::VehicleIdentity(_) => SectionKind::VehicleIdentity,
            ReportSection::VehiclePhoto(_) => SectionKind::VehiclePhoto,
            ReportSection::SuggestedPrice(_) => SectionKind::SuggestedPrice,
            ReportSection::History(_) => SectionKind::History,
            ReportSection::Diagnosis(_) => SectionKind::Diagnosis,
            ReportSection::Checklist(_) => SectionKind::Checklist,
            ReportSection::BodyDiagram(_) => SectionKind::BodyDiagram,
            ReportSection::TireDiagram(_) => SectionKind::TireDiagram,
            ReportSection::Battery(_) => SectionKind::Battery,
            ReportSection::BrakeFluid(_) => SectionKind::BrakeFluid,
            ReportSection::Photos(_) => SectionKind::Photos,
            ReportSection::Verdict(_) => SectionKind::Verdict,
        }
    }

    /// Printed section heading.
    pub fn title(&self) -> String {
        match self {
            ReportSection::Header(h) => h.company_name.clone(),
            ReportSection::Ingress(_) => "Fecha y hora de ingreso".to_string(),
            ReportSection::VehicleIdentity(_) => "Datos del vehículo".to_string(),
            ReportSection::VehiclePhoto(_) => "Fotografía del vehículo".to_string(),
            ReportSection::SuggestedPrice(_) => "Precio sugerido".to_string(),
            ReportSection::History(_) => "Historial RUNT".to_string(),
            ReportSection::Diagnosis(_) => "Sugerencias de diagnóstico".to_string(),
            ReportSection::Checklist(page) => format!("Inspección: {}", page.category.title()),
            ReportSection::BodyDiagram(_) => "Diagrama de carrocería".to_string(),
            ReportSection::TireDiagram(_) => "Diagrama de llantas".to_string(),
            ReportSection::Battery(_) => "Batería".to_string(),
            ReportSection::BrakeFluid(_) => "Líquido de frenos".to_string(),
            ReportSection::Photos(page) => format!(
                "Registro fotográfico ({}/{})",
                page.page_number, page.total_pages
            ),
            ReportSection::Verdict(_) => "Dictamen final".to_string(),
        }
    }

    /// Embedded images carried by this section, placeholders included.
    pub fn images(&self) -> Vec<&EmbeddedImage> {
        match self {
            ReportSection::Header(h) => vec![&h.logo],
            ReportSection::VehiclePhoto(p) => vec![&p.image],
            ReportSection::BodyDiagram(b) => vec![&b.diagram.image],
            ReportSection::TireDiagram(t) => vec![&t.diagram.image],
            ReportSection::Photos(page) => page.slots.iter().map(|s| &s.image).collect(),
            _ => Vec::new(),
        }
    }

    /// Whether the section opens a new physical page.
    pub fn starts_page(&self) -> bool {
        matches!(
            self,
            ReportSection::Header(_)
                | ReportSection::History(_)
                | ReportSection::Checklist(_)
                | ReportSection::BodyDiagram(_)
                | ReportSection::TireDiagram(_)
                | ReportSection::Photos(_)
                | ReportSection::Verdict(_)
        )
    }
}
