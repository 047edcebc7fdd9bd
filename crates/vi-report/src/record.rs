//! Inspection record consumed by the composer.
//!
//! The record is a read-only snapshot handed in by the persistence layer.
//! Image fields hold reference strings exactly as the acquisition paths
//! produced them (file paths, URLs or `data:` URIs).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vi_annotate::{DamagePoint, TireMeasurement};

/// Vehicle body style; selects the base silhouette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyStyle {
    #[default]
    Sedan,
    Suv,
    Pickup,
    Hatchback,
    Van,
}

impl BodyStyle {
    /// Upper-case name printed on synthesized diagrams.
    pub fn display_name(&self) -> &'static str {
        match self {
            BodyStyle::Sedan => "SEDAN",
            BodyStyle::Suv => "SUV",
            BodyStyle::Pickup => "PICKUP",
            BodyStyle::Hatchback => "HATCHBACK",
            BodyStyle::Van => "VAN",
        }
    }
}

/// Identity of the inspected vehicle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleInfo {
    pub plate: String,
    pub brand: String,
    pub line: String,
    pub model_year: Option<u16>,
    pub color: Option<String>,
    pub mileage_km: Option<u64>,
    pub fuel: Option<String>,
    pub vin: Option<String>,
    pub engine_number: Option<String>,
    pub body_style: BodyStyle,
}

/// Vehicle-history (RUNT) record as returned by the lookup service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleHistory {
    pub registration_status: Option<String>,
    pub service_type: Option<String>,
    pub transit_authority: Option<String>,
    pub registration_date: Option<String>,
    pub soat_expiry: Option<String>,
    pub technical_review_expiry: Option<String>,
    pub liens: Option<String>,
    pub stolen_report: Option<bool>,
    pub owner_count: Option<u32>,
    /// Any other reported fields, in label order.
    pub extra: BTreeMap<String, String>,
}

/// Checklist category groups; each prints on its own page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistCategory {
    LightsExterior,
    EngineMounts,
    Interior,
}

impl ChecklistCategory {
    /// Page order.
    pub const ALL: [ChecklistCategory; 3] = [
        ChecklistCategory::LightsExterior,
        ChecklistCategory::EngineMounts,
        ChecklistCategory::Interior,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ChecklistCategory::LightsExterior => "Luces y exterior",
            ChecklistCategory::EngineMounts => "Motor y soportes",
            ChecklistCategory::Interior => "Interior",
        }
    }
}

/// Result of one checklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Good,
    Regular,
    Bad,
    NotApplicable,
}

impl ItemStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Good => "Bueno",
            ItemStatus::Regular => "Regular",
            ItemStatus::Bad => "Malo",
            ItemStatus::NotApplicable => "N/A",
        }
    }
}

/// One checklist row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub category: ChecklistCategory,
    pub name: String,
    pub status: ItemStatus,
    #[serde(default)]
    pub observation: Option<String>,
}

/// Body-diagram sub-record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyInspection {
    pub points: Vec<DamagePoint>,
    pub notes: Option<String>,
}

/// Condition of a checked component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentCondition {
    Good,
    Regular,
    Bad,
}

impl ComponentCondition {
    pub fn label(&self) -> &'static str {
        match self {
            ComponentCondition::Good => "Bueno",
            ComponentCondition::Regular => "Regular",
            ComponentCondition::Bad => "Malo",
        }
    }
}

/// Battery check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryStatus {
    pub condition: ComponentCondition,
    /// Resting voltage.
    #[serde(default)]
    pub voltage: Option<f64>,
    #[serde(default)]
    pub observation: Option<String>,
}

/// Brake fluid check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrakeFluidStatus {
    pub condition: ComponentCondition,
    #[serde(default)]
    pub observation: Option<String>,
}

/// Tire-diagram sub-record with the battery and brake fluid checks done at the same station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TireInspection {
    pub measurements: Vec<TireMeasurement>,
    pub battery: Option<BatteryStatus>,
    pub brake_fluid: Option<BrakeFluidStatus>,
}

/// One inspection photograph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionPhoto {
    /// Usually a number ("1", "2", ...); photos sort by it.
    pub label: String,
    /// Image reference.
    pub image: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Final decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictOutcome {
    Approved,
    Rejected,
}

impl VerdictOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            VerdictOutcome::Approved => "APROBADO",
            VerdictOutcome::Rejected => "RECHAZADO",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub outcome: VerdictOutcome,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Complete inspection snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionRecord {
    pub id: String,
    pub ingress_at: NaiveDateTime,
    pub vehicle: VehicleInfo,
    #[serde(default)]
    pub vehicle_photo: Option<String>,
    /// Suggested price in Colombian pesos.
    #[serde(default)]
    pub suggested_price: Option<u64>,
    #[serde(default)]
    pub history: Option<VehicleHistory>,
    #[serde(default)]
    pub diagnosis: Vec<String>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    #[serde(default)]
    pub body: Option<BodyInspection>,
    #[serde(default)]
    pub tires: Option<TireInspection>,
    #[serde(default)]
    pub photos: Vec<InspectionPhoto>,
    #[serde(default)]
    pub verdict: Option<Verdict>,
    #[serde(default)]
    pub inspector: Option<String>,
}

impl InspectionRecord {
    /// Minimal record with only the mandatory fields.
    pub fn new(id: impl Into<String>, ingress_at: NaiveDateTime, vehicle: VehicleInfo) -> Self {
        Self {
            id: id.into(),
            ingress_at,
            vehicle,
            vehicle_photo: None,
            suggested_price: None,
            history: None,
            diagnosis: Vec::new(),
            checklist: Vec::new(),
            body: None,
            tires: None,
            photos: Vec::new(),
            verdict: None,
            inspector: None,
        }
    }

    /// Load a record from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Damage points, empty when there is no body sub-record.
    pub fn damage_points(&self) -> &[DamagePoint] {
        self.body.as_ref().map(|b| b.points.as_slice()).unwrap_or(&[])
    }

    /// Tire readings, one per position; a later reading for a position
    /// replaces an earlier one. Empty when there is no tire sub-record.
    pub fn tire_measurements(&self) -> Vec<TireMeasurement> {
        let mut readings: Vec<TireMeasurement> = Vec::new();
        for m in self.tires.iter().flat_map(|t| &t.measurements) {
            match readings.iter_mut().find(|r| r.position == m.position) {
                Some(existing) => *existing = *m,
                None => readings.push(*m),
            }
        }
        readings
    }
}
