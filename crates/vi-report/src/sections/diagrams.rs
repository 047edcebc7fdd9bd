//! Body diagram, tire diagram and the battery/brake-fluid subsections.

use crate::diagram::DiagramImage;
use crate::record::{BatteryStatus, BodyStyle, BrakeFluidStatus, ComponentCondition};
use serde::{Deserialize, Serialize};
use vi_annotate::{
    classify, measurement_leader, DamagePoint, DiagramFrame, LabelOffset, LeaderLine,
    SeverityBand, TireMeasurement, TirePosition,
};

/// One damage marker row, in marker order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageRow {
    pub sequence: u32,
    pub label: String,
    pub observation: Option<String>,
}

/// Body diagram with its marker table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDiagramSection {
    pub body_style: BodyStyle,
    pub diagram: DiagramImage,
    pub rows: Vec<DamageRow>,
    pub notes: Option<String>,
}

impl BodyDiagramSection {
    pub fn new(
        body_style: BodyStyle,
        diagram: DiagramImage,
        points: &[DamagePoint],
        notes: Option<&str>,
    ) -> Self {
        let mut rows: Vec<DamageRow> = points
            .iter()
            .map(|p| DamageRow {
                sequence: p.sequence,
                label: p.label.clone(),
                observation: p.observation.clone(),
            })
            .collect();
        rows.sort_by_key(|r| r.sequence);
        Self {
            body_style,
            diagram,
            rows,
            notes: notes.map(str::to_string),
        }
    }

    /// Number of marked points.
    pub fn point_count(&self) -> usize {
        self.rows.len()
    }
}

/// One tire reading with its band and label placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TireRow {
    pub position: TirePosition,
    pub title: String,
    pub value: f64,
    pub band: SeverityBand,
    pub leader: LeaderLine,
}

/// Tire diagram with readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TireDiagramSection {
    pub diagram: DiagramImage,
    pub rows: Vec<TireRow>,
    /// Frame the leader lines were computed against.
    pub frame: DiagramFrame,
    /// Most severe band among the readings.
    pub worst_band: SeverityBand,
}

impl TireDiagramSection {
    pub fn new(
        diagram: DiagramImage,
        measurements: &[TireMeasurement],
        frame: DiagramFrame,
        offset: LabelOffset,
    ) -> Self {
        let mut rows: Vec<TireRow> = measurements
            .iter()
            .map(|m| TireRow {
                position: m.position,
                title: m.title().to_string(),
                value: m.value,
                band: classify(Some(m.value)),
                leader: measurement_leader(m, frame, offset),
            })
            .collect();
        rows.sort_by_key(|r| r.position);
        let worst_band = rows
            .iter()
            .map(|r| r.band)
            .max_by_key(SeverityBand::rank)
            .unwrap_or(SeverityBand::Unknown);
        Self {
            diagram,
            rows,
            frame,
            worst_band,
        }
    }
}

/// Battery check result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatterySection {
    pub condition: ComponentCondition,
    /// Formatted voltage, e.g. `12.6 V`.
    pub voltage: Option<String>,
    pub observation: Option<String>,
}

impl From<&BatteryStatus> for BatterySection {
    fn from(status: &BatteryStatus) -> Self {
        Self {
            condition: status.condition,
            voltage: status.voltage.map(|v| format!("{:.1} V", v)),
            observation: status.observation.clone(),
        }
    }
}

/// Brake fluid check result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrakeFluidSection {
    pub condition: ComponentCondition,
    pub observation: Option<String>,
}

impl From<&BrakeFluidStatus> for BrakeFluidSection {
    fn from(status: &BrakeFluidStatus) -> Self {
        Self {
            condition: status.condition,
            observation: status.observation.clone(),
        }
    }
}
