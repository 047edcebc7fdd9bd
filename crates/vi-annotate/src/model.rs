//! Damage points and tire measurements.
//!
//! Collections are plain slices in, owned vectors out. Callers never mutate a
//! collection in place, so a snapshot handed to the report composer cannot be
//! changed underneath it.

use crate::error::{Result, ValidationError};
use serde::{Deserialize, Serialize};

/// Smallest accepted tread depth reading (mm).
pub const MIN_TREAD_DEPTH_MM: f64 = 0.0;

/// Largest accepted tread depth reading (mm).
pub const MAX_TREAD_DEPTH_MM: f64 = 6.34;

/// One marked defect on the body diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamagePoint {
    /// Horizontal position as a fraction of the diagram width.
    pub x: f64,
    /// Vertical position as a fraction of the diagram height.
    pub y: f64,
    /// 1-based marker number, dense within a diagram.
    pub sequence: u32,
    /// Short marker label.
    #[serde(default)]
    pub label: String,
    /// Free-text observation.
    #[serde(default)]
    pub observation: Option<String>,
}

/// Append a damage point numbered after the existing ones.
///
/// Coordinates are stored as given; out-of-range values from raw touch input
/// are kept.
pub fn add_damage_point(
    points: &[DamagePoint],
    x: f64,
    y: f64,
    label: impl Into<String>,
    observation: Option<String>,
) -> Vec<DamagePoint> {
    let mut next = points.to_vec();
    next.push(DamagePoint {
        x,
        y,
        sequence: points.len() as u32 + 1,
        label: label.into(),
        observation,
    });
    next
}

/// Remove the point with `sequence` and renumber the rest as 1..N.
///
/// Unknown sequence numbers leave the points unchanged apart from the
/// renumbering pass.
pub fn remove_damage_point(points: &[DamagePoint], sequence: u32) -> Vec<DamagePoint> {
    points
        .iter()
        .filter(|p| p.sequence != sequence)
        .cloned()
        .enumerate()
        .map(|(idx, mut p)| {
            p.sequence = idx as u32 + 1;
            p
        })
        .collect()
}

/// Fixed wheel positions on the tire diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TirePosition {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

impl TirePosition {
    /// All positions in diagram order.
    pub const ALL: [TirePosition; 4] = [
        TirePosition::FrontLeft,
        TirePosition::FrontRight,
        TirePosition::RearLeft,
        TirePosition::RearRight,
    ];

    /// Stable key used in serialized records.
    pub fn key(&self) -> &'static str {
        match self {
            TirePosition::FrontLeft => "front_left",
            TirePosition::FrontRight => "front_right",
            TirePosition::RearLeft => "rear_left",
            TirePosition::RearRight => "rear_right",
        }
    }

    /// Display name bound to the position.
    pub fn title(&self) -> &'static str {
        match self {
            TirePosition::FrontLeft => "Delantera izquierda",
            TirePosition::FrontRight => "Delantera derecha",
            TirePosition::RearLeft => "Trasera izquierda",
            TirePosition::RearRight => "Trasera derecha",
        }
    }

    /// Normalized (x, y) of the wheel on the tire diagram.
    pub fn coordinates(&self) -> (f64, f64) {
        match self {
            TirePosition::FrontLeft => (0.22, 0.24),
            TirePosition::FrontRight => (0.78, 0.24),
            TirePosition::RearLeft => (0.22, 0.78),
            TirePosition::RearRight => (0.78, 0.78),
        }
    }
}

impl std::fmt::Display for TirePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for TirePosition {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "fl" | "front_left" => Ok(TirePosition::FrontLeft),
            "fr" | "front_right" => Ok(TirePosition::FrontRight),
            "rl" | "rear_left" => Ok(TirePosition::RearLeft),
            "rr" | "rear_right" => Ok(TirePosition::RearRight),
            _ => Err(format!("unknown tire position: {}", s)),
        }
    }
}

/// One tread depth reading, keyed by wheel position.
///
/// Coordinates and title are not stored; they are fixed by the position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TireMeasurement {
    /// Wheel the reading belongs to.
    pub position: TirePosition,
    /// Tread depth in millimetres, within [0, 6.34].
    pub value: f64,
}

impl TireMeasurement {
    /// Build a validated measurement.
    pub fn new(position: TirePosition, value: f64) -> Result<Self> {
        validate_depth(value)?;
        Ok(Self { position, value })
    }

    /// Normalized x of the wheel.
    pub fn x(&self) -> f64 {
        self.position.coordinates().0
    }

    /// Normalized y of the wheel.
    pub fn y(&self) -> f64 {
        self.position.coordinates().1
    }

    /// Display name of the wheel.
    pub fn title(&self) -> &'static str {
        self.position.title()
    }
}

fn validate_depth(value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite);
    }
    if !(MIN_TREAD_DEPTH_MM..=MAX_TREAD_DEPTH_MM).contains(&value) {
        return Err(ValidationError::OutOfRange {
            value,
            min: MIN_TREAD_DEPTH_MM,
            max: MAX_TREAD_DEPTH_MM,
        });
    }
    Ok(())
}

/// Insert or replace the reading for `position`.
///
/// A replaced reading keeps its slot; a new one is appended. Invalid values are
/// rejected without producing a new collection.
pub fn upsert_tire_measurement(
    measurements: &[TireMeasurement],
    position: TirePosition,
    value: f64,
) -> Result<Vec<TireMeasurement>> {
    let measurement = TireMeasurement::new(position, value)?;
    let mut next: Vec<TireMeasurement> = measurements.to_vec();
    match next.iter_mut().find(|m| m.position == position) {
        Some(existing) => *existing = measurement,
        None => next.push(measurement),
    }
    Ok(next)
}

/// Drop the reading for `position`, if any.
pub fn remove_tire_measurement(
    measurements: &[TireMeasurement],
    position: TirePosition,
) -> Vec<TireMeasurement> {
    measurements
        .iter()
        .filter(|m| m.position != position)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequences(points: &[DamagePoint]) -> Vec<u32> {
        points.iter().map(|p| p.sequence).collect()
    }

    #[test]
    fn test_add_assigns_next_sequence() {
        let points = add_damage_point(&[], 0.1, 0.2, "A", None);
        let points = add_damage_point(&points, 0.3, 0.4, "B", Some("golpe".to_string()));
        assert_eq!(sequences(&points), vec![1, 2]);
        assert_eq!(points[1].observation.as_deref(), Some("golpe"));
    }

    #[test]
    fn test_add_keeps_out_of_range_coordinates() {
        let points = add_damage_point(&[], -0.05, 1.2, "", None);
        assert_eq!(points[0].x, -0.05);
        assert_eq!(points[0].y, 1.2);
    }

    #[test]
    fn test_remove_renumbers_densely() {
        let mut points = Vec::new();
        for label in ["A", "B", "C", "D"] {
            points = add_damage_point(&points, 0.5, 0.5, label, None);
        }
        let points = remove_damage_point(&points, 2);
        assert_eq!(sequences(&points), vec![1, 2, 3]);
        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "C", "D"]);
    }

    #[test]
    fn test_remove_unknown_sequence_is_noop() {
        let points = add_damage_point(&[], 0.5, 0.5, "A", None);
        let after = remove_damage_point(&points, 9);
        assert_eq!(after, points);
    }

    #[test]
    fn test_upsert_replaces_existing() {
        let m = upsert_tire_measurement(&[], TirePosition::RearLeft, 2.0).unwrap();
        let m = upsert_tire_measurement(&m, TirePosition::FrontLeft, 5.0).unwrap();
        let m = upsert_tire_measurement(&m, TirePosition::RearLeft, 4.1).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m[0].position, TirePosition::RearLeft);
        assert_eq!(m[0].value, 4.1);
    }

    #[test]
    fn test_upsert_rejects_invalid_values() {
        assert_eq!(
            upsert_tire_measurement(&[], TirePosition::FrontRight, f64::NAN),
            Err(ValidationError::NotFinite)
        );
        assert!(matches!(
            upsert_tire_measurement(&[], TirePosition::FrontRight, 6.35),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(upsert_tire_measurement(&[], TirePosition::FrontRight, -0.01).is_err());
        assert!(upsert_tire_measurement(&[], TirePosition::FrontRight, 0.0).is_ok());
        assert!(upsert_tire_measurement(&[], TirePosition::FrontRight, 6.34).is_ok());
    }

    #[test]
    fn test_remove_tire_measurement() {
        let m = upsert_tire_measurement(&[], TirePosition::RearRight, 3.0).unwrap();
        assert!(remove_tire_measurement(&m, TirePosition::RearRight).is_empty());
        assert_eq!(remove_tire_measurement(&m, TirePosition::FrontLeft).len(), 1);
    }

    #[test]
    fn test_position_parsing_and_serde() {
        assert_eq!("FL".parse::<TirePosition>(), Ok(TirePosition::FrontLeft));
        assert_eq!("rear-right".parse::<TirePosition>(), Ok(TirePosition::RearRight));
        assert!("middle".parse::<TirePosition>().is_err());

        let json = serde_json::to_string(&TirePosition::FrontRight).unwrap();
        assert_eq!(json, "\"front_right\"");
    }

    #[test]
    fn test_measurement_fixed_coordinates() {
        let m = TireMeasurement::new(TirePosition::RearRight, 1.0).unwrap();
        assert_eq!((m.x(), m.y()), (0.78, 0.78));
        assert_eq!(m.title(), "Trasera derecha");
    }
}
