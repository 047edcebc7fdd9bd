//! Leader-line placement for measurement labels.
//!
//! The label anchor sits at a fixed pixel offset from the measurement dot,
//! independent of the diagram size. The connector is drawn from the dot with
//! its origin pinned there and rotated by `angle_degrees`. The live overlay
//! and the report diagram both call into this module so the two stay in sync.

use crate::model::TireMeasurement;
use serde::{Deserialize, Serialize};

/// Rendered size of a diagram in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagramFrame {
    pub width: f64,
    pub height: f64,
}

impl DiagramFrame {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Convert normalized coordinates to pixel space.
    pub fn denormalize(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.width, y * self.height)
    }

    /// Convert pixel coordinates (e.g. a touch location) to normalized space.
    ///
    /// A zero-sized frame maps everything to the origin.
    pub fn normalize(&self, px: f64, py: f64) -> (f64, f64) {
        let x = if self.width > 0.0 { px / self.width } else { 0.0 };
        let y = if self.height > 0.0 { py / self.height } else { 0.0 };
        (x, y)
    }
}

impl Default for DiagramFrame {
    fn default() -> Self {
        Self::new(320.0, 480.0)
    }
}

/// Pixel offset from a measurement dot to its label anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelOffset {
    pub dx: f64,
    pub dy: f64,
}

impl Default for LabelOffset {
    fn default() -> Self {
        Self { dx: 35.0, dy: -25.0 }
    }
}

/// Connector from a measurement dot to its label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeaderLine {
    /// Dot position (pixels).
    pub origin_x: f64,
    pub origin_y: f64,
    /// Label anchor (pixels).
    pub label_x: f64,
    pub label_y: f64,
    /// Connector length (pixels).
    pub length: f64,
    /// Rotation about the origin, in degrees.
    pub angle_degrees: f64,
}

impl LeaderLine {
    /// CSS transform for a connector box whose `transform-origin` is its left edge.
    pub fn css_transform(&self) -> String {
        format!("rotate({:.2}deg)", self.angle_degrees)
    }
}

/// Leader line for a dot at pixel `(x, y)`.
pub fn leader_line(x: f64, y: f64, offset: LabelOffset) -> LeaderLine {
    let label_x = x + offset.dx;
    let label_y = y + offset.dy;
    let dx = label_x - x;
    let dy = label_y - y;
    LeaderLine {
        origin_x: x,
        origin_y: y,
        label_x,
        label_y,
        length: (dx * dx + dy * dy).sqrt(),
        angle_degrees: dy.atan2(dx).to_degrees(),
    }
}

/// Leader line for a tire measurement drawn on `frame`.
pub fn measurement_leader(
    measurement: &TireMeasurement,
    frame: DiagramFrame,
    offset: LabelOffset,
) -> LeaderLine {
    let (x, y) = frame.denormalize(measurement.x(), measurement.y());
    leader_line(x, y, offset)
}
