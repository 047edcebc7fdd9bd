//! Tread depth severity bands.

use serde::{Deserialize, Serialize};

/// Upper bound (exclusive) of the critical band.
const CRITICAL_BELOW: f64 = 1.40;
/// Upper bound (inclusive) of the attention band.
const ATTENTION_MAX: f64 = 2.8;
/// Upper bound (inclusive) of the regular band.
const REGULAR_MAX: f64 = 4.5;
/// Upper bound (inclusive) of the good band.
const GOOD_MAX: f64 = 6.34;

/// Discrete classification of a tread depth reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBand {
    Critical,
    Attention,
    Regular,
    Good,
    Unknown,
}

impl SeverityBand {
    /// Label shown next to the reading and in the report.
    pub fn label(&self) -> &'static str {
        match self {
            SeverityBand::Critical => "CRÍTICO",
            SeverityBand::Attention => "ATENCIÓN",
            SeverityBand::Regular => "REGULAR",
            SeverityBand::Good => "BUENO",
            SeverityBand::Unknown => "N/A",
        }
    }

    /// Color family of the band.
    pub fn color_name(&self) -> &'static str {
        match self {
            SeverityBand::Critical => "red",
            SeverityBand::Attention => "orange",
            SeverityBand::Regular => "yellow",
            SeverityBand::Good => "green",
            SeverityBand::Unknown => "blue",
        }
    }

    /// Hex color used by renderers.
    pub fn color(&self) -> &'static str {
        match self {
            SeverityBand::Critical => "#E53935",
            SeverityBand::Attention => "#FB8C00",
            SeverityBand::Regular => "#FDD835",
            SeverityBand::Good => "#43A047",
            SeverityBand::Unknown => "#1E88E5",
        }
    }

    /// Ordering weight; higher is worse. Unknown sorts below every real band.
    pub fn rank(&self) -> u8 {
        match self {
            SeverityBand::Unknown => 0,
            SeverityBand::Good => 1,
            SeverityBand::Regular => 2,
            SeverityBand::Attention => 3,
            SeverityBand::Critical => 4,
        }
    }
}

impl std::fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classify a reading. Total: missing, NaN and above-range values are `Unknown`.
pub fn classify(value: Option<f64>) -> SeverityBand {
    match value {
        None => SeverityBand::Unknown,
        Some(v) if v.is_nan() => SeverityBand::Unknown,
        Some(v) if v < CRITICAL_BELOW => SeverityBand::Critical,
        Some(v) if v <= ATTENTION_MAX => SeverityBand::Attention,
        Some(v) if v <= REGULAR_MAX => SeverityBand::Regular,
        Some(v) if v <= GOOD_MAX => SeverityBand::Good,
        Some(_) => SeverityBand::Unknown,
    }
}
