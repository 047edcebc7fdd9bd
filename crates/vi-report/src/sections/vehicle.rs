//! Vehicle identity, photo and price sections.

use crate::embed::EmbeddedImage;
use crate::record::VehicleInfo;
use serde::{Deserialize, Serialize};

/// Value shown for fields the record does not carry.
pub const NOT_AVAILABLE: &str = "No registrado";

/// One label/value cell of a data grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRow {
    pub label: String,
    pub value: String,
}

impl GridRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Row for an optional value, falling back to [`NOT_AVAILABLE`].
    pub fn optional(label: impl Into<String>, value: Option<impl ToString>) -> Self {
        let value = value
            .map(|v| v.to_string())
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        Self::new(label, value)
    }
}

/// Vehicle identity grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleIdentitySection {
    pub rows: Vec<GridRow>,
}

impl VehicleIdentitySection {
    pub fn from_vehicle(vehicle: &VehicleInfo) -> Self {
        let rows = vec![
            GridRow::optional("Placa", Some(vehicle.plate.to_uppercase())),
            GridRow::optional("Marca", Some(&vehicle.brand)),
            GridRow::optional("Línea", Some(&vehicle.line)),
            GridRow::optional("Modelo", vehicle.model_year),
            GridRow::optional("Color", vehicle.color.as_ref()),
            GridRow::optional(
                "Kilometraje",
                vehicle.mileage_km.map(|km| format!("{} km", group_thousands(km))),
            ),
            GridRow::optional("Combustible", vehicle.fuel.as_ref()),
            GridRow::optional("VIN", vehicle.vin.as_ref()),
            GridRow::optional("No. motor", vehicle.engine_number.as_ref()),
            GridRow::new("Carrocería", vehicle.body_style.display_name()),
        ];
        Self { rows }
    }
}

/// Main vehicle photograph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehiclePhotoSection {
    pub image: EmbeddedImage,
}

/// Suggested sale price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedPriceSection {
    pub amount: Option<u64>,
    pub formatted: String,
}

impl SuggestedPriceSection {
    pub fn new(amount: Option<u64>) -> Self {
        Self {
            amount,
            formatted: amount
                .map(format_cop)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

/// Colombian peso formatting: `$ 45.000.000`.
pub fn format_cop(amount: u64) -> String {
    format!("$ {}", group_thousands(amount))
}

/// Group digits by thousands with `.` separators.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::BodyStyle;

    #[test]
    fn test_format_cop() {
        assert_eq!(format_cop(0), "$ 0");
        assert_eq!(format_cop(999), "$ 999");
        assert_eq!(format_cop(1000), "$ 1.000");
        assert_eq!(format_cop(45_000_000), "$ 45.000.000");
        assert_eq!(format_cop(1_234_567_890), "$ 1.234.567.890");
    }

    #[test]
    fn test_price_fallback() {
        assert_eq!(SuggestedPriceSection::new(None).formatted, NOT_AVAILABLE);
    }

    #[test]
    fn test_identity_grid() {
        let vehicle = VehicleInfo {
            plate: "abc123".to_string(),
            brand: "Renault".to_string(),
            mileage_km: Some(85_400),
            body_style: BodyStyle::Hatchback,
            ..VehicleInfo::default()
        };
        let section = VehicleIdentitySection::from_vehicle(&vehicle);
        let find = |label: &str| {
            section
                .rows
                .iter()
                .find(|r| r.label == label)
                .map(|r| r.value.clone())
                .unwrap()
        };
        assert_eq!(find("Placa"), "ABC123");
        assert_eq!(find("Kilometraje"), "85.400 km");
        assert_eq!(find("Línea"), NOT_AVAILABLE);
        assert_eq!(find("Carrocería"), "HATCHBACK");
    }
}
