//! Vehicle-history (RUNT) grid.

use super::vehicle::GridRow;
use crate::record::VehicleHistory;
use serde::{Deserialize, Serialize};

/// Full history grid as reported by the lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySection {
    pub rows: Vec<GridRow>,
    /// True when the record flags a theft report.
    pub stolen_flag: bool,
}

impl HistorySection {
    pub fn from_history(history: &VehicleHistory) -> Self {
        let yes_no = |v: bool| if v { "Sí" } else { "No" };
        let mut rows = vec![
            GridRow::optional("Estado de matrícula", history.registration_status.as_ref()),
            GridRow::optional("Tipo de servicio", history.service_type.as_ref()),
            GridRow::optional("Organismo de tránsito", history.transit_authority.as_ref()),
            GridRow::optional("Fecha de matrícula", history.registration_date.as_ref()),
            GridRow::optional("Vencimiento SOAT", history.soat_expiry.as_ref()),
            GridRow::optional(
                "Vencimiento revisión técnico-mecánica",
                history.technical_review_expiry.as_ref(),
            ),
            GridRow::optional("Prendas / limitaciones", history.liens.as_ref()),
            GridRow::optional("Reporte de hurto", history.stolen_report.map(yes_no)),
            GridRow::optional("Número de propietarios", history.owner_count),
        ];
        rows.extend(
            history
                .extra
                .iter()
                .map(|(label, value)| GridRow::optional(label.clone(), Some(value))),
        );
        Self {
            rows,
            stolen_flag: history.stolen_report.unwrap_or(false),
        }
    }
}
