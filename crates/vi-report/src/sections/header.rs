//! Header and ingress sections.

use crate::config::CompanySettings;
use crate::embed::EmbeddedImage;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Company block at the top of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderSection {
    pub company_name: String,
    /// Contact lines in print order (NIT, address, phone, email, website).
    pub contact_lines: Vec<String>,
    pub logo: EmbeddedImage,
    /// Inspection identifier.
    pub inspection_id: String,
    pub inspector: Option<String>,
}

impl HeaderSection {
    pub fn new(
        settings: &CompanySettings,
        logo: EmbeddedImage,
        inspection_id: &str,
        inspector: Option<&str>,
    ) -> Self {
        let mut contact_lines = Vec::new();
        if let Some(tax_id) = non_blank(settings.tax_id.as_deref()) {
            contact_lines.push(format!("NIT {}", tax_id));
        }
        for line in [
            settings.address.as_deref(),
            settings.phone.as_deref(),
            settings.email.as_deref(),
            settings.website.as_deref(),
        ] {
            if let Some(line) = non_blank(line) {
                contact_lines.push(line.to_string());
            }
        }
        Self {
            company_name: settings.name.clone(),
            contact_lines,
            logo,
            inspection_id: inspection_id.to_string(),
            inspector: non_blank(inspector).map(str::to_string),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Date and time the vehicle entered the inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngressSection {
    pub at: NaiveDateTime,
    /// `dd/mm/yyyy`.
    pub date: String,
    /// 12-hour clock, e.g. `09:30 AM`.
    pub time: String,
}

impl IngressSection {
    pub fn new(at: NaiveDateTime) -> Self {
        Self {
            at,
            date: at.format("%d/%m/%Y").to_string(),
            time: at.format("%I:%M %p").to_string(),
        }
    }
}
