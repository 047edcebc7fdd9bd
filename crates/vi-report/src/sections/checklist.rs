//! Diagnosis list and checklist pages.

use crate::record::{ChecklistCategory, ChecklistItem, ItemStatus};
use serde::{Deserialize, Serialize};

/// Suggested repairs and remarks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisSection {
    pub suggestions: Vec<String>,
}

impl DiagnosisSection {
    /// Trimmed non-empty suggestions, or `None` when nothing remains.
    pub fn from_suggestions(suggestions: &[String]) -> Option<Self> {
        let suggestions: Vec<String> = suggestions
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if suggestions.is_empty() {
            None
        } else {
            Some(Self { suggestions })
        }
    }
}

/// One printed checklist row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistRow {
    pub name: String,
    pub status: ItemStatus,
    pub observation: Option<String>,
}

/// Per-status totals for a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub good: usize,
    pub regular: usize,
    pub bad: usize,
    pub not_applicable: usize,
}

impl StatusCounts {
    fn add(&mut self, status: ItemStatus) {
        match status {
            ItemStatus::Good => self.good += 1,
            ItemStatus::Regular => self.regular += 1,
            ItemStatus::Bad => self.bad += 1,
            ItemStatus::NotApplicable => self.not_applicable += 1,
        }
    }
}

/// Checklist items of one category group; printed on its own page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistPage {
    pub category: ChecklistCategory,
    pub rows: Vec<ChecklistRow>,
    pub counts: StatusCounts,
}

impl ChecklistPage {
    /// Pages for every category with at least one item, in fixed category order.
    pub fn group(items: &[ChecklistItem]) -> Vec<ChecklistPage> {
        ChecklistCategory::ALL
            .iter()
            .filter_map(|&category| {
                let mut counts = StatusCounts::default();
                let rows: Vec<ChecklistRow> = items
                    .iter()
                    .filter(|item| item.category == category)
                    .map(|item| {
                        counts.add(item.status);
                        ChecklistRow {
                            name: item.name.clone(),
                            status: item.status,
                            observation: item.observation.clone(),
                        }
                    })
                    .collect();
                (!rows.is_empty()).then_some(ChecklistPage {
                    category,
                    rows,
                    counts,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(category: ChecklistCategory, name: &str, status: ItemStatus) -> ChecklistItem {
        ChecklistItem {
            category,
            name: name.to_string(),
            status,
            observation: None,
        }
    }

    #[test]
    fn test_grouping_keeps_category_order_and_skips_empty() {
        let items = vec![
            item(ChecklistCategory::Interior, "Tapicería", ItemStatus::Regular),
            item(ChecklistCategory::LightsExterior, "Farola izq.", ItemStatus::Good),
            item(ChecklistCategory::Interior, "Aire acondicionado", ItemStatus::Bad),
            item(ChecklistCategory::LightsExterior, "Stop", ItemStatus::NotApplicable),
        ];
        let pages = ChecklistPage::group(&items);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].category, ChecklistCategory::LightsExterior);
        assert_eq!(pages[1].category, ChecklistCategory::Interior);
        assert_eq!(pages[1].rows[0].name, "Tapicería");
        assert_eq!(pages[1].counts.bad, 1);
        assert_eq!(pages[0].counts.not_applicable, 1);
    }

    #[test]
    fn test_diagnosis_drops_blank_suggestions() {
        assert!(DiagnosisSection::from_suggestions(&[" ".to_string()]).is_none());
        let section =
            DiagnosisSection::from_suggestions(&["Cambiar pastillas ".to_string()]).unwrap();
        assert_eq!(section.suggestions, vec!["Cambiar pastillas".to_string()]);
    }
}
