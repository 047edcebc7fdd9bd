//! Final verdict section.

use crate::record::{Verdict, VerdictOutcome};
use serde::{Deserialize, Serialize};

/// Approval or rejection; `outcome` is `None` while undecided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictSection {
    pub outcome: Option<VerdictOutcome>,
    pub notes: Option<String>,
    pub inspector: Option<String>,
}

impl VerdictSection {
    pub fn new(verdict: Option<&Verdict>, inspector: Option<&str>) -> Self {
        Self {
            outcome: verdict.map(|v| v.outcome),
            notes: verdict.and_then(|v| v.notes.clone()),
            inspector: inspector.map(str::to_string),
        }
    }

    /// Printed outcome label.
    pub fn label(&self) -> &'static str {
        self.outcome.map_or("PENDIENTE", |o| o.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_when_no_verdict() {
        let section = VerdictSection::new(None, Some("J. Pérez"));
        assert_eq!(section.label(), "PENDIENTE");
        assert_eq!(section.inspector.as_deref(), Some("J. Pérez"));
    }

    #[test]
    fn test_rejected_label() {
        let verdict = Verdict {
            outcome: VerdictOutcome::Rejected,
            notes: Some("Chasis reparado".to_string()),
        };
        let section = VerdictSection::new(Some(&verdict), None);
        assert_eq!(section.label(), "RECHAZADO");
        assert_eq!(section.notes.as_deref(), Some("Chasis reparado"));
    }
}
