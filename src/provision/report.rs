//! Per-operation report lines and per-phase tallies

use std::fmt;

use super::classifier::Classification;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub label: String,
    pub classification: Classification,
}

impl ReportLine {
    pub fn new(label: impl Into<String>, classification: Classification) -> Self {
        Self {
            label: label.into(),
            classification,
        }
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.classification {
            Classification::Success => write!(f, "{}: OK", self.label),
            Classification::Warning(reason) => write!(f, "{}: WARN - {}", self.label, reason),
            Classification::Fatal(reason) => write!(f, "{}: FAIL - {}", self.label, reason),
        }
    }
}

/// Success/warning/fatal counts for one phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTally {
    pub phase: String,
    pub success: usize,
    pub warning: usize,
    pub fatal: usize,
}

impl PhaseTally {
    pub fn new(phase: impl Into<String>) -> Self {
        Self {
            phase: phase.into(),
            success: 0,
            warning: 0,
            fatal: 0,
        }
    }

    pub fn record(&mut self, classification: &Classification) {
        match classification {
            Classification::Success => self.success += 1,
            Classification::Warning(_) => self.warning += 1,
            Classification::Fatal(_) => self.fatal += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.warning + self.fatal
    }
}

impl fmt::Display for PhaseTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} OK, {} WARN, {} FAIL ({} operations)",
            self.phase,
            self.success,
            self.warning,
            self.fatal,
            self.total()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_format() {
        assert_eq!(
            ReportLine::new("Keyword: shoes", Classification::Success).to_string(),
            "Keyword: shoes: OK"
        );
        assert_eq!(
            ReportLine::new("Keyword: casino", Classification::Warning("Policy".into())).to_string(),
            "Keyword: casino: WARN - Policy"
        );
        assert_eq!(
            ReportLine::new("Ad group: G", Classification::Fatal("Duplicate".into())).to_string(),
            "Ad group: G: FAIL - Duplicate"
        );
    }

    #[test]
    fn test_tally_line() {
        let mut tally = PhaseTally::new("Phase 2");
        tally.record(&Classification::Success);
        tally.record(&Classification::Success);
        tally.record(&Classification::Warning("w".into()));

        assert_eq!(tally.total(), 3);
        assert_eq!(tally.to_string(), "Phase 2: 2 OK, 1 WARN, 0 FAIL (3 operations)");
    }
}
