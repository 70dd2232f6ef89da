//! Result slots shared between consecutive requests of one session

use crate::analysis::AnalysisReport;

/// The primary analysis, an optional comparison, and whichever was shown last
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub original: Option<AnalysisReport>,
    pub comparison: Option<AnalysisReport>,
    pub current: Option<AnalysisReport>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A new primary analysis replaces the original and drops any comparison
    pub fn record_primary(&mut self, report: AnalysisReport) {
        self.original = Some(report.clone());
        self.current = Some(report);
        self.comparison = None;
    }

    /// Keeps the original and shows `report` next to it
    pub fn record_comparison(&mut self, report: AnalysisReport) {
        self.comparison = Some(report.clone());
        self.current = Some(report);
    }

    #[must_use]
    pub fn is_comparing(&self) -> bool {
        self.original.is_some() && self.comparison.is_some()
    }
}
