//! `EventRisk` - Historical weather risk analysis for future events
//!
//! This library aggregates multi-year daily weather history for a place and
//! date window, simulates the event days from that climatology, scores the
//! hot/rain risk and suggests lower-risk dates or destinations.

pub mod advisor;
pub mod analysis;
pub mod cache;
pub mod climatology;
pub mod config;
pub mod error;
pub mod history;
pub mod location_resolver;
pub mod models;
pub mod optimizer;
pub mod risk;
pub mod simulation;
pub mod state;
pub mod weather;

#[cfg(test)]
mod test_support;

// Re-export core types for public API
pub use advisor::{Advice, AlternativeReason, DestinationCatalog};
pub use analysis::{AnalysisReport, EventAnalyzer, EventRequest};
pub use cache::Cache;
pub use climatology::{Climatology, ClimatologyEntry, MonthDay};
pub use config::EventRiskConfig;
pub use error::EventRiskError;
pub use history::HistoricalAggregator;
pub use location_resolver::{Geocoder, LocationResolver, OpenMeteoGeocoder};
pub use models::{
    BestWindow, DailyObservation, DailyRecord, HistoricalDataset, Location, RiskLevel, RiskProfile,
    SimulatedForecastRow,
};
pub use optimizer::{DateOptimizer, event_duration};
pub use risk::{RiskLevels, RiskThresholds, score_risk};
pub use simulation::ForecastSimulator;
pub use state::AppState;
pub use weather::{OpenMeteoClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, EventRiskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
