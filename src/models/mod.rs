//! Data models for the EventRisk application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates and display address
//! - Observation: Daily weather records and the historical dataset
//! - Forecast: Simulated forecast rows
//! - Risk: Risk profiles, risk levels and best-window results

pub mod forecast;
pub mod location;
pub mod observation;
pub mod risk;

// Re-export all public types for convenient access
pub use forecast::SimulatedForecastRow;
pub use location::Location;
pub use observation::{DailyObservation, DailyRecord, HistoricalDataset};
pub use risk::{BestWindow, RiskLevel, RiskProfile};
