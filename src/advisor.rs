//! Travel advice for an analysed event
//!
//! Turns a risk profile into advisory messages and, for high-risk events,
//! suggests alternative destinations drawn from fixed regional lists.

use rand::RngExt;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::models::{BestWindow, Location, RiskLevel, RiskProfile};
use crate::risk::RiskLevels;

const MAX_SUGGESTIONS: usize = 3;

const SOUTH_INDIAN_STATES: [&str; 5] = ["Kerala", "Tamil Nadu", "Karnataka", "Andhra Pradesh", "Telangana"];

/// Why alternative destinations were suggested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlternativeReason {
    /// Rain risk is high, suggestions are drier places
    Drier,
    /// Heat risk is high, suggestions are cooler places
    Cooler,
}

/// Alternative destinations grouped by region and purpose
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationCatalog {
    pub cooler_south_india: Vec<String>,
    pub cooler_north_india: Vec<String>,
    pub drier_india: Vec<String>,
    pub cooler_international: Vec<String>,
    pub drier_international: Vec<String>,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

impl Default for DestinationCatalog {
    fn default() -> Self {
        Self {
            cooler_south_india: names(&["Munnar, Kerala", "Ooty, Tamil Nadu", "Kodaikanal, Tamil Nadu"]),
            cooler_north_india: names(&[
                "Shimla, Himachal Pradesh",
                "Manali, Himachal Pradesh",
                "Nainital, Uttarakhand",
            ]),
            drier_india: names(&["Jaisalmer, Rajasthan", "Leh, Ladakh", "Pune, Maharashtra"]),
            cooler_international: names(&["Zurich, Switzerland", "Vancouver, Canada", "Oslo, Norway"]),
            drier_international: names(&["Dubai, UAE", "Cairo, Egypt", "Lima, Peru"]),
        }
    }
}

impl DestinationCatalog {
    /// The list to draw from for `location`, rain taking precedence over heat
    #[must_use]
    pub fn source_for(
        &self,
        location: &Location,
        profile: &RiskProfile,
        levels: &RiskLevels,
    ) -> Option<(AlternativeReason, &[String])> {
        let in_india = location.country_name() == "India";

        if profile.rain_day_probability > levels.high_percent {
            let list = if in_india { &self.drier_india } else { &self.drier_international };
            Some((AlternativeReason::Drier, list))
        } else if profile.hot_day_probability > levels.high_percent {
            let list = if !in_india {
                &self.cooler_international
            } else if SOUTH_INDIAN_STATES.iter().any(|state| location.address.contains(state)) {
                &self.cooler_south_india
            } else {
                &self.cooler_north_india
            };
            Some((AlternativeReason::Cooler, list))
        } else {
            None
        }
    }
}

/// Up to three distinct names sampled uniformly from `list`
pub fn sample_destinations<R: RngExt>(list: &[String], rng: &mut R) -> Vec<String> {
    let mut pool = list.to_vec();
    pool.shuffle(rng);
    pool.truncate(MAX_SUGGESTIONS.min(list.len()));
    pool
}

/// Advice attached to an analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub level: RiskLevel,
    /// Human-readable advice, in display order
    pub messages: Vec<String>,
    /// Lower-risk dates at the same place, if they differ from the event's
    pub date_suggestion: Option<BestWindow>,
    pub alternative_reason: Option<AlternativeReason>,
    pub alternative_destinations: Vec<String>,
}

/// Builds [`Advice`] from a risk profile
#[derive(Debug, Clone, Default)]
pub struct Advisor {
    levels: RiskLevels,
    catalog: DestinationCatalog,
}

impl Advisor {
    #[must_use]
    pub fn new(levels: RiskLevels, catalog: DestinationCatalog) -> Self {
        Self { levels, catalog }
    }

    #[must_use]
    pub fn levels(&self) -> &RiskLevels {
        &self.levels
    }

    /// Assemble advice for an event at `location` starting on `event_start`.
    ///
    /// `best_window` is only consulted for high-risk events and only reported
    /// when it starts on a different day than the event.
    pub fn advise<R: RngExt>(
        &self,
        display_name: &str,
        location: &Location,
        profile: &RiskProfile,
        event_start: chrono::NaiveDate,
        best_window: Option<BestWindow>,
        rng: &mut R,
    ) -> Advice {
        let level = self.levels.classify(profile);
        let mut advice = Advice {
            level,
            messages: Vec::new(),
            date_suggestion: None,
            alternative_reason: None,
            alternative_destinations: Vec::new(),
        };

        match level {
            RiskLevel::Low => advice.messages.push(
                "Good Conditions Expected: Your selected location and dates have a low historical risk of adverse weather."
                    .to_string(),
            ),
            RiskLevel::Moderate => advice.messages.push(
                "Moderate Risk: Be aware of potential adverse weather. It is advisable to have a backup plan."
                    .to_string(),
            ),
            RiskLevel::High => {
                if let Some(window) = best_window.filter(|w| w.start != event_start) {
                    advice.messages.push(format!(
                        "Date Suggestion: If you wish to stay in {}, the period from {} to {} has a historically lower weather risk.",
                        display_name,
                        window.start.format("%B %d"),
                        window.end.format("%B %d")
                    ));
                    advice.date_suggestion = Some(window);
                }

                if let Some((reason, list)) = self.catalog.source_for(location, profile, &self.levels) {
                    advice.messages.push(match reason {
                        AlternativeReason::Drier => format!(
                            "High Rain Risk: With a {:.0}% chance of rainy conditions, you might want to consider some drier destinations.",
                            profile.rain_day_probability
                        ),
                        AlternativeReason::Cooler => format!(
                            "High Heat Risk: There's a {:.0}% chance of hot weather. You could explore some cooler, nearby alternatives.",
                            profile.hot_day_probability
                        ),
                    });
                    advice.alternative_reason = Some(reason);
                    advice.alternative_destinations = sample_destinations(list, rng);
                }
            }
        }

        advice
    }
}
