use super::{Attraction, BudgetLevel, Itinerary, Preferences};
use crate::schemas::completion_schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Per-day and total spend estimate for a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub budget_level: BudgetLevel,
    pub estimated_per_day: u32,
    pub estimated_total: u64,
    pub currency: String,
}

/// Narrative summary and practical tips for a planned trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TripSummary {
    /// Concise trip summary paragraph of 3-6 sentences
    pub summary: String,
    /// 4-6 practical travel tips for this destination and trip type
    pub tips: Vec<String>,
}

completion_schema!(TripSummary, "TripSummary");

impl TripSummary {
    /// Generic text substituted when the summary reply cannot be parsed.
    pub fn fallback() -> Self {
        Self {
            summary: "This is a multi-day trip plan generated based on your preferences."
                .to_string(),
            tips: vec![
                "Carry basic medicines and a water bottle.".to_string(),
                "Check local weather before packing.".to_string(),
            ],
        }
    }
}

/// Every stage's output from one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripPlan {
    pub preferences: Preferences,
    /// Retrieved attractions, ranked by score
    pub attractions: Vec<Attraction>,
    pub itinerary: Itinerary,
    pub cost: CostEstimate,
    pub summary: TripSummary,
}

impl TripPlan {
    /// Look up a retrieved attraction by name.
    pub fn attraction(&self, name: &str) -> Option<&Attraction> {
        self.attractions
            .iter()
            .find(|attraction| attraction.name.eq_ignore_ascii_case(name))
    }
}
