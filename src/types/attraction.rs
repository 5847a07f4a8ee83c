use super::preferences::label_enum;
use serde::{Deserialize, Serialize};

/// Entry-fee tier of an attraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CostLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl CostLevel {
    /// Exact label match after trimming and lowercasing; anything unrecognised is medium.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "low" => CostLevel::Low,
            "high" => CostLevel::High,
            _ => CostLevel::Medium,
        }
    }

    /// Tier implied by an entrance fee: free is low, up to 200 is medium, above is high.
    pub fn from_fee(fee: f64) -> Self {
        if fee == 0.0 {
            CostLevel::Low
        } else if fee <= 200.0 {
            CostLevel::Medium
        } else {
            CostLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CostLevel::Low => "low",
            CostLevel::Medium => "medium",
            CostLevel::High => "high",
        }
    }
}

label_enum!(CostLevel);

/// One point of interest from the tourism dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attraction {
    pub name: String,
    pub city: String,
    pub state: String,
    pub region: String,
    /// Free-text keyword list, e.g. "Beach, Nightlife"
    pub tags: String,
    pub best_season: String,
    pub cost_level: CostLevel,
    pub typical_duration_hours: u32,
    /// Google review rating in [0, 5]
    pub rating: f64,
    pub review_count_lakhs: f64,
    /// Description text the index embeds
    pub summary: String,
    /// Relevance assigned at ranking time
    #[serde(default)]
    pub score: f64,
}

impl Attraction {
    /// "name city state", the text used for map searches.
    pub fn map_query(&self) -> String {
        [self.name.as_str(), self.city.as_str(), self.state.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}
