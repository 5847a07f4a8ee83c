use crate::schemas::completion_schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Implements lenient string parsing, display, and a plain string schema for a label enum.
/// Any input string is accepted and mapped through the type's `normalize` rule.
macro_rules! label_enum {
    ($ty:ident) => {
        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                Ok($ty::normalize(&raw))
            }
        }

        impl schemars::JsonSchema for $ty {
            fn schema_name() -> String {
                stringify!($ty).to_string()
            }

            fn is_referenceable() -> bool {
                false
            }

            fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
                <String as schemars::JsonSchema>::json_schema(gen)
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use label_enum;

/// Spending tier of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl BudgetLevel {
    /// Any text mentioning "low" is low, any mentioning "high" is high, everything else medium.
    pub fn normalize(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        if lowered.contains("low") {
            BudgetLevel::Low
        } else if lowered.contains("high") {
            BudgetLevel::High
        } else {
            BudgetLevel::Medium
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetLevel::Low => "low",
            BudgetLevel::Medium => "medium",
            BudgetLevel::High => "high",
        }
    }
}

label_enum!(BudgetLevel);

/// Who is travelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TripType {
    Family,
    #[default]
    Friends,
    Couple,
    Solo,
}

impl TripType {
    pub fn normalize(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        if lowered.contains("family") {
            TripType::Family
        } else if lowered.contains("couple") {
            TripType::Couple
        } else if lowered.contains("solo") {
            TripType::Solo
        } else {
            TripType::Friends
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TripType::Family => "family",
            TripType::Friends => "friends",
            TripType::Couple => "couple",
            TripType::Solo => "solo",
        }
    }
}

label_enum!(TripType);

/// Pace of the itinerary; controls how many attractions are planned per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItineraryStyle {
    #[default]
    Standard,
    Relaxed,
    Packed,
}

impl ItineraryStyle {
    pub fn normalize(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        if lowered.contains("relaxed") {
            ItineraryStyle::Relaxed
        } else if lowered.contains("packed") {
            ItineraryStyle::Packed
        } else {
            ItineraryStyle::Standard
        }
    }

    /// Target number of attractions per day.
    pub fn attractions_per_day(&self) -> usize {
        match self {
            ItineraryStyle::Relaxed => 2,
            ItineraryStyle::Standard => 3,
            ItineraryStyle::Packed => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItineraryStyle::Standard => "standard",
            ItineraryStyle::Relaxed => "relaxed",
            ItineraryStyle::Packed => "packed",
        }
    }
}

label_enum!(ItineraryStyle);

/// Structured trip preferences extracted from free-form text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Preferences {
    /// Destination city, state, or region; several may be comma-separated
    pub destination: String,
    /// Number of days at the destination
    pub days: u32,
    /// One of: low, medium, high
    pub budget_level: BudgetLevel,
    /// One of: family, friends, couple, solo
    pub trip_type: TripType,
    /// 3-6 interest keywords such as nature, temples, beaches, food, nightlife
    pub interests: Vec<String>,
    /// One of: standard, relaxed, packed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub itinerary_style: Option<ItineraryStyle>,
}

completion_schema!(Preferences, "Preferences");

impl Preferences {
    /// Record substituted when the extraction reply cannot be parsed.
    pub fn fallback() -> Self {
        Self {
            destination: "Goa".to_string(),
            days: 3,
            budget_level: BudgetLevel::Medium,
            trip_type: TripType::Friends,
            interests: vec!["beach".to_string(), "nightlife".to_string()],
            itinerary_style: None,
        }
    }

    /// Day count used for planning and costing; never below one.
    pub fn trip_days(&self) -> u32 {
        self.days.max(1)
    }

    pub fn style(&self) -> ItineraryStyle {
        self.itinerary_style.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_budget_normalization() {
        assert_eq!(BudgetLevel::normalize("Low"), BudgetLevel::Low);
        assert_eq!(BudgetLevel::normalize("  very HIGH end "), BudgetLevel::High);
        assert_eq!(BudgetLevel::normalize("medium"), BudgetLevel::Medium);
        assert_eq!(BudgetLevel::normalize(""), BudgetLevel::Medium);
        assert_eq!(BudgetLevel::normalize("luxury"), BudgetLevel::Medium);
        // "low" wins when both appear
        assert_eq!(BudgetLevel::normalize("low to high"), BudgetLevel::Low);
    }

    #[test]
    fn test_budget_normalization_is_idempotent() {
        for raw in ["Low", "HIGH", "medium", "", "whatever", "below average"] {
            let once = BudgetLevel::normalize(raw);
            assert_eq!(BudgetLevel::normalize(once.as_str()), once);
        }
    }

    #[test]
    fn test_style_targets() {
        assert_eq!(ItineraryStyle::normalize("Relaxed").attractions_per_day(), 2);
        assert_eq!(ItineraryStyle::normalize("PACKED").attractions_per_day(), 4);
        assert_eq!(ItineraryStyle::normalize("Standard").attractions_per_day(), 3);
        assert_eq!(ItineraryStyle::normalize("chaotic").attractions_per_day(), 3);
    }

    #[test]
    fn test_lenient_deserialization() {
        let prefs: Preferences = serde_json::from_value(json!({
            "destination": "Jaipur",
            "days": 4,
            "budget_level": "Medium budget",
            "trip_type": "Family with kids",
            "interests": ["forts", "history", "food"]
        }))
        .unwrap();

        assert_eq!(prefs.budget_level, BudgetLevel::Medium);
        assert_eq!(prefs.trip_type, TripType::Family);
        assert_eq!(prefs.style(), ItineraryStyle::Standard);
    }

    #[test]
    fn test_serializes_lowercase_labels() {
        let mut prefs = Preferences::fallback();
        prefs.itinerary_style = Some(ItineraryStyle::Packed);
        let value = serde_json::to_value(&prefs).unwrap();

        assert_eq!(value["budget_level"], "medium");
        assert_eq!(value["trip_type"], "friends");
        assert_eq!(value["itinerary_style"], "packed");
    }

    #[test]
    fn test_trip_days_is_at_least_one() {
        let mut prefs = Preferences::fallback();
        prefs.days = 0;
        assert_eq!(prefs.trip_days(), 1);
    }
}
