use super::{Attraction, CostLevel};
use crate::schemas::completion_schema;
use schemars::{
    schema::{InstanceType, Schema, SchemaObject},
    JsonSchema,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Day-wise plan produced by the itinerary planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Itinerary {
    /// One entry per trip day, in order
    pub days: Vec<DayPlan>,
}

completion_schema!(Itinerary, "Itinerary");

impl Itinerary {
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// All planned attractions across every day, in plan order.
    pub fn attractions(&self) -> impl Iterator<Item = &PlannedAttraction> {
        self.days.iter().flat_map(|day| day.attractions.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DayPlan {
    /// 1-based day number
    pub day: u32,
    /// Short title for the day
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub attractions: Vec<PlannedAttraction>,
}

impl DayPlan {
    pub fn total_hours(&self) -> u32 {
        self.attractions
            .iter()
            .map(|attraction| attraction.typical_duration_hours)
            .sum()
    }
}

/// The subset of an attraction carried into a day plan, plus planner notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlannedAttraction {
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default, deserialize_with = "deserialize_hours")]
    #[schemars(schema_with = "hours_schema")]
    pub typical_duration_hours: u32,
    #[serde(default)]
    pub cost_level: CostLevel,
    /// Short explanation for this attraction in context of the trip
    #[serde(default)]
    pub notes: String,
}

impl From<&Attraction> for PlannedAttraction {
    fn from(attraction: &Attraction) -> Self {
        Self {
            name: attraction.name.clone(),
            city: attraction.city.clone(),
            state: attraction.state.clone(),
            typical_duration_hours: attraction.typical_duration_hours,
            cost_level: attraction.cost_level,
            notes: String::new(),
        }
    }
}

fn hours_schema(_: &mut schemars::gen::SchemaGenerator) -> Schema {
    SchemaObject {
        instance_type: Some(vec![InstanceType::Number, InstanceType::String].into()),
        ..Default::default()
    }
    .into()
}

/// Models write durations as 2, 2.5, or "3"; round whatever number arrives.
fn deserialize_hours<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let hours = match &value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    match hours {
        Some(hours) if hours.is_finite() && hours >= 0.0 => Ok(hours.round() as u32),
        _ => Err(serde::de::Error::custom(format!(
            "invalid duration in hours: {}",
            value
        ))),
    }
}
