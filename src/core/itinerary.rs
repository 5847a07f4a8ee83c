//! Day-wise itinerary planning with deterministic chunking as the fallback.

use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::{
    error::{PlannerError, Result},
    services::LanguageModel,
    types::{
        response::parse_checked_or_fallback, Attraction, DayPlan, Itinerary, ItineraryStyle,
        PlannedAttraction, Preferences, StructuredReply,
    },
};

pub const ITINERARY_PLANNER_PROMPT: &str = r#"You are an expert travel planner.
You receive:
- a destination
- number of days
- list of candidate attractions with metadata (name, city, tags, duration hours, cost_level)
- user preferences (trip type, interests, budget level)

Goal:
Create a realistic, day-wise itinerary.
Rules:
- 2 to 4 main attractions per day depending on duration hours.
- Group nearby attractions (same city/region) in the same day if possible.
- Respect budget_level and avoid too many 'high' cost_level attractions for low budget.
- Mix experiences (e.g., not all temples in one day if possible).
- Make sure each day is not overloaded in total hours (>8 hours).
- Produce exactly one entry per requested day.

Return the itinerary in structured JSON:
{
  "days": [
    {
      "day": 1,
      "title": "Short text title",
      "attractions": [
        {
          "name": "...",
          "city": "...",
          "state": "...",
          "typical_duration_hours": 3,
          "cost_level": "medium",
          "notes": "short explanation for this attraction in context of trip"
        }
      ]
    }
  ]
}
No extra text, only JSON."#;

/// Compact view of a candidate sent to the model.
#[derive(Debug, Serialize)]
struct CandidateView<'a> {
    name: &'a str,
    city: &'a str,
    state: &'a str,
    tags: &'a str,
    typical_duration_hours: u32,
    cost_level: &'a str,
}

/// Leading slice of the ranked list the planner may use: `max(days * per_day, days * 2)` entries.
pub fn candidate_window(attractions: &[Attraction], days: u32, style: ItineraryStyle) -> &[Attraction] {
    let days = days.max(1) as usize;
    let limit = (days * style.attractions_per_day()).max(days * 2);
    &attractions[..attractions.len().min(limit)]
}

pub fn build_planner_prompt(
    preferences: &Preferences,
    candidates: &[Attraction],
    style: ItineraryStyle,
) -> Result<String> {
    let compact: Vec<CandidateView<'_>> = candidates
        .iter()
        .map(|attraction| CandidateView {
            name: &attraction.name,
            city: &attraction.city,
            state: &attraction.state,
            tags: &attraction.tags,
            typical_duration_hours: attraction.typical_duration_hours,
            cost_level: attraction.cost_level.as_str(),
        })
        .collect();

    let planner_input = json!({
        "destination": preferences.destination,
        "days": preferences.trip_days(),
        "trip_type": preferences.trip_type,
        "budget_level": preferences.budget_level,
        "interests": preferences.interests,
        "itinerary_style": style,
        "candidate_attractions": compact,
    });

    Ok(format!(
        "{}\n\nData:\n{}",
        ITINERARY_PLANNER_PROMPT,
        serde_json::to_string_pretty(&planner_input)?
    ))
}

/// Partition the candidates into `days` consecutive chunks of `max(1, len / days)`, in rank order.
///
/// Days past the end of the list are left empty; a remainder that does not fill a chunk is
/// dropped.
pub fn fallback_itinerary(destination: &str, candidates: &[Attraction], days: u32) -> Itinerary {
    let days = days.max(1);
    let per_day = (candidates.len() / days as usize).max(1);

    let plans = (1..=days)
        .map(|day| {
            let start = ((day - 1) as usize * per_day).min(candidates.len());
            let end = (start + per_day).min(candidates.len());
            DayPlan {
                day,
                title: format!("Day {} in {}", day, destination),
                attractions: candidates[start..end]
                    .iter()
                    .map(PlannedAttraction::from)
                    .collect(),
            }
        })
        .collect();

    Itinerary { days: plans }
}

/// The model's plan must cover exactly the requested number of days.
fn check_day_count(itinerary: &Itinerary, days: u32) -> Result<()> {
    if itinerary.day_count() != days as usize {
        return Err(PlannerError::Validation(format!(
            "itinerary covers {} days, expected {}",
            itinerary.day_count(),
            days
        )));
    }
    Ok(())
}

/// One model call over the candidate window; an unusable reply yields [`fallback_itinerary`].
pub async fn plan_itinerary(
    model: &dyn LanguageModel,
    preferences: &Preferences,
    attractions: &[Attraction],
    style: ItineraryStyle,
) -> Result<StructuredReply<Itinerary>> {
    let days = preferences.trip_days();
    let candidates = candidate_window(attractions, days, style);
    let prompt = build_planner_prompt(preferences, candidates, style)?;

    let reply = model.complete(&prompt).await?;
    let itinerary = parse_checked_or_fallback(
        "plan",
        &reply,
        |itinerary| check_day_count(itinerary, days),
        || fallback_itinerary(&preferences.destination, candidates, days),
    );

    info!(
        target: "tripagent::plan",
        days = itinerary.value().day_count(),
        candidates = candidates.len(),
        style = %style,
        fallback = itinerary.is_fallback(),
        "planned itinerary"
    );

    Ok(itinerary)
}
