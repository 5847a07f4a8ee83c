use serde_json::json;
use tracing::info;

use crate::{
    error::Result,
    services::LanguageModel,
    types::{
        response::parse_or_fallback, CostEstimate, Itinerary, Preferences, StructuredReply,
        TripSummary,
    },
};

pub const RESPONSE_SUMMARY_PROMPT: &str = r#"You are a helpful travel assistant.
Given:
- user preferences
- a day-wise itinerary
- a cost estimation

Generate:
- A concise trip summary paragraph (3-6 sentences)
- 4-6 practical travel tips for this destination and trip type.

Return response as JSON:
{
  "summary": "...",
  "tips": ["...", "..."]
}
No extra explanation."#;

pub fn build_summary_prompt(
    preferences: &Preferences,
    itinerary: &Itinerary,
    cost: &CostEstimate,
) -> Result<String> {
    let data = json!({
        "preferences": preferences,
        "itinerary": itinerary,
        "cost": cost,
    });

    Ok(format!(
        "{}\n\nData:\n{}",
        RESPONSE_SUMMARY_PROMPT,
        serde_json::to_string_pretty(&data)?
    ))
}

/// One model call; an unusable reply yields [`TripSummary::fallback`].
pub async fn generate_summary(
    model: &dyn LanguageModel,
    preferences: &Preferences,
    itinerary: &Itinerary,
    cost: &CostEstimate,
) -> Result<StructuredReply<TripSummary>> {
    let prompt = build_summary_prompt(preferences, itinerary, cost)?;
    let reply = model.complete(&prompt).await?;
    let summary = parse_or_fallback("summary", &reply, TripSummary::fallback);

    info!(
        target: "tripagent::summary",
        tips = summary.value().tips.len(),
        fallback = summary.is_fallback(),
        "generated summary"
    );

    Ok(summary)
}
