use tracing::info;

use crate::{
    error::Result,
    services::LanguageModel,
    types::{response::parse_or_fallback, Preferences, StructuredReply},
};

pub const PREFERENCE_EXTRACTION_PROMPT: &str = "\
You are a travel preference extraction assistant.
Given a user's free-form text about a trip, extract structured fields as JSON:
- destination (string, city/state/region)
- days (integer number of days)
- budget_level (one of: low, medium, high)
- trip_type (one of: family, friends, couple, solo; choose closest)
- interests (list of 3-6 keywords like: nature, adventure, temples, beaches, food, nightlife, culture, history)

If something is not explicitly given, make a reasonable assumption. Never omit a field.
Return ONLY valid JSON, no explanation.";

pub fn build_extraction_prompt(user_input: &str) -> String {
    format!(
        "{}\n\nUser Input:\n{}",
        PREFERENCE_EXTRACTION_PROMPT, user_input
    )
}

/// One model call; an unusable reply yields [`Preferences::fallback`].
pub async fn extract_preferences(
    model: &dyn LanguageModel,
    user_input: &str,
) -> Result<StructuredReply<Preferences>> {
    let reply = model.complete(&build_extraction_prompt(user_input)).await?;
    let preferences = parse_or_fallback("extract", &reply, Preferences::fallback);

    info!(
        target: "tripagent::extract",
        destination = %preferences.value().destination,
        days = preferences.value().days,
        fallback = preferences.is_fallback(),
        "extracted preferences"
    );

    Ok(preferences)
}
