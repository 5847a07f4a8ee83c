use std::sync::Arc;

use tracing::{info, warn};

use super::{
    cost::estimate_cost, extraction::extract_preferences, itinerary::plan_itinerary,
    scoring::rank_attractions, summary::generate_summary,
};
use crate::{
    config::{EmbedderKind, PlannerConfig, DEFAULT_TOP_K},
    error::{PlannerError, Result},
    retrieval::{AttractionIndex, AttractionSearch},
    services::{
        Embedder, HashedEmbedder, LanguageModel, OpenAIClient, OpenAiChatModel, OpenAiEmbedder,
    },
    types::{Attraction, ItineraryStyle, Preferences, TripPlan},
};

/// Free-text trip request plus optional explicit overrides.
#[derive(Debug, Clone, Default)]
pub struct PlanRequest {
    pub text: String,
    /// Replaces the extracted destination when non-blank
    pub destination: Option<String>,
    /// Raw day count; replaces the extracted value only if it is a positive integer
    pub days: Option<String>,
    pub style: Option<ItineraryStyle>,
}

impl PlanRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_days(mut self, days: impl ToString) -> Self {
        self.days = Some(days.to_string());
        self
    }

    pub fn with_style(mut self, style: ItineraryStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Apply the overrides to freshly extracted preferences.
    pub fn apply_overrides(&self, preferences: &mut Preferences) {
        if let Some(destination) = self
            .destination
            .as_deref()
            .map(str::trim)
            .filter(|destination| !destination.is_empty())
        {
            preferences.destination = destination.to_string();
        }

        if let Some(raw_days) = self.days.as_deref() {
            match coerce_days(raw_days) {
                Ok(days) => preferences.days = days,
                Err(err) => warn!(
                    target: "tripagent::pipeline",
                    error = %err,
                    "ignoring day-count override"
                ),
            }
        }

        preferences.itinerary_style = Some(self.style.unwrap_or_default());
    }
}

/// Coerce a day-count override into a positive integer.
pub fn coerce_days(raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(days) if days > 0 => Ok(days),
        _ => Err(PlannerError::InvalidOverride(format!(
            "day count must be a positive integer, got `{}`",
            raw
        ))),
    }
}

/// Sequential pipeline: extract, retrieve and rank, plan, cost, summarise.
pub struct TripPlanner {
    model: Arc<dyn LanguageModel>,
    index: Arc<dyn AttractionSearch>,
    top_k: usize,
}

impl std::fmt::Debug for TripPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripPlanner")
            .field("top_k", &self.top_k)
            .finish_non_exhaustive()
    }
}

impl TripPlanner {
    pub fn new(model: Arc<dyn LanguageModel>, index: Arc<dyn AttractionSearch>) -> Self {
        Self {
            model,
            index,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Build the model handle and the attraction index described by `config`.
    pub async fn from_config(config: &PlannerConfig) -> Result<Self> {
        let client = OpenAIClient::new(config.api_key.clone(), config.timeout)?
            .with_base_url(config.base_url.clone());

        let model = OpenAiChatModel::new(client.clone(), config.chat_model.clone())
            .with_temperature(config.temperature);

        let embedder: Arc<dyn Embedder> = match config.embedder {
            EmbedderKind::OpenAi => Arc::new(OpenAiEmbedder::new(
                client,
                config.embedding_model.clone(),
            )),
            EmbedderKind::Hashed => Arc::new(HashedEmbedder::default()),
        };

        let index = AttractionIndex::from_csv(&config.dataset_path, embedder).await?;
        if index.is_empty() {
            return Err(PlannerError::Dataset(format!(
                "{} contains no attractions",
                config.dataset_path.display()
            )));
        }

        Ok(Self::new(Arc::new(model), Arc::new(index)).with_top_k(config.top_k))
    }

    /// Retrieve candidates for the preferences and rank them by score.
    pub async fn retrieve(&self, preferences: &Preferences) -> Result<Vec<Attraction>> {
        let raw = self
            .index
            .search(&preferences.destination, &preferences.interests, self.top_k)
            .await?;
        let ranked = rank_attractions(raw, preferences);

        info!(
            target: "tripagent::retrieval",
            destination = %preferences.destination,
            candidates = ranked.len(),
            "retrieved attractions"
        );
        Ok(ranked)
    }

    /// Run every stage in order and return each stage's output.
    pub async fn plan(&self, request: &PlanRequest) -> Result<TripPlan> {
        let mut preferences = extract_preferences(self.model.as_ref(), &request.text)
            .await?
            .into_inner();
        request.apply_overrides(&mut preferences);

        let attractions = self.retrieve(&preferences).await?;

        let itinerary = plan_itinerary(
            self.model.as_ref(),
            &preferences,
            &attractions,
            preferences.style(),
        )
        .await?
        .into_inner();

        let cost = estimate_cost(&preferences);

        let summary = generate_summary(self.model.as_ref(), &preferences, &itinerary, &cost)
            .await?
            .into_inner();

        info!(
            target: "tripagent::pipeline",
            destination = %preferences.destination,
            days = itinerary.day_count(),
            total = cost.estimated_total,
            "trip plan complete"
        );

        Ok(TripPlan {
            preferences,
            attractions,
            itinerary,
            cost,
            summary,
        })
    }
}
