//! trip-agent-rs: a retrieval-augmented, LLM-assisted day-wise travel itinerary planner
//!
//! A free-text request flows through five sequential stages: preference
//! extraction, attraction retrieval and ranking, itinerary planning, cost
//! estimation, and summary generation. Every model-backed stage falls back to
//! a deterministic default when the model reply cannot be used, so a plan is
//! always produced unless the model or dataset is unreachable.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use trip_agent_rs::{PlanRequest, PlannerConfig, TripPlanner};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PlannerConfig::from_env()?;
//!     let planner = TripPlanner::from_config(&config).await?;
//!
//!     let request = PlanRequest::new("3 days in Goa with friends, beaches and nightlife");
//!     let plan = planner.plan(&request).await?;
//!     println!("{}", trip_agent_rs::report::render_markdown(&plan, None));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod report;
pub mod retrieval;
pub mod schemas;
pub mod services;
pub mod types;

pub use config::{EmbedderKind, PlannerConfig};
pub use crate::core::{
    estimate_cost, extract_preferences, generate_summary, plan_itinerary, rank_attractions,
    score_attraction, PlanRequest, TripPlanner,
};
pub use error::{PlannerError, Result};
pub use retrieval::{convert_raw_dataset, load_attractions, AttractionIndex, AttractionSearch};
pub use schemas::{CompletionSchema, SchemaHandle};
pub use services::{Embedder, HashedEmbedder, LanguageModel, OpenAIClient};
pub use types::{
    Attraction, BudgetLevel, CostEstimate, CostLevel, DayPlan, Itinerary, ItineraryStyle,
    PlannedAttraction, Preferences, StructuredReply, TripPlan, TripSummary, TripType,
};

#[cfg(feature = "cli")]
pub mod cli;
