pub mod cost;
pub mod extraction;
pub mod itinerary;
pub mod pipeline;
pub mod scoring;
pub mod summary;

pub use cost::{estimate_cost, estimate_cost_per_day, CURRENCY};
pub use extraction::{build_extraction_prompt, extract_preferences};
pub use itinerary::{build_planner_prompt, candidate_window, fallback_itinerary, plan_itinerary};
pub use pipeline::{coerce_days, PlanRequest, TripPlanner};
pub use scoring::{normalize_budget, rank_attractions, score_attraction};
pub use summary::{build_summary_prompt, generate_summary};
