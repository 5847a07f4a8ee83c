use std::{collections::VecDeque, path::PathBuf, sync::Arc, sync::Mutex};

use async_trait::async_trait;
use serde_json::json;
use trip_agent_rs::{
    load_attractions,
    retrieval::build_query,
    AttractionIndex, AttractionSearch, HashedEmbedder, ItineraryStyle, LanguageModel, PlanRequest,
    PlannerError, Result, TripPlanner,
};

/// Replays canned replies in order and records every prompt it receives.
#[derive(Default)]
struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn failing(error: PlannerError) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Err(error)])),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("no more scripted replies".to_string()))
    }
}

fn dataset_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/tourism_data.csv")
}

async fn sample_index() -> AttractionIndex {
    let records = load_attractions(dataset_path()).unwrap();
    AttractionIndex::build(records, Arc::new(HashedEmbedder::default()))
        .await
        .unwrap()
}

async fn planner(model: Arc<ScriptedModel>) -> TripPlanner {
    TripPlanner::new(model, Arc::new(sample_index().await)).with_top_k(50)
}

fn goa_preferences_reply() -> String {
    json!({
        "destination": "Goa",
        "days": 3,
        "budget_level": "medium",
        "trip_type": "friends",
        "interests": ["beach", "nightlife"]
    })
    .to_string()
}

fn goa_itinerary_reply() -> String {
    json!({
        "days": [
            {"day": 1, "title": "North Goa beaches", "attractions": [
                {"name": "Baga Beach", "city": "Goa", "state": "Goa", "typical_duration_hours": 3, "cost_level": "low", "notes": "Go at sunset"},
                {"name": "Tito's Lane", "city": "Goa", "state": "Goa", "typical_duration_hours": 3, "cost_level": "medium"}
            ]},
            {"day": 2, "title": "Forts and markets", "attractions": [
                {"name": "Fort Aguada", "city": "Candolim", "state": "Goa", "typical_duration_hours": "2"},
                {"name": "Anjuna Flea Market", "city": "Goa", "state": "Goa", "typical_duration_hours": 2}
            ]},
            {"day": 3, "title": "Old Goa", "attractions": [
                {"name": "Basilica of Bom Jesus", "city": "Old Goa", "state": "Goa", "typical_duration_hours": 1.5}
            ]}
        ]
    })
    .to_string()
}

fn summary_reply() -> String {
    "```json\n{\"summary\": \"Three sunny days of beaches and nights out in North Goa.\", \
     \"tips\": [\"Rent a scooter\", \"Carry sunscreen\", \"Book shacks early\", \"Keep cash\"]}\n```"
        .to_string()
}

#[tokio::test]
async fn test_goa_trip_end_to_end() {
    let model = Arc::new(ScriptedModel::new([
        goa_preferences_reply(),
        goa_itinerary_reply(),
        summary_reply(),
    ]));
    let planner = planner(model.clone()).await;

    let plan = planner
        .plan(&PlanRequest::new(
            "3 days in Goa with friends, medium budget, love beaches and nightlife",
        ))
        .await
        .unwrap();

    assert_eq!(plan.preferences.destination, "Goa");
    assert_eq!(plan.preferences.itinerary_style, Some(ItineraryStyle::Standard));
    assert!(!plan.attractions.is_empty());
    assert!(plan.attractions.iter().all(|a| a.state == "Goa"));
    assert!(plan
        .attractions
        .windows(2)
        .all(|pair| pair[0].score >= pair[1].score));

    assert_eq!(plan.itinerary.days.len(), 3);
    assert_eq!(plan.itinerary.days[0].title, "North Goa beaches");
    assert_eq!(plan.itinerary.days[1].attractions[0].typical_duration_hours, 2);
    assert_eq!(plan.cost.estimated_per_day, 2500);
    assert_eq!(plan.cost.estimated_total, 7500);
    assert_eq!(plan.cost.currency, "INR");
    assert_eq!(
        plan.summary.summary,
        "Three sunny days of beaches and nights out in North Goa."
    );
    assert_eq!(plan.summary.tips.len(), 4);

    let prompts = model.prompts();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[0].ends_with("love beaches and nightlife"));
    assert!(prompts[1].contains("Baga Beach"));
    assert!(prompts[2].contains("North Goa beaches"));
}

#[tokio::test]
async fn test_unusable_replies_fall_back_at_every_stage() {
    let model = Arc::new(ScriptedModel::new([
        "Sure! Goa sounds lovely.",
        "{\"days\": \"soon\"}",
        "[]",
    ]));
    let planner = planner(model).await;

    let plan = planner
        .plan(&PlanRequest::new("something fun"))
        .await
        .unwrap();

    assert_eq!(plan.preferences.destination, "Goa");
    assert_eq!(plan.preferences.days, 3);
    assert_eq!(plan.preferences.interests, vec!["beach", "nightlife"]);

    assert_eq!(plan.itinerary.days.len(), 3);
    for (index, day) in plan.itinerary.days.iter().enumerate() {
        assert_eq!(day.day as usize, index + 1);
        assert_eq!(day.title, format!("Day {} in Goa", index + 1));
        assert!(!day.attractions.is_empty());
    }

    assert!(plan.summary.summary.contains("multi-day trip plan"));
    assert_eq!(plan.summary.tips.len(), 2);
}

#[tokio::test]
async fn test_itinerary_with_wrong_day_count_falls_back() {
    let two_days = json!({
        "days": [
            {"day": 1, "title": "Beaches", "attractions": []},
            {"day": 2, "title": "Forts", "attractions": []}
        ]
    })
    .to_string();
    let model = Arc::new(ScriptedModel::new([
        goa_preferences_reply(),
        two_days,
        summary_reply(),
    ]));
    let planner = planner(model).await;

    let plan = planner.plan(&PlanRequest::new("Goa trip")).await.unwrap();

    assert_eq!(plan.itinerary.days.len(), 3);
    assert_eq!(plan.itinerary.days[0].title, "Day 1 in Goa");
}

#[tokio::test]
async fn test_overrides_change_destination_days_and_style() {
    let model = Arc::new(ScriptedModel::new([
        goa_preferences_reply(),
        "not a plan".to_string(),
        summary_reply(),
    ]));
    let planner = planner(model.clone()).await;

    let request = PlanRequest::new("3 days in Goa with friends")
        .with_destination("Jaipur")
        .with_days("2")
        .with_style(ItineraryStyle::Relaxed);
    let plan = planner.plan(&request).await.unwrap();

    assert_eq!(plan.preferences.destination, "Jaipur");
    assert_eq!(plan.preferences.days, 2);
    assert!(plan.attractions.iter().all(|a| a.city == "Jaipur"));
    assert_eq!(plan.itinerary.days.len(), 2);
    assert!(plan
        .itinerary
        .days
        .iter()
        .all(|day| day.attractions.iter().all(|a| a.city == "Jaipur")));
    assert_eq!(plan.cost.estimated_total, 5000);
    assert!(model.prompts()[1].contains("relaxed"));
}

#[tokio::test]
async fn test_model_failure_aborts_the_run() {
    let model = Arc::new(ScriptedModel::failing(PlannerError::RateLimit {
        retry_after: 5,
    }));
    let planner = planner(model).await;

    let err = planner
        .plan(&PlanRequest::new("3 days in Goa"))
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "RATE_LIMIT_ERROR");
}

#[tokio::test]
async fn test_unmatched_destination_returns_unfiltered_results() {
    let index = sample_index().await;
    let interests = vec!["history".to_string()];

    let searched = index.search("Atlantis", &interests, 5).await.unwrap();
    let unfiltered = index
        .semantic_search(&build_query("Atlantis", &interests), 5)
        .await
        .unwrap();

    assert_eq!(searched.len(), 5);
    assert_eq!(searched, unfiltered);
}

#[tokio::test]
async fn test_multi_destination_keeps_every_matching_city() {
    let index = sample_index().await;
    let interests = vec!["history".to_string(), "food".to_string()];

    let results = index
        .search("Mumbai, Delhi", &interests, index.len())
        .await
        .unwrap();

    assert!(!results.is_empty());
    assert!(results.iter().all(|a| a.city == "Mumbai" || a.city == "Delhi"));
    assert!(results.iter().any(|a| a.city == "Mumbai"));
    assert!(results.iter().any(|a| a.city == "Delhi"));
}

#[test]
fn test_sample_dataset_loads() {
    let records = load_attractions(dataset_path()).unwrap();

    assert!(records.len() >= 20);
    assert!(records.iter().all(|a| !a.name.is_empty()));
    assert!(records.iter().all(|a| a.typical_duration_hours > 0));
}
