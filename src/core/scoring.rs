//! Deterministic re-ranking of retrieved attractions against the user's preferences.

use std::cmp::Ordering;

use crate::types::{Attraction, BudgetLevel, CostLevel, Preferences, TripType};

const INTEREST_MATCH_BONUS: f64 = 2.0;
const FAMILY_NIGHTLIFE_PENALTY: f64 = 1.0;
const COUPLE_ROMANTIC_BONUS: f64 = 1.0;
const BUDGET_MATCH_BONUS: f64 = 1.5;
const RATING_WEIGHT: f64 = 0.8;
const REVIEW_WEIGHT: f64 = 0.5;
const REVIEW_CAP_LAKHS: f64 = 5.0;

/// Shared budget normalisation rule used by scoring and cost estimation.
pub fn normalize_budget(raw: &str) -> BudgetLevel {
    BudgetLevel::normalize(raw)
}

/// Relevance of one attraction; unbounded, larger is better.
pub fn score_attraction(
    attraction: &Attraction,
    interests: &[String],
    trip_type: TripType,
    budget_level: BudgetLevel,
) -> f64 {
    let tags = attraction.tags.to_lowercase();
    let mut score = 0.0;

    for interest in interests {
        let keyword = interest.trim().to_lowercase();
        if !keyword.is_empty() && tags.contains(&keyword) {
            score += INTEREST_MATCH_BONUS;
        }
    }

    match trip_type {
        TripType::Family if tags.contains("nightlife") => score -= FAMILY_NIGHTLIFE_PENALTY,
        TripType::Couple if tags.contains("romantic") => score += COUPLE_ROMANTIC_BONUS,
        _ => {}
    }

    match (budget_level, attraction.cost_level) {
        (BudgetLevel::Low, CostLevel::Low) | (BudgetLevel::High, CostLevel::High) => {
            score += BUDGET_MATCH_BONUS
        }
        _ => {}
    }

    score += attraction.rating * RATING_WEIGHT;
    score += attraction.review_count_lakhs.min(REVIEW_CAP_LAKHS) * REVIEW_WEIGHT;

    score
}

/// Score every attraction and sort descending; equal scores keep retrieval order.
pub fn rank_attractions(mut attractions: Vec<Attraction>, preferences: &Preferences) -> Vec<Attraction> {
    for attraction in attractions.iter_mut() {
        attraction.score = score_attraction(
            attraction,
            &preferences.interests,
            preferences.trip_type,
            preferences.budget_level,
        );
    }

    attractions.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    attractions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attraction(tags: &str, cost_level: CostLevel, rating: f64, reviews: f64) -> Attraction {
        Attraction {
            name: "Test Place".to_string(),
            city: "Panaji".to_string(),
            state: "Goa".to_string(),
            region: "Western".to_string(),
            tags: tags.to_string(),
            best_season: "Nov-Feb".to_string(),
            cost_level,
            typical_duration_hours: 2,
            rating,
            review_count_lakhs: reviews,
            summary: String::new(),
            score: 0.0,
        }
    }

    fn interests(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_interest_matches_are_additive() {
        let place = attraction("Beach, Nightlife, Food", CostLevel::Medium, 0.0, 0.0);
        let score = score_attraction(
            &place,
            &interests(&["beach", "NIGHTLIFE", " food "]),
            TripType::Friends,
            BudgetLevel::Medium,
        );
        assert_close(score, 6.0);
    }

    #[test]
    fn test_each_extra_matching_interest_adds_two() {
        let place = attraction("fort, history, palace", CostLevel::High, 4.2, 1.3);
        let base = score_attraction(&place, &interests(&["fort"]), TripType::Solo, BudgetLevel::Low);
        let more = score_attraction(
            &place,
            &interests(&["fort", "palace"]),
            TripType::Solo,
            BudgetLevel::Low,
        );
        assert_close(more - base, 2.0);
    }

    #[test]
    fn test_blank_interests_do_not_score() {
        let place = attraction("beach, nightlife", CostLevel::Medium, 0.0, 0.0);
        let score = score_attraction(
            &place,
            &interests(&["", "   ", "beach"]),
            TripType::Friends,
            BudgetLevel::Medium,
        );
        assert_close(score, 2.0);
    }

    #[test]
    fn test_trip_type_adjustments() {
        let club = attraction("nightlife", CostLevel::Medium, 0.0, 0.0);
        assert_close(score_attraction(&club, &[], TripType::Family, BudgetLevel::Medium), -1.0);
        assert_close(score_attraction(&club, &[], TripType::Friends, BudgetLevel::Medium), 0.0);

        let sunset = attraction("Romantic sunset point", CostLevel::Medium, 0.0, 0.0);
        assert_close(score_attraction(&sunset, &[], TripType::Couple, BudgetLevel::Medium), 1.0);
    }

    #[test]
    fn test_budget_bonus_only_for_matching_extremes() {
        let cheap = attraction("", CostLevel::Low, 0.0, 0.0);
        let pricey = attraction("", CostLevel::High, 0.0, 0.0);
        let mid = attraction("", CostLevel::Medium, 0.0, 0.0);

        assert_close(score_attraction(&cheap, &[], TripType::Solo, BudgetLevel::Low), 1.5);
        assert_close(score_attraction(&pricey, &[], TripType::Solo, BudgetLevel::High), 1.5);
        assert_close(score_attraction(&mid, &[], TripType::Solo, BudgetLevel::Medium), 0.0);
        assert_close(score_attraction(&pricey, &[], TripType::Solo, BudgetLevel::Low), 0.0);
    }

    #[test]
    fn test_rating_and_capped_reviews() {
        let popular = attraction("", CostLevel::Medium, 5.0, 12.0);
        // 5.0 * 0.8 + min(12, 5) * 0.5
        assert_close(score_attraction(&popular, &[], TripType::Solo, BudgetLevel::Medium), 6.5);

        let modest = attraction("", CostLevel::Medium, 3.5, 2.0);
        assert_close(score_attraction(&modest, &[], TripType::Solo, BudgetLevel::Medium), 3.8);
    }

    #[test]
    fn test_rank_is_descending_and_stable() {
        let mut first = attraction("temple", CostLevel::Medium, 4.0, 1.0);
        first.name = "First".to_string();
        let mut second = attraction("temple", CostLevel::Medium, 4.0, 1.0);
        second.name = "Second".to_string();
        let mut best = attraction("beach", CostLevel::Medium, 4.0, 1.0);
        best.name = "Best".to_string();

        let mut preferences = Preferences::fallback();
        preferences.interests = interests(&["beach"]);

        let ranked = rank_attractions(vec![first, second, best], &preferences);
        let names: Vec<_> = ranked.iter().map(|a| a.name.as_str()).collect();

        assert_eq!(names, vec!["Best", "First", "Second"]);
        assert!(ranked[0].score > ranked[1].score);
        assert_close(ranked[1].score, ranked[2].score);
    }

    #[test]
    fn test_normalize_budget_matches_cost_rule() {
        assert_eq!(normalize_budget("LOW budget"), BudgetLevel::Low);
        assert_eq!(normalize_budget("High"), BudgetLevel::High);
        assert_eq!(normalize_budget("mid-range"), BudgetLevel::Medium);
    }
}
