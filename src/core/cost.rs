use crate::types::{BudgetLevel, CostEstimate, Preferences};

/// Currency of every estimate.
pub const CURRENCY: &str = "INR";

/// Fixed daily spend per budget tier.
pub fn estimate_cost_per_day(budget_level: BudgetLevel) -> u32 {
    match budget_level {
        BudgetLevel::Low => 1500,
        BudgetLevel::Medium => 2500,
        BudgetLevel::High => 4000,
    }
}

impl CostEstimate {
    /// Estimate for `days` days at the given tier; the total is always `per_day * days`.
    pub fn for_trip(budget_level: BudgetLevel, days: u32) -> Self {
        let per_day = estimate_cost_per_day(budget_level);
        Self {
            budget_level,
            estimated_per_day: per_day,
            estimated_total: u64::from(per_day) * u64::from(days),
            currency: CURRENCY.to_string(),
        }
    }
}

/// Cost estimate for a preference record.
pub fn estimate_cost(preferences: &Preferences) -> CostEstimate {
    CostEstimate::for_trip(preferences.budget_level, preferences.trip_days())
}
