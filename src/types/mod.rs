pub mod attraction;
pub mod itinerary;
pub mod preferences;
pub mod response;
pub mod result;

pub use attraction::{Attraction, CostLevel};
pub use itinerary::{DayPlan, Itinerary, PlannedAttraction};
pub use preferences::{BudgetLevel, ItineraryStyle, Preferences, TripType};
pub use response::{parse_or_fallback, parse_structured, StructuredReply};
pub use result::{CostEstimate, TripPlan, TripSummary};
