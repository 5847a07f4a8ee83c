//! Markdown rendering of a finished trip plan, with hotel, route, and season hints.

use std::fmt::Write as _;

use url::form_urlencoded;

use crate::types::{BudgetLevel, DayPlan, TripPlan};

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";
const MAX_SEASON_NOTES: usize = 5;
const PLACES_PER_SEASON_NOTE: usize = 3;

/// Google Maps search link for free text.
pub fn maps_search_url(query: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("{}{}", MAPS_SEARCH_URL, encoded)
}

/// Route link covering every attraction of a day, or `None` for an empty day.
pub fn day_route_url(day: &DayPlan) -> Option<String> {
    if day.attractions.is_empty() {
        return None;
    }

    let stops: Vec<String> = day
        .attractions
        .iter()
        .map(|attraction| {
            format!("{} {} {}", attraction.name, attraction.city, attraction.state)
                .trim()
                .to_string()
        })
        .collect();
    Some(maps_search_url(&stops.join(" to ")))
}

/// Hotel names for a city and budget tier; a few cities have their own list.
pub fn suggest_hotels(city: &str, budget_level: BudgetLevel) -> Vec<&'static str> {
    let city = city.to_lowercase();

    if city.contains("goa") {
        return vec![
            "Beachside Resort (Calangute)",
            "Goa Comfort Stay",
            "Shoreline Guest House",
        ];
    }
    if city.contains("mumbai") {
        return vec![
            "Colaba Business Hotel",
            "Fort Heritage Inn",
            "Marine Drive Residency",
        ];
    }
    if city.contains("jaipur") {
        return vec![
            "Pink City Palace Hotel",
            "Hawa Mahal View Inn",
            "Jaipur Heritage Haveli",
        ];
    }
    if city.contains("delhi") {
        return vec![
            "Connaught Place Residency",
            "Karol Bagh Comfort Hotel",
            "Delhi Business Inn",
        ];
    }

    match budget_level {
        BudgetLevel::Low => vec!["OYO Rooms", "Zostel Hostel", "Budget Inn Lodge"],
        BudgetLevel::Medium => vec![
            "Treebo Trend Hotel",
            "FabHotel Business Stay",
            "City Comfort Residency",
        ],
        BudgetLevel::High => vec!["Taj Hotel & Convention", "ITC Grand", "The Oberoi"],
    }
}

/// How to get from the origin city to the destination.
pub fn suggest_travel_route(origin: &str, destination: &str) -> String {
    let origin = origin.trim();
    let destination = destination.trim();
    if origin.is_empty() || destination.is_empty() {
        return "No starting city specified. You can directly start from your destination city."
            .to_string();
    }

    let origin_lower = origin.to_lowercase();
    let destination_lower = destination.to_lowercase();

    if origin_lower.contains(&destination_lower) || destination_lower.contains(&origin_lower) {
        return format!(
            "You are already in {}. Use local transport like metro, bus, cab or auto for sightseeing.",
            destination
        );
    }

    let base_text = format!(
        "To travel from **{}** to **{}**, typical options are:\n\
         - Flight between nearest airports\n\
         - Long-distance express train (book via IRCTC)\n\
         - Overnight sleeper bus or state transport\n",
        origin, destination
    );

    let from_kerala = ["kochi", "ernakulam", "kerala"]
        .iter()
        .any(|place| origin_lower.contains(place));

    if from_kerala && destination_lower.contains("mumbai") {
        return format!(
            "Recommended route from **{}** to **{}**:\n\
             - Direct flight from Kochi International Airport to Mumbai (CSMIA)\n\
             - OR Netravati Express / other Kerala-Mumbai trains (via IRCTC)\n\n{}",
            origin, destination, base_text
        );
    }

    if origin_lower.contains("delhi") && destination_lower.contains("mumbai") {
        return format!(
            "Recommended route from **Delhi** to **Mumbai**:\n\
             - Flight from IGI Airport (Delhi) to CSMIA (Mumbai), about 2 hours\n\
             - OR Rajdhani / Duronto Express from New Delhi to Mumbai Central\n\n{}",
            base_text
        );
    }

    if origin_lower.contains("bangalore") || origin_lower.contains("bengaluru") {
        return format!(
            "Recommended route from **{}** to **{}**:\n\
             - Multiple daily flights from Bengaluru (BLR) to major Indian cities\n\
             - Udayan / other express trains depending on destination\n\n{}",
            origin, destination, base_text
        );
    }

    base_text + "Choose option based on time, comfort and budget."
}

/// Best-season notes for the planned attractions, grouped by season in first-seen order.
pub fn season_notes(plan: &TripPlan) -> Vec<String> {
    let mut seasons: Vec<(String, Vec<String>)> = Vec::new();

    for planned in plan.itinerary.attractions() {
        let Some(season) = plan
            .attraction(&planned.name)
            .map(|attraction| attraction.best_season.trim())
            .filter(|season| !season.is_empty())
        else {
            continue;
        };

        match seasons.iter_mut().find(|(known, _)| known == season) {
            Some((_, places)) => places.push(planned.name.clone()),
            None => seasons.push((season.to_string(), vec![planned.name.clone()])),
        }
    }

    let mut notes: Vec<String> = seasons
        .into_iter()
        .take(MAX_SEASON_NOTES)
        .map(|(season, places)| {
            let place_list = places
                .iter()
                .take(PLACES_PER_SEASON_NOTE)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} are best visited in **{}**.", place_list, season)
        })
        .collect();

    if notes.is_empty() {
        notes.push(
            "Most sights in this itinerary are fine year-round, but avoid peak summer \
             afternoons for outdoor sightseeing in India and stay hydrated."
                .to_string(),
        );
    }

    notes
}

/// Render the whole plan as Markdown. `origin` adds a "how to get there" section.
pub fn render_markdown(plan: &TripPlan, origin: Option<&str>) -> String {
    let preferences = &plan.preferences;
    let cost = &plan.cost;
    let mut out = String::new();

    let _ = writeln!(out, "# Trip to {}\n", preferences.destination);

    if let Some(origin) = origin {
        let _ = writeln!(out, "## How to Reach Your Destination\n");
        let _ = writeln!(
            out,
            "{}\n",
            suggest_travel_route(origin, &preferences.destination)
        );
    }

    let _ = writeln!(out, "## Preferences\n");
    let _ = writeln!(out, "- Destination(s): {}", preferences.destination);
    let _ = writeln!(out, "- Days: {}", preferences.days);
    let _ = writeln!(out, "- Budget level: {}", preferences.budget_level);
    let _ = writeln!(out, "- Trip type: {}", preferences.trip_type);
    let _ = writeln!(out, "- Style: {}", preferences.style());
    let _ = writeln!(out, "- Interests: {}\n", preferences.interests.join(", "));

    let _ = writeln!(out, "## Cost Estimate\n");
    let _ = writeln!(
        out,
        "**Per day:** {} {} | **Total:** {} {} (budget level: {})\n",
        cost.estimated_per_day,
        cost.currency,
        cost.estimated_total,
        cost.currency,
        cost.budget_level
    );

    let _ = writeln!(out, "## Day-wise Itinerary\n");
    for day in &plan.itinerary.days {
        let title = if day.title.trim().is_empty() {
            "Planned Activities"
        } else {
            day.title.as_str()
        };
        let _ = writeln!(out, "### Day {}: {}\n", day.day, title);

        if let Some(route) = day_route_url(day) {
            let _ = writeln!(
                out,
                "About {} hours of sightseeing. [View approximate route for this day]({})\n",
                day.total_hours(),
                route
            );
        }

        for planned in &day.attractions {
            let _ = writeln!(out, "#### {} ({}, {})\n", planned.name, planned.city, planned.state);

            let mut line = format!(
                "- Duration: {} hours | Cost level: {}",
                planned.typical_duration_hours, planned.cost_level
            );
            if let Some(source) = plan.attraction(&planned.name) {
                if source.rating > 0.0 {
                    let _ = write!(line, " | Rating: {:.1}", source.rating);
                }
                if source.review_count_lakhs > 0.0 {
                    let _ = write!(line, " | Reviews: {:.1} lakh", source.review_count_lakhs);
                }
            }
            let _ = writeln!(out, "{}", line);

            if !planned.notes.trim().is_empty() {
                let _ = writeln!(out, "- Notes: {}", planned.notes);
            }
            let map_query = match plan.attraction(&planned.name) {
                Some(source) => source.map_query(),
                None => format!("{} {} {}", planned.name, planned.city, planned.state),
            };
            let _ = writeln!(out, "- [View on Google Maps]({})\n", maps_search_url(&map_query));
        }

        let hotel_city = day
            .attractions
            .first()
            .map(|first| first.city.as_str())
            .filter(|city| !city.trim().is_empty())
            .unwrap_or(preferences.destination.as_str());
        if !day.attractions.is_empty() && !hotel_city.trim().is_empty() {
            let _ = writeln!(out, "**Recommended hotels:**\n");
            for hotel in suggest_hotels(hotel_city, preferences.budget_level) {
                let _ = writeln!(out, "- {} ({})", hotel, hotel_city);
            }
            let _ = writeln!(out);
        }
    }

    let _ = writeln!(out, "## Trip Summary\n");
    let _ = writeln!(out, "{}\n", plan.summary.summary);

    let _ = writeln!(out, "### Practical Tips\n");
    for tip in &plan.summary.tips {
        let _ = writeln!(out, "- {}", tip);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "### Season & Weather Notes\n");
    for note in season_notes(plan) {
        let _ = writeln!(out, "- {}", note);
    }

    out
}
