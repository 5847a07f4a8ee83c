//! Loading the attraction dataset and converting the raw source table into it.

use std::{fs::File, io, path::Path};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{PlannerError, Result},
    types::{Attraction, CostLevel},
};

const DEFAULT_DURATION_HOURS: u32 = 3;

/// One row of the cleaned dataset, in column order.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct DatasetRow {
    name: String,
    city: String,
    state: String,
    region: String,
    tags: String,
    description: String,
    typical_duration_hours: String,
    cost_level: String,
    best_season: String,
    rating: String,
    review_count_lakhs: String,
}

impl DatasetRow {
    fn into_attraction(self) -> Attraction {
        Attraction {
            typical_duration_hours: parse_hours(&self.typical_duration_hours)
                .unwrap_or(DEFAULT_DURATION_HOURS),
            cost_level: CostLevel::normalize(&self.cost_level),
            rating: parse_number(&self.rating).unwrap_or(0.0),
            review_count_lakhs: parse_number(&self.review_count_lakhs).unwrap_or(0.0),
            name: self.name,
            city: self.city,
            state: self.state,
            region: self.region,
            tags: self.tags,
            best_season: self.best_season,
            summary: self.description,
            score: 0.0,
        }
    }
}

/// Load the cleaned dataset from a CSV file.
pub fn load_attractions(path: impl AsRef<Path>) -> Result<Vec<Attraction>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| {
        PlannerError::Dataset(format!("cannot open {}: {}", path.display(), err))
    })?;
    let attractions = load_attractions_from_reader(file)?;
    info!(
        target: "tripagent::retrieval",
        path = %path.display(),
        records = attractions.len(),
        "loaded attraction dataset"
    );
    Ok(attractions)
}

/// Load the cleaned dataset from any CSV source with a header row.
///
/// Unparseable durations default to 3 hours, unparseable ratings and review counts to 0,
/// and unknown cost levels to medium.
pub fn load_attractions_from_reader<R: io::Read>(reader: R) -> Result<Vec<Attraction>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let mut attractions = Vec::new();
    for row in csv_reader.deserialize::<DatasetRow>() {
        attractions.push(row?.into_attraction());
    }
    Ok(attractions)
}

/// Row of the raw "Top Indian Places to Visit" table.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPlaceRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "Zone")]
    zone: String,
    #[serde(rename = "Type")]
    place_type: String,
    #[serde(rename = "Significance")]
    significance: String,
    #[serde(rename = "time needed to visit in hrs")]
    hours_needed: String,
    #[serde(rename = "Entrance Fee in INR")]
    entrance_fee: String,
    #[serde(rename = "Best Time to visit")]
    best_time: String,
    #[serde(rename = "Google review rating")]
    rating: String,
    #[serde(rename = "Number of google review in lakhs")]
    review_lakhs: String,
}

impl RawPlaceRow {
    fn into_dataset_row(self) -> DatasetRow {
        let cost_level = parse_number(&self.entrance_fee)
            .map(CostLevel::from_fee)
            .unwrap_or(CostLevel::Medium);

        DatasetRow {
            name: self.name,
            city: self.city,
            state: self.state,
            region: or_default(self.zone, "India"),
            tags: or_default(self.place_type, "tourist attraction"),
            description: or_default(self.significance, "Popular tourist attraction"),
            typical_duration_hours: parse_hours(&self.hours_needed).unwrap_or(2).to_string(),
            cost_level: cost_level.as_str().to_string(),
            best_season: or_default(self.best_time, "Oct-Mar"),
            rating: parse_number(&self.rating).unwrap_or(0.0).to_string(),
            review_count_lakhs: parse_number(&self.review_lakhs).unwrap_or(0.0).to_string(),
        }
    }
}

/// Convert the raw source table into the cleaned dataset schema. Returns the row count.
pub fn convert_raw_dataset(source: impl AsRef<Path>, target: impl AsRef<Path>) -> Result<usize> {
    let source = File::open(source.as_ref())?;
    let target = File::create(target.as_ref())?;
    convert_raw_dataset_from_reader(source, target)
}

pub fn convert_raw_dataset_from_reader<R, W>(reader: R, writer: W) -> Result<usize>
where
    R: io::Read,
    W: io::Write,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut count = 0;
    for row in csv_reader.deserialize::<RawPlaceRow>() {
        csv_writer.serialize(row?.into_dataset_row())?;
        count += 1;
    }
    csv_writer.flush()?;

    info!(target: "tripagent::retrieval", rows = count, "converted raw dataset");
    Ok(count)
}

fn or_default(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

fn parse_hours(raw: &str) -> Option<u32> {
    parse_number(raw)
        .filter(|hours| *hours >= 0.0)
        .map(|hours| hours.trunc() as u32)
}
