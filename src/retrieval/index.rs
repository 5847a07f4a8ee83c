//! Semantic index over the attraction dataset with strict location filtering.

use std::{cmp::Ordering, path::Path, sync::Arc};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::dataset::load_attractions;
use crate::{
    error::{PlannerError, Result},
    services::Embedder,
    types::Attraction,
};

/// Capability the planner needs from retrieval: top-k attractions for a destination and interests.
#[async_trait]
pub trait AttractionSearch: Send + Sync {
    async fn search(
        &self,
        destination: &str,
        interests: &[String],
        k: usize,
    ) -> Result<Vec<Attraction>>;
}

/// Brute-force cosine similarity index over dense vectors.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, vector: Vec<f32>) -> usize {
        self.vectors.push(vector);
        self.vectors.len() - 1
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Positions of the `k` most similar vectors, best first; ties keep insertion order.
    pub fn nearest(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, vector)| (position, cosine_similarity(query, vector)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(k);
        scored
    }
}

/// Cosine similarity; zero when either vector has zero norm or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// The attraction dataset plus an embedding of each record's description.
pub struct AttractionIndex {
    records: Vec<Attraction>,
    vectors: VectorIndex,
    embedder: Arc<dyn Embedder>,
}

impl std::fmt::Debug for AttractionIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttractionIndex")
            .field("records", &self.records.len())
            .finish_non_exhaustive()
    }
}

impl AttractionIndex {
    /// Embed every record's description and build the index. Called once per process.
    pub async fn build(records: Vec<Attraction>, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let texts: Vec<String> = records.iter().map(embedding_text).collect();
        let embeddings = if texts.is_empty() {
            Vec::new()
        } else {
            embedder.embed(&texts).await?
        };

        if embeddings.len() != records.len() {
            return Err(PlannerError::Embedding(format!(
                "embedded {} of {} attractions",
                embeddings.len(),
                records.len()
            )));
        }

        let mut vectors = VectorIndex::new();
        for embedding in embeddings {
            vectors.insert(embedding);
        }

        info!(
            target: "tripagent::retrieval",
            records = records.len(),
            "built attraction index"
        );

        Ok(Self {
            records,
            vectors,
            embedder,
        })
    }

    /// Load a dataset CSV and build the index over it.
    pub async fn from_csv(path: impl AsRef<Path>, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let records = load_attractions(path)?;
        Self::build(records, embedder).await
    }

    pub fn records(&self) -> &[Attraction] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The `k` records nearest to `query`, by embedding similarity only.
    pub async fn semantic_search(&self, query: &str, k: usize) -> Result<Vec<Attraction>> {
        let query_vector = self
            .embedder
            .embed(&[query.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| PlannerError::Embedding("query produced no embedding".to_string()))?;

        Ok(self
            .vectors
            .nearest(&query_vector, k)
            .into_iter()
            .map(|(position, _)| self.records[position].clone())
            .collect())
    }
}

#[async_trait]
impl AttractionSearch for AttractionIndex {
    async fn search(
        &self,
        destination: &str,
        interests: &[String],
        k: usize,
    ) -> Result<Vec<Attraction>> {
        let destination = destination.trim();
        let query = build_query(destination, interests);
        let raw_results = self.semantic_search(&query, k).await?;
        let tokens = location_tokens(destination);

        debug!(
            target: "tripagent::retrieval",
            query = %query,
            tokens = ?tokens,
            retrieved = raw_results.len()
        );

        Ok(apply_location_filter(raw_results, &tokens))
    }
}

/// The natural-language query sent to the embedder.
pub fn build_query(destination: &str, interests: &[String]) -> String {
    format!(
        "Tourist attractions in {} for interests: {}",
        destination.trim(),
        interests.join(", ")
    )
}

/// Comma-separated, trimmed, lowercased destination fragments; empty fragments dropped.
pub fn location_tokens(destination: &str) -> Vec<String> {
    destination
        .split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Whether any token is a substring of the record's city, state, or region (case-insensitive).
pub fn matches_location(attraction: &Attraction, tokens: &[String]) -> bool {
    let city = attraction.city.to_lowercase();
    let state = attraction.state.to_lowercase();
    let region = attraction.region.to_lowercase();

    tokens.iter().any(|token| {
        city.contains(token.as_str())
            || state.contains(token.as_str())
            || region.contains(token.as_str())
    })
}

/// Keep only records matching at least one location token, preserving order.
pub fn filter_by_location(attractions: &[Attraction], tokens: &[String]) -> Vec<Attraction> {
    attractions
        .iter()
        .filter(|attraction| matches_location(attraction, tokens))
        .cloned()
        .collect()
}

/// Strict location filter with a fallback to the unfiltered results when nothing matches.
///
/// No tokens means no filtering.
pub fn apply_location_filter(raw_results: Vec<Attraction>, tokens: &[String]) -> Vec<Attraction> {
    if tokens.is_empty() {
        return raw_results;
    }

    let filtered = filter_by_location(&raw_results, tokens);
    if filtered.is_empty() {
        warn!(
            target: "tripagent::retrieval",
            tokens = ?tokens,
            "no retrieved attraction matches the destination, using unfiltered results"
        );
        return raw_results;
    }

    filtered
}

fn embedding_text(attraction: &Attraction) -> String {
    if attraction.summary.trim().is_empty() {
        attraction.name.clone()
    } else {
        attraction.summary.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{services::HashedEmbedder, types::CostLevel};

    fn attraction(name: &str, city: &str, state: &str, region: &str) -> Attraction {
        Attraction {
            name: name.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            region: region.to_string(),
            tags: String::new(),
            best_season: String::new(),
            cost_level: CostLevel::Medium,
            typical_duration_hours: 2,
            rating: 4.0,
            review_count_lakhs: 0.5,
            summary: format!("{} in {}", name, city),
            score: 0.0,
        }
    }

    #[test]
    fn test_location_tokens() {
        assert_eq!(location_tokens(" Mumbai , Goa ,, "), vec!["mumbai", "goa"]);
        assert!(location_tokens("  ").is_empty());
        assert!(location_tokens(",").is_empty());
    }

    #[test]
    fn test_matches_city_state_or_region() {
        let gateway = attraction("Gateway of India", "Mumbai", "Maharashtra", "Western");
        assert!(matches_location(&gateway, &["mumbai".to_string()]));
        assert!(matches_location(&gateway, &["maharashtra".to_string()]));
        assert!(matches_location(&gateway, &["west".to_string()]));
        assert!(!matches_location(&gateway, &["goa".to_string()]));
    }

    #[test]
    fn test_filter_keeps_order_and_matches_any_token() {
        let results = vec![
            attraction("Baga Beach", "Goa", "Goa", "Western"),
            attraction("Amber Fort", "Jaipur", "Rajasthan", "Northern"),
            attraction("Gateway of India", "Mumbai", "Maharashtra", "Western"),
        ];
        let tokens = location_tokens("Mumbai, Goa");
        let names: Vec<_> = filter_by_location(&results, &tokens)
            .into_iter()
            .map(|a| a.name)
            .collect();

        assert_eq!(names, vec!["Baga Beach", "Gateway of India"]);
    }

    #[test]
    fn test_filter_falls_back_when_nothing_matches() {
        let results = vec![
            attraction("Baga Beach", "Goa", "Goa", "Western"),
            attraction("Amber Fort", "Jaipur", "Rajasthan", "Northern"),
        ];
        let filtered = apply_location_filter(results.clone(), &location_tokens("Atlantis"));
        assert_eq!(filtered, results);
    }

    #[test]
    fn test_no_tokens_means_no_filter() {
        let results = vec![attraction("Baga Beach", "Goa", "Goa", "Western")];
        assert_eq!(apply_location_filter(results.clone(), &[]), results);
    }

    #[test]
    fn test_nearest_orders_by_similarity() {
        let mut index = VectorIndex::new();
        index.insert(vec![1.0, 0.0]);
        index.insert(vec![0.0, 1.0]);
        index.insert(vec![0.7, 0.7]);

        let nearest = index.nearest(&[1.0, 0.1], 2);
        assert_eq!(nearest.len(), 2);
        assert_eq!(nearest[0].0, 0);
        assert_eq!(nearest[1].0, 2);
    }

    #[test]
    fn test_nearest_ties_keep_insertion_order() {
        let mut index = VectorIndex::new();
        index.insert(vec![1.0, 0.0]);
        index.insert(vec![1.0, 0.0]);
        index.insert(vec![1.0, 0.0]);

        let positions: Vec<_> = index.nearest(&[1.0, 0.0], 3).into_iter().map(|(p, _)| p).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_search_prefers_matching_destination() {
        let records = vec![
            attraction("Amber Fort", "Jaipur", "Rajasthan", "Northern"),
            attraction("Baga Beach", "Goa", "Goa", "Western"),
            attraction("Hawa Mahal", "Jaipur", "Rajasthan", "Northern"),
        ];
        let index = tokio_test::block_on(AttractionIndex::build(
            records,
            Arc::new(HashedEmbedder::default()),
        ))
        .unwrap();

        let results =
            tokio_test::block_on(index.search("Jaipur", &["forts".to_string()], 3)).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|a| a.city == "Jaipur"));
    }

    #[test]
    fn test_cosine_similarity_edge_cases() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert!((cosine_similarity(&[2.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    }
}
