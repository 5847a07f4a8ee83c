use async_trait::async_trait;
use serde_json::Value;

use super::openai_client::OpenAIClient;
use crate::error::{PlannerError, Result};

const OPENAI_BATCH_SIZE: usize = 128;
const DEFAULT_HASHED_DIMENSIONS: usize = 256;

/// Text embedding capability: one vector per input, in input order.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// [`Embedder`] backed by an OpenAI-compatible `/embeddings` endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiEmbedder {
    client: OpenAIClient,
    model: String,
    batch_size: usize,
}

impl OpenAiEmbedder {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            batch_size: OPENAI_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(inputs.len());

        for batch in inputs.chunks(self.batch_size) {
            let response = self.client.embeddings(&self.model, batch).await?;
            let mut batch_vectors = parse_embedding_response(&response)?;
            if batch_vectors.len() != batch.len() {
                return Err(PlannerError::Embedding(format!(
                    "expected {} embeddings, received {}",
                    batch.len(),
                    batch_vectors.len()
                )));
            }
            vectors.append(&mut batch_vectors);
        }

        Ok(vectors)
    }
}

/// Extract `data[*].embedding`, ordered by each entry's `index` field.
fn parse_embedding_response(response: &Value) -> Result<Vec<Vec<f32>>> {
    let data = response
        .get("data")
        .and_then(|value| value.as_array())
        .ok_or_else(|| PlannerError::Embedding("response is missing `data`".to_string()))?;

    let mut indexed = Vec::with_capacity(data.len());
    for (position, entry) in data.iter().enumerate() {
        let index = entry
            .get("index")
            .and_then(|value| value.as_u64())
            .map(|value| value as usize)
            .unwrap_or(position);
        let embedding = entry
            .get("embedding")
            .and_then(|value| value.as_array())
            .ok_or_else(|| {
                PlannerError::Embedding(format!("entry {} has no embedding", position))
            })?
            .iter()
            .map(|component| component.as_f64().map(|x| x as f32))
            .collect::<Option<Vec<f32>>>()
            .ok_or_else(|| {
                PlannerError::Embedding(format!("entry {} has a non-numeric component", position))
            })?;
        indexed.push((index, embedding));
    }

    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, embedding)| embedding).collect())
}

/// Deterministic, offline bag-of-words embedder.
///
/// Each lowercase alphanumeric token is hashed into one of `dimensions` buckets and the
/// resulting counts are L2-normalised. Similar wording yields similar vectors, which is
/// enough for small datasets, local runs, and tests.
#[derive(Debug, Clone)]
pub struct HashedEmbedder {
    dimensions: usize,
}

impl HashedEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
        {
            let bucket = (fnv1a(&token.to_lowercase()) % self.dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

impl Default for HashedEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_HASHED_DIMENSIONS)
    }
}

#[async_trait]
impl Embedder for HashedEmbedder {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(inputs.iter().map(|input| self.embed_text(input)).collect())
    }
}

fn fnv1a(text: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    text.bytes()
        .fold(OFFSET, |hash, byte| (hash ^ byte as u64).wrapping_mul(PRIME))
}
