pub mod embedding;
pub mod model;
pub mod openai_client;

pub use embedding::{Embedder, HashedEmbedder, OpenAiEmbedder};
pub use model::{LanguageModel, OpenAiChatModel};
pub use openai_client::{ChatCompletionRequest, OpenAIClient};
