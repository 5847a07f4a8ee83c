use thiserror::Error;

/// Main error type for the trip planner
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limit exceeded: retry after {retry_after}s")]
    RateLimit { retry_after: u64 },

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid override: {0}")]
    InvalidOverride(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    /// Whether the pipeline recovers from this error locally instead of aborting.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PlannerError::Serialization(_)
                | PlannerError::Validation(_)
                | PlannerError::InvalidOverride(_)
        )
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            PlannerError::Config(_) => "CONFIG_ERROR",
            PlannerError::Http(_) => "HTTP_ERROR",
            PlannerError::Api { .. } => "API_ERROR",
            PlannerError::RateLimit { .. } => "RATE_LIMIT_ERROR",
            PlannerError::Timeout(_) => "TIMEOUT_ERROR",
            PlannerError::Serialization(_) => "SERIALIZATION_ERROR",
            PlannerError::Validation(_) => "VALIDATION_ERROR",
            PlannerError::Embedding(_) => "EMBEDDING_ERROR",
            PlannerError::Dataset(_) => "DATASET_ERROR",
            PlannerError::Csv(_) => "CSV_ERROR",
            PlannerError::Io(_) => "IO_ERROR",
            PlannerError::InvalidOverride(_) => "INVALID_OVERRIDE",
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "recoverable": self.is_recoverable()
            }
        })
    }
}
