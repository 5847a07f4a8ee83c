//! Parsing of structured model replies with fallback substitution.

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::{PlannerError, Result},
    schemas::{validate_structured_payload, CompletionSchema},
};

/// Outcome of parsing a model reply: the parsed value, or the substituted default.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredReply<T> {
    Parsed(T),
    Fallback { value: T, reason: String },
}

impl<T> StructuredReply<T> {
    pub fn value(&self) -> &T {
        match self {
            StructuredReply::Parsed(value) => value,
            StructuredReply::Fallback { value, .. } => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            StructuredReply::Parsed(value) => value,
            StructuredReply::Fallback { value, .. } => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, StructuredReply::Fallback { .. })
    }
}

/// Parse, schema-validate, and deserialize a reply that should be a single JSON object.
pub fn parse_structured<T>(text: &str) -> Result<T>
where
    T: CompletionSchema,
{
    let schema = T::schema();
    let value: Value = serde_json::from_str(strip_code_fence(text))?;

    if !value.is_object() {
        return Err(PlannerError::Validation(format!(
            "`{}` reply must be a JSON object",
            schema.schema_name()
        )));
    }

    if let Err(err) = validate_structured_payload(schema, &value) {
        debug!(
            target: "tripagent::schema",
            schema = schema.schema_name(),
            error = %err,
            payload = %value
        );
        return Err(err);
    }

    serde_path_to_error::deserialize(value).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        PlannerError::Validation(format!(
            "failed to deserialize `{}` at {}: {}",
            schema.schema_name(),
            location,
            err
        ))
    })
}

/// Parse a reply, substituting `fallback()` on any failure.
pub fn parse_or_fallback<T, F>(stage: &'static str, text: &str, fallback: F) -> StructuredReply<T>
where
    T: CompletionSchema,
    F: FnOnce() -> T,
{
    parse_checked_or_fallback(stage, text, |_| Ok(()), fallback)
}

/// Like [`parse_or_fallback`], with an extra shape check applied to the parsed value.
pub fn parse_checked_or_fallback<T, C, F>(
    stage: &'static str,
    text: &str,
    check: C,
    fallback: F,
) -> StructuredReply<T>
where
    T: CompletionSchema,
    C: FnOnce(&T) -> Result<()>,
    F: FnOnce() -> T,
{
    let parsed = parse_structured::<T>(text).and_then(|value| {
        check(&value)?;
        Ok(value)
    });

    match parsed {
        Ok(value) => StructuredReply::Parsed(value),
        Err(err) => {
            warn!(
                target: "tripagent::fallback",
                stage,
                error = %err,
                "model reply unusable, substituting fallback"
            );
            StructuredReply::Fallback {
                value: fallback(),
                reason: err.to_string(),
            }
        }
    }
}

/// Strip a surrounding Markdown code fence (```json ... ```), if present.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // drop the info string ("json") on the opening line
    match body.find('\n') {
        Some(newline) => body[newline + 1..].trim(),
        None => body.trim(),
    }
}
