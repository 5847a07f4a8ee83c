//! JSON schemas for the structured replies requested from the language model.

pub mod validation;

use schemars::schema::RootSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{any::TypeId, sync::Arc};

pub use validation::validate_structured_payload;

/// Cached JSON schema handle associated with a reply type.
#[derive(Clone, Debug)]
pub struct SchemaHandle {
    schema_name: &'static str,
    type_name: &'static str,
    type_id: TypeId,
    schema_json: Arc<Value>,
}

impl SchemaHandle {
    pub fn from_root_schema<T: 'static>(
        schema_name: &'static str,
        type_name: &'static str,
        root: RootSchema,
    ) -> Self {
        let schema_json = serde_json::to_value(root)
            .unwrap_or_else(|err| panic!("failed to serialize schema for {}: {}", type_name, err));

        Self {
            schema_name,
            type_name,
            type_id: TypeId::of::<T>(),
            schema_json: Arc::new(schema_json),
        }
    }

    pub fn schema_name(&self) -> &'static str {
        self.schema_name
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn schema_json(&self) -> &Value {
        self.schema_json.as_ref()
    }
}

/// A type the language model is asked to produce as a JSON object.
pub trait CompletionSchema: DeserializeOwned + Send + Sync + 'static {
    fn schema() -> &'static SchemaHandle;
}

/// Implements [`CompletionSchema`] for a `JsonSchema` type, caching the generated schema.
macro_rules! completion_schema {
    ($ty:ty, $name:literal) => {
        impl $crate::schemas::CompletionSchema for $ty {
            fn schema() -> &'static $crate::schemas::SchemaHandle {
                static HANDLE: std::sync::OnceLock<$crate::schemas::SchemaHandle> =
                    std::sync::OnceLock::new();
                HANDLE.get_or_init(|| {
                    $crate::schemas::SchemaHandle::from_root_schema::<$ty>(
                        $name,
                        std::any::type_name::<$ty>(),
                        schemars::schema_for!($ty),
                    )
                })
            }
        }
    };
}

pub(crate) use completion_schema;
