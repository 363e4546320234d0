//! Schema registry - embedded JSON schemas for structured responses
//!
//! Each schema-constrained stage ships a JSON schema that is sent to the
//! analysis service as its response format and used locally to validate
//! whatever comes back before deserializing. The schema's serialized form
//! is also part of the cache fingerprint, so editing a schema invalidates
//! cached responses for that stage.

use std::collections::HashMap;

use rust_embed::Embed;
use thiserror::Error;

#[derive(Embed)]
#[folder = "schemas/"]
struct EmbeddedSchemas;

/// The three schema-constrained analysis passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageSchema {
    Components,
    Relationships,
    Ordering,
}

impl StageSchema {
    pub fn all() -> &'static [StageSchema] {
        &[
            StageSchema::Components,
            StageSchema::Relationships,
            StageSchema::Ordering,
        ]
    }

    /// Schema name announced to the service and used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            StageSchema::Components => "components",
            StageSchema::Relationships => "relationship_analysis",
            StageSchema::Ordering => "ordered_components",
        }
    }

    fn file_name(&self) -> &'static str {
        match self {
            StageSchema::Components => "components.schema.json",
            StageSchema::Relationships => "relationships.schema.json",
            StageSchema::Ordering => "ordering.schema.json",
        }
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("embedded schema missing or unparsable: {0}")]
    Missing(&'static str),

    #[error("response does not conform to the {schema} schema: {detail}")]
    Invalid { schema: &'static str, detail: String },

    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A parsed response schema ready to be sent and enforced.
#[derive(Debug, Clone)]
pub struct ResponseSchema {
    name: &'static str,
    json: serde_json::Value,
    serialized: String,
}

impl ResponseSchema {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Schema body as JSON, for the wire request.
    pub fn json(&self) -> &serde_json::Value {
        &self.json
    }

    /// Canonical serialized form; part of the cache fingerprint.
    pub fn identity(&self) -> &str {
        &self.serialized
    }

    /// Validate a raw response body against this schema and deserialize it.
    pub fn parse<T: serde::de::DeserializeOwned>(&self, body: &str) -> Result<T, SchemaError> {
        let instance: serde_json::Value = serde_json::from_str(body)?;
        let validator = jsonschema::validator_for(&self.json)
            .map_err(|_| SchemaError::Missing(self.name))?;
        if let Some(first_error) = validator.iter_errors(&instance).next() {
            return Err(SchemaError::Invalid {
                schema: self.name,
                detail: first_error.to_string(),
            });
        }
        Ok(serde_json::from_value(instance)?)
    }
}

/// Registry of embedded response schemas.
pub struct SchemaRegistry {
    schemas: HashMap<StageSchema, ResponseSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        let mut schemas = HashMap::new();
        for stage in StageSchema::all() {
            if let Some(file) = EmbeddedSchemas::get(stage.file_name()) {
                if let Ok(json) = serde_json::from_slice::<serde_json::Value>(&file.data) {
                    let serialized = json.to_string();
                    schemas.insert(
                        *stage,
                        ResponseSchema {
                            name: stage.name(),
                            json,
                            serialized,
                        },
                    );
                }
            }
        }
        Self { schemas }
    }

    pub fn get(&self, stage: StageSchema) -> Result<&ResponseSchema, SchemaError> {
        self.schemas
            .get(&stage)
            .ok_or_else(|| SchemaError::Missing(stage.name()))
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
