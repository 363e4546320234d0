//! External analysis service interface
//!
//! The pipeline never talks to a concrete service; it invokes an
//! [`AnalysisClient`] with a text context and an optional response schema
//! and gets back the raw response body. One adapter exists per concrete
//! service ([`openai::OpenAiClient`] for OpenAI-compatible endpoints), plus
//! a caching decorator and a scripted mock for tests.

pub mod cached;
pub mod mock;
pub mod openai;

use thiserror::Error;

use crate::core::cache;
use crate::schema::ResponseSchema;

pub use cached::CachedClient;
pub use mock::MockClient;
pub use openai::{ClientConfig, OpenAiClient};

/// Errors from the external analysis service. Fatal for the current run;
/// never retried here.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("analysis service request failed: {0}")]
    Transport(String),

    #[error("analysis service returned an unexpected payload: {0}")]
    MalformedResponse(String),

    #[error("mock client ran out of scripted responses")]
    ScriptExhausted,
}

/// One request to the analysis service: a context and, for structured
/// passes, the schema the response must conform to.
pub struct AnalysisRequest<'a> {
    pub context: &'a str,
    pub schema: Option<&'a ResponseSchema>,
}

impl<'a> AnalysisRequest<'a> {
    pub fn text(context: &'a str) -> Self {
        Self {
            context,
            schema: None,
        }
    }

    pub fn structured(context: &'a str, schema: &'a ResponseSchema) -> Self {
        Self {
            context,
            schema: Some(schema),
        }
    }

    /// Content-addressed identity of this request; the cache key.
    pub fn fingerprint(&self) -> String {
        let schema_identity = self.schema.map(|s| s.identity()).unwrap_or("");
        cache::fingerprint(self.context, schema_identity)
    }
}

/// Stateless request/response capability over the analysis service.
///
/// Returns the raw response body: free text for unconstrained requests,
/// a JSON document for schema-constrained ones. Callers deserialize via
/// [`ResponseSchema::parse`].
pub trait AnalysisClient {
    fn invoke(&self, request: &AnalysisRequest) -> Result<String, ClientError>;
}
