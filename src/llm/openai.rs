//! OpenAI-compatible chat-completions adapter
//!
//! Works against any endpoint speaking the OpenAI chat API, including
//! Gemini's compatibility surface (the default). Schema-constrained
//! requests use the `json_schema` response format so the service returns a
//! JSON document instead of free text.
//!
//! Calls are synchronous round-trips with a single attempt; a transport
//! failure is a hard stage failure for the run.

use serde_json::json;

use super::{AnalysisClient, AnalysisRequest, ClientError};

/// Configuration for the OpenAI-compatible client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL up to (not including) `/chat/completions`.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Bearer token, if the endpoint requires one.
    pub api_key: Option<String>,
    /// Per-call deadline in seconds.
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            model: "gemini-2.5-flash-lite-preview-06-17".to_string(),
            api_key: None,
            timeout_seconds: 300,
        }
    }
}

/// Blocking client for an OpenAI-compatible chat endpoint.
pub struct OpenAiClient {
    config: ClientConfig,
    agent: ureq::Agent,
}

impl OpenAiClient {
    pub fn new(config: ClientConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build();
        Self { config, agent }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn build_body(&self, request: &AnalysisRequest) -> serde_json::Value {
        let mut body = json!({
            "model": self.config.model,
            "messages": [{"role": "user", "content": request.context}],
            "temperature": 0,
            "stream": false,
        });
        if let Some(schema) = request.schema {
            body["response_format"] = json!({
                "type": "json_schema",
                "json_schema": {
                    "name": schema.name(),
                    "schema": schema.json(),
                    "strict": true,
                },
            });
        }
        body
    }
}

impl AnalysisClient for OpenAiClient {
    fn invoke(&self, request: &AnalysisRequest) -> Result<String, ClientError> {
        let endpoint = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));

        let mut http_request = self
            .agent
            .post(&endpoint)
            .set("Content-Type", "application/json");
        if let Some(ref api_key) = self.config.api_key {
            http_request = http_request.set("Authorization", &format!("Bearer {api_key}"));
        }

        let response = http_request
            .send_json(self.build_body(request))
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let payload: serde_json::Value = response
            .into_json()
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;

        payload["choices"]
            .as_array()
            .and_then(|choices| choices.first())
            .and_then(|choice| choice["message"]["content"].as_str())
            .map(|content| content.to_string())
            .ok_or_else(|| {
                ClientError::MalformedResponse(format!("no message content in {payload}"))
            })
    }
}
