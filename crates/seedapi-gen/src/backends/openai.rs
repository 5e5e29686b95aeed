use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use seedapi_types::ResourceDescriptor;

use super::{check_status, http_client};
use crate::config::GeneratorConfig;
use crate::error::{GenError, GenResult};
use crate::generator::{decode_output, prompt_for, request_schema, Generation, Generator, TokenUsage};

const SYSTEM_PROMPT: &str = "You generate realistic sample data for a REST API. \
Respond with a single JSON value and nothing else.";

/// Generator backed by the OpenAI chat completions API.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    config: GeneratorConfig,
}

impl OpenAiGenerator {
    pub fn new(config: GeneratorConfig) -> GenResult<Self> {
        Ok(Self {
            client: http_client(&config)?,
            config,
        })
    }

    /// Chat completions request body for `descriptor`.
    ///
    /// Models with structured-output support get a strict `json_schema`
    /// response format; the rest get JSON mode with the schema spelled out in
    /// the system message.
    pub fn request_body(&self, descriptor: &ResourceDescriptor) -> Value {
        let schema = request_schema(descriptor);
        let (system, response_format) = if self.config.model.structured_outputs() {
            (
                SYSTEM_PROMPT.to_string(),
                json!({
                    "type": "json_schema",
                    "json_schema": {
                        "name": schema_name(&descriptor.name),
                        "schema": schema,
                        "strict": true
                    }
                }),
            )
        } else {
            (
                format!("{SYSTEM_PROMPT} The JSON must match this JSON Schema: {schema}"),
                json!({ "type": "json_object" }),
            )
        };
        json!({
            "model": self.config.model.as_str(),
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt_for(descriptor) }
            ],
            "response_format": response_format
        })
    }

    /// Extract the JSON output and token usage from a response body.
    pub fn parse_response(body: &Value) -> GenResult<(Value, TokenUsage)> {
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| match body["choices"][0]["message"]["refusal"].as_str() {
                Some(refusal) => GenError::InvalidResponse(format!("model refused: {refusal}")),
                None => GenError::InvalidResponse("missing choices[0].message.content".into()),
            })?;
        let output: Value = serde_json::from_str(content)
            .map_err(|e| GenError::InvalidResponse(format!("content is not JSON: {e}")))?;
        let usage = &body["usage"];
        let usage = TokenUsage {
            prompt_tokens: usage["prompt_tokens"].as_u64().unwrap_or(0),
            completion_tokens: usage["completion_tokens"].as_u64().unwrap_or(0),
            total_tokens: usage["total_tokens"].as_u64().unwrap_or(0),
        };
        Ok((output, usage))
    }

    async fn send(&self, body: &Value) -> GenResult<Value> {
        let url = format!("{}/chat/completions", self.config.endpoint());
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await?;
        Ok(check_status(response).await?.json::<Value>().await?)
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn generate(&self, descriptor: &ResourceDescriptor) -> GenResult<Generation> {
        let body = self.request_body(descriptor);
        debug!(resource = %descriptor.name, model = %self.config.model, "requesting chat completion");
        let response = self.config.retry.run(&descriptor.name, || self.send(&body)).await?;
        let (output, usage) = Self::parse_response(&response)?;
        Ok(Generation {
            data: decode_output(descriptor, output)?,
            usage,
        })
    }
}

/// Schema names may only contain `[a-zA-Z0-9_-]`.
fn schema_name(resource: &str) -> String {
    resource
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}
