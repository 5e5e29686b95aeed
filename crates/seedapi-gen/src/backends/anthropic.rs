use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use seedapi_types::ResourceDescriptor;

use super::{check_status, http_client};
use crate::config::GeneratorConfig;
use crate::error::{GenError, GenResult};
use crate::generator::{decode_output, prompt_for, request_schema, Generation, Generator, TokenUsage};

const API_VERSION: &str = "2023-06-01";
const TOOL_NAME: &str = "emit_sample_data";

/// Generator backed by the Anthropic messages API.
///
/// The model is forced to call a single tool whose input schema is the
/// resource schema; the tool input is the generated data.
pub struct AnthropicGenerator {
    client: reqwest::Client,
    config: GeneratorConfig,
}

impl AnthropicGenerator {
    pub fn new(config: GeneratorConfig) -> GenResult<Self> {
        Ok(Self {
            client: http_client(&config)?,
            config,
        })
    }

    pub fn request_body(&self, descriptor: &ResourceDescriptor) -> Value {
        json!({
            "model": self.config.model.as_str(),
            "max_tokens": self.config.max_tokens,
            "system": "You generate realistic sample data for a REST API.",
            "messages": [
                { "role": "user", "content": prompt_for(descriptor) }
            ],
            "tools": [{
                "name": TOOL_NAME,
                "description": format!("Record the generated `{}` data.", descriptor.name),
                "input_schema": request_schema(descriptor)
            }],
            "tool_choice": { "type": "tool", "name": TOOL_NAME }
        })
    }

    pub fn parse_response(body: &Value) -> GenResult<(Value, TokenUsage)> {
        let input = body["content"]
            .as_array()
            .and_then(|blocks| {
                blocks
                    .iter()
                    .find(|b| b["type"] == "tool_use" && b["name"] == TOOL_NAME)
            })
            .map(|block| block["input"].clone())
            .ok_or_else(|| GenError::InvalidResponse("no tool_use block in response".into()))?;
        let prompt_tokens = body["usage"]["input_tokens"].as_u64().unwrap_or(0);
        let completion_tokens = body["usage"]["output_tokens"].as_u64().unwrap_or(0);
        let usage = TokenUsage {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        };
        Ok((input, usage))
    }

    async fn send(&self, body: &Value) -> GenResult<Value> {
        let url = format!("{}/messages", self.config.endpoint());
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(body)
            .send()
            .await?;
        Ok(check_status(response).await?.json::<Value>().await?)
    }
}

#[async_trait]
impl Generator for AnthropicGenerator {
    async fn generate(&self, descriptor: &ResourceDescriptor) -> GenResult<Generation> {
        let body = self.request_body(descriptor);
        debug!(resource = %descriptor.name, model = %self.config.model, "requesting message");
        let response = self.config.retry.run(&descriptor.name, || self.send(&body)).await?;
        let (output, usage) = Self::parse_response(&response)?;
        Ok(Generation {
            data: decode_output(descriptor, output)?,
            usage,
        })
    }
}
