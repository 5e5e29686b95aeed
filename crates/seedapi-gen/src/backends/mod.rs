//! Hosted language-model backends.

pub mod anthropic;
pub mod openai;

pub use anthropic::AnthropicGenerator;
pub use openai::OpenAiGenerator;

use crate::config::GeneratorConfig;
use crate::error::GenResult;
use crate::generator::Generator;
use crate::model::Provider;

/// The backend for the configured model's provider.
pub fn build_generator(config: GeneratorConfig) -> GenResult<Box<dyn Generator>> {
    Ok(match config.model.provider() {
        Provider::OpenAi => Box::new(OpenAiGenerator::new(config)?),
        Provider::Anthropic => Box::new(AnthropicGenerator::new(config)?),
    })
}

/// Map a non-success HTTP response to a provider error.
pub(crate) async fn check_status(response: reqwest::Response) -> GenResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(crate::error::GenError::Provider {
        status: status.as_u16(),
        body,
    })
}

pub(crate) fn http_client(config: &GeneratorConfig) -> GenResult<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(config.timeout).build()?)
}
