use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GenError;

/// Hosted model provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    /// Environment variable holding this provider's API key.
    pub fn api_key_var(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Anthropic => "https://api.anthropic.com/v1",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => write!(f, "OpenAI"),
            Self::Anthropic => write!(f, "Anthropic"),
        }
    }
}

pub const OPENAI_MODELS: &[&str] = &[
    "gpt-4o",
    "gpt-4o-2024-05-13",
    "gpt-4o-2024-08-06",
    "gpt-4o-mini",
    "gpt-4o-mini-2024-07-18",
    "gpt-4-turbo",
    "gpt-4-turbo-2024-04-09",
    "gpt-4-turbo-preview",
    "gpt-4-0125-preview",
    "gpt-4-1106-preview",
    "gpt-4",
    "gpt-4-0613",
    "gpt-3.5-turbo-0125",
    "gpt-3.5-turbo",
    "gpt-3.5-turbo-1106",
];

pub const ANTHROPIC_MODELS: &[&str] = &[
    "claude-3-5-sonnet-20240620",
    "claude-3-opus-20240229",
    "claude-3-sonnet-20240229",
    "claude-3-haiku-20240307",
];

/// The only OpenAI model that gets strict `json_schema` structured output.
const STRUCTURED_OUTPUT_MODEL: &str = "gpt-4o-2024-08-06";

/// A supported model id.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelId {
    id: &'static str,
    provider: Provider,
}

impl ModelId {
    pub const DEFAULT: &'static str = "gpt-4o-mini";

    pub fn parse(s: &str) -> Result<Self, GenError> {
        if let Some(id) = OPENAI_MODELS.iter().find(|m| **m == s) {
            return Ok(Self { id, provider: Provider::OpenAi });
        }
        if let Some(id) = ANTHROPIC_MODELS.iter().find(|m| **m == s) {
            return Ok(Self { id, provider: Provider::Anthropic });
        }
        Err(GenError::UnknownModel(s.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        self.id
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Whether requests should use strict JSON-schema structured output.
    pub fn structured_outputs(&self) -> bool {
        self.id == STRUCTURED_OUTPUT_MODEL
    }
}

impl Default for ModelId {
    fn default() -> Self {
        Self {
            id: Self::DEFAULT,
            provider: Provider::OpenAi,
        }
    }
}

impl FromStr for ModelId {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelId({})", self.id)
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id)
    }
}
