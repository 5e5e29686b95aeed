//! Sample-data generation for seedapi.
//!
//! A [`Generator`] turns one [`ResourceDescriptor`](seedapi_types::ResourceDescriptor)
//! into [`ResourceData`](seedapi_types::ResourceData). The bundled backends
//! ask a hosted language model for JSON that matches the descriptor's shape:
//!
//! - [`OpenAiGenerator`] -- chat completions with a JSON response format
//! - [`AnthropicGenerator`] -- messages API with a forced tool call
//!
//! [`generate_all`] drives a generator over a whole descriptor set, one
//! resource at a time, and sums the token usage. Transient provider
//! failures are retried according to a [`RetryPolicy`].

pub mod backends;
pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod retry;

pub use backends::{build_generator, AnthropicGenerator, OpenAiGenerator};
pub use config::GeneratorConfig;
pub use error::{GenError, GenResult};
pub use generator::{decode_output, generate_all, request_schema, Generation, Generator, TokenUsage};
pub use model::{ModelId, Provider, ANTHROPIC_MODELS, OPENAI_MODELS};
pub use retry::RetryPolicy;
