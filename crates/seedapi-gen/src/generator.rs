use std::ops::AddAssign;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use seedapi_types::{Cardinality, DescriptorSet, GeneratedData, ResourceData, ResourceDescriptor};

use crate::error::{GenError, GenResult};

/// Tokens consumed by one or more generation requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: Self) {
        self.prompt_tokens += rhs.prompt_tokens;
        self.completion_tokens += rhs.completion_tokens;
        self.total_tokens += rhs.total_tokens;
    }
}

/// Output of generating one resource.
#[derive(Clone, Debug, PartialEq)]
pub struct Generation {
    pub data: ResourceData,
    pub usage: TokenUsage,
}

/// Produces sample data for a resource descriptor.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, descriptor: &ResourceDescriptor) -> GenResult<Generation>;
}

/// JSON Schema the model must satisfy for `descriptor`.
///
/// Collections are wrapped in an object with a `result` array, since most
/// providers only accept an object at the top level.
pub fn request_schema(descriptor: &ResourceDescriptor) -> Value {
    let shape = Value::Object(descriptor.shape.clone());
    match descriptor.cardinality {
        Cardinality::Single => shape,
        Cardinality::Collection => json!({
            "type": "object",
            "properties": {
                "result": { "type": "array", "items": shape }
            },
            "required": ["result"],
            "additionalProperties": false
        }),
    }
}

/// The instruction sent with the schema.
pub fn prompt_for(descriptor: &ResourceDescriptor) -> String {
    match &descriptor.prompt {
        Some(prompt) => prompt.clone(),
        None => match descriptor.cardinality {
            Cardinality::Single => format!("Generate a realistic `{}` object.", descriptor.name),
            Cardinality::Collection => {
                format!("Generate a list of realistic `{}` objects.", descriptor.name)
            }
        },
    }
}

/// Turn a model's JSON output into resource data of the right cardinality.
///
/// Collections are expected under `result`; a bare array is accepted too.
pub fn decode_output(descriptor: &ResourceDescriptor, output: Value) -> GenResult<ResourceData> {
    let invalid = |reason: &str| GenError::InvalidOutput {
        resource: descriptor.name.clone(),
        reason: reason.to_string(),
    };
    let value = match (descriptor.cardinality, output) {
        (Cardinality::Single, value @ Value::Object(_)) => value,
        (Cardinality::Single, _) => return Err(invalid("expected an object")),
        (Cardinality::Collection, value @ Value::Array(_)) => value,
        (Cardinality::Collection, Value::Object(mut wrapper)) => match wrapper.remove("result") {
            Some(value @ Value::Array(_)) => value,
            _ => return Err(invalid("expected a `result` array")),
        },
        (Cardinality::Collection, _) => return Err(invalid("expected an array")),
    };
    ResourceData::from_value(&descriptor.name, value).map_err(|e| invalid(&e.to_string()))
}

/// Generate every resource in `descriptors`, one after another.
pub async fn generate_all(
    generator: &dyn Generator,
    descriptors: &DescriptorSet,
) -> GenResult<(GeneratedData, TokenUsage)> {
    let mut data = GeneratedData::new();
    let mut usage = TokenUsage::default();
    for descriptor in descriptors.iter() {
        let generation = generator.generate(descriptor).await?;
        let items = match &generation.data {
            ResourceData::Single(_) => 1,
            ResourceData::Collection(items) => items.len(),
        };
        info!(
            resource = %descriptor.name,
            cardinality = %descriptor.cardinality,
            items,
            tokens = generation.usage.total_tokens,
            "generated resource"
        );
        usage += generation.usage;
        data.insert(descriptor.name.clone(), generation.data);
    }
    Ok((data, usage))
}
