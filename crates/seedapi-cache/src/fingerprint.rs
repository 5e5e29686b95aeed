use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use seedapi_types::DescriptorSet;

use crate::error::{CacheError, CacheResult};

/// Domain tag prepended to every descriptor-set hash.
const DOMAIN: &str = "seedapi-descriptors-v1";

/// Hex-encoded BLAKE3 digest of a descriptor set's canonical JSON form.
///
/// Canonical means every object's keys are sorted, recursively, so two
/// descriptor sets that differ only in declaration order (of resources or of
/// keys inside a shape) produce the same fingerprint. Any change to a
/// resource's prompt, shape, or cardinality produces a different one.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint a descriptor set.
    pub fn of(descriptors: &DescriptorSet) -> CacheResult<Self> {
        let value =
            serde_json::to_value(descriptors).map_err(|e| CacheError::Serialization(e.to_string()))?;
        let canonical = serde_json::to_vec(&canonicalize(value))
            .map_err(|e| CacheError::Serialization(e.to_string()))?;

        let mut hasher = blake3::Hasher::new();
        hasher.update(DOMAIN.as_bytes());
        hasher.update(b":");
        hasher.update(&canonical);
        Ok(Self(hex::encode(hasher.finalize().as_bytes())))
    }

    /// Wrap a previously stored fingerprint string.
    pub fn from_stored(s: &str) -> Self {
        Self(s.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form (first 8 characters) for log lines.
    pub fn short(&self) -> &str {
        &self.0[..8.min(self.0.len())]
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.short())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rebuild `value` with every object's keys in sorted order.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k, canonicalize(v)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
