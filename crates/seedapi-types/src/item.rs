use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::descriptor::Cardinality;
use crate::error::{TypeError, TypeResult};
use crate::name::validate_resource_name;

/// One record: an ordered mapping from field name to value.
pub type Item = Map<String, Value>;

/// The string form of an item's `id`, used for collection lookups.
///
/// Route parameters are always strings while stored ids may be numbers, so
/// both sides are compared through this string form: `12`, `12.0` and `"12"`
/// all coerce to `"12"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Coerce a JSON value to its id string.
    ///
    /// Arrays and objects have no id form and return `None`.
    pub fn coerce(value: &Value) -> Option<Self> {
        let s = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i.to_string()
                } else if let Some(u) = n.as_u64() {
                    u.to_string()
                } else {
                    float_id(n.as_f64()?)
                }
            }
            Value::Bool(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::Array(_) | Value::Object(_) => return None,
        };
        Some(Self(s))
    }

    /// The coerced id of an item, if it carries one.
    pub fn of(item: &Item) -> Option<Self> {
        item.get("id").and_then(Self::coerce)
    }

    /// Returns `true` if `item` carries an id equal to this one.
    pub fn matches(&self, item: &Item) -> bool {
        Self::of(item).is_some_and(|id| id == *self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Shortest round-trip form of a float, in the notation JavaScript's
/// `String(number)` uses: plain decimals for `1e-6 <= |f| < 1e21`,
/// exponent form (`1e+21`, `1.5e-7`) outside that range.
fn float_id(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let abs = f.abs();
    if (1e-6..1e21).contains(&abs) {
        return if f.fract() == 0.0 { format!("{f:.0}") } else { f.to_string() };
    }
    let exp = format!("{f:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A resource's data, tagged by cardinality.
///
/// Serialized untagged: a single item is a JSON object, a collection is a
/// JSON array of objects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceData {
    Single(Item),
    Collection(Vec<Item>),
}

impl ResourceData {
    pub fn cardinality(&self) -> Cardinality {
        match self {
            Self::Single(_) => Cardinality::Single,
            Self::Collection(_) => Cardinality::Collection,
        }
    }

    /// Interpret a JSON value as resource data.
    pub fn from_value(resource: &str, value: Value) -> TypeResult<Self> {
        let invalid = || TypeError::InvalidData {
            resource: resource.to_string(),
        };
        match value {
            Value::Object(item) => Ok(Self::Single(item)),
            Value::Array(values) => values
                .into_iter()
                .map(|v| match v {
                    Value::Object(item) => Ok(item),
                    _ => Err(invalid()),
                })
                .collect::<TypeResult<Vec<_>>>()
                .map(Self::Collection),
            _ => Err(invalid()),
        }
    }
}

/// Generated (or supplied) data for every resource, keyed by resource name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratedData {
    resources: BTreeMap<String, ResourceData>,
}

impl GeneratedData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a generated-data document, validating each resource's name and
    /// shape.
    pub fn from_json(text: &str) -> TypeResult<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| TypeError::Parse(e.to_string()))?;
        let Value::Object(entries) = value else {
            return Err(TypeError::NotAMapping);
        };
        let mut data = Self::new();
        for (name, value) in entries {
            validate_resource_name(&name)?;
            let resource = ResourceData::from_value(&name, value)?;
            data.insert(name, resource);
        }
        Ok(data)
    }

    /// Pretty-printed JSON form, as written to disk.
    pub fn to_json_pretty(&self) -> TypeResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TypeError::Parse(e.to_string()))
    }

    pub fn insert(&mut self, name: impl Into<String>, data: ResourceData) -> Option<ResourceData> {
        self.resources.insert(name.into(), data)
    }

    pub fn get(&self, name: &str) -> Option<&ResourceData> {
        self.resources.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResourceData)> {
        self.resources.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl IntoIterator for GeneratedData {
    type Item = (String, ResourceData);
    type IntoIter = std::collections::btree_map::IntoIter<String, ResourceData>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.into_iter()
    }
}
