use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{TypeError, TypeResult};
use crate::name::validate_resource_name;

/// Whether a resource holds one item or an ordered collection of items.
///
/// Cardinality is decided once, when the descriptor is loaded, and decides
/// which route set the server synthesizes for the resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    Single,
    Collection,
}

impl Cardinality {
    pub fn is_single(self) -> bool {
        matches!(self, Self::Single)
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Collection => write!(f, "collection"),
        }
    }
}

/// Declarative description of one resource.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Unique name, used as the route segment.
    pub name: String,
    pub cardinality: Cardinality,
    /// Instruction handed to the generator.
    pub prompt: Option<String>,
    /// JSON Schema object describing a single item.
    pub shape: Map<String, Value>,
}

impl ResourceDescriptor {
    pub fn new(name: impl Into<String>, cardinality: Cardinality, shape: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            cardinality,
            prompt: None,
            shape,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Returns `true` if the shape declares a top-level `id` property.
    pub fn declares_id(&self) -> bool {
        self.shape
            .get("properties")
            .and_then(Value::as_object)
            .is_some_and(|props| props.contains_key("id"))
    }

    fn from_entry(name: &str, entry: &Value) -> TypeResult<Self> {
        let invalid = |reason: &str| TypeError::InvalidDescriptor {
            resource: name.to_string(),
            reason: reason.to_string(),
        };

        let fields = entry.as_object().ok_or_else(|| invalid("descriptor must be a mapping"))?;

        if let Some(unknown) = fields
            .keys()
            .find(|k| !matches!(k.as_str(), "single" | "prompt" | "shape"))
        {
            return Err(invalid(&format!("unknown field `{unknown}`")));
        }

        let cardinality = match fields.get("single") {
            None => Cardinality::Collection,
            Some(Value::Bool(true)) => Cardinality::Single,
            Some(Value::Bool(false)) => Cardinality::Collection,
            Some(_) => return Err(invalid("`single` must be a boolean")),
        };

        let prompt = match fields.get("prompt") {
            None => None,
            Some(Value::String(p)) => Some(p.clone()),
            Some(_) => return Err(invalid("`prompt` must be a string")),
        };

        let shape = match fields.get("shape") {
            Some(Value::Object(shape)) => shape.clone(),
            Some(_) => return Err(invalid("`shape` must be a mapping")),
            None => return Err(invalid("missing `shape`")),
        };

        Ok(Self {
            name: name.to_string(),
            cardinality,
            prompt,
            shape,
        })
    }
}

/// Serialization format of a descriptor file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DescriptorFormat {
    Json,
    Toml,
}

impl DescriptorFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> TypeResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            _ => Err(TypeError::UnsupportedFormat(ext)),
        }
    }
}

/// Every descriptor loaded from one descriptor file, keyed by resource name.
///
/// Keys are kept sorted so that iteration never depends on declaration order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DescriptorSet {
    resources: BTreeMap<String, ResourceDescriptor>,
}

impl DescriptorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and structurally validate descriptor file contents.
    pub fn parse(text: &str, format: DescriptorFormat) -> TypeResult<Self> {
        let value: Value = match format {
            DescriptorFormat::Json => {
                serde_json::from_str(text).map_err(|e| TypeError::Parse(e.to_string()))?
            }
            DescriptorFormat::Toml => {
                toml::from_str(text).map_err(|e| TypeError::Parse(e.to_string()))?
            }
        };
        Self::from_value(&value)
    }

    /// Validate an already-parsed descriptor document.
    pub fn from_value(value: &Value) -> TypeResult<Self> {
        let entries = value.as_object().ok_or(TypeError::NotAMapping)?;
        if entries.is_empty() {
            return Err(TypeError::Empty);
        }

        let mut set = Self::new();
        for (name, entry) in entries {
            validate_resource_name(name)?;
            let descriptor = ResourceDescriptor::from_entry(name, entry)?;
            if descriptor.cardinality == Cardinality::Collection && !descriptor.declares_id() {
                tracing::warn!(resource = %name, "collection shape declares no `id` property; lookups by id will not match");
            }
            set.insert(descriptor);
        }
        Ok(set)
    }

    /// Insert a descriptor, replacing any previous one with the same name.
    pub fn insert(&mut self, descriptor: ResourceDescriptor) -> Option<ResourceDescriptor> {
        self.resources.insert(descriptor.name.clone(), descriptor)
    }

    pub fn get(&self, name: &str) -> Option<&ResourceDescriptor> {
        self.resources.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.resources.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl FromIterator<ResourceDescriptor> for DescriptorSet {
    fn from_iter<I: IntoIterator<Item = ResourceDescriptor>>(iter: I) -> Self {
        let mut set = Self::new();
        for descriptor in iter {
            set.insert(descriptor);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BLOG_JSON: &str = r#"{
        "posts": {
            "prompt": "Generate 3 posts",
            "shape": {
                "type": "object",
                "properties": {
                    "id": { "type": "number" },
                    "title": { "type": "string" },
                    "views": { "type": "number" }
                }
            }
        },
        "profile": {
            "single": true,
            "prompt": "Generate a profile",
            "shape": { "type": "object", "properties": { "name": { "type": "string" } } }
        }
    }"#;

    #[test]
    fn parse_json_descriptors() {
        let set = DescriptorSet::parse(BLOG_JSON, DescriptorFormat::Json).unwrap();
        assert_eq!(set.len(), 2);

        let posts = set.get("posts").unwrap();
        assert_eq!(posts.cardinality, Cardinality::Collection);
        assert_eq!(posts.prompt.as_deref(), Some("Generate 3 posts"));
        assert!(posts.declares_id());

        let profile = set.get("profile").unwrap();
        assert!(profile.cardinality.is_single());
        assert!(!profile.declares_id());
    }

    #[test]
    fn parse_toml_descriptors() {
        let text = r#"
            [comments]
            prompt = "Generate 5 comments"

            [comments.shape]
            type = "object"

            [comments.shape.properties.id]
            type = "number"

            [comments.shape.properties.text]
            type = "string"
        "#;
        let set = DescriptorSet::parse(text, DescriptorFormat::Toml).unwrap();
        let comments = set.get("comments").unwrap();
        assert_eq!(comments.cardinality, Cardinality::Collection);
        assert!(comments.declares_id());
    }

    #[test]
    fn names_are_sorted() {
        let set = DescriptorSet::parse(BLOG_JSON, DescriptorFormat::Json).unwrap();
        let names: Vec<_> = set.names().collect();
        assert_eq!(names, vec!["posts", "profile"]);
    }

    #[test]
    fn rejects_non_mapping() {
        let err = DescriptorSet::from_value(&json!([1, 2])).unwrap_err();
        assert_eq!(err, TypeError::NotAMapping);
    }

    #[test]
    fn rejects_empty() {
        let err = DescriptorSet::from_value(&json!({})).unwrap_err();
        assert_eq!(err, TypeError::Empty);
    }

    #[test]
    fn rejects_bad_names() {
        let err = DescriptorSet::from_value(&json!({"a/b": {"shape": {}}})).unwrap_err();
        assert!(matches!(err, TypeError::InvalidName(_)));
        let err = DescriptorSet::from_value(&json!({"": {"shape": {}}})).unwrap_err();
        assert!(matches!(err, TypeError::InvalidName(_)));
    }

    #[test]
    fn rejects_route_syntax_in_names() {
        let err = DescriptorSet::from_value(&json!({":a": {"shape": {}}, ":b": {"shape": {}}}))
            .unwrap_err();
        assert_eq!(err, TypeError::InvalidName(":a".into()));
        let err = DescriptorSet::from_value(&json!({"*all": {"shape": {}}})).unwrap_err();
        assert_eq!(err, TypeError::InvalidName("*all".into()));
    }

    #[test]
    fn rejects_missing_shape() {
        let err = DescriptorSet::from_value(&json!({"users": {"prompt": "x"}})).unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidDescriptor {
                resource: "users".into(),
                reason: "missing `shape`".into()
            }
        );
    }

    #[test]
    fn rejects_wrongly_typed_fields() {
        let err = DescriptorSet::from_value(&json!({"u": {"single": "yes", "shape": {}}})).unwrap_err();
        assert!(err.to_string().contains("`single` must be a boolean"));

        let err = DescriptorSet::from_value(&json!({"u": {"prompt": 3, "shape": {}}})).unwrap_err();
        assert!(err.to_string().contains("`prompt` must be a string"));

        let err = DescriptorSet::from_value(&json!({"u": {"shape": "object"}})).unwrap_err();
        assert!(err.to_string().contains("`shape` must be a mapping"));

        let err = DescriptorSet::from_value(&json!({"u": 5})).unwrap_err();
        assert!(err.to_string().contains("descriptor must be a mapping"));
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = DescriptorSet::from_value(&json!({"u": {"shape": {}, "schema": {}}})).unwrap_err();
        assert!(err.to_string().contains("unknown field `schema`"));
    }

    #[test]
    fn parse_error_is_reported() {
        let err = DescriptorSet::parse("{ not json", DescriptorFormat::Json).unwrap_err();
        assert!(matches!(err, TypeError::Parse(_)));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(DescriptorFormat::from_path(Path::new("seed.json")).unwrap(), DescriptorFormat::Json);
        assert_eq!(DescriptorFormat::from_path(Path::new("seed.TOML")).unwrap(), DescriptorFormat::Toml);
        assert!(DescriptorFormat::from_path(Path::new("seed.ts")).is_err());
        assert!(DescriptorFormat::from_path(Path::new("seed")).is_err());
    }

    #[test]
    fn collect_from_iterator() {
        let set: DescriptorSet = vec![
            ResourceDescriptor::new("b", Cardinality::Single, Map::new()),
            ResourceDescriptor::new("a", Cardinality::Collection, Map::new()).with_prompt("p"),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(set.get("a").unwrap().prompt.as_deref(), Some("p"));
    }
}
