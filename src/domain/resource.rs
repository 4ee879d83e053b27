//! Clinical resource shapes
//!
//! emrlink moves resources between two shapes:
//!
//! - [`Resource`] is the canonical shape exposed at the library boundary. Its
//!   `resourceType` discriminant is a required, typed field.
//! - [`SessionResource`] is the raw JSON object a session transport sends and
//!   receives. Context hydration works on this shape.
//!
//! Conversions between the two live in [`crate::core::transform`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Keys owned by the typed members of [`Resource`]
const RESERVED_KEYS: [&str; 2] = ["resourceType", "id"];

/// Canonical clinical resource
///
/// Any FHIR resource can be represented: the discriminant and logical id are
/// typed, all other elements are kept verbatim in `fields`.
///
/// # Examples
///
/// ```
/// use emrlink::domain::Resource;
/// use serde_json::json;
///
/// let observation = Resource::new("Observation")
///     .with_field("status", json!("final"))
///     .with_field("code", json!({"text": "Heart rate"}));
///
/// assert_eq!(observation.resource_type, "Observation");
/// assert!(observation.has_field("status"));
/// assert!(!observation.has_field("subject"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// FHIR resource type discriminant
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    /// Logical id, assigned by the server on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Every other element of the resource
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Resource {
    /// Create an empty resource of the given type
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: None,
            fields: Map::new(),
        }
    }

    /// Set the logical id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set an element
    ///
    /// A string `id` sets the typed logical id. `resourceType` cannot be set
    /// through `fields`; it is kept there and rejected on conversion.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        match value {
            Value::String(id) if key == "id" => self.id = Some(id),
            value => {
                self.fields.insert(key, value);
            }
        }
        self
    }

    /// The first key in `fields` that collides with a typed member
    pub fn reserved_field(&self) -> Option<&'static str> {
        RESERVED_KEYS
            .into_iter()
            .find(|key| self.fields.contains_key(*key))
    }

    /// Returns the element stored under `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns true if the element is present
    pub fn has_field(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Relative reference to this resource (`Type/id`), if it has an id
    pub fn reference(&self) -> Option<Reference> {
        self.id
            .as_deref()
            .map(|id| Reference::to(&self.resource_type, id))
    }
}

/// Resource in the shape the session transport works with
///
/// A JSON object; the `resourceType` member is not guaranteed to be present,
/// which is exactly what response validation checks for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionResource(Map<String, Value>);

impl SessionResource {
    /// Wrap a raw JSON object
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Narrow an arbitrary JSON value to an object
    ///
    /// Returns the value back if it is not a JSON object.
    pub fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }

    /// The `resourceType` member, if it is a non-empty string
    pub fn resource_type(&self) -> Option<&str> {
        self.0
            .get("resourceType")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Insert `value` under `key` unless the key is already present
    ///
    /// Returns true if the value was inserted.
    pub fn insert_if_absent(&mut self, key: &str, value: Value) -> bool {
        if self.0.contains_key(key) {
            return false;
        }
        self.0.insert(key.to_string(), value);
        true
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// FHIR Reference element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Relative or absolute reference, e.g. `Patient/123`
    pub reference: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Reference {
    /// Relative reference to `resource_type/id`
    pub fn to(resource_type: &str, id: &str) -> Self {
        Self {
            reference: format!("{resource_type}/{id}"),
            display: None,
        }
    }
}

/// FHIR Period element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: String,
    pub end: String,
}

impl Period {
    /// A zero-length period at `instant`
    pub fn at(instant: impl Into<String>) -> Self {
        let instant = instant.into();
        Self {
            start: instant.clone(),
            end: instant,
        }
    }
}

/// Clinical context entities a session carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    Patient,
    Encounter,
    User,
}

impl ContextKind {
    /// Resource type a read of this entity is expected to yield
    pub fn expected_resource_type(&self) -> &'static str {
        match self {
            ContextKind::Patient => "Patient",
            ContextKind::Encounter => "Encounter",
            ContextKind::User => "Practitioner",
        }
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextKind::Patient => f.write_str("patient"),
            ContextKind::Encounter => f.write_str("encounter"),
            ContextKind::User => f.write_str("user"),
        }
    }
}
