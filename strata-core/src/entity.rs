use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::key::Key;
use crate::value::Value;

/// Properties - a map of property names to typed values
pub type Properties = HashMap<String, Value>;

/// Entity - a key plus its property bag, as held remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub key: Key,
    pub properties: Properties,
}

impl Entity {
    pub fn new(key: Key, properties: Properties) -> Self {
        Self { key, properties }
    }
}

/// Capability trait mapping a native record to and from its property bag.
///
/// This is the seam the entity codec works through: instead of runtime
/// field introspection, a record states its own mapping. `merge_properties`
/// must ignore property names it does not recognize (forward-compatible
/// schema evolution) and leave fields absent from the bag at their current
/// value, so a `Default` instance ends up with defaults for anything the
/// store did not send.
pub trait Record: Default {
    /// Produce one property per persisted field.
    fn to_properties(&self) -> Properties;

    /// Apply a decoded property bag onto this record, by property name.
    fn merge_properties(&mut self, properties: Properties);
}

/// The identity mapping: a raw property bag is itself a record. Useful for
/// schemaless access and for tooling that has no native struct to decode into.
impl Record for Properties {
    fn to_properties(&self) -> Properties {
        self.clone()
    }

    fn merge_properties(&mut self, properties: Properties) {
        self.extend(properties);
    }
}

/// Helper to build property bags
pub struct PropertiesBuilder {
    properties: Properties,
}

impl PropertiesBuilder {
    pub fn new() -> Self {
        Self {
            properties: Properties::new(),
        }
    }

    pub fn string(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), Value::string(value));
        self
    }

    pub fn integer(mut self, name: impl Into<String>, value: i64) -> Self {
        self.properties.insert(name.into(), Value::integer(value));
        self
    }

    pub fn double(mut self, name: impl Into<String>, value: f64) -> Self {
        self.properties.insert(name.into(), Value::double(value));
        self
    }

    pub fn bool(mut self, name: impl Into<String>, value: bool) -> Self {
        self.properties.insert(name.into(), Value::Bool(value));
        self
    }

    pub fn timestamp(mut self, name: impl Into<String>, micros: i64) -> Self {
        self.properties.insert(name.into(), Value::timestamp(micros));
        self
    }

    pub fn key(mut self, name: impl Into<String>, key: Key) -> Self {
        self.properties.insert(name.into(), Value::key(key));
        self
    }

    pub fn value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    pub fn build(self) -> Properties {
        self.properties
    }
}

impl Default for PropertiesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
