//! # Schema Tree
//!
//! A JSON Schema reduced to the shape constant propagation cares about.
//!
//! ```text
//! { "properties": { ... } }              → Object { properties, constant: None }
//! { "properties": { ... }, "const": v }  → Object { properties, constant: Some(v) }
//! { "const": v }                         → Const(v)
//! anything else                          → Opaque
//! ```
//!
//! Conversion from JSON never fails. A `properties` keyword whose value is
//! not an object is ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A schema fragment, tagged by what propagation can do with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum SchemaNode {
    /// Declares nested properties, and possibly a constant of its own.
    Object {
        /// Child schemas keyed by property name.
        properties: BTreeMap<String, SchemaNode>,
        /// The node's own `const`, if declared.
        constant: Option<Value>,
    },
    /// A leaf fixing its value to exactly one constant.
    Const(Value),
    /// Neither `properties` nor `const`.
    Opaque,
}

impl SchemaNode {
    /// Reduce a JSON Schema value to a node.
    pub fn from_json(schema: &Value) -> Self {
        let Some(obj) = schema.as_object() else {
            return Self::Opaque;
        };
        let constant = obj.get("const").cloned();
        match obj.get("properties").and_then(Value::as_object) {
            Some(props) => Self::Object {
                properties: props
                    .iter()
                    .map(|(key, child)| (key.clone(), Self::from_json(child)))
                    .collect(),
                constant,
            },
            None => match constant {
                Some(value) => Self::Const(value),
                None => Self::Opaque,
            },
        }
    }

    /// Render back to a JSON Schema fragment (only `properties` and `const`).
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        if let Some(properties) = self.properties() {
            let props: Map<String, Value> = properties
                .iter()
                .map(|(key, child)| (key.clone(), child.to_json()))
                .collect();
            obj.insert("properties".to_string(), Value::Object(props));
        }
        if let Some(constant) = self.constant() {
            obj.insert("const".to_string(), constant.clone());
        }
        Value::Object(obj)
    }

    /// Nested property schemas, if this node declares any.
    pub fn properties(&self) -> Option<&BTreeMap<String, SchemaNode>> {
        match self {
            Self::Object { properties, .. } => Some(properties),
            _ => None,
        }
    }

    /// The declared constant, if any.
    pub fn constant(&self) -> Option<&Value> {
        match self {
            Self::Object { constant, .. } => constant.as_ref(),
            Self::Const(value) => Some(value),
            Self::Opaque => None,
        }
    }

    /// Whether this node gives propagation nothing to do.
    pub fn is_opaque(&self) -> bool {
        matches!(self, Self::Opaque)
    }
}

impl From<Value> for SchemaNode {
    fn from(schema: Value) -> Self {
        Self::from_json(&schema)
    }
}

impl From<SchemaNode> for Value {
    fn from(node: SchemaNode) -> Self {
        node.to_json()
    }
}
