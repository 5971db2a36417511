//! # Credential Form Data
//!
//! The payload the form renderer hands to the wizard on every edit: the
//! current subject data, the validator's verdict, and the schema it was
//! judged against. Field names follow the renderer's camelCase wire format.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::node::SchemaNode;

/// One validation failure reported by the form validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Human-readable description of the violation.
    pub message: String,
    /// JSON Pointer to the violating value in the data.
    #[serde(default)]
    pub instance_path: String,
    /// JSON Pointer to the violated keyword in the schema.
    #[serde(default)]
    pub schema_path: String,
    /// The schema fragment containing the violated keyword.
    pub parent_schema: SchemaNode,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Subject data plus the validator's verdict on it.
///
/// `errors` keeps the validator's order; only the first entry drives
/// constant propagation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialFormData {
    /// Field name → value. Usually an object; `null` when nothing was entered.
    #[serde(default)]
    pub data: Value,
    /// Validation errors, empty when the data is valid.
    #[serde(default)]
    pub errors: Vec<ValidationError>,
    /// The subject schema the data was validated against.
    #[serde(default)]
    pub schema: Value,
}

impl CredentialFormData {
    /// Form data with no errors.
    pub fn valid(data: Value, schema: Value) -> Self {
        Self {
            data,
            errors: Vec::new(),
            schema,
        }
    }

    /// Whether the validator accepted the data.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of reported errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// The error whose parent schema drives propagation.
    pub fn first_error(&self) -> Option<&ValidationError> {
        self.errors.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_renderer_payload() {
        let form: CredentialFormData = serde_json::from_value(json!({
            "data": { "name": "Alice" },
            "errors": [{
                "message": "must have required property 'type'",
                "instancePath": "",
                "parentSchema": { "properties": { "type": { "const": "Employee" } } }
            }],
            "schema": { "type": "object" }
        }))
        .unwrap();
        assert!(!form.is_valid());
        assert_eq!(form.error_count(), 1);
        let first = form.first_error().unwrap();
        assert!(first.schema_path.is_empty());
        assert!(first.parent_schema.properties().is_some());
    }

    #[test]
    fn test_missing_fields_default() {
        let form: CredentialFormData = serde_json::from_value(json!({})).unwrap();
        assert!(form.is_valid());
        assert_eq!(form.data, Value::Null);
    }

    #[test]
    fn test_error_display() {
        let e = ValidationError {
            message: "\"Z\" is not \"X\"".to_string(),
            instance_path: "/a".to_string(),
            schema_path: "/properties/a/const".to_string(),
            parent_schema: SchemaNode::Const(json!("X")),
        };
        assert_eq!(e.to_string(), "/a: \"Z\" is not \"X\"");
        let root = ValidationError {
            instance_path: String::new(),
            ..e
        };
        assert!(root.to_string().starts_with("(root)"));
    }
}
