//! # Schema-Constant Propagation
//!
//! Fills schema-declared constants into a data tree before the form is
//! validated again.
//!
//! ## Rules
//!
//! For every property of the supplied parent schema:
//!
//! 1. If the property declares a truthy `const` and the data holds no
//!    truthy value under that key, the constant is written.
//! 2. If the property declares nested `properties`, the data under that key
//!    is made an object (when it is not truthy) and the rules recurse into
//!    it. A truthy non-object value is left alone.
//! 3. Anything else is untouched.
//!
//! Presence is weak: `null`, `false`, `0`, and `""` count as absent.
//! Propagation is idempotent and never fails; a schema without
//! `properties` or data that is not an object makes it a no-op.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::form::CredentialFormData;
use crate::node::SchemaNode;

/// Truthiness as the form renderer sees it.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Write the constants declared under `schema` into `data`.
///
/// `schema` must be the direct parent of the property set being repaired;
/// sibling and ancestor schemas are not searched. Returns the number of
/// values written.
pub fn propagate_const_defaults(schema: &SchemaNode, data: &mut Value) -> usize {
    let (Some(properties), Some(data)) = (schema.properties(), data.as_object_mut()) else {
        return 0;
    };
    update_properties(properties, data)
}

fn update_properties(properties: &BTreeMap<String, SchemaNode>, data: &mut Map<String, Value>) -> usize {
    let mut written = 0;
    for (key, property) in properties {
        if let Some(constant) = property.constant() {
            let present = data.get(key).is_some_and(is_truthy);
            if is_truthy(constant) && !present {
                data.insert(key.clone(), constant.clone());
                written += 1;
            }
        }

        if let Some(nested) = property.properties() {
            let slot = data.entry(key.clone()).or_insert(Value::Null);
            if !is_truthy(slot) {
                *slot = Value::Object(Map::new());
                written += 1;
            }
            if let Some(child) = slot.as_object_mut() {
                written += update_properties(nested, child);
            }
        }
    }
    written
}

/// Propagate constants into a form using its first error's parent schema.
///
/// Later errors are not consulted, so at most one parent schema is repaired
/// per call. Returns the number of values written.
pub fn sync_const_values(form: &mut CredentialFormData) -> usize {
    let Some(first) = form.errors.first() else {
        return 0;
    };
    let written = propagate_const_defaults(&first.parent_schema, &mut form.data);
    if written > 0 {
        tracing::debug!(
            written,
            schema_path = %first.schema_path,
            "propagated schema constants into form data"
        );
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::ValidationError;
    use proptest::prelude::*;
    use serde_json::json;

    fn node(schema: Value) -> SchemaNode {
        SchemaNode::from_json(&schema)
    }

    fn nested_schema() -> SchemaNode {
        node(json!({
            "properties": {
                "a": { "const": "X" },
                "b": { "properties": { "c": { "const": "Y" } } }
            }
        }))
    }

    #[test]
    fn test_fills_empty_object() {
        let mut data = json!({});
        propagate_const_defaults(&nested_schema(), &mut data);
        assert_eq!(data, json!({ "a": "X", "b": { "c": "Y" } }));
    }

    #[test]
    fn test_idempotent() {
        let mut once = json!({});
        propagate_const_defaults(&nested_schema(), &mut once);
        let mut twice = once.clone();
        let written = propagate_const_defaults(&nested_schema(), &mut twice);
        assert_eq!(written, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_truthy_value_kept() {
        let mut data = json!({ "a": "Z" });
        propagate_const_defaults(&nested_schema(), &mut data);
        assert_eq!(data["a"], "Z");
    }

    #[test]
    fn test_falsy_values_count_as_absent() {
        for falsy in [json!(""), json!(0), json!(false), json!(null)] {
            let mut data = json!({ "a": falsy });
            propagate_const_defaults(&nested_schema(), &mut data);
            assert_eq!(data["a"], "X");
        }
    }

    #[test]
    fn test_falsy_constant_not_written() {
        let schema = node(json!({
            "properties": {
                "flag": { "const": false },
                "count": { "const": 0 },
                "label": { "const": "" }
            }
        }));
        let mut data = json!({});
        assert_eq!(propagate_const_defaults(&schema, &mut data), 0);
        assert_eq!(data, json!({}));
    }

    #[test]
    fn test_untouched_keys() {
        let schema = node(json!({
            "properties": { "free": { "type": "string" }, "a": { "const": "X" } }
        }));
        let mut data = json!({ "free": "", "other": 1 });
        propagate_const_defaults(&schema, &mut data);
        assert_eq!(data, json!({ "free": "", "other": 1, "a": "X" }));
    }

    #[test]
    fn test_nested_falsy_replaced_by_object() {
        let mut data = json!({ "b": null });
        propagate_const_defaults(&nested_schema(), &mut data);
        assert_eq!(data["b"], json!({ "c": "Y" }));
    }

    #[test]
    fn test_nested_truthy_scalar_left_alone() {
        let mut data = json!({ "b": "scalar" });
        propagate_const_defaults(&nested_schema(), &mut data);
        assert_eq!(data["b"], "scalar");
    }

    #[test]
    fn test_existing_nested_object_preserved() {
        let mut data = json!({ "b": { "keep": true } });
        propagate_const_defaults(&nested_schema(), &mut data);
        assert_eq!(data["b"], json!({ "keep": true, "c": "Y" }));
    }

    #[test]
    fn test_no_properties_is_noop() {
        let mut data = json!({});
        assert_eq!(propagate_const_defaults(&SchemaNode::Const(json!("X")), &mut data), 0);
        assert_eq!(propagate_const_defaults(&SchemaNode::Opaque, &mut data), 0);
        assert_eq!(data, json!({}));
    }

    #[test]
    fn test_non_object_data_is_noop() {
        let mut data = Value::Null;
        assert_eq!(propagate_const_defaults(&nested_schema(), &mut data), 0);
        assert_eq!(data, Value::Null);

        let mut data = json!(["a"]);
        propagate_const_defaults(&nested_schema(), &mut data);
        assert_eq!(data, json!(["a"]));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!("0")));
    }

    #[test]
    fn test_sync_uses_first_error_only() {
        let first = ValidationError {
            message: "missing a".to_string(),
            instance_path: String::new(),
            schema_path: "/required".to_string(),
            parent_schema: node(json!({ "properties": { "a": { "const": "X" } } })),
        };
        let second = ValidationError {
            parent_schema: node(json!({ "properties": { "z": { "const": "Z" } } })),
            ..first.clone()
        };
        let mut form = CredentialFormData {
            data: json!({}),
            errors: vec![first, second],
            schema: json!({}),
        };
        assert_eq!(sync_const_values(&mut form), 1);
        assert_eq!(form.data, json!({ "a": "X" }));
    }

    #[test]
    fn test_sync_without_errors_is_noop() {
        let mut form = CredentialFormData::valid(json!({}), json!({}));
        assert_eq!(sync_const_values(&mut form), 0);
        assert_eq!(form.data, json!({}));
    }

    fn data_strategy() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            (-3i64..3).prop_map(|n| json!(n)),
            "[a-z]{0,3}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop::collection::btree_map("[a-d]", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect()))
        })
    }

    fn schema_strategy() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(json!({})),
            "[a-z]{0,2}".prop_map(|s| json!({ "const": s })),
            (-1i64..2).prop_map(|n| json!({ "const": n })),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop::collection::btree_map("[a-d]", inner, 0..4).prop_map(|m| {
                let props: Map<String, Value> = m.into_iter().collect();
                json!({ "properties": props })
            })
        })
    }

    proptest! {
        /// A second pass over the output of the first never writes anything.
        #[test]
        fn propagation_is_idempotent(schema in schema_strategy(), data in data_strategy()) {
            let schema = SchemaNode::from_json(&schema);
            let mut once = data;
            propagate_const_defaults(&schema, &mut once);
            let mut twice = once.clone();
            let written = propagate_const_defaults(&schema, &mut twice);
            prop_assert_eq!(written, 0);
            prop_assert_eq!(once, twice);
        }

        /// Truthy values already in the data survive propagation.
        #[test]
        fn truthy_top_level_values_survive(schema in schema_strategy(), data in data_strategy()) {
            let schema = SchemaNode::from_json(&schema);
            let before = data.clone();
            let mut after = data;
            propagate_const_defaults(&schema, &mut after);
            if let (Some(before), Some(after)) = (before.as_object(), after.as_object()) {
                for (key, value) in before {
                    if is_truthy(value) && !value.is_object() {
                        prop_assert_eq!(Some(value), after.get(key));
                    }
                }
            }
        }
    }
}
