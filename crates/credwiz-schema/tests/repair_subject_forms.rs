//! Integration test: validate → propagate → re-validate over realistic
//! credential subject schemas.

use credwiz_schema::{repair_form, sync_const_values, FormValidator};
use serde_json::{json, Value};

fn employee_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "@context": { "type": "string", "const": "https://www.w3.org/2018/credentials/v1" },
            "type": { "type": "string", "const": "VerifiedEmployee" },
            "name": { "type": "string" },
            "employer": {
                "type": "object",
                "properties": {
                    "country": { "type": "string", "const": "NL" },
                    "legalName": { "type": "string" }
                },
                "required": ["country"]
            }
        },
        "required": ["@context", "type", "employer"]
    })
}

#[test]
fn test_empty_subject_repaired_in_one_pass() {
    let validator = FormValidator::new(employee_schema()).expect("schema compiles");
    let outcome = repair_form(&validator, json!({ "name": "Alice" }), 4);

    assert!(outcome.form.is_valid(), "remaining: {:?}", outcome.form.errors);
    assert_eq!(outcome.passes, 1);
    assert_eq!(
        outcome.form.data,
        json!({
            "@context": "https://www.w3.org/2018/credentials/v1",
            "type": "VerifiedEmployee",
            "name": "Alice",
            "employer": { "country": "NL" }
        })
    );
}

#[test]
fn test_user_values_survive_repair() {
    let validator = FormValidator::new(employee_schema()).expect("schema compiles");
    let outcome = repair_form(
        &validator,
        json!({ "name": "Bob", "employer": { "country": "NL", "legalName": "Acme" } }),
        4,
    );
    assert!(outcome.form.is_valid(), "remaining: {:?}", outcome.form.errors);
    assert_eq!(outcome.written, 2);
    assert_eq!(outcome.form.data["type"], "VerifiedEmployee");
    assert_eq!(outcome.form.data["name"], "Bob");
    assert_eq!(outcome.form.data["employer"]["legalName"], "Acme");
}

#[test]
fn test_parent_schema_is_applied_at_form_root() {
    // The nested `required` error names the employer schema as parent;
    // propagation applies it to the form root and does not search for the
    // matching subtree.
    let validator = FormValidator::new(employee_schema()).expect("schema compiles");
    let mut form = validator.validate(json!({
        "@context": "https://www.w3.org/2018/credentials/v1",
        "type": "VerifiedEmployee",
        "employer": { "legalName": "Acme" }
    }));
    assert_eq!(form.error_count(), 1);
    assert_eq!(sync_const_values(&mut form), 1);
    assert_eq!(form.data["country"], "NL");
    assert!(form.data["employer"].get("country").is_none());
}

#[test]
fn test_conflicting_user_value_is_reported_not_overwritten() {
    let validator = FormValidator::new(employee_schema()).expect("schema compiles");
    let outcome = repair_form(
        &validator,
        json!({
            "@context": "https://www.w3.org/2018/credentials/v1",
            "type": "Manager",
            "employer": { "country": "NL" }
        }),
        4,
    );
    assert!(!outcome.form.is_valid());
    assert_eq!(outcome.form.data["type"], "Manager");
    assert_eq!(outcome.written, 0);
}
