//! # Repair Loop
//!
//! Alternates validation and constant propagation until the data is valid,
//! a pass writes nothing, or the pass budget runs out. Each pass repairs
//! at most the parent schema of the first reported error, so deeply nested
//! gaps may need several passes.

use serde_json::Value;

use crate::form::CredentialFormData;
use crate::propagate::sync_const_values;
use crate::validate::FormValidator;

/// Result of [`repair_form`].
#[derive(Debug, Clone, PartialEq)]
pub struct RepairOutcome {
    /// The final, re-validated form.
    pub form: CredentialFormData,
    /// Propagation passes run.
    pub passes: usize,
    /// Values written across all passes.
    pub written: usize,
}

/// Validate `data`, then propagate and re-validate up to `max_passes` times.
pub fn repair_form(validator: &FormValidator, data: Value, max_passes: usize) -> RepairOutcome {
    let mut form = validator.validate(data);
    let mut passes = 0;
    let mut written = 0;

    while !form.is_valid() && passes < max_passes {
        passes += 1;
        let pass_written = sync_const_values(&mut form);
        if pass_written == 0 {
            break;
        }
        written += pass_written;
        form = validator.validate(form.data);
    }

    tracing::debug!(passes, written, remaining = form.error_count(), "form repair finished");
    RepairOutcome { form, passes, written }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_repair_fills_required_constant() {
        let validator = FormValidator::new(json!({
            "type": "object",
            "properties": {
                "type": { "const": "Employee" },
                "name": { "type": "string" }
            },
            "required": ["type"]
        }))
        .unwrap();
        let outcome = repair_form(&validator, json!({ "name": "Alice" }), 3);
        assert!(outcome.form.is_valid());
        assert_eq!(outcome.form.data, json!({ "type": "Employee", "name": "Alice" }));
        assert_eq!(outcome.passes, 1);
        assert_eq!(outcome.written, 1);
    }

    #[test]
    fn test_repair_stops_when_nothing_written() {
        let validator = FormValidator::new(json!({
            "type": "object",
            "properties": { "name": { "type": "string" } },
            "required": ["name"]
        }))
        .unwrap();
        let outcome = repair_form(&validator, json!({}), 5);
        assert!(!outcome.form.is_valid());
        assert_eq!(outcome.passes, 1);
        assert_eq!(outcome.written, 0);
    }

    #[test]
    fn test_zero_passes_only_validates() {
        let validator = FormValidator::new(json!({
            "properties": { "type": { "const": "Employee" } },
            "required": ["type"]
        }))
        .unwrap();
        let outcome = repair_form(&validator, json!({}), 0);
        assert_eq!(outcome.passes, 0);
        assert_eq!(outcome.form.data, json!({}));
        assert!(!outcome.form.is_valid());
    }
}
