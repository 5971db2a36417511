//! # Form Validation
//!
//! Validates credential subject data against its JSON Schema and reports
//! the result in the shape the wizard consumes ([`CredentialFormData`]).
//!
//! ## Parent Schemas
//!
//! Each violation names the keyword that failed by its schema path, e.g.
//! `/properties/address/required`. The parent schema is the fragment that
//! holds that keyword, found by dropping the last path segment and
//! resolving the rest as a JSON Pointer into the subject schema. For a
//! missing required property that fragment is the enclosing object schema,
//! which is what lets constant propagation fill the gap. Paths that cannot
//! be resolved locally (through `$ref`, for instance) yield an opaque node.
//!
//! ## Offline Resolution
//!
//! External `$ref` URIs are never fetched. Unknown references resolve to a
//! permissive empty schema so validation of the local document proceeds.

use std::fmt;
use std::path::Path;

use jsonschema::{Retrieve, Uri, Validator};
use serde_json::Value;
use thiserror::Error;

use crate::form::{CredentialFormData, ValidationError};
use crate::node::SchemaNode;

/// Resolves every external reference to a permissive schema.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(&self, uri: &Uri<&str>) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        tracing::debug!(uri = uri.as_str(), "external schema reference resolved as permissive");
        Ok(serde_json::json!({}))
    }
}

/// Error building a form validator.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The schema file could not be read or parsed.
    #[error("schema load error for '{path}': {reason}")]
    SchemaLoad {
        /// Path to the schema file.
        path: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// The schema is not a valid JSON Schema.
    #[error("validator build error: {reason}")]
    ValidatorBuild {
        /// Reason the validator could not be built.
        reason: String,
    },
}

/// A compiled validator for one credential subject schema.
pub struct FormValidator {
    schema: Value,
    validator: Validator,
}

impl fmt::Debug for FormValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormValidator")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl FormValidator {
    /// Compile `schema`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::ValidatorBuild` if `schema` is not a
    /// valid JSON Schema.
    pub fn new(schema: Value) -> Result<Self, SchemaValidationError> {
        let mut opts = jsonschema::options();
        opts.with_retriever(OfflineRetriever);
        let validator = opts
            .build(&schema)
            .map_err(|e| SchemaValidationError::ValidatorBuild {
                reason: e.to_string(),
            })?;
        Ok(Self { schema, validator })
    }

    /// Load and compile a JSON schema file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaValidationError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SchemaValidationError::SchemaLoad {
            path: path.display().to_string(),
            reason: format!("cannot read file: {e}"),
        })?;
        let schema: Value = serde_json::from_str(&content).map_err(|e| SchemaValidationError::SchemaLoad {
            path: path.display().to_string(),
            reason: format!("invalid JSON: {e}"),
        })?;
        Self::new(schema)
    }

    /// The subject schema this validator was compiled from.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// All violations of `data`, in validator order.
    pub fn violations(&self, data: &Value) -> Vec<ValidationError> {
        self.validator
            .iter_errors(data)
            .map(|e| {
                let schema_path = e.schema_path.to_string();
                ValidationError {
                    message: e.to_string(),
                    instance_path: e.instance_path.to_string(),
                    parent_schema: self.parent_schema_at(&schema_path),
                    schema_path,
                }
            })
            .collect()
    }

    /// Validate `data` and package it as form data.
    pub fn validate(&self, data: Value) -> CredentialFormData {
        let errors = self.violations(&data);
        CredentialFormData {
            data,
            errors,
            schema: self.schema.clone(),
        }
    }

    fn parent_schema_at(&self, schema_path: &str) -> SchemaNode {
        let parent = schema_path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("");
        self.schema
            .pointer(parent)
            .map(SchemaNode::from_json)
            .unwrap_or(SchemaNode::Opaque)
    }
}
