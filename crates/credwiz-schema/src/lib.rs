//! # credwiz-schema: Credential Form Schemas
//!
//! Everything the wizard knows about the credential subject form it
//! gathers at step 1.
//!
//! ## Schema Model (`node`)
//!
//! [`SchemaNode`] keeps only the parts of a JSON Schema the wizard acts
//! on: nested `properties` and `const` values. Everything else is opaque.
//!
//! ## Constant Propagation (`propagate`)
//!
//! [`propagate_const_defaults`] writes schema-declared constants into a
//! data tree wherever the data lacks a truthy value, creating intermediate
//! objects as needed. [`sync_const_values`] applies it to a form using the
//! parent schema of the first reported validation error.
//!
//! ## Form Validation (`validate`)
//!
//! [`FormValidator`] compiles a subject schema with the `jsonschema` crate
//! and produces [`CredentialFormData`] whose errors carry the schema
//! fragment that contains the violated keyword.
//!
//! ## Crate Policy
//!
//! - Malformed schemas or data never make propagation fail; it is a no-op.
//! - Validator construction is the only fallible operation.

pub mod form;
pub mod node;
pub mod propagate;
pub mod repair;
pub mod validate;

pub use form::{CredentialFormData, ValidationError};
pub use node::SchemaNode;
pub use propagate::{is_truthy, propagate_const_defaults, sync_const_values};
pub use repair::{repair_form, RepairOutcome};
pub use validate::{FormValidator, SchemaValidationError};
