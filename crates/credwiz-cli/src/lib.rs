//! # credwiz-cli: Issuance Wizard Command-Line Driver
//!
//! ## Subcommands
//!
//! - `validate`: validate subject data against a subject schema
//! - `repair`: fill schema constants until the data validates
//! - `walk`: drive a wizard session end to end and print each view
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to the domain crates and only format output.
//! - Handlers return the process exit code: 0 on success, 1 when the input
//!   is rejected. Operational failures are errors.

use std::path::Path;

use anyhow::{Context, Result};
use credwiz_core::WizardConfig;
use serde_json::Value;

pub mod repair;
pub mod validate;
pub mod walk;

/// Load the wizard configuration from `path`, or from `CREDWIZ_CONFIG`
/// when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<WizardConfig> {
    match path {
        Some(path) => WizardConfig::load(path).with_context(|| format!("failed to load config {}", path.display())),
        None => WizardConfig::from_env().context("failed to load config from environment"),
    }
}

/// Read a JSON document.
pub fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}
