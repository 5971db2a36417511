//! # Validate Subcommand
//!
//! Validates subject data against a subject schema and lists each
//! violation with the schema fragment it belongs to.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use credwiz_schema::FormValidator;

use crate::read_json;

/// Arguments for `credwiz validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Subject JSON schema.
    #[arg(long)]
    pub schema: PathBuf,

    /// Subject data to validate.
    #[arg(long)]
    pub data: PathBuf,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let validator = FormValidator::from_file(&args.schema).context("failed to load subject schema")?;
    let data = read_json(&args.data)?;
    let form = validator.validate(data);

    if form.is_valid() {
        println!("OK: {}", args.data.display());
        return Ok(0);
    }

    println!("FAIL: {} ({} error(s))", args.data.display(), form.error_count());
    for error in &form.errors {
        println!("  {error}");
        println!("    schema: {}", error.schema_path);
    }
    Ok(1)
}
