//! # Repair Subcommand
//!
//! Fills constants declared by the subject schema into the data, re-validating
//! between passes, and prints the result.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use credwiz_schema::{repair_form, FormValidator};

use crate::read_json;

/// Arguments for `credwiz repair`.
#[derive(Args, Debug)]
pub struct RepairArgs {
    /// Subject JSON schema.
    #[arg(long)]
    pub schema: PathBuf,

    /// Subject data to repair.
    #[arg(long)]
    pub data: PathBuf,

    /// Maximum propagation passes.
    #[arg(long, default_value_t = 4)]
    pub passes: usize,
}

/// Execute the repair subcommand. Exits 1 if the data is still invalid.
pub fn run_repair(args: &RepairArgs) -> Result<u8> {
    let validator = FormValidator::from_file(&args.schema).context("failed to load subject schema")?;
    let data = read_json(&args.data)?;
    let outcome = repair_form(&validator, data, args.passes);

    println!("{}", serde_json::to_string_pretty(&outcome.form.data)?);
    eprintln!(
        "{} value(s) written in {} pass(es), {} error(s) remaining",
        outcome.written,
        outcome.passes,
        outcome.form.error_count()
    );
    for error in &outcome.form.errors {
        eprintln!("  {error}");
    }

    Ok(if outcome.form.is_valid() { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_repairable_data_exits_zero() {
        let schema = write_temp(
            r#"{"type":"object","properties":{"type":{"const":"VerifiedEmployee"}},"required":["type"]}"#,
        );
        let data = write_temp("{}");
        let args = RepairArgs {
            schema: schema.path().to_path_buf(),
            data: data.path().to_path_buf(),
            passes: 4,
        };
        assert_eq!(run_repair(&args).unwrap(), 0);
    }

    #[test]
    fn test_unrepairable_data_exits_one() {
        let schema = write_temp(r#"{"type":"object","required":["name"]}"#);
        let data = write_temp("{}");
        let args = RepairArgs {
            schema: schema.path().to_path_buf(),
            data: data.path().to_path_buf(),
            passes: 4,
        };
        assert_eq!(run_repair(&args).unwrap(), 1);
    }
}
