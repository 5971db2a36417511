//! # Walk Subcommand
//!
//! Drives one wizard session from mount to issuance against an in-memory
//! navigation host and a local offer generator, printing the view after
//! every step as a JSON line.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use clap::Args;
use credwiz_core::{CredentialTypeSelection, IssueMethod, IssueMethodSelection, WizardConfig};
use credwiz_schema::FormValidator;
use credwiz_state::{
    HistoryHost, OfferError, OfferGenerator, OfferOutcome, OfferRequest, QrValueResult, WizardController,
    WizardSession,
};

use crate::read_json;

/// Arguments for `credwiz walk`.
#[derive(Args, Debug)]
pub struct WalkArgs {
    /// Subject JSON schema.
    #[arg(long)]
    pub schema: PathBuf,

    /// Subject data entered at step 1.
    #[arg(long)]
    pub data: PathBuf,

    /// Credential type chosen at step 1.
    #[arg(long)]
    pub credential_type: String,

    /// Issue method confirmed at step 2 (`qrCode` or `walletUrl`).
    #[arg(long)]
    pub method: Option<String>,

    /// Wallet address submitted from the wallet-URL modal.
    #[arg(long)]
    pub wallet_url: Option<String>,

    /// Press "back" on the host instead of closing the modal.
    #[arg(long)]
    pub back: bool,

    /// Times the form is re-validated after constants are filled in.
    #[arg(long, default_value_t = 4)]
    pub passes: usize,
}

/// Produces offers locally, keyed by modal session.
#[derive(Debug, Default)]
pub struct LocalOfferGenerator;

#[async_trait]
impl OfferGenerator for LocalOfferGenerator {
    async fn generate(&self, request: OfferRequest) -> Result<QrValueResult, OfferError> {
        let id = request.modal.as_uuid().to_string();
        let credential = request
            .credential_type
            .map(|t| t.value)
            .unwrap_or_else(|| "unspecified".to_string());
        Ok(QrValueResult {
            uri_value: format!("openid-credential-offer://?credential_offer_uri=urn:credwiz:{id}&type={credential}"),
            id,
            expiry_in_sec: request.expiry_in_sec,
        })
    }
}

/// Execute the walk subcommand. Exits 1 if the wizard refuses to advance.
pub fn run_walk(args: &WalkArgs, config: &WizardConfig) -> Result<u8> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(walk(args, config))
}

async fn walk(args: &WalkArgs, config: &WizardConfig) -> Result<u8> {
    let validator = FormValidator::from_file(&args.schema).context("failed to load subject schema")?;
    let data = read_json(&args.data)?;

    let host = Arc::new(HistoryHost::new());
    let mut session = WizardSession::mount(config, host.clone());
    print_view("mount", session.controller());

    session
        .controller_mut()
        .on_select_credential_type_change(CredentialTypeSelection::new(args.credential_type.as_str()));
    enter_form_data(session.controller_mut(), &validator, data, args.passes);
    print_view("details", session.controller());

    if let Err(e) = session.controller_mut().advance() {
        eprintln!("cannot leave details: {e}");
        return Ok(1);
    }
    print_view("advance", session.controller());

    if let Some(method) = &args.method {
        let translations = config.translations();
        session
            .controller_mut()
            .on_issue_method_change(IssueMethodSelection::labelled(IssueMethod::from(method.as_str()), &translations));
    }
    if let Err(e) = session.controller_mut().advance() {
        eprintln!("cannot issue: {e}");
        return Ok(1);
    }
    print_view("dispatch", session.controller());

    if let OfferOutcome::Stored(offer) = session.generate_offer(&LocalOfferGenerator).await? {
        tracing::info!(offer_id = %offer.id, "offer ready");
    }
    print_view("offer", session.controller());

    if let Some(wallet_url) = &args.wallet_url {
        session
            .submit_wallet_url(&PrintingSubmitter, wallet_url)
            .await
            .context("wallet URL submission failed")?;
    }

    if args.back {
        host.go_back();
        session.pump_navigation();
        print_view("back", session.controller());
    } else if session.controller().show_qr_modal() {
        session.controller_mut().on_close_qr_modal();
        print_view("close", session.controller());
    } else if session.controller().show_wallet_url_modal() {
        session.controller_mut().on_close_wallet_url_modal();
        print_view("close", session.controller());
    } else {
        bail!("no issuance modal opened");
    }

    let controller = session.unmount();
    tracing::debug!(transitions = controller.transitions().len(), "walk finished");
    Ok(0)
}

/// Hand validated data to the controller, re-validating while constant
/// propagation keeps changing it.
fn enter_form_data(
    controller: &mut WizardController,
    validator: &FormValidator,
    data: serde_json::Value,
    passes: usize,
) {
    let mut data = data;
    for _ in 0..=passes {
        controller.on_credential_form_data_change(validator.validate(data.clone()));
        let Some(form) = controller.form_data() else {
            return;
        };
        if form.is_valid() || form.data == data {
            return;
        }
        data = form.data.clone();
    }
}

struct PrintingSubmitter;

#[async_trait]
impl credwiz_state::WalletUrlSubmitter for PrintingSubmitter {
    async fn submit(&self, wallet_url: &str, offer: &QrValueResult) -> Result<(), OfferError> {
        println!("{}", serde_json::json!({ "walletUrl": wallet_url, "offer": offer }));
        Ok(())
    }
}

fn print_view(label: &str, controller: &WizardController) {
    let line = serde_json::json!({ "event": label, "view": controller.view() });
    println!("{line}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    fn args(schema: &Path, data: &Path) -> WalkArgs {
        WalkArgs {
            schema: schema.to_path_buf(),
            data: data.to_path_buf(),
            credential_type: "VerifiedEmployee".to_string(),
            method: None,
            wallet_url: None,
            back: false,
            passes: 4,
        }
    }

    #[test]
    fn test_walk_repairs_and_issues() {
        let schema = write_temp(
            r#"{"type":"object","properties":{"type":{"const":"VerifiedEmployee"},"name":{"type":"string"}},"required":["type"]}"#,
        );
        let data = write_temp(r#"{"name":"Alice"}"#);
        let code = run_walk(&args(schema.path(), data.path()), &WizardConfig::default()).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_walk_stops_on_invalid_data() {
        let schema = write_temp(r#"{"type":"object","required":["name"]}"#);
        let data = write_temp("{}");
        let code = run_walk(&args(schema.path(), data.path()), &WizardConfig::default()).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn test_walk_rejects_unknown_method() {
        let schema = write_temp(r#"{"type":"object"}"#);
        let data = write_temp("{}");
        let mut a = args(schema.path(), data.path());
        a.method = Some("nfc".to_string());
        assert_eq!(run_walk(&a, &WizardConfig::default()).unwrap(), 1);
    }

    #[test]
    fn test_walk_wallet_url_with_back() {
        let schema = write_temp(r#"{"type":"object"}"#);
        let data = write_temp("{}");
        let mut a = args(schema.path(), data.path());
        a.method = Some("walletUrl".to_string());
        a.wallet_url = Some("https://wallet.example/receive".to_string());
        a.back = true;
        assert_eq!(run_walk(&a, &WizardConfig::default()).unwrap(), 0);
    }

    #[test]
    fn test_enter_form_data_converges() {
        let validator = FormValidator::new(serde_json::json!({
            "properties": { "type": { "const": "VerifiedEmployee" } },
            "required": ["type"]
        }))
        .unwrap();
        let mut controller = WizardController::default();
        enter_form_data(&mut controller, &validator, serde_json::json!({}), 4);
        assert!(!controller.disabled());
    }
}
