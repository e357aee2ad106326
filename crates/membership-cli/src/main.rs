//! Membership CLI - run a membership application through the same checks
//! the website applies.
//!
//! Reads an application as a flat JSON object of field name → value and
//! either validates it or runs the full submission lifecycle against the
//! simulated recipient.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use membership_core::form::SUBMITTING_LABEL;
use membership_core::{
    format_uk_phone, parse_date_of_birth, recommend_section, ApplicationForm, Config,
    MembershipForm, SimulatedSubmitter, SubmissionError, SubmissionSession,
};
use serde_json::{json, Value};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const USAGE: &str = "\
Usage:
  membership <application.json>          validate and submit an application
  membership --check <application.json>  validate only, print the result
  membership --recommend <YYYY-MM-DD>    recommend a section for a birth date
  membership --format-phone <number>     format a UK phone number";

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("--check") => check(Path::new(required_arg(&args, 2)?)),
        Some("--recommend") => recommend(required_arg(&args, 2)?),
        Some("--format-phone") => {
            println!("{}", format_uk_phone(required_arg(&args, 2)?));
            Ok(())
        }
        Some("--help") | Some("-h") => {
            println!("{}", USAGE);
            Ok(())
        }
        Some(path) => submit(Path::new(path)).await,
        None => bail!("missing arguments\n\n{}", USAGE),
    }
}

fn required_arg(args: &[String], index: usize) -> Result<&str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("missing argument\n\n{}", USAGE))
}

/// Load an application file.
///
/// String values are taken as-is. A checked checkbox may be given as `true`
/// and is posted as `on`; `false` and `null` are left out, as an unchecked
/// box is.
fn load_application(path: &Path) -> Result<ApplicationForm> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read application file: {}", path.display()))?;
    let raw: BTreeMap<String, Value> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse application file: {}", path.display()))?;

    let form = application_from_json(raw);
    debug!(fields = form.len(), path = %path.display(), "Loaded application");
    Ok(form)
}

fn application_from_json(raw: BTreeMap<String, Value>) -> ApplicationForm {
    raw.into_iter()
        .filter_map(|(name, value)| match value {
            Value::String(s) => Some((name, s)),
            Value::Bool(true) => Some((name, "on".to_string())),
            Value::Bool(false) | Value::Null => None,
            other => Some((name, other.to_string())),
        })
        .collect()
}

fn check(path: &Path) -> Result<()> {
    let application = load_application(path)?;
    let report = membership_core::validate(&application);
    println!("{}", serde_json::to_string_pretty(&report.summary())?);
    if let Some(alert) = report.alert() {
        eprintln!("{}", alert);
    }
    if !report.is_ok() {
        bail!("application is not valid");
    }
    Ok(())
}

fn recommend(dob: &str) -> Result<()> {
    let dob = parse_date_of_birth(dob)
        .ok_or_else(|| anyhow::anyhow!("not a date of birth: {}", dob))?;
    match recommend_section(dob) {
        Some(section) => println!("{} {} {}", section, section.display_name(), section.age_range()),
        None => println!("none"),
    }
    Ok(())
}

async fn submit(path: &Path) -> Result<()> {
    let config = Config::load()?;
    let application = load_application(path)?;

    let session = Arc::new(SubmissionSession::with_cooldown(config.cooldown()));
    let form = MembershipForm::new(session, SimulatedSubmitter::from_config(&config));

    eprintln!("{}", SUBMITTING_LABEL);
    match form.submit(&application).await {
        Ok(submission) => {
            info!(reference = %submission.ack.reference, "Application submitted");
            let output = json!({
                "status": "submitted",
                "reference": submission.ack.reference,
                "recipient": submission.ack.recipient,
                "received_at": submission.ack.received_at,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(SubmissionError::Rejected(report)) => {
            println!("{}", serde_json::to_string_pretty(&report.summary())?);
            if let Some(alert) = report.alert() {
                eprintln!("{}", alert);
            }
            bail!("application rejected");
        }
        Err(e) => Err(e.into()),
    }
}
