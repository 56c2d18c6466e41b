pub mod generate;
pub mod lifecycle;
pub mod regenerate;
pub mod status;
pub mod templates;

use std::path::Path;

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};

use sitegen_core::{GenerationRecord, GenerationStatus, RecordId};
use sitegen_pipeline::Orchestrator;

use crate::config;

pub(crate) fn open(root: &Path) -> Result<Orchestrator> {
    let settings = config::load_settings(root)?;
    Orchestrator::open_at(root, &settings)
        .with_context(|| format!("cannot open data directory {}", root.display()))
}

pub(crate) fn parse_id(raw: &str) -> Result<RecordId> {
    raw.trim()
        .parse()
        .with_context(|| format!("'{raw}' is not a record id"))
}

pub(crate) fn status_label(status: GenerationStatus) -> ColoredString {
    let label = status.to_string();
    match status {
        GenerationStatus::Live => label.green().bold(),
        GenerationStatus::Error => label.red().bold(),
        _ => label.yellow(),
    }
}

/// One-line outcome for commands that finish a run.
pub(crate) fn print_outcome(record: &GenerationRecord) {
    match record.status {
        GenerationStatus::Live => println!(
            "{} {} is {} at {}",
            "✓".green(),
            record.domain,
            status_label(record.status),
            record.deployment_url.as_deref().unwrap_or("-"),
        ),
        _ => println!(
            "{} {} is {}: {}",
            "✗".red(),
            record.domain,
            status_label(record.status),
            record.error_message.as_deref().unwrap_or("no message"),
        ),
    }
    println!("  record: {}", record.id);
}

/// Non-zero exit for a run that ended in `ERROR`.
pub(crate) fn ensure_live(record: &GenerationRecord) -> Result<()> {
    if record.status == GenerationStatus::Live {
        return Ok(());
    }
    anyhow::bail!(
        "generation {} ended in {}: {}",
        record.id,
        record.status,
        record.error_message.as_deref().unwrap_or("no message")
    )
}
