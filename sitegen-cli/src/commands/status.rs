//! `sitegen status [<record-id>] [--json]`

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use sitegen_core::{GenerationRecord, GenerationStatus};

use super::{open, parse_id, status_label};

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Show one record in detail instead of the table.
    pub record_id: Option<String>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "record")]
    id: String,
    #[tabled(rename = "domain")]
    domain: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "template")]
    template: String,
    #[tabled(rename = "url / error")]
    outcome: String,
    #[tabled(rename = "updated")]
    updated: String,
}

impl StatusArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let orchestrator = open(root)?;

        if let Some(raw) = self.record_id.as_deref() {
            let id = parse_id(raw)?;
            let record = orchestrator
                .get_record(&id)
                .with_context(|| format!("cannot load {id}"))?;
            if self.json {
                return print_json(&record);
            }
            print_detail(&record);
            return Ok(());
        }

        let records = orchestrator.list().context("cannot list records")?;
        if self.json {
            return print_json(&records);
        }
        print_table(records);
        Ok(())
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(records: Vec<GenerationRecord>) {
    let live = records
        .iter()
        .filter(|r| r.status == GenerationStatus::Live)
        .count();
    let failed = records
        .iter()
        .filter(|r| r.status == GenerationStatus::Error)
        .count();
    println!(
        "sitegen v{} | {} records | {} live | {} failed",
        env!("CARGO_PKG_VERSION"),
        records.len(),
        live,
        failed,
    );

    if records.is_empty() {
        println!("No generation records.");
        return;
    }

    let rows: Vec<RecordRow> = records
        .into_iter()
        .map(|r| RecordRow {
            id: r.id.to_string(),
            domain: r.domain.to_string(),
            status: r.status.to_string(),
            template: format!("{}/{}", r.template_id, r.color_scheme_id),
            outcome: outcome(&r),
            updated: age(r.updated_at, Utc::now()),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if failed > 0 {
        println!("Run 'sitegen regenerate <record>' to retry failed records.");
    }
}

fn print_detail(record: &GenerationRecord) {
    println!("{} {}", record.domain.to_string().bold(), status_label(record.status));
    println!("  record:     {}", record.id);
    println!("  owner:      {}", record.owner_id);
    println!(
        "  template:   {} ({})",
        record.template_id, record.color_scheme_id
    );
    if let Some(scheme) = &record.presentation_scheme {
        println!("  motion:     {scheme}");
    }
    if let Some(source) = &record.content_source {
        println!("  content:    {source}");
    }
    if let Some(url) = &record.deployment_url {
        println!("  url:        {url}");
    }
    if let Some(error) = &record.error_message {
        println!("  error:      {}", error.red());
    }
    println!("  runs:       {}", record.generation_count);
    println!("  created:    {}", record.created_at.to_rfc3339());
    println!(
        "  updated:    {} ({})",
        record.updated_at.to_rfc3339(),
        age(record.updated_at, Utc::now())
    );
    if let Some(published) = record.published_at {
        println!("  published:  {}", published.to_rfc3339());
    }
}

fn outcome(record: &GenerationRecord) -> String {
    record
        .deployment_url
        .clone()
        .or_else(|| record.error_message.clone())
        .unwrap_or_else(|| "-".to_string())
}

/// Coarse "5m ago" style age.
fn age(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - at).num_seconds().max(0);
    match secs {
        0..=59 => format!("{secs}s ago"),
        60..=3_599 => format!("{}m ago", secs / 60),
        3_600..=86_399 => format!("{}h ago", secs / 3_600),
        _ => format!("{}d ago", secs / 86_400),
    }
}
