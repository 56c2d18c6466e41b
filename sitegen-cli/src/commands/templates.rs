//! `sitegen templates`

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use super::open;

#[derive(Args, Debug)]
pub struct TemplatesArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct TemplateRow {
    #[tabled(rename = "template")]
    id: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "color schemes")]
    schemes: String,
    #[tabled(rename = "source")]
    source: &'static str,
}

impl TemplatesArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let templates = open(root)?.templates().context("cannot list templates")?;
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&templates)
                    .context("failed to serialize templates JSON")?
            );
            return Ok(());
        }

        let rows: Vec<TemplateRow> = templates
            .into_iter()
            .map(|t| TemplateRow {
                id: t.id,
                name: t.name,
                schemes: t.color_schemes.join(", "),
                source: if t.builtin { "built-in" } else { "user" },
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
