//! `sitegen regenerate <record-id> [--scheme <name>]`

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use super::{ensure_live, open, parse_id, print_outcome};

#[derive(Args, Debug)]
pub struct RegenerateArgs {
    pub record_id: String,

    /// Switch to another color scheme of the same template.
    #[arg(long)]
    pub scheme: Option<String>,
}

impl RegenerateArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let id = parse_id(&self.record_id)?;
        let record = open(root)?
            .regenerate(&id, self.scheme.as_deref())
            .with_context(|| format!("cannot regenerate {id}"))?;
        print_outcome(&record);
        ensure_live(&record)
    }
}
