//! `sitegen undeploy <record-id>` and `sitegen delete <record-id>`

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use super::{open, parse_id, status_label};

#[derive(Args, Debug)]
pub struct UndeployArgs {
    pub record_id: String,
}

impl UndeployArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let id = parse_id(&self.record_id)?;
        let record = open(root)?
            .undeploy(&id)
            .with_context(|| format!("cannot undeploy {id}"))?;
        println!(
            "{} {} is offline; record is now {}",
            "✓".green(),
            record.domain,
            status_label(record.status)
        );
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub record_id: String,
}

impl DeleteArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let id = parse_id(&self.record_id)?;
        let record = open(root)?
            .delete(&id)
            .with_context(|| format!("cannot delete {id}"))?;
        println!(
            "{} Deleted record {} and the site for {}",
            "✓".green(),
            record.id,
            record.domain
        );
        Ok(())
    }
}
