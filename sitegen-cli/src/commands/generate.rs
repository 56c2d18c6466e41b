//! `sitegen generate --owner <id> --domain <d> --profile <file.yaml> ...`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use sitegen_core::{Domain, GenerationRequest, OwnerId, ProfileInput};
use sitegen_pipeline::{Dispatcher, PipelineError};

use super::{ensure_live, open, print_outcome};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Owner of the site; their profile is stored for later regeneration.
    #[arg(long)]
    pub owner: String,

    #[arg(long)]
    pub domain: String,

    /// YAML file with the client profile (name, profession, bio, services, ...).
    #[arg(long, value_name = "FILE")]
    pub profile: PathBuf,

    #[arg(long, default_value = "professional")]
    pub template: String,

    /// Color scheme defined by the template.
    #[arg(long, default_value = "default")]
    pub scheme: String,

    /// Content provider to try first.
    #[arg(long)]
    pub provider: Option<String>,
}

impl GenerateArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let profile = read_profile(&self.profile)?;
        let domain = Domain::parse(&self.domain)
            .with_context(|| format!("invalid domain '{}'", self.domain))?;
        let request = GenerationRequest {
            owner_id: OwnerId::from(self.owner),
            domain,
            profile,
            template_id: self.template,
            color_scheme_id: self.scheme,
        };

        let dispatcher = Dispatcher::new(Arc::new(open(root)?));
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("cannot start async runtime")?;

        let record = runtime.block_on(async {
            let run = dispatcher.start_generation(request, self.provider)?;
            println!("Accepted record {}", run.id);
            run.wait().await
        });
        let record = match record {
            Ok(record) => record,
            Err(e @ PipelineError::DuplicateDomain { .. }) => {
                return Err(e).context("pick another domain or regenerate the existing record")
            }
            Err(e) => return Err(e).context("generation did not complete"),
        };

        print_outcome(&record);
        ensure_live(&record)
    }
}

fn read_profile(path: &Path) -> Result<ProfileInput> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read profile {}", path.display()))?;
    serde_yaml::from_str(&raw).with_context(|| format!("invalid profile {}", path.display()))
}
