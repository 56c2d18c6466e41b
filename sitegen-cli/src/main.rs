//! sitegen: turn a client profile into a deployed one-page website.
//!
//! # Usage
//!
//! ```text
//! sitegen generate --owner <id> --domain <domain> --profile <file.yaml> [--template professional] [--scheme default] [--provider <name>]
//! sitegen regenerate <record-id> [--scheme <name>]
//! sitegen status [<record-id>] [--json]
//! sitegen undeploy <record-id>
//! sitegen delete <record-id>
//! sitegen templates
//! ```
//!
//! Global flags: `--root <dir>` (default `~/.sitegen`), `--log-json`.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    generate::GenerateArgs,
    lifecycle::{DeleteArgs, UndeployArgs},
    regenerate::RegenerateArgs,
    status::StatusArgs,
    templates::TemplatesArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "sitegen",
    version,
    about = "Generate, deploy and manage one-page websites for client profiles",
    long_about = None,
)]
struct Cli {
    /// Data directory holding records, builds and served sites.
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a generation record and run the pipeline to completion.
    Generate(GenerateArgs),

    /// Re-run a LIVE or ERROR record with the owner's stored profile.
    Regenerate(RegenerateArgs),

    /// Show one record, or every record.
    Status(StatusArgs),

    /// Take a LIVE site offline, keeping its build.
    Undeploy(UndeployArgs),

    /// Remove a record with its site and build.
    Delete(DeleteArgs),

    /// List available templates and their color schemes.
    Templates(TemplatesArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let root = config::resolve_root(cli.root)?;
    match cli.command {
        Commands::Generate(args) => args.run(&root),
        Commands::Regenerate(args) => args.run(&root),
        Commands::Status(args) => args.run(&root),
        Commands::Undeploy(args) => args.run(&root),
        Commands::Delete(args) => args.run(&root),
        Commands::Templates(args) => args.run(&root),
    }
}

/// `RUST_LOG` filter, `info` by default. Logs go to stderr so command output
/// on stdout stays parseable.
fn init_tracing(json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
