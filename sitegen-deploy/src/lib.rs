//! # sitegen-deploy
//!
//! Writes rendered pages to the durable build location and publishes build
//! directories as served sites: staged copy, reverse-proxy config, manifest,
//! then an atomic swap into `<sites>/<domain>`.

pub mod deployer;
pub mod error;
pub mod manifest;
pub mod nginx;
pub mod writer;

pub use deployer::{DeployConfig, Deployer, Deployment};
pub use error::DeployError;
pub use manifest::{Manifest, ManifestEntry};
pub use writer::{remove_build, write_build};
