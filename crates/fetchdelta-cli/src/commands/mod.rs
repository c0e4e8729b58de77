//! Subcommands and the options they share

pub mod cache;
pub mod fetch;

use clap::Args;
use fetchdelta_core::cache::SnapshotStore;
use fetchdelta_core::logging_facility;
use fetchdelta_store::{BackendKind, StoreConfig};
use std::path::PathBuf;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Cache selection, shared by every subcommand
#[derive(Debug, Args)]
pub struct StoreArgs {
    /// Config file; a missing file means defaults
    #[arg(long, global = true, env = "FETCHDELTA_CONFIG", default_value = "fetchdelta.toml")]
    pub config: PathBuf,

    /// Override `cache.backend` (fs, sqlite, memory)
    #[arg(long, global = true)]
    pub backend: Option<BackendKind>,

    /// Override `cache.root`
    #[arg(long, global = true)]
    pub cache_root: Option<PathBuf>,
}

/// Load config, apply flag overrides, start logging and open the store
pub fn open_store(args: &StoreArgs) -> Result<SnapshotStore, Box<dyn std::error::Error>> {
    let mut config = StoreConfig::load(&args.config)?;
    if let Some(backend) = args.backend {
        config.cache.backend = backend;
    }
    if let Some(root) = &args.cache_root {
        config.cache.root = root.clone();
    }

    logging_facility::init(config.logging.profile);
    Ok(config.open_store()?)
}
