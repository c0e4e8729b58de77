//! Cache maintenance: `delete-cache`, `show`, `list`

use crate::commands::CommandResult;
use clap::Args;
use fetchdelta_core::cache::SnapshotStore;
use fetchdelta_core::errors::{ExError, ExErrorKind};

#[derive(Debug, Args)]
pub struct DeleteCacheArgs {
    /// Cache to delete; omit to delete every cache
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[arg(long)]
    pub cache_name: String,
}

pub fn execute_delete(args: DeleteCacheArgs, store: SnapshotStore) -> CommandResult {
    store.delete(args.name.as_deref())?;
    match args.name {
        Some(name) => println!("Deleted cache '{}'", name),
        None => println!("Deleted all caches"),
    }
    Ok(())
}

pub fn execute_show(args: ShowArgs, store: SnapshotStore) -> CommandResult {
    let envelope = store.inspect(&args.cache_name)?.ok_or_else(|| {
        ExError::new(ExErrorKind::NotFound)
            .with_op("show_cache")
            .with_cache_name(args.cache_name.as_str())
            .with_message("No such cache")
    })?;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

pub fn execute_list(store: SnapshotStore) -> CommandResult {
    for name in store.cache_names()? {
        println!("{}", name);
    }
    Ok(())
}
