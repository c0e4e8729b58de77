//! fetchdelta CLI
//!
//! Command-line interface for fetchdelta

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "fetchdelta")]
#[command(about = "fetchdelta - change scripts for ordered, sectioned result sets", long_about = None)]
struct Cli {
    #[command(flatten)]
    store: commands::StoreArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch a JSON fixture against a cache and print the change notifications
    Fetch(commands::fetch::FetchArgs),
    /// Delete one cache, or every cache
    DeleteCache(commands::cache::DeleteCacheArgs),
    /// Print a persisted baseline
    Show(commands::cache::ShowArgs),
    /// List persisted cache names
    List,
}

fn main() {
    let cli = Cli::parse();

    let result = commands::open_store(&cli.store).and_then(|store| match cli.command {
        Commands::Fetch(args) => commands::fetch::execute(args, store),
        Commands::DeleteCache(args) => commands::cache::execute_delete(args, store),
        Commands::Show(args) => commands::cache::execute_show(args, store),
        Commands::List => commands::cache::execute_list(store),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
