mod cli;
mod commands;
mod config;
mod error;
mod filter;
mod render;
mod server;
mod store;
mod types;

use clap::Parser;
use cli::{Cli, Commands};
use tracing::error;
use tracing_subscriber::EnvFilter;

const EXIT_FAILURE: i32 = 1;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log_level))
        .with_target(false)
        .init();

    let result = match &cli.command {
        Commands::Init(args) => commands::init(args),
        Commands::Serve(args) => commands::serve(args).await,
        Commands::List(args) => commands::list(args).await,
        Commands::Show(args) => commands::show(args).await,
        Commands::Schema => commands::schema(),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(EXIT_FAILURE);
    }
}
