use clap::Parser;
use tracing_subscriber::EnvFilter;

mod backend;
mod cli;
mod commands;
mod output;
mod password;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so JSON output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("userstore=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::User(command) => commands::user::run(command, &cli.store, cli.format).await,
        Commands::Login(args) => commands::login::run(args, &cli.store, cli.format).await,
        Commands::Call(args) => commands::call::run(args, &cli.store, cli.format).await,
        Commands::Info => commands::info::run(&cli.store, cli.format).await,
    }
}
