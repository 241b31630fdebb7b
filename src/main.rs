//! circlet - CLI companion for managing CircleCI contexts

use clap::Parser;

mod cli;
mod client;
mod config;
mod error;
mod git;
mod output;

use cli::{Cli, Commands, ContextCommands};
use client::CircleCiClient;
use config::Config;
use error::{ConfigError, Result};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Init => cli::init::run(cli.config.as_deref()),
        Commands::Status => cli::status::run(cli.config.as_deref()),
        Commands::Version => {
            println!("circlet version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Context(context_cmd) => {
            let config = Config::load_at(cli.config.as_deref())?;
            config.validate_auth()?;

            let token = config.token.clone().ok_or(ConfigError::MissingToken)?;
            let client = CircleCiClient::new(&config.host, token)?;
            let org = cli::context::resolve_organization(cli.org.as_deref(), cli.vcs, &config)?;

            match context_cmd {
                ContextCommands::List => cli::context::list(&client, &org, cli.format).await,
                ContextCommands::Show { name } => {
                    cli::context::show(&client, &org, &name, cli.format).await
                }
                ContextCommands::Create { name } => {
                    cli::context::create(&client, &org, &name).await
                }
                ContextCommands::Delete { name } => {
                    cli::context::delete(&client, &org, &name).await
                }
                ContextCommands::Store { context, variable } => {
                    cli::context::store(&client, &org, &context, &variable).await
                }
                ContextCommands::Remove { context, variable } => {
                    cli::context::remove(&client, &org, &context, &variable).await
                }
            }
        }
    }
}
