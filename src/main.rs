//! Themis CLI entry point.

use anyhow::Context;
use clap::Parser;

use themis::cli::{Cli, Commands};
use themis::infrastructure::config::ConfigLoader;
use themis::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load_with_override(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => themis::cli::handle_error(err, cli.json),
    };

    let _logger = match LogConfig::try_from(&config.logging)
        .map_err(anyhow::Error::msg)
        .and_then(|log_config| LoggerImpl::init(&log_config))
        .context("Failed to initialize logging")
    {
        Ok(logger) => logger,
        Err(err) => themis::cli::handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Ask(args) => themis::cli::commands::ask::execute(args, &config, cli.json).await,
        Commands::Chat(args) => themis::cli::commands::chat::execute(args, &config, cli.json).await,
        Commands::Eval(args) => themis::cli::commands::eval::execute(args, &config, cli.json).await,
        Commands::Health(args) => {
            themis::cli::commands::health::execute(args, &config, cli.json).await
        }
    };

    if let Err(err) = result {
        themis::cli::handle_error(err, cli.json);
    }
}
