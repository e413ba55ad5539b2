//! Command-line interface.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;

use commands::{ask::AskArgs, chat::ChatArgs, eval::EvalArgs, health::HealthArgs};

#[derive(Parser, Debug)]
#[command(name = "themis")]
#[command(about = "Themis - grounded legal question answering", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file replacing .themis/config.yaml and .themis/local.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer a single legal question
    Ask(AskArgs),
    /// Interactive question loop
    Chat(ChatArgs),
    /// Run a golden dataset through the agent and judge the answers
    Eval(EvalArgs),
    /// Check that the oracle and evidence store are reachable
    Health(HealthArgs),
}

/// Print an error and exit with status 1
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", style("Error:").red().bold());
    }
    std::process::exit(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask_with_globals() {
        let cli = Cli::try_parse_from([
            "themis",
            "ask",
            "What is required for a valid marriage?",
            "--show-trace",
            "--json",
            "--config",
            "custom.yaml",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
        match cli.command {
            Commands::Ask(args) => {
                assert_eq!(args.question, "What is required for a valid marriage?");
                assert!(args.show_trace);
            }
            other => panic!("Expected ask, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_eval_requires_dataset() {
        assert!(Cli::try_parse_from(["themis", "eval"]).is_err());

        let cli = Cli::try_parse_from(["themis", "eval", "goldens.yaml"]).unwrap();
        assert!(matches!(cli.command, Commands::Eval(_)));
    }

    #[test]
    fn test_parse_chat_and_health() {
        assert!(matches!(
            Cli::try_parse_from(["themis", "chat"]).unwrap().command,
            Commands::Chat(_)
        ));
        assert!(matches!(
            Cli::try_parse_from(["themis", "health", "--json"]).unwrap().command,
            Commands::Health(_)
        ));
    }
}
