//! Implementation of the `themis chat` command.
//!
//! Reads questions from stdin until `exit` or end of input. Ctrl-C during a
//! session cancels it at the next transition; Ctrl-C at the prompt quits.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::output::{create_spinner, output};
use crate::domain::errors::AgentError;
use crate::domain::models::Config;

use super::ask::AskOutput;
use super::build_agent;

const PROMPT: &str = "Ask legal question: ";

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Print the evidence and reasoning trace after every answer
    #[arg(long)]
    pub show_trace: bool,
}

/// Whether a line ends the chat.
fn is_exit(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "exit" | "quit")
}

pub async fn execute(args: ChatArgs, config: &Config, json_mode: bool) -> Result<()> {
    let (agent, _) = build_agent(config)?;

    if !json_mode {
        println!("\n{} (type 'exit' to quit)\n", style("Legal Advisor Ready").bold());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if !json_mode {
            print!("{PROMPT}");
            std::io::stdout().flush().context("Failed to flush stdout")?;
        }

        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read from stdin")?,
            _ = tokio::signal::ctrl_c() => None,
        };

        let Some(line) = line else { break };
        if is_exit(&line) {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }

        let shutdown = agent.shutdown_handle();
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = shutdown.send(());
            }
        });

        let spinner = create_spinner("Researching...", json_mode);
        let result = agent.run(question).await;
        spinner.finish_and_clear();
        watcher.abort();

        match result {
            Ok(outcome) => output(
                &AskOutput {
                    outcome,
                    show_trace: args.show_trace,
                },
                json_mode,
            ),
            Err(AgentError::Cancelled(step)) => {
                eprintln!("{} session cancelled before {step}", style("!").yellow());
            }
            // A failed session should not end the chat
            Err(err) => eprintln!("{} {err}", style("Error:").red().bold()),
        }

        if !json_mode {
            println!("\n------------------------------------\n");
        }
    }

    Ok(())
}
