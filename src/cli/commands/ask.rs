//! Implementation of the `themis ask` command.

use anyhow::Result;
use clap::Args;
use console::style;
use serde::Serialize;

use crate::cli::output::{create_spinner, output, truncate, CommandOutput, ProgressBarExt};
use crate::domain::models::{Config, SessionOutcome};

use super::build_agent;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The legal question to answer
    pub question: String,

    /// Also print the evidence and the agent's reasoning trace
    #[arg(long)]
    pub show_trace: bool,
}

#[derive(Debug, Serialize)]
pub struct AskOutput {
    #[serde(flatten)]
    pub outcome: SessionOutcome,
    #[serde(skip)]
    pub show_trace: bool,
}

impl CommandOutput for AskOutput {
    fn to_human(&self) -> String {
        let outcome = &self.outcome;
        let mut lines = vec![
            style("Answer").bold().underlined().to_string(),
            outcome.answer.clone(),
        ];

        if self.show_trace {
            lines.push(String::new());
            lines.push(style(format!("Evidence ({})", outcome.evidence.len())).bold().to_string());
            for (index, fragment) in outcome.evidence.iter().enumerate() {
                lines.push(format!("  [{}] {}", index + 1, truncate(fragment.trim(), 100)));
            }

            lines.push(String::new());
            lines.push(style("Reasoning trace").bold().to_string());
            lines.push(outcome.reasoning_trace.trim().to_string());

            let steps: Vec<String> = outcome.visited.iter().map(ToString::to_string).collect();
            lines.push(String::new());
            lines.push(format!("Steps: {}", steps.join(" -> ")));
            lines.push(format!(
                "Iterations: {}  Termination: {}  Elapsed: {} ms",
                outcome.iterations, outcome.termination, outcome.elapsed_ms
            ));
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: AskArgs, config: &Config, json_mode: bool) -> Result<()> {
    let (agent, _) = build_agent(config)?;

    let spinner = create_spinner("Researching...", json_mode);
    let result = agent.run(&args.question).await;

    match result {
        Ok(outcome) => {
            spinner.finish_and_clear();
            output(
                &AskOutput {
                    outcome,
                    show_trace: args.show_trace,
                },
                json_mode,
            );
            Ok(())
        }
        Err(err) => {
            spinner.finish_error("Session failed");
            Err(err.into())
        }
    }
}
