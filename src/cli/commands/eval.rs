//! Implementation of the `themis eval` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::output::{create_spinner, output, CommandOutput, ProgressBarExt, TableFormatter};
use crate::domain::models::{Config, EvaluationReport};
use crate::services::EvaluationService;

use super::build_agent;

#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Golden dataset (YAML or JSON) with `goldens: [{input, expected_output}]`
    pub dataset: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct EvalOutput {
    pub dataset: PathBuf,
    pub total: usize,
    pub passed: usize,
    pub pass_rate: f64,
    pub faithful: usize,
    pub tool_correct: usize,
    pub report: EvaluationReport,
}

impl From<(PathBuf, EvaluationReport)> for EvalOutput {
    fn from((dataset, report): (PathBuf, EvaluationReport)) -> Self {
        Self {
            dataset,
            total: report.cases.len(),
            passed: report.passed(),
            pass_rate: report.pass_rate(),
            faithful: report.faithful(),
            tool_correct: report.tool_correct(),
            report,
        }
    }
}

impl CommandOutput for EvalOutput {
    fn to_human(&self) -> String {
        let table = TableFormatter::new().format_evaluation(&self.report);
        format!(
            "{table}\n\nFaithful {}/{}, tools in order {}/{}\nPassed {}/{} ({:.1}%)",
            self.faithful,
            self.total,
            self.tool_correct,
            self.total,
            self.passed,
            self.total,
            self.pass_rate * 100.0
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: EvalArgs, config: &Config, json_mode: bool) -> Result<()> {
    let dataset = EvaluationService::load_dataset(&args.dataset)?;
    let (agent, oracle) = build_agent(config)?;
    let service = EvaluationService::new(agent, oracle);

    let spinner = create_spinner(
        format!("Evaluating {} goldens...", dataset.goldens.len()),
        json_mode,
    );
    let report = service.evaluate(&dataset).await;
    spinner.finish_success(format!("{}/{} passed", report.passed(), report.cases.len()));

    output(&EvalOutput::from((args.dataset, report)), json_mode);
    Ok(())
}
