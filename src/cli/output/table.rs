//! Table output formatting for CLI commands
//!
//! Evaluation reports and health checks are rendered with comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::domain::models::{EvaluationReport, JudgeVerdict};

use super::truncate;

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    pub fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format an evaluation report, one row per golden
    pub fn format_evaluation(&self, report: &EvaluationReport) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Question").add_attribute(Attribute::Bold),
            Cell::new("Verdict").add_attribute(Attribute::Bold),
            Cell::new("Faithful").add_attribute(Attribute::Bold),
            Cell::new("Tools").add_attribute(Attribute::Bold),
            Cell::new("Evidence").add_attribute(Attribute::Bold),
            Cell::new("Iterations").add_attribute(Attribute::Bold),
            Cell::new("Termination").add_attribute(Attribute::Bold),
        ]);

        for (index, case) in report.cases.iter().enumerate() {
            let tools = if case.tool_correctness { "ok" } else { "missed" };

            let termination = match (&case.termination, &case.error) {
                (_, Some(error)) => format!("error: {}", truncate(error, 30)),
                (Some(termination), None) => termination.to_string(),
                (None, None) => "-".to_string(),
            };

            table.add_row(vec![
                Cell::new(index + 1),
                Cell::new(truncate(&case.input, 50)),
                self.verdict_cell(case.verdict),
                self.verdict_cell(case.faithfulness),
                Cell::new(tools),
                Cell::new(case.retrieval_context.len()),
                Cell::new(case.iterations),
                Cell::new(termination),
            ]);
        }

        table.to_string()
    }

    fn verdict_cell(&self, verdict: JudgeVerdict) -> Cell {
        let cell = Cell::new(verdict_label(verdict));
        if self.use_colors {
            cell.fg(verdict_color(verdict))
        } else {
            cell
        }
    }

    /// Format component health rows: (component, backend, reachable, detail)
    pub fn format_health(&self, rows: &[(&str, &str, bool, String)]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Component").add_attribute(Attribute::Bold),
            Cell::new("Backend").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Detail").add_attribute(Attribute::Bold),
        ]);

        for (component, backend, reachable, detail) in rows {
            let label = if *reachable { "ok" } else { "unavailable" };
            let status = if self.use_colors {
                Cell::new(label).fg(if *reachable { Color::Green } else { Color::Red })
            } else {
                Cell::new(label)
            };
            table.add_row(vec![
                Cell::new(component),
                Cell::new(backend),
                status,
                Cell::new(truncate(detail, 60)),
            ]);
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if the terminal supports colors
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::colors_enabled()
}

fn verdict_label(verdict: JudgeVerdict) -> &'static str {
    match verdict {
        JudgeVerdict::Pass => "pass",
        JudgeVerdict::Fail => "fail",
        JudgeVerdict::Inconclusive => "inconclusive",
    }
}

fn verdict_color(verdict: JudgeVerdict) -> Color {
    match verdict {
        JudgeVerdict::Pass => Color::Green,
        JudgeVerdict::Fail => Color::Red,
        JudgeVerdict::Inconclusive => Color::Yellow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{EvaluationCase, Termination};

    fn case(verdict: JudgeVerdict, error: Option<&str>) -> EvaluationCase {
        EvaluationCase {
            input: "What are the conditions for a valid Hindu marriage?".to_string(),
            expected_output: "No living spouse.".to_string(),
            actual_output: Some("1. No living spouse.".to_string()),
            retrieval_context: vec!["Section 5".to_string()],
            steps: Vec::new(),
            iterations: 2,
            termination: Some(Termination::Converged),
            verdict,
            faithfulness: JudgeVerdict::Fail,
            tool_correctness: error.is_none(),
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_format_evaluation() {
        let formatter = TableFormatter::with_config(false, Some(120));
        let report = EvaluationReport {
            cases: vec![
                case(JudgeVerdict::Pass, None),
                case(JudgeVerdict::Fail, Some("Retrieval unavailable")),
            ],
        };

        let table = formatter.format_evaluation(&report);

        assert!(table.contains("Verdict"));
        assert!(table.contains("Faithful"));
        assert!(table.contains("pass"));
        assert!(table.contains("fail"));
        assert!(table.contains("ok"));
        assert!(table.contains("missed"));
        assert!(table.contains("converged"));
        assert!(table.contains("error: Retrieval unavailable"));
    }

    #[test]
    fn test_format_health() {
        let formatter = TableFormatter::with_config(false, None);
        let rows = vec![
            ("oracle", "ollama", true, "http://localhost:11434".to_string()),
            ("evidence_store", "chroma", false, "connection refused".to_string()),
        ];

        let table = formatter.format_health(&rows);

        assert!(table.contains("unavailable"));
        assert!(table.contains("ollama"));
    }
}
