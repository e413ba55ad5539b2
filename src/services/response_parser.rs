//! Parsers turning free-form oracle text into tagged results.
//!
//! Nothing outside this module inspects raw oracle output. Both parsers are
//! total: any input maps to a variant, and the conservative reading wins
//! whenever the text is unclear.

use serde::{Deserialize, Serialize};

use crate::domain::models::NextAction;

/// Action requested by the decision node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Retrieve,
    Answer,
    /// No clear action in the response
    Unparseable,
}

impl Decision {
    /// Routing token for this decision. Anything but a clear `retrieve`
    /// ends the loop.
    pub fn next_action(self) -> NextAction {
        match self {
            Self::Retrieve => NextAction::Retrieve,
            Self::Answer | Self::Unparseable => NextAction::Answer,
        }
    }
}

/// Binary classification verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceVerdict {
    Relevant,
    Irrelevant,
    /// Neither or both of YES/NO present
    Ambiguous,
}

impl RelevanceVerdict {
    /// Only an unambiguous YES counts.
    pub fn is_affirmative(self) -> bool {
        self == Self::Relevant
    }
}

/// Parse a `Thought: ... / Action: ...` response.
///
/// The last `Action:` line wins. Its value must name exactly one of
/// `retrieve` or `answer`. A response without an `Action:` line is accepted
/// only when it is a single bare action word.
pub fn parse_decision(response: &str) -> Decision {
    let action_value = response.lines().rev().find_map(action_line_value);

    match action_value {
        Some(value) => decision_from_words(value),
        None if response.split_whitespace().count() == 1 => decision_from_words(response),
        None => Decision::Unparseable,
    }
}

fn action_line_value(line: &str) -> Option<&str> {
    let line = line.trim().trim_start_matches(['*', '-', '#', '>', ' ']);
    let (label, value) = line.split_once(':')?;
    label
        .trim()
        .trim_matches('*')
        .eq_ignore_ascii_case("action")
        .then_some(value)
}

fn decision_from_words(text: &str) -> Decision {
    let mut retrieve = false;
    let mut answer = false;
    for word in words(text) {
        match word.to_ascii_lowercase().as_str() {
            "retrieve" => retrieve = true,
            "answer" => answer = true,
            _ => {}
        }
    }

    match (retrieve, answer) {
        (true, false) => Decision::Retrieve,
        (false, true) => Decision::Answer,
        _ => Decision::Unparseable,
    }
}

/// Parse a one-word YES/NO classification response.
pub fn parse_relevance(response: &str) -> RelevanceVerdict {
    let mut yes = false;
    let mut no = false;
    for word in words(response) {
        if word.eq_ignore_ascii_case("yes") {
            yes = true;
        } else if word.eq_ignore_ascii_case("no") {
            no = true;
        }
    }

    match (yes, no) {
        (true, false) => RelevanceVerdict::Relevant,
        (false, true) => RelevanceVerdict::Irrelevant,
        _ => RelevanceVerdict::Ambiguous,
    }
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|word| !word.is_empty())
}
