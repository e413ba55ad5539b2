//! Scripted oracle for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::errors::OracleError;
use crate::domain::ports::{OracleRequest, OracleTask, ReasoningOracle};

/// One scripted reply.
#[derive(Debug, Clone)]
enum ScriptedReply {
    Text(String),
    Fail(String),
}

/// A response rule: matches on task and prompt substring, replies in order.
///
/// Replies are consumed one per matching call; the last reply repeats once
/// the list is exhausted.
#[derive(Debug, Clone)]
pub struct ScriptRule {
    task: OracleTask,
    needle: Option<String>,
    replies: Vec<ScriptedReply>,
    cursor: usize,
}

impl ScriptRule {
    pub fn new(task: OracleTask) -> Self {
        Self {
            task,
            needle: None,
            replies: Vec::new(),
            cursor: 0,
        }
    }

    /// Only match prompts containing `needle`.
    pub fn containing(mut self, needle: impl Into<String>) -> Self {
        self.needle = Some(needle.into());
        self
    }

    pub fn reply(mut self, text: impl Into<String>) -> Self {
        self.replies.push(ScriptedReply::Text(text.into()));
        self
    }

    /// Simulate a backend failure for this call.
    pub fn fail(mut self, message: impl Into<String>) -> Self {
        self.replies.push(ScriptedReply::Fail(message.into()));
        self
    }

    fn matches(&self, request: &OracleRequest) -> bool {
        self.task == request.task
            && self
                .needle
                .as_deref()
                .is_none_or(|needle| request.prompt.contains(needle))
    }

    fn next_reply(&mut self) -> Option<ScriptedReply> {
        let reply = self.replies.get(self.cursor).or_else(|| self.replies.last())?;
        let reply = reply.clone();
        self.cursor += 1;
        Some(reply)
    }
}

/// A recorded oracle call.
#[derive(Debug, Clone)]
pub struct OracleCall {
    pub task: OracleTask,
    pub prompt: String,
}

/// Deterministic oracle driven by ordered rules.
///
/// The first matching rule answers. A call no rule matches fails with
/// `OracleError::NoResponse`, which the agent treats like any other
/// backend failure.
pub struct ScriptedOracle {
    rules: Arc<RwLock<Vec<ScriptRule>>>,
    calls: Arc<RwLock<Vec<OracleCall>>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self {
            rules: Arc::new(RwLock::new(Vec::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create an oracle from a list of rules.
    pub fn with_rules(rules: Vec<ScriptRule>) -> Self {
        Self {
            rules: Arc::new(RwLock::new(rules)),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Add a rule after the existing ones.
    pub async fn push_rule(&self, rule: ScriptRule) {
        self.rules.write().await.push(rule);
    }

    /// Get all recorded calls, in order.
    pub async fn calls(&self) -> Vec<OracleCall> {
        self.calls.read().await.clone()
    }

    /// Get the recorded calls for one task.
    pub async fn calls_for(&self, task: OracleTask) -> Vec<OracleCall> {
        self.calls
            .read()
            .await
            .iter()
            .filter(|call| call.task == task)
            .cloned()
            .collect()
    }

    /// Clear recorded calls and rewind every rule.
    pub async fn reset(&self) {
        self.calls.write().await.clear();
        for rule in self.rules.write().await.iter_mut() {
            rule.cursor = 0;
        }
    }
}

impl Default for ScriptedOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReasoningOracle for ScriptedOracle {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn complete(&self, request: OracleRequest) -> Result<String, OracleError> {
        self.calls.write().await.push(OracleCall {
            task: request.task,
            prompt: request.prompt.clone(),
        });

        let reply = {
            let mut rules = self.rules.write().await;
            rules
                .iter_mut()
                .find(|rule| rule.matches(&request))
                .and_then(ScriptRule::next_reply)
        };

        match reply {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Fail(message)) => Err(OracleError::Unreachable(message)),
            None => Err(OracleError::NoResponse),
        }
    }

    async fn is_available(&self) -> Result<bool, OracleError> {
        Ok(true)
    }
}
