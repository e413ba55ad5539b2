//! Agent nodes, the controller that drives them, and the evaluation harness.

pub mod agent;
pub mod answer;
pub mod convergence;
pub mod decision;
pub mod evaluation;
pub mod prompts;
pub mod response_parser;
pub mod retriever;
pub mod selector;

pub use agent::LegalAgent;
pub use answer::AnswerGenerator;
pub use convergence::check_convergence;
pub use decision::DecisionNode;
pub use evaluation::EvaluationService;
pub use response_parser::{parse_decision, parse_relevance, Decision, RelevanceVerdict};
pub use retriever::Retriever;
pub use selector::Selector;
