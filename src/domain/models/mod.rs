pub mod config;
pub mod evaluation;
pub mod session;

pub use config::{
    AgentConfig, Config, EvidenceStoreConfig, LoggingConfig, OracleConfig, StoreBackend,
};
pub use evaluation::{
    tools_called_in_order, EvaluationCase, EvaluationDataset, EvaluationReport, Golden,
    JudgeVerdict, EXPECTED_TOOL_ORDER,
};
pub use session::{
    AgentStep, Fragment, NextAction, SessionOutcome, SessionState, Termination,
    INSUFFICIENT_EVIDENCE,
};
