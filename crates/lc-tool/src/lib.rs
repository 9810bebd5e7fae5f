mod case;
mod runner;
mod source;

pub use case::{TestAction, TestCase, TESTCASE_SCHEMA_V1};
pub use runner::{assert_case, run_case, RunReport};
pub use source::{read_pack_files_from_dir, read_test_case};

use std::path::PathBuf;

use lc_core::ExecutionState;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LcToolError {
    #[error("Failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse testcase {path}: {source}")]
    ParseCase {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid testcase schema version \"{found}\", expected \"{expected}\".")]
    InvalidSchemaVersion { expected: String, found: String },
    #[error("No .json files under {path}.")]
    SourceEmpty { path: PathBuf },
    #[error("Pack error: {0}")]
    Pack(#[from] lc_api::PackError),
    #[error("Action missing at wait {wait_index}: script is {execution}.")]
    MissingAction {
        wait_index: usize,
        execution: &'static str,
    },
    #[error(
        "Action kind mismatch at wait {wait_index}: script is {execution}, got {actual_action_kind}."
    )]
    ActionKindMismatch {
        wait_index: usize,
        execution: &'static str,
        actual_action_kind: String,
    },
    #[error("Unused actions: used {used} of {total}.")]
    UnusedActions { used: usize, total: usize },
    #[error("Guard exceeded: max_steps={max_steps}.")]
    GuardExceeded { max_steps: usize },
    #[error("Expected execution {expected:?}, actual {actual:?}.")]
    ExecutionMismatch {
        expected: ExecutionState,
        actual: ExecutionState,
    },
    #[error("Expected event count {expected}, actual {actual}. observed={observed}")]
    EventCountMismatch {
        expected: usize,
        actual: usize,
        observed: String,
    },
    #[error("Event mismatch at index {index}. expected={expected} actual={actual}")]
    EventMismatch {
        index: usize,
        expected: String,
        actual: String,
    },
    #[error("Failed to serialize event for diff: {0}")]
    EventSerialize(serde_json::Error),
}

#[cfg(test)]
mod tool_test_support;
