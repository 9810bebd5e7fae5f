use lc_core::{Entity, ExecutionState, ScriptValue};
use lc_runtime::WorldEvent;
use serde::{Deserialize, Serialize};

pub const TESTCASE_SCHEMA_V1: &str = "lc-tool-case.v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub schema_version: String,
    pub entry_script: String,
    #[serde(default, rename = "self")]
    pub self_entity: Option<Entity>,
    #[serde(default)]
    pub active: Vec<Entity>,
    #[serde(default)]
    pub args: Vec<ScriptValue>,
    #[serde(default)]
    pub actions: Vec<TestAction>,
    #[serde(default = "default_expected_execution")]
    pub expected_execution: ExecutionState,
    #[serde(default)]
    pub expected_events: Vec<WorldEvent>,
}

fn default_expected_execution() -> ExecutionState {
    ExecutionState::Finished
}

/// The player's answer to a script waiting on outside input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TestAction {
    PauseButton,
    LastInt { value: i32 },
}

impl TestAction {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::PauseButton => "pauseButton",
            Self::LastInt { .. } => "lastInt",
        }
    }

    /// Whether this action answers a script suspended in `execution`.
    pub fn answers(&self, execution: ExecutionState) -> bool {
        matches!(
            (self, execution),
            (Self::PauseButton, ExecutionState::PauseButton)
                | (Self::LastInt { .. }, ExecutionState::CountDown)
        )
    }
}
