use lc_api::{ScriptPack, SessionSnapshot};
use lc_core::ExecutionState;
use lc_runtime::{AbortReport, WorldEvent};
use serde::{Deserialize, Serialize};

pub(crate) const LC_SESSION_SCHEMA: &str = "lc-session.v1";

#[derive(Debug, Clone)]
pub(crate) struct LoadedPack {
    /// `pack-dir:<absolute path>`, stored in session state files.
    pub(crate) id: String,
    pub(crate) pack: ScriptPack,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionStateV1 {
    pub(crate) schema_version: String,
    pub(crate) pack_id: String,
    pub(crate) entry_script: String,
    #[serde(default)]
    pub(crate) instruction_budget: Option<u32>,
    pub(crate) snapshot: SessionSnapshot,
}

#[derive(Debug, Clone)]
pub(crate) struct BoundaryResult {
    pub(crate) execution: ExecutionState,
    pub(crate) events: Vec<WorldEvent>,
    pub(crate) abort: Option<AbortReport>,
}

impl BoundaryResult {
    /// Dialogs are the only boundaries worth saving; timed waits are settled first.
    pub(crate) fn awaits_input(&self) -> bool {
        matches!(
            self.execution,
            ExecutionState::PauseButton | ExecutionState::CountDown
        )
    }
}
