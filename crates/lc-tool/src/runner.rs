use std::path::Path;

use lc_api::{load_pack_from_map, ScriptSession, StartSessionOptions};
use lc_core::ExecutionState;
use lc_runtime::WorldEvent;

use crate::source::{read_pack_files_from_dir, read_test_case};
use crate::{LcToolError, TestAction, TestCase};

const MAX_STEPS: usize = 5_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub observed_events: Vec<WorldEvent>,
    pub execution: ExecutionState,
    pub consumed_actions: usize,
    pub steps: usize,
}

pub fn run_case(pack_dir: &Path, case: &TestCase) -> Result<RunReport, LcToolError> {
    let files = read_pack_files_from_dir(pack_dir)?;
    let pack = load_pack_from_map(&files)?;
    let mut session = ScriptSession::start(StartSessionOptions {
        pack,
        entry_script: case.entry_script.clone(),
        self_entity: case.self_entity,
        active: case.active.clone(),
        pointers: None,
        args: case.args.clone(),
        world: None,
        instruction_budget: None,
    })?;

    let mut action_index = 0usize;
    let mut execution = session.step();

    for step in 1..=MAX_STEPS {
        match execution {
            ExecutionState::Finished | ExecutionState::Aborted => {
                if action_index != case.actions.len() {
                    return Err(LcToolError::UnusedActions {
                        used: action_index,
                        total: case.actions.len(),
                    });
                }
                return Ok(RunReport {
                    observed_events: session.take_events(),
                    execution,
                    consumed_actions: action_index,
                    steps: step,
                });
            }
            ExecutionState::PauseButton | ExecutionState::CountDown => {
                let action = case.actions.get(action_index).ok_or(
                    LcToolError::MissingAction {
                        wait_index: action_index,
                        execution: execution.name(),
                    },
                )?;
                if !action.answers(execution) {
                    return Err(LcToolError::ActionKindMismatch {
                        wait_index: action_index,
                        execution: execution.name(),
                        actual_action_kind: action.kind_name().to_string(),
                    });
                }
                let last_int = match action {
                    TestAction::LastInt { value } => Some(*value),
                    TestAction::PauseButton => None,
                };
                action_index += 1;
                execution = session.continue_dialog(last_int)?;
            }
            _ if execution.resumes_automatically() => {
                execution = session.wait()?;
            }
            _ => {
                execution = session.step();
            }
        }
    }

    Err(LcToolError::GuardExceeded {
        max_steps: MAX_STEPS,
    })
}

pub fn assert_case(pack_dir: &Path, case_path: &Path) -> Result<(), LcToolError> {
    let case = read_test_case(case_path)?;
    let report = run_case(pack_dir, &case)?;

    if report.execution != case.expected_execution {
        return Err(LcToolError::ExecutionMismatch {
            expected: case.expected_execution,
            actual: report.execution,
        });
    }

    if report.observed_events.len() != case.expected_events.len() {
        let observed = serde_json::to_string_pretty(&report.observed_events)
            .map_err(LcToolError::EventSerialize)?;
        return Err(LcToolError::EventCountMismatch {
            expected: case.expected_events.len(),
            actual: report.observed_events.len(),
            observed,
        });
    }

    for (index, (expected, actual)) in case
        .expected_events
        .iter()
        .zip(report.observed_events.iter())
        .enumerate()
    {
        if expected != actual {
            let expected = serde_json::to_string(expected).map_err(LcToolError::EventSerialize)?;
            let actual = serde_json::to_string(actual).map_err(LcToolError::EventSerialize)?;
            return Err(LcToolError::EventMismatch {
                index,
                expected,
                actual,
            });
        }
    }

    Ok(())
}
