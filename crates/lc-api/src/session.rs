use lc_core::{Entity, ExecutionState, PointerSet, ScriptValue};
use lc_runtime::{
    SandboxWorld, ScriptRunner, ScriptSnapshot, ScriptState, WorldEvent,
};
use serde::{Deserialize, Serialize};

use crate::{PackError, ScriptPack};

pub const SESSION_SNAPSHOT_SCHEMA_V1: &str = "lc-session-snapshot.v1";

#[derive(Debug, Clone)]
pub struct StartSessionOptions {
    pub pack: ScriptPack,
    pub entry_script: String,
    pub self_entity: Option<Entity>,
    pub active: Vec<Entity>,
    /// `None` grants every pointer the bound entities allow.
    pub pointers: Option<PointerSet>,
    pub args: Vec<ScriptValue>,
    /// Overrides the pack's own world.
    pub world: Option<SandboxWorld>,
    pub instruction_budget: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct ResumeSessionOptions {
    pub pack: ScriptPack,
    pub snapshot: SessionSnapshot,
    pub instruction_budget: Option<u32>,
}

/// A suspended script together with the world it was running against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub schema_version: String,
    pub script: ScriptSnapshot,
    pub world: SandboxWorld,
}

/// One script invocation driven against a sandbox world.
pub struct ScriptSession {
    runner: ScriptRunner,
    state: ScriptState,
    world: SandboxWorld,
}

impl ScriptSession {
    /// Binds the entry script; nothing runs until [`ScriptSession::step`].
    pub fn start(options: StartSessionOptions) -> Result<Self, PackError> {
        let runner = options.pack.runner(options.instruction_budget)?;
        let script = options.pack.resolve_entry(&options.entry_script)?;
        let mut state = ScriptRunner::init(
            script,
            options.self_entity,
            &options.active,
            options.pointers.unwrap_or_else(PointerSet::empty),
            options.args,
        )?;
        if options.pointers.is_none() {
            state.grant_bound_pointers();
        }
        let world = options
            .world
            .or(options.pack.world)
            .unwrap_or_default();
        Ok(Self {
            runner,
            state,
            world,
        })
    }

    pub fn resume(options: ResumeSessionOptions) -> Result<Self, PackError> {
        let SessionSnapshot {
            schema_version,
            script,
            world,
        } = options.snapshot;
        if schema_version != SESSION_SNAPSHOT_SCHEMA_V1 {
            return Err(PackError::SnapshotSchema {
                found: schema_version,
            });
        }
        let runner = options.pack.runner(options.instruction_budget)?;
        let state = script.restore(runner.scripts())?;
        Ok(Self {
            runner,
            state,
            world,
        })
    }

    pub fn state(&self) -> &ScriptState {
        &self.state
    }

    pub fn execution(&self) -> ExecutionState {
        self.state.execution
    }

    pub fn world(&self) -> &SandboxWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut SandboxWorld {
        &mut self.world
    }

    pub fn take_events(&mut self) -> Vec<WorldEvent> {
        self.world.take_events()
    }

    /// One `execute` call.
    pub fn step(&mut self) -> ExecutionState {
        self.runner
            .execute(&mut self.state, &mut self.world, false, false)
    }

    /// Ticks the world through a timed wait, then re-enters.
    pub fn wait(&mut self) -> Result<ExecutionState, PackError> {
        let execution = self.state.execution;
        if !execution.resumes_automatically() {
            return Err(PackError::NotWaiting {
                execution: execution.name(),
            });
        }
        let ticks = self.state.delay.unwrap_or(1).max(1);
        for _ in 0..ticks {
            self.world.tick();
        }
        log::debug!("waited {} ticks, clock={}", ticks, self.world.clock);
        Ok(self.step())
    }

    /// Delivers the player's answer to a pause button or count dialog.
    pub fn continue_dialog(&mut self, last_int: Option<i32>) -> Result<ExecutionState, PackError> {
        match self.state.execution {
            ExecutionState::PauseButton => {}
            ExecutionState::CountDown => {
                self.state.last_int = last_int.ok_or(PackError::MissingLastInt)?;
            }
            other => {
                return Err(PackError::NotWaiting {
                    execution: other.name(),
                })
            }
        }
        Ok(self.step())
    }

    /// Follows timed waits until the script ends or needs outside input.
    pub fn settle(&mut self, max_waits: usize) -> Result<ExecutionState, PackError> {
        let mut waits = 0;
        while self.state.execution.resumes_automatically() {
            if waits == max_waits {
                return Err(PackError::WaitLimit { max_waits });
            }
            waits += 1;
            self.wait()?;
        }
        Ok(self.state.execution)
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot, PackError> {
        Ok(SessionSnapshot {
            schema_version: SESSION_SNAPSHOT_SCHEMA_V1.to_string(),
            script: ScriptSnapshot::capture(&self.state)?,
            world: self.world.clone(),
        })
    }
}

#[cfg(test)]
mod session_tests {
    use lc_core::{ExecutionState, ScriptErrorKind};
    use lc_runtime::WorldEvent;

    use super::*;
    use crate::api_test_support::*;
    use crate::load_pack_from_map;

    fn options(entry: &str) -> StartSessionOptions {
        StartSessionOptions {
            pack: load_pack_from_map(&greeting_pack()).expect("pack should load"),
            entry_script: entry.to_string(),
            self_entity: Some(bob()),
            active: Vec::new(),
            pointers: None,
            args: Vec::new(),
            world: None,
            instruction_budget: None,
        }
    }

    fn messages(events: Vec<WorldEvent>) -> Vec<String> {
        events
            .into_iter()
            .filter_map(|event| match event {
                WorldEvent::Message { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn start_then_step_runs_to_the_end() {
        let mut session = ScriptSession::start(options("greet")).expect("session should start");
        assert_eq!(session.execution(), ExecutionState::Ready);
        assert_eq!(session.step(), ExecutionState::Finished);
        assert_eq!(messages(session.take_events()), vec!["Hello bob".to_string()]);
    }

    #[test]
    fn settle_ticks_through_delays() {
        let mut session = ScriptSession::start(options("patience")).expect("session should start");
        assert_eq!(session.step(), ExecutionState::Suspended);
        assert_eq!(session.state().delay, Some(3));
        assert_eq!(session.settle(10).expect("settle"), ExecutionState::Finished);
        assert_eq!(session.world().clock, 3);
        assert_eq!(
            messages(session.take_events()),
            vec!["before".to_string(), "after".to_string()]
        );
    }

    #[test]
    fn settle_gives_up_after_the_wait_limit() {
        let mut session = ScriptSession::start(options("patience")).expect("session should start");
        session.step();
        let error = session.settle(0).expect_err("limit should trip");
        assert_eq!(error.code(), "SESSION_WAIT_LIMIT");
    }

    #[test]
    fn snapshot_and_resume_keep_world_and_stack() {
        let mut session = ScriptSession::start(options("patience")).expect("session should start");
        session.step();
        let snapshot = session.snapshot().expect("snapshot");
        let json = serde_json::to_string(&snapshot).expect("snapshot should serialize");
        let snapshot: SessionSnapshot = serde_json::from_str(&json).expect("snapshot should parse");

        let mut resumed = ScriptSession::resume(ResumeSessionOptions {
            pack: load_pack_from_map(&greeting_pack()).expect("pack should load"),
            snapshot,
            instruction_budget: None,
        })
        .expect("resume should pass");
        assert_eq!(resumed.execution(), ExecutionState::Suspended);
        assert_eq!(resumed.world().events.len(), 1);
        assert_eq!(resumed.wait().expect("wait"), ExecutionState::Finished);
    }

    #[test]
    fn resume_rejects_unknown_schema() {
        let mut session = ScriptSession::start(options("patience")).expect("session should start");
        session.step();
        let mut snapshot = session.snapshot().expect("snapshot");
        snapshot.schema_version = "lc-session-snapshot.v0".to_string();
        let error = ScriptSession::resume(ResumeSessionOptions {
            pack: load_pack_from_map(&greeting_pack()).expect("pack should load"),
            snapshot,
            instruction_budget: None,
        })
        .err()
        .expect("schema should fail");
        assert_eq!(error.code(), "SESSION_SNAPSHOT_SCHEMA");
    }

    #[test]
    fn snapshot_of_a_finished_session_fails() {
        let mut session = ScriptSession::start(options("greet")).expect("session should start");
        session.step();
        let error = session.snapshot().expect_err("finished session");
        assert!(matches!(error, PackError::Script(ref inner) if inner.kind == ScriptErrorKind::Runtime));
    }

    #[test]
    fn wait_and_dialog_check_the_current_state() {
        let mut session = ScriptSession::start(options("greet")).expect("session should start");
        let error = session.wait().expect_err("ready is not a timed wait");
        assert_eq!(error.code(), "SESSION_NOT_WAITING");
        let error = session
            .continue_dialog(Some(1))
            .expect_err("ready is not a dialog");
        assert!(matches!(error, PackError::NotWaiting { execution: "READY" }));
    }
}
