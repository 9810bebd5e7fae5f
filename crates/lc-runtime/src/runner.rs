use std::sync::Arc;

use lc_core::{
    ConfigStore, Entity, ExecutionState, PointerSet, Script, ScriptError, ScriptErrorKind,
    ScriptValue,
};
use serde::{Deserialize, Serialize};

use crate::provider::ScriptProvider;
use crate::registry::{HandlerRegistry, ScriptEnv};
use crate::state::ScriptState;
use crate::world::World;

pub const DEFAULT_INSTRUCTION_BUDGET: u32 = 500_000;

#[derive(Clone)]
pub struct ScriptRunnerOptions {
    pub scripts: Arc<ScriptProvider>,
    pub config: Arc<ConfigStore>,
    pub instruction_budget: Option<u32>,
}

/// What an aborted invocation leaves behind for the operator or the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbortReport {
    pub kind: ScriptErrorKind,
    pub message: String,
    pub file: String,
    /// `name - file:line`, innermost first.
    pub backtrace: Vec<String>,
}

impl AbortReport {
    fn capture(state: &ScriptState, error: &ScriptError) -> Self {
        let mut backtrace = vec![frame_line(&state.script, state.pc)];
        backtrace.extend(
            state
                .frames
                .iter()
                .rev()
                .map(|frame| frame_line(&frame.script, frame.pc)),
        );
        Self {
            kind: error.kind,
            message: error.message.clone(),
            file: state.script.file_name().to_string(),
            backtrace,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("script error: {}", self.message),
            format!("file: {}", self.file),
            String::new(),
            "stack backtrace:".to_string(),
        ];
        lines.extend(
            self.backtrace
                .iter()
                .enumerate()
                .map(|(index, entry)| format!("    {}: {}", index + 1, entry)),
        );
        lines
    }
}

fn frame_line(script: &Script, pc: i32) -> String {
    format!(
        "{} - {}:{}",
        script.name(),
        script.file_name(),
        script.line_number(pc)
    )
}

pub struct ScriptRunner {
    registry: Arc<HandlerRegistry>,
    scripts: Arc<ScriptProvider>,
    config: Arc<ConfigStore>,
    instruction_budget: u32,
}

impl ScriptRunner {
    pub fn new(options: ScriptRunnerOptions) -> Result<Self, ScriptError> {
        Ok(Self {
            registry: Arc::new(HandlerRegistry::standard()?),
            scripts: options.scripts,
            config: options.config,
            instruction_budget: options
                .instruction_budget
                .unwrap_or(DEFAULT_INSTRUCTION_BUDGET),
        })
    }

    pub fn with_registry(options: ScriptRunnerOptions, registry: Arc<HandlerRegistry>) -> Self {
        Self {
            registry,
            scripts: options.scripts,
            config: options.config,
            instruction_budget: options
                .instruction_budget
                .unwrap_or(DEFAULT_INSTRUCTION_BUDGET),
        }
    }

    pub fn scripts(&self) -> &Arc<ScriptProvider> {
        &self.scripts
    }

    pub fn config(&self) -> &Arc<ConfigStore> {
        &self.config
    }

    pub fn init(
        script: Arc<Script>,
        primary: Option<Entity>,
        active: &[Entity],
        pointers: PointerSet,
        args: Vec<ScriptValue>,
    ) -> Result<ScriptState, ScriptError> {
        let mut state = ScriptState::new(script, args);
        state.self_entity = primary;
        state.pointer_add(pointers);
        if let Some(primary) = primary {
            state.bind_entity(primary)?;
        }
        for entity in active {
            state.bind_entity(*entity)?;
        }
        Ok(state)
    }

    pub fn execute(
        &self,
        state: &mut ScriptState,
        world: &mut dyn World,
        reset: bool,
        benchmark: bool,
    ) -> ExecutionState {
        if state.script.info.is_none() {
            state.execution = ExecutionState::Aborted;
            return state.execution;
        }
        if reset {
            state.reset();
        } else if state.execution.is_terminal() {
            log::warn!(
                "{} is {} and was not reset; refusing to re-enter",
                state.script.name(),
                state.execution.name()
            );
            return state.execution;
        }
        if !benchmark {
            state.opcount = 0;
        }

        if state.execution != ExecutionState::Running {
            state.execution_history.push(state.execution);
        }
        state.execution = ExecutionState::Running;
        state.delay = None;

        let mut env = ScriptEnv {
            world,
            scripts: &self.scripts,
            config: &self.config,
        };
        if let Err(error) = self.run_loop(state, &mut env, benchmark) {
            self.abort(state, env.world, error);
        }
        state.execution
    }

    fn run_loop(
        &self,
        state: &mut ScriptState,
        env: &mut ScriptEnv<'_>,
        benchmark: bool,
    ) -> Result<(), ScriptError> {
        while state.execution == ExecutionState::Running {
            let len = state.script.len() as i64;
            if i64::from(state.pc) >= len || state.pc < -1 {
                return Err(invalid_pc(state.pc, len));
            }
            if !benchmark && state.opcount >= self.instruction_budget {
                return Err(ScriptError::new(
                    ScriptErrorKind::InstructionBudgetExceeded,
                    format!(
                        "Too many instructions: {} executed without finishing.",
                        state.opcount
                    ),
                ));
            }
            state.opcount += 1;
            state.pc += 1;
            let opcode = state
                .script
                .opcode(state.pc)
                .ok_or_else(|| invalid_pc(state.pc, len))?;
            self.execute_inner(state, env, opcode)?;
        }
        Ok(())
    }

    pub fn execute_inner(
        &self,
        state: &mut ScriptState,
        env: &mut ScriptEnv<'_>,
        opcode: i32,
    ) -> Result<(), ScriptError> {
        let Some(handler) = self.registry.get(opcode) else {
            return Err(ScriptError::new(
                ScriptErrorKind::UnknownOpcode,
                format!("Unknown opcode {}", opcode),
            ));
        };
        handler(state, env)
    }

    fn abort(&self, state: &mut ScriptState, world: &mut dyn World, error: ScriptError) {
        let report = AbortReport::capture(state, &error);
        log::error!("{}", error);

        let player = match state.self_entity {
            Some(Entity::Player(player)) => Some(player.pid),
            _ => None,
        };
        for line in report.lines() {
            match player {
                Some(pid) => {
                    if let Err(delivery) = world.message_game(pid, &line) {
                        log::warn!("could not deliver script error to {}: {}", pid, delivery);
                        log::error!("{}", line);
                    }
                }
                None => log::error!("{}", line),
            }
        }

        state.abort_report = Some(report);
        state.execution = ExecutionState::Aborted;
    }
}

fn invalid_pc(pc: i32, len: i64) -> ScriptError {
    ScriptError::new(
        ScriptErrorKind::InvalidProgramCounter,
        format!("Invalid program counter: {}, max expected: {}", pc, len),
    )
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod runner_tests;
