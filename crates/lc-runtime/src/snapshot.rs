use lc_core::{
    Entity, ExecutionState, Loc, Npc, Obj, Player, PointerSet, ScriptError, ScriptValue,
};
use serde::{Deserialize, Serialize};

use crate::provider::ScriptProvider;
use crate::state::{ActiveSlots, GosubFrame, ScriptState};

pub const SCRIPT_SNAPSHOT_SCHEMA_V1: &str = "script-snapshot.v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSnapshot {
    pub script_id: i32,
    pub pc: i32,
    pub int_locals: Vec<i32>,
    pub string_locals: Vec<String>,
}

/// A suspended execution context. Scripts are stored by id and resolved again on restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptSnapshot {
    pub schema_version: String,
    pub root_script_id: i32,
    pub script_id: i32,
    pub pc: i32,
    pub execution: ExecutionState,
    pub execution_history: Vec<ExecutionState>,
    pub int_stack: Vec<i32>,
    pub string_stack: Vec<String>,
    pub int_locals: Vec<i32>,
    pub string_locals: Vec<String>,
    pub frames: Vec<FrameSnapshot>,
    pub pointers: PointerSet,
    #[serde(rename = "self")]
    pub self_entity: Option<Entity>,
    pub active_players: ActiveSlots<Player>,
    pub active_npcs: ActiveSlots<Npc>,
    pub active_locs: ActiveSlots<Loc>,
    pub active_objs: ActiveSlots<Obj>,
    pub last_int: i32,
    pub delay: Option<i32>,
    pub db_table: i32,
    pub db_row_query: Vec<i32>,
    pub db_cursor: usize,
    #[serde(default)]
    pub args: Vec<ScriptValue>,
}

impl ScriptSnapshot {
    pub fn capture(state: &ScriptState) -> Result<Self, ScriptError> {
        if !state.execution.is_suspended() {
            return Err(ScriptError::runtime(format!(
                "Snapshot is only allowed while suspended, state is {}.",
                state.execution.name()
            )));
        }

        let frames = state
            .frames
            .iter()
            .map(|frame| FrameSnapshot {
                script_id: frame.script.id,
                pc: frame.pc,
                int_locals: frame.int_locals.clone(),
                string_locals: frame.string_locals.clone(),
            })
            .collect();

        Ok(Self {
            schema_version: SCRIPT_SNAPSHOT_SCHEMA_V1.to_string(),
            root_script_id: state.root_script.id,
            script_id: state.script.id,
            pc: state.pc,
            execution: state.execution,
            execution_history: state.execution_history.clone(),
            int_stack: state.int_stack.clone(),
            string_stack: state.string_stack.clone(),
            int_locals: state.int_locals.clone(),
            string_locals: state.string_locals.clone(),
            frames,
            pointers: state.pointers,
            self_entity: state.self_entity,
            active_players: state.active_players,
            active_npcs: state.active_npcs,
            active_locs: state.active_locs,
            active_objs: state.active_objs,
            last_int: state.last_int,
            delay: state.delay,
            db_table: state.db_table,
            db_row_query: state.db_row_query.clone(),
            db_cursor: state.db_cursor,
            args: state.args.clone(),
        })
    }

    pub fn restore(self, scripts: &ScriptProvider) -> Result<ScriptState, ScriptError> {
        if self.schema_version != SCRIPT_SNAPSHOT_SCHEMA_V1 {
            return Err(ScriptError::runtime(format!(
                "Unsupported snapshot schema \"{}\".",
                self.schema_version
            )));
        }
        if !self.execution.is_suspended() {
            return Err(ScriptError::runtime(format!(
                "Snapshot execution state {} is not a suspension.",
                self.execution.name()
            )));
        }

        let script = scripts.require(self.script_id)?;
        let mut frames = Vec::with_capacity(self.frames.len());
        for frame in self.frames {
            frames.push(GosubFrame {
                script: scripts.require(frame.script_id)?,
                pc: frame.pc,
                int_locals: frame.int_locals,
                string_locals: frame.string_locals,
            });
        }
        if self.pc < -1 || i64::from(self.pc) >= script.len() as i64 {
            return Err(ScriptError::runtime(format!(
                "Snapshot pc {} is outside {}.",
                self.pc,
                script.name()
            )));
        }

        let mut state = ScriptState::new(scripts.require(self.root_script_id)?, self.args);
        state.script = script;
        state.pc = self.pc;
        state.execution = self.execution;
        state.execution_history = self.execution_history;
        state.frames = frames;
        state.int_stack = self.int_stack;
        state.string_stack = self.string_stack;
        state.int_locals = self.int_locals;
        state.string_locals = self.string_locals;
        state.pointers = self.pointers;
        state.self_entity = self.self_entity;
        state.active_players = self.active_players;
        state.active_npcs = self.active_npcs;
        state.active_locs = self.active_locs;
        state.active_objs = self.active_objs;
        state.last_int = self.last_int;
        state.delay = self.delay;
        state.db_table = self.db_table;
        state.db_row_query = self.db_row_query;
        state.db_cursor = self.db_cursor;
        Ok(state)
    }
}
