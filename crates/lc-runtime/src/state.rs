use std::sync::Arc;

use lc_core::{
    Entity, ExecutionState, Loc, Npc, Obj, Player, PointerSet, Script, ScriptError,
    ScriptErrorKind, ScriptValue,
};
use serde::{Deserialize, Serialize};

use crate::runner::AbortReport;

pub const MAX_FRAMES: usize = 50;
pub const ACTIVE_SLOT_CAPACITY: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GosubFrame {
    pub script: Arc<Script>,
    /// pc of the call instruction in the caller.
    pub pc: i32,
    pub int_locals: Vec<i32>,
    pub string_locals: Vec<String>,
}

/// Up to two bound entities of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSlots<T> {
    slots: [Option<T>; ACTIVE_SLOT_CAPACITY],
}

impl<T> Default for ActiveSlots<T> {
    fn default() -> Self {
        Self {
            slots: [None, None],
        }
    }
}

impl<T: Copy> ActiveSlots<T> {
    pub fn bind(&mut self, entity: T) -> Result<usize, ScriptError> {
        let Some(index) = self.slots.iter().position(Option::is_none) else {
            return Err(ScriptError::capacity(
                "Attempting to have more than 2 active entities of the same type.",
            ));
        };
        self.slots[index] = Some(entity);
        Ok(index)
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.slots.get(index).copied().flatten()
    }

    pub fn set(&mut self, index: usize, entity: Option<T>) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = entity;
        }
    }

    pub fn first(&self) -> Option<T> {
        self.slots.iter().flatten().next().copied()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct ScriptState {
    pub script: Arc<Script>,
    pub execution: ExecutionState,
    pub execution_history: Vec<ExecutionState>,
    pub pc: i32,
    pub opcount: u32,
    pub frames: Vec<GosubFrame>,
    pub int_stack: Vec<i32>,
    pub string_stack: Vec<String>,
    pub int_locals: Vec<i32>,
    pub string_locals: Vec<String>,
    pub pointers: PointerSet,
    pub self_entity: Option<Entity>,
    pub active_players: ActiveSlots<Player>,
    pub active_npcs: ActiveSlots<Npc>,
    pub active_locs: ActiveSlots<Loc>,
    pub active_objs: ActiveSlots<Obj>,
    /// Value delivered by the simulation after a count dialog.
    pub last_int: i32,
    /// Ticks requested by the last timed suspension.
    pub delay: Option<i32>,
    pub db_table: i32,
    pub db_row_query: Vec<i32>,
    pub db_cursor: usize,
    pub abort_report: Option<AbortReport>,
    pub(crate) root_script: Arc<Script>,
    pub(crate) args: Vec<ScriptValue>,
}

fn split_args(script: &Script, args: &[ScriptValue]) -> (Vec<i32>, Vec<String>) {
    let mut int_locals = Vec::new();
    let mut string_locals = Vec::new();
    for arg in args {
        match arg {
            ScriptValue::Int(value) => int_locals.push(*value),
            ScriptValue::String(value) => string_locals.push(value.clone()),
        }
    }
    if int_locals.len() < script.int_local_count {
        int_locals.resize(script.int_local_count, 0);
    }
    if string_locals.len() < script.string_local_count {
        string_locals.resize(script.string_local_count, String::new());
    }
    (int_locals, string_locals)
}

fn pointer_missing(message: String) -> ScriptError {
    ScriptError::new(ScriptErrorKind::PointerMissing, message)
}

impl ScriptState {
    pub fn new(script: Arc<Script>, args: Vec<ScriptValue>) -> Self {
        let (int_locals, string_locals) = split_args(&script, &args);
        Self {
            root_script: Arc::clone(&script),
            script,
            execution: ExecutionState::Ready,
            execution_history: Vec::new(),
            pc: -1,
            opcount: 0,
            frames: Vec::new(),
            int_stack: Vec::new(),
            string_stack: Vec::new(),
            int_locals,
            string_locals,
            pointers: PointerSet::empty(),
            self_entity: None,
            active_players: ActiveSlots::default(),
            active_npcs: ActiveSlots::default(),
            active_locs: ActiveSlots::default(),
            active_objs: ActiveSlots::default(),
            last_int: 0,
            delay: None,
            db_table: -1,
            db_row_query: Vec::new(),
            db_cursor: 0,
            abort_report: None,
            args,
        }
    }

    /// Rewinds to a fresh invocation of the root script with the original arguments.
    pub fn reset(&mut self) {
        self.script = Arc::clone(&self.root_script);
        self.pc = -1;
        self.opcount = 0;
        self.frames.clear();
        self.int_stack.clear();
        self.string_stack.clear();
        let (int_locals, string_locals) = split_args(&self.script, &self.args);
        self.int_locals = int_locals;
        self.string_locals = string_locals;
        self.delay = None;
        self.db_table = -1;
        self.db_row_query.clear();
        self.db_cursor = 0;
        self.abort_report = None;
    }

    pub fn fp(&self) -> usize {
        self.frames.len()
    }

    pub fn int_operand(&self) -> i32 {
        self.script.int_operand(self.pc)
    }

    pub fn string_operand(&self) -> Result<String, ScriptError> {
        self.script
            .string_operand(self.pc)
            .map(str::to_string)
            .ok_or_else(|| {
                ScriptError::runtime(format!("Missing string operand at pc {}.", self.pc))
            })
    }

    pub fn push_int(&mut self, value: i32) {
        self.int_stack.push(value);
    }

    pub fn pop_int(&mut self) -> Result<i32, ScriptError> {
        self.int_stack
            .pop()
            .ok_or_else(|| ScriptError::stack_underflow("int"))
    }

    /// Pops `count` ints and returns them in the order they were pushed.
    pub fn pop_ints(&mut self, count: usize) -> Result<Vec<i32>, ScriptError> {
        if self.int_stack.len() < count {
            return Err(ScriptError::stack_underflow("int"));
        }
        let start = self.int_stack.len() - count;
        Ok(self.int_stack.split_off(start))
    }

    pub fn push_string(&mut self, value: impl Into<String>) {
        self.string_stack.push(value.into());
    }

    pub fn pop_string(&mut self) -> Result<String, ScriptError> {
        self.string_stack
            .pop()
            .ok_or_else(|| ScriptError::stack_underflow("string"))
    }

    pub fn pop_strings(&mut self, count: usize) -> Result<Vec<String>, ScriptError> {
        if self.string_stack.len() < count {
            return Err(ScriptError::stack_underflow("string"));
        }
        let start = self.string_stack.len() - count;
        Ok(self.string_stack.split_off(start))
    }

    pub fn push_value(&mut self, value: ScriptValue) {
        match value {
            ScriptValue::Int(value) => self.push_int(value),
            ScriptValue::String(value) => self.push_string(value),
        }
    }

    pub fn active_player(&self) -> Option<Player> {
        self.active_players.first()
    }

    pub fn active_npc(&self) -> Option<Npc> {
        self.active_npcs.first()
    }

    pub fn active_loc(&self) -> Option<Loc> {
        self.active_locs.first()
    }

    pub fn active_obj(&self) -> Option<Obj> {
        self.active_objs.first()
    }

    pub fn pointer_add(&mut self, pointer: PointerSet) {
        self.pointers.insert(pointer);
    }

    pub fn pointer_remove(&mut self, pointer: PointerSet) {
        self.pointers.remove(pointer);
    }

    pub fn pointer_check(&self, pointer: PointerSet) -> bool {
        self.pointers.contains(pointer)
    }

    /// Binds into the first free slot of the entity's category. Pointers are
    /// granted separately.
    pub fn bind_entity(&mut self, entity: Entity) -> Result<usize, ScriptError> {
        match entity {
            Entity::Player(player) => self.active_players.bind(player),
            Entity::Npc(npc) => self.active_npcs.bind(npc),
            Entity::Loc(loc) => self.active_locs.bind(loc),
            Entity::Obj(obj) => self.active_objs.bind(obj),
        }
    }

    /// Grants the plain pointer of every bound slot, plus the protected player
    /// pointers. Used when a caller has no narrower permission set in mind.
    pub fn grant_bound_pointers(&mut self) {
        let slots = [
            (
                self.active_players.len(),
                [
                    PointerSet::ACTIVE_PLAYER | PointerSet::PROTECTED_ACTIVE_PLAYER,
                    PointerSet::ACTIVE_PLAYER2 | PointerSet::PROTECTED_ACTIVE_PLAYER2,
                ],
            ),
            (
                self.active_npcs.len(),
                [PointerSet::ACTIVE_NPC, PointerSet::ACTIVE_NPC2],
            ),
            (
                self.active_locs.len(),
                [PointerSet::ACTIVE_LOC, PointerSet::ACTIVE_LOC2],
            ),
            (
                self.active_objs.len(),
                [PointerSet::ACTIVE_OBJ, PointerSet::ACTIVE_OBJ2],
            ),
        ];
        for (bound, pointers) in slots {
            for pointer in pointers.into_iter().take(bound) {
                self.pointer_add(pointer);
            }
        }
    }

    /// Slot index selected by the current instruction's operand.
    pub fn selected_slot(&self) -> usize {
        usize::from(self.int_operand() == 1)
    }

    pub fn require_player(&self) -> Result<Player, ScriptError> {
        self.require_player_slot(self.selected_slot() == 1, false)
    }

    pub fn require_protected_player(&self) -> Result<Player, ScriptError> {
        self.require_player_slot(self.selected_slot() == 1, true)
    }

    /// Player in an explicit slot, for opcodes whose operand encodes more than the slot.
    pub fn require_player_slot(
        &self,
        secondary: bool,
        protected: bool,
    ) -> Result<Player, ScriptError> {
        let pointer = if protected {
            PointerSet::pick(
                PointerSet::PROTECTED_ACTIVE_PLAYER,
                PointerSet::PROTECTED_ACTIVE_PLAYER2,
                secondary,
            )
        } else {
            PointerSet::pick(
                PointerSet::ACTIVE_PLAYER,
                PointerSet::ACTIVE_PLAYER2,
                secondary,
            )
        };
        self.require(pointer, self.active_players.get(usize::from(secondary)))
    }

    pub fn require_npc(&self) -> Result<Npc, ScriptError> {
        self.require_npc_slot(self.selected_slot() == 1)
    }

    pub fn require_npc_slot(&self, secondary: bool) -> Result<Npc, ScriptError> {
        let pointer = PointerSet::pick(PointerSet::ACTIVE_NPC, PointerSet::ACTIVE_NPC2, secondary);
        self.require(pointer, self.active_npcs.get(usize::from(secondary)))
    }

    pub fn require_loc(&self) -> Result<Loc, ScriptError> {
        let pointer = PointerSet::pick(
            PointerSet::ACTIVE_LOC,
            PointerSet::ACTIVE_LOC2,
            self.selected_slot() == 1,
        );
        self.require(pointer, self.active_locs.get(self.selected_slot()))
    }

    pub fn require_obj(&self) -> Result<Obj, ScriptError> {
        let pointer = PointerSet::pick(
            PointerSet::ACTIVE_OBJ,
            PointerSet::ACTIVE_OBJ2,
            self.selected_slot() == 1,
        );
        self.require(pointer, self.active_objs.get(self.selected_slot()))
    }

    fn require<T>(&self, pointer: PointerSet, slot: Option<T>) -> Result<T, ScriptError> {
        if !self.pointer_check(pointer) {
            return Err(pointer_missing(format!(
                "Required pointer {:?} is not granted.",
                pointer
            )));
        }
        slot.ok_or_else(|| pointer_missing(format!("Pointer {:?} has no bound entity.", pointer)))
    }

    /// Enters `callee`, keeping the caller on the frame stack.
    pub fn gosub(&mut self, callee: Arc<Script>, args: Vec<ScriptValue>) -> Result<(), ScriptError> {
        if self.frames.len() >= MAX_FRAMES {
            return Err(ScriptError::capacity(format!(
                "Call stack overflow: more than {} frames.",
                MAX_FRAMES
            )));
        }
        let (int_locals, string_locals) = split_args(&callee, &args);
        let caller = std::mem::replace(&mut self.script, callee);
        self.frames.push(GosubFrame {
            script: caller,
            pc: self.pc,
            int_locals: std::mem::replace(&mut self.int_locals, int_locals),
            string_locals: std::mem::replace(&mut self.string_locals, string_locals),
        });
        self.pc = -1;
        log::trace!("gosub {} (fp={})", self.script.name(), self.frames.len());
        Ok(())
    }

    /// Replaces the whole call chain with `target`.
    pub fn jump(&mut self, target: Arc<Script>, args: Vec<ScriptValue>) {
        let (int_locals, string_locals) = split_args(&target, &args);
        self.frames.clear();
        self.script = target;
        self.int_locals = int_locals;
        self.string_locals = string_locals;
        self.pc = -1;
    }

    /// Leaves the current script. Returns `false` when there is no caller.
    pub fn return_from_call(&mut self) -> bool {
        let Some(frame) = self.frames.pop() else {
            return false;
        };
        self.script = frame.script;
        self.pc = frame.pc;
        self.int_locals = frame.int_locals;
        self.string_locals = frame.string_locals;
        true
    }

    pub fn suspend(&mut self, execution: ExecutionState, delay: Option<i32>) {
        self.execution = execution;
        self.delay = delay;
    }
}

#[cfg(test)]
mod state_tests {
    use super::*;
    use crate::runtime_test_support::*;

    #[test]
    fn pops_fail_on_empty_stacks() {
        let mut state = ScriptState::new(script(0, vec![]), vec![]);
        let error = state.pop_int().expect_err("empty int pop should fail");
        assert_eq!(error.kind, ScriptErrorKind::StackUnderflow);
        let error = state.pop_string().expect_err("empty string pop should fail");
        assert_eq!(error.kind, ScriptErrorKind::StackUnderflow);
        state.push_int(1);
        let error = state.pop_ints(2).expect_err("short pop should fail");
        assert_eq!(error.kind, ScriptErrorKind::StackUnderflow);
        assert_eq!(state.int_stack, vec![1]);
    }

    #[test]
    fn pop_ints_returns_push_order() {
        let mut state = ScriptState::new(script(0, vec![]), vec![]);
        for value in [1, 2, 3, 4] {
            state.push_int(value);
        }
        assert_eq!(state.pop_ints(3).expect("pop should pass"), vec![2, 3, 4]);
        assert_eq!(state.pop_int().expect("pop should pass"), 1);
        state.push_string("a");
        state.push_string("b");
        assert_eq!(
            state.pop_strings(2).expect("pop should pass"),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn third_bind_is_a_capacity_violation_for_every_category() {
        let entities = [
            [player_entity(1), player_entity(2), player_entity(3)],
            [npc_entity(1, 0), npc_entity(2, 0), npc_entity(3, 0)],
            [loc_entity(1), loc_entity(2), loc_entity(3)],
            [obj_entity(1), obj_entity(2), obj_entity(3)],
        ];
        for [first, second, third] in entities {
            let mut state = ScriptState::new(script(0, vec![]), vec![]);
            state.bind_entity(first).expect("first bind should pass");
            state.bind_entity(second).expect("second bind should pass");
            let error = state.bind_entity(third).expect_err("third bind should fail");
            assert_eq!(error.kind, ScriptErrorKind::CapacityViolation);
        }
    }

    #[test]
    fn bind_fills_slots_in_order_without_granting_pointers() {
        let mut state = ScriptState::new(script(0, vec![]), vec![]);
        assert_eq!(state.bind_entity(npc_entity(4, 1)), Ok(0));
        assert_eq!(state.bind_entity(npc_entity(5, 1)), Ok(1));
        assert!(state.pointers.is_empty());
        assert_eq!(state.active_npc().map(|npc| npc.nid), Some(4));
        assert_eq!(state.active_npcs.get(1).map(|npc| npc.nid), Some(5));
        assert!(state.active_player().is_none());
    }

    #[test]
    fn require_fails_without_pointer_or_binding() {
        let mut state = ScriptState::new(script(0, vec![]), vec![]);
        let error = state.require_npc().expect_err("unbound npc should fail");
        assert_eq!(error.kind, ScriptErrorKind::PointerMissing);

        state.active_npcs.set(0, Some(Npc { nid: 1, type_id: 0 }));
        let error = state.require_npc().expect_err("npc without pointer should fail");
        assert_eq!(error.kind, ScriptErrorKind::PointerMissing);

        state.pointer_add(PointerSet::ACTIVE_NPC);
        assert_eq!(state.require_npc().map(|npc| npc.nid), Ok(1));

        state.bind_entity(player_entity(9)).expect("bind should pass");
        state.pointer_add(PointerSet::ACTIVE_PLAYER);
        let error = state
            .require_protected_player()
            .expect_err("unprotected player should fail");
        assert_eq!(error.kind, ScriptErrorKind::PointerMissing);
        assert_eq!(state.require_player().map(|player| player.pid), Ok(9));
    }

    #[test]
    fn args_fill_locals_by_type() {
        let mut body = script(0, vec![]);
        Arc::make_mut(&mut body).int_local_count = 3;
        let state = ScriptState::new(
            body,
            vec![
                ScriptValue::Int(7),
                ScriptValue::String("x".to_string()),
                ScriptValue::Int(8),
            ],
        );
        assert_eq!(state.int_locals, vec![7, 8, 0]);
        assert_eq!(state.string_locals, vec!["x".to_string()]);
    }

    #[test]
    fn reset_reinitializes_stacks_frames_and_locals() {
        let root = script(0, vec![]);
        let callee = script(1, vec![]);
        let mut state = ScriptState::new(Arc::clone(&root), vec![ScriptValue::Int(5)]);
        state.pc = 3;
        state.opcount = 40;
        state.push_int(1);
        state.push_string("s");
        state.int_locals[0] = 99;
        state.gosub(callee, vec![]).expect("gosub should pass");

        state.reset();
        assert_eq!(state.pc, -1);
        assert_eq!(state.opcount, 0);
        assert!(state.frames.is_empty());
        assert!(state.int_stack.is_empty());
        assert!(state.string_stack.is_empty());
        assert_eq!(state.int_locals, vec![5]);
        assert!(Arc::ptr_eq(&state.script, &root));
    }

    #[test]
    fn gosub_overflow_is_a_capacity_violation() {
        let mut state = ScriptState::new(script(0, vec![]), vec![]);
        for _ in 0..MAX_FRAMES {
            state
                .gosub(script(1, vec![]), vec![])
                .expect("gosub within capacity should pass");
        }
        let error = state
            .gosub(script(1, vec![]), vec![])
            .expect_err("overflow should fail");
        assert_eq!(error.kind, ScriptErrorKind::CapacityViolation);
        assert_eq!(state.fp(), MAX_FRAMES);
    }

    #[test]
    fn return_restores_caller_pc_and_locals() {
        let mut state = ScriptState::new(script(0, vec![]), vec![ScriptValue::Int(1)]);
        state.pc = 4;
        state
            .gosub(script(1, vec![]), vec![ScriptValue::Int(2)])
            .expect("gosub should pass");
        assert_eq!(state.int_locals, vec![2]);
        assert_eq!(state.pc, -1);
        assert!(state.return_from_call());
        assert_eq!(state.pc, 4);
        assert_eq!(state.int_locals, vec![1]);
        assert_eq!(state.script.id, 0);
        assert!(!state.return_from_call());
    }
}
