use lc_core::ScriptError;

use super::bool_int;
use crate::opcode::ScriptOpcode;
use crate::registry::{HandlerTable, ScriptEnv};
use crate::state::ScriptState;

pub(crate) const HANDLERS: HandlerTable = &[
    (ScriptOpcode::ERROR, error),
    (ScriptOpcode::ACTIVE_NPC, active_npc),
    (ScriptOpcode::ACTIVE_PLAYER, active_player),
    (ScriptOpcode::ACTIVE_LOC, active_loc),
    (ScriptOpcode::ACTIVE_OBJ, active_obj),
];

fn error(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    Err(ScriptError::runtime(state.pop_string()?))
}

// The active_* checks only look at the slot; pointers are not required.

fn active_npc(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let bound = state.active_npcs.get(state.selected_slot()).is_some();
    state.push_int(bool_int(bound));
    Ok(())
}

fn active_player(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let bound = state.active_players.get(state.selected_slot()).is_some();
    state.push_int(bool_int(bound));
    Ok(())
}

fn active_loc(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let bound = state.active_locs.get(state.selected_slot()).is_some();
    state.push_int(bool_int(bound));
    Ok(())
}

fn active_obj(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let bound = state.active_objs.get(state.selected_slot()).is_some();
    state.push_int(bool_int(bound));
    Ok(())
}

#[cfg(test)]
mod debug_tests {
    use lc_core::{ExecutionState, ScriptErrorKind};

    use crate::opcode::ScriptOpcode::*;
    use crate::runtime_test_support::*;

    #[test]
    fn error_aborts_with_the_popped_message() {
        let main = script(
            0,
            vec![str_op(PUSH_CONSTANT_STRING, "boom"), op(ERROR), op(RETURN)],
        );
        let mut harness = Harness::new(vec![main]);
        let mut state = harness.init(0, None, &[], vec![]);
        assert_eq!(harness.run(&mut state), ExecutionState::Aborted);
        let report = state.abort_report.expect("abort should leave a report");
        assert_eq!(report.kind, ScriptErrorKind::Runtime);
        assert_eq!(report.message, "boom");
    }

    #[test]
    fn active_checks_follow_the_operand_slot() {
        let main = script(
            0,
            vec![
                op(ACTIVE_PLAYER),
                int(ACTIVE_PLAYER, 1),
                op(ACTIVE_NPC),
                op(ACTIVE_LOC),
                op(ACTIVE_OBJ),
                int(ACTIVE_OBJ, 1),
                op(RETURN),
            ],
        );
        let mut harness = Harness::new(vec![main]);
        let mut state = harness.init(
            0,
            Some(player_entity(1)),
            &[loc_entity(1), obj_entity(3), obj_entity(995)],
            vec![],
        );
        assert_eq!(harness.run(&mut state), ExecutionState::Finished);
        assert_eq!(state.int_stack, vec![1, 0, 0, 1, 1, 1]);
    }
}
