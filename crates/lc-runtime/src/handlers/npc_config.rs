use lc_core::ScriptError;

use super::{name_or_null, pop_array, push_param};
use crate::opcode::ScriptOpcode;
use crate::registry::{HandlerTable, ScriptEnv};
use crate::state::ScriptState;

pub(crate) const HANDLERS: HandlerTable = &[
    (ScriptOpcode::NC_CATEGORY, nc_category),
    (ScriptOpcode::NC_DEBUGNAME, nc_debugname),
    (ScriptOpcode::NC_DESC, nc_desc),
    (ScriptOpcode::NC_NAME, nc_name),
    (ScriptOpcode::NC_PARAM, nc_param),
];

fn nc_category(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let npc_type = env.config.npc(state.pop_int()?)?;
    state.push_int(npc_type.category);
    Ok(())
}

fn nc_debugname(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let npc_type = env.config.npc(state.pop_int()?)?;
    state.push_string(npc_type.debugname.clone());
    Ok(())
}

fn nc_desc(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let npc_type = env.config.npc(state.pop_int()?)?;
    state.push_string(name_or_null(npc_type.desc.as_ref()));
    Ok(())
}

fn nc_name(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let npc_type = env.config.npc(state.pop_int()?)?;
    state.push_string(name_or_null(npc_type.name.as_ref()));
    Ok(())
}

fn nc_param(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let [type_id, param] = pop_array(state)?;
    let npc_type = env.config.npc(type_id)?;
    let (var_type, value) = env.config.resolve_param(&npc_type.params, param)?;
    push_param(state, var_type, value)
}

#[cfg(test)]
mod npc_config_tests {
    use lc_core::{ExecutionState, ScriptErrorKind};

    use crate::opcode::ScriptOpcode::*;
    use crate::runtime_test_support::*;

    #[test]
    fn reads_type_fields_without_an_active_npc() {
        let main = script(
            0,
            vec![
                int(PUSH_CONSTANT_INT, 2),
                op(NC_CATEGORY),
                int(PUSH_CONSTANT_INT, 2),
                op(NC_DEBUGNAME),
                int(PUSH_CONSTANT_INT, 2),
                op(NC_DESC),
                int(PUSH_CONSTANT_INT, 4),
                op(NC_NAME),
                int(PUSH_CONSTANT_INT, 4),
                int(PUSH_CONSTANT_INT, 1),
                op(NC_PARAM),
                op(RETURN),
            ],
        );
        let mut harness = Harness::new(vec![main]);
        let mut state = harness.init(0, None, &[], vec![]);
        assert_eq!(harness.run(&mut state), ExecutionState::Finished);
        assert_eq!(state.int_stack, vec![7, 4]);
        assert_eq!(
            state.string_stack,
            vec!["guard".to_string(), "On duty.".to_string(), "null".to_string()]
        );
    }

    #[test]
    fn unknown_type_aborts() {
        let main = script(0, vec![int(PUSH_CONSTANT_INT, 99), op(NC_NAME)]);
        let mut harness = Harness::new(vec![main]);
        let mut state = harness.init(0, None, &[], vec![]);
        assert_eq!(harness.run(&mut state), ExecutionState::Aborted);
        let report = state.abort_report.expect("abort should leave a report");
        assert_eq!(report.kind, ScriptErrorKind::Runtime);
        assert_eq!(report.message, "Npc type 99 does not exist.");
    }
}
