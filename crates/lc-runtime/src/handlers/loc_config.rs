use lc_core::ScriptError;

use super::{name_or_null, pop_array, push_param};
use crate::opcode::ScriptOpcode;
use crate::registry::{HandlerTable, ScriptEnv};
use crate::state::ScriptState;

pub(crate) const HANDLERS: HandlerTable = &[
    (ScriptOpcode::LC_CATEGORY, lc_category),
    (ScriptOpcode::LC_DEBUGNAME, lc_debugname),
    (ScriptOpcode::LC_DESC, lc_desc),
    (ScriptOpcode::LC_NAME, lc_name),
    (ScriptOpcode::LC_PARAM, lc_param),
];

fn lc_category(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let loc_type = env.config.loc(state.pop_int()?)?;
    state.push_int(loc_type.category);
    Ok(())
}

fn lc_debugname(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let loc_type = env.config.loc(state.pop_int()?)?;
    state.push_string(loc_type.debugname.clone());
    Ok(())
}

fn lc_desc(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let loc_type = env.config.loc(state.pop_int()?)?;
    state.push_string(name_or_null(loc_type.desc.as_ref()));
    Ok(())
}

fn lc_name(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let loc_type = env.config.loc(state.pop_int()?)?;
    state.push_string(name_or_null(loc_type.name.as_ref()));
    Ok(())
}

fn lc_param(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let [type_id, param] = pop_array(state)?;
    let loc_type = env.config.loc(type_id)?;
    let (var_type, value) = env.config.resolve_param(&loc_type.params, param)?;
    push_param(state, var_type, value)
}
