use lc_core::{ObjType, ScriptError};

use super::{bool_int, name_or_null, pop_array, push_param};
use crate::opcode::ScriptOpcode;
use crate::registry::{HandlerTable, ScriptEnv};
use crate::state::ScriptState;

pub(crate) const HANDLERS: HandlerTable = &[
    (ScriptOpcode::OC_CATEGORY, oc_category),
    (ScriptOpcode::OC_COST, oc_cost),
    (ScriptOpcode::OC_DEBUGNAME, oc_debugname),
    (ScriptOpcode::OC_DESC, oc_desc),
    (ScriptOpcode::OC_MEMBERS, oc_members),
    (ScriptOpcode::OC_NAME, oc_name),
    (ScriptOpcode::OC_PARAM, oc_param),
    (ScriptOpcode::OC_STACKABLE, oc_stackable),
    (ScriptOpcode::OC_WEIGHT, oc_weight),
];

fn pop_obj_type<'a>(
    state: &mut ScriptState,
    env: &ScriptEnv<'a>,
) -> Result<&'a ObjType, ScriptError> {
    env.config.obj(state.pop_int()?)
}

fn oc_category(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let obj_type = pop_obj_type(state, env)?;
    state.push_int(obj_type.category);
    Ok(())
}

fn oc_cost(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let obj_type = pop_obj_type(state, env)?;
    state.push_int(obj_type.cost);
    Ok(())
}

fn oc_debugname(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let obj_type = pop_obj_type(state, env)?;
    state.push_string(obj_type.debugname.clone());
    Ok(())
}

fn oc_desc(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let obj_type = pop_obj_type(state, env)?;
    state.push_string(name_or_null(obj_type.desc.as_ref()));
    Ok(())
}

fn oc_members(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let obj_type = pop_obj_type(state, env)?;
    state.push_int(bool_int(obj_type.members));
    Ok(())
}

fn oc_name(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let obj_type = pop_obj_type(state, env)?;
    state.push_string(name_or_null(obj_type.name.as_ref()));
    Ok(())
}

fn oc_param(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let [type_id, param] = pop_array(state)?;
    let obj_type = env.config.obj(type_id)?;
    let (var_type, value) = env.config.resolve_param(&obj_type.params, param)?;
    push_param(state, var_type, value)
}

fn oc_stackable(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let obj_type = pop_obj_type(state, env)?;
    state.push_int(bool_int(obj_type.stackable));
    Ok(())
}

fn oc_weight(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let obj_type = pop_obj_type(state, env)?;
    state.push_int(obj_type.weight);
    Ok(())
}
