use lc_core::{Coord, Obj, ScriptError};

use super::{name_or_null, pop_array, push_param, unimplemented};
use crate::opcode::ScriptOpcode;
use crate::registry::{HandlerTable, ScriptEnv};
use crate::state::ScriptState;

pub(crate) const HANDLERS: HandlerTable = &[
    (ScriptOpcode::OBJ_ADD, obj_add),
    (ScriptOpcode::OBJ_ADDALL, unimplemented),
    (ScriptOpcode::OBJ_COORD, obj_coord),
    (ScriptOpcode::OBJ_COUNT, obj_count),
    (ScriptOpcode::OBJ_DEL, obj_del),
    (ScriptOpcode::OBJ_NAME, obj_name),
    (ScriptOpcode::OBJ_PARAM, obj_param),
    (ScriptOpcode::OBJ_TYPE, obj_type),
    (ScriptOpcode::OBJ_TAKEITEM, unimplemented),
];

/// Drops an obj visible to the active player only, if one is bound.
fn obj_add(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let [coord, type_id, count, duration] = pop_array(state)?;
    env.config.obj(type_id)?;
    let obj = Obj {
        type_id,
        coord: Coord::from_script_int(coord),
        count,
    };
    let receiver = state.active_player().map(|player| player.pid);
    env.world.add_obj(obj, receiver, duration)
}

fn obj_coord(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let obj = state.require_obj()?;
    state.push_int(obj.coord.to_script_int());
    Ok(())
}

fn obj_count(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let obj = state.require_obj()?;
    state.push_int(obj.count);
    Ok(())
}

fn obj_del(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let obj = state.require_obj()?;
    env.world.remove_obj(obj, 0)
}

fn obj_name(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let obj = state.require_obj()?;
    let name = name_or_null(env.config.obj(obj.type_id)?.name.as_ref());
    state.push_string(name);
    Ok(())
}

fn obj_param(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let param = state.pop_int()?;
    let obj = state.require_obj()?;
    let obj_type = env.config.obj(obj.type_id)?;
    let (var_type, value) = env.config.resolve_param(&obj_type.params, param)?;
    push_param(state, var_type, value)
}

fn obj_type(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let obj = state.require_obj()?;
    state.push_int(obj.type_id);
    Ok(())
}
