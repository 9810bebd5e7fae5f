use lc_core::{Coord, Loc, ScriptError};

use super::{name_or_null, pop_array, push_param, unimplemented};
use crate::opcode::ScriptOpcode;
use crate::registry::{HandlerTable, ScriptEnv};
use crate::state::ScriptState;

pub(crate) const HANDLERS: HandlerTable = &[
    (ScriptOpcode::LOC_ADD, loc_add),
    (ScriptOpcode::LOC_ANGLE, loc_angle),
    (ScriptOpcode::LOC_ANIM, unimplemented),
    (ScriptOpcode::LOC_CATEGORY, loc_category),
    (ScriptOpcode::LOC_CHANGE, unimplemented),
    (ScriptOpcode::LOC_COORD, loc_coord),
    (ScriptOpcode::LOC_DEL, loc_del),
    (ScriptOpcode::LOC_FINDALLZONE, unimplemented),
    (ScriptOpcode::LOC_FINDNEXT, unimplemented),
    (ScriptOpcode::LOC_PARAM, loc_param),
    (ScriptOpcode::LOC_TYPE, loc_type),
    (ScriptOpcode::LOC_NAME, loc_name),
    (ScriptOpcode::LOC_SHAPE, loc_shape),
];

fn loc_add(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let [coord, type_id, angle, shape, duration] = pop_array(state)?;
    let loc = Loc {
        type_id,
        coord: Coord::from_script_int(coord),
        shape,
        angle: angle & 0x3,
    };
    env.world.add_loc(loc, duration)
}

fn loc_angle(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let loc = state.require_loc()?;
    state.push_int(loc.angle);
    Ok(())
}

fn loc_category(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let loc = state.require_loc()?;
    state.push_int(env.config.loc(loc.type_id)?.category);
    Ok(())
}

fn loc_coord(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let loc = state.require_loc()?;
    state.push_int(loc.coord.to_script_int());
    Ok(())
}

fn loc_del(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let duration = state.pop_int()?;
    let loc = state.require_loc()?;
    env.world.remove_loc(loc, duration)
}

fn loc_param(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let param = state.pop_int()?;
    let loc = state.require_loc()?;
    let loc_type = env.config.loc(loc.type_id)?;
    let (var_type, value) = env.config.resolve_param(&loc_type.params, param)?;
    push_param(state, var_type, value)
}

fn loc_type(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let loc = state.require_loc()?;
    state.push_int(loc.type_id);
    Ok(())
}

fn loc_name(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let loc = state.require_loc()?;
    let name = name_or_null(env.config.loc(loc.type_id)?.name.as_ref());
    state.push_string(name);
    Ok(())
}

fn loc_shape(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let loc = state.require_loc()?;
    state.push_int(loc.shape);
    Ok(())
}
