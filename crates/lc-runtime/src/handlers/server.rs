use lc_core::{Coord, ExecutionState, ScriptError};

use super::{bool_int, pop_array, unimplemented};
use crate::opcode::ScriptOpcode;
use crate::registry::{HandlerTable, ScriptEnv};
use crate::state::ScriptState;

pub(crate) const HANDLERS: HandlerTable = &[
    (ScriptOpcode::MAP_CLOCK, map_clock),
    (ScriptOpcode::MAP_MEMBERS, map_members),
    (ScriptOpcode::MAP_PLAYERCOUNT, map_playercount),
    (ScriptOpcode::COORDX, coordx),
    (ScriptOpcode::COORDY, coordy),
    (ScriptOpcode::COORDZ, coordz),
    (ScriptOpcode::MOVECOORD, movecoord),
    (ScriptOpcode::DISTANCE, distance),
    (ScriptOpcode::WORLD_DELAY, world_delay),
    (ScriptOpcode::INZONE, inzone),
    (ScriptOpcode::MAP_FINDSQUARE, unimplemented),
    (ScriptOpcode::LINEOFWALK, unimplemented),
    (ScriptOpcode::PROJANIM_PL, unimplemented),
];

fn map_clock(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    state.push_int(env.world.map_clock());
    Ok(())
}

fn map_members(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    state.push_int(bool_int(env.world.members()));
    Ok(())
}

fn map_playercount(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    state.push_int(env.world.player_count());
    Ok(())
}

fn pop_coord(state: &mut ScriptState) -> Result<Coord, ScriptError> {
    state.pop_int().map(Coord::from_script_int)
}

fn coordx(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let coord = pop_coord(state)?;
    state.push_int(coord.x);
    Ok(())
}

fn coordy(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let coord = pop_coord(state)?;
    state.push_int(coord.level);
    Ok(())
}

fn coordz(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let coord = pop_coord(state)?;
    state.push_int(coord.z);
    Ok(())
}

fn movecoord(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let [coord, dx, dy, dz] = pop_array(state)?;
    let moved = Coord::from_script_int(coord).translate(dx, dy, dz);
    state.push_int(moved.to_script_int());
    Ok(())
}

/// Chebyshev distance, levels ignored.
fn distance(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let to = pop_coord(state)?;
    let from = pop_coord(state)?;
    state.push_int((from.x - to.x).abs().max((from.z - to.z).abs()));
    Ok(())
}

fn world_delay(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let ticks = state.pop_int()?;
    state.suspend(ExecutionState::WorldSuspended, Some(ticks.saturating_add(1)));
    Ok(())
}

/// Pushes 1 when the third coord lies inside the box spanned by the first two.
fn inzone(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let coord = pop_coord(state)?;
    let to = pop_coord(state)?;
    let from = pop_coord(state)?;
    let within = |value: i32, a: i32, b: i32| value >= a.min(b) && value <= a.max(b);
    let inside = within(coord.level, from.level, to.level)
        && within(coord.x, from.x, to.x)
        && within(coord.z, from.z, to.z);
    state.push_int(bool_int(inside));
    Ok(())
}
