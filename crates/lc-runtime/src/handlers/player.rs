use lc_core::{Coord, ExecutionState, ScriptError};

use super::{pop_array, unimplemented};
use crate::opcode::ScriptOpcode;
use crate::registry::{HandlerTable, ScriptEnv};
use crate::state::ScriptState;

pub(crate) const HANDLERS: HandlerTable = &[
    (ScriptOpcode::MES, mes),
    (ScriptOpcode::P_DELAY, p_delay),
    (ScriptOpcode::P_PAUSEBUTTON, p_pausebutton),
    (ScriptOpcode::P_COUNTDIALOG, p_countdialog),
    (ScriptOpcode::LAST_INT, last_int),
    (ScriptOpcode::COORD, coord),
    (ScriptOpcode::DISPLAYNAME, displayname),
    (ScriptOpcode::UID, uid),
    (ScriptOpcode::P_TELEJUMP, p_telejump),
    (ScriptOpcode::STAT, stat),
    (ScriptOpcode::STAT_BASE, stat_base),
    (ScriptOpcode::GIVEXP, givexp),
    (ScriptOpcode::ANIM, anim),
    (ScriptOpcode::SAY, say),
    (ScriptOpcode::QUEUE, queue),
    (ScriptOpcode::WEAKQUEUE, unimplemented),
    (ScriptOpcode::ALLOWDESIGN, unimplemented),
];

type HandlerResult = Result<(), ScriptError>;

fn mes(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let message = state.pop_string()?;
    let player = state.require_player()?;
    env.world.message_game(player.pid, &message)
}

// p_ prefixed ops only run with protected access.

fn p_delay(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let ticks = state.pop_int()?;
    state.require_protected_player()?;
    state.suspend(ExecutionState::Suspended, Some(ticks.saturating_add(1)));
    Ok(())
}

fn p_pausebutton(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    state.require_protected_player()?;
    state.suspend(ExecutionState::PauseButton, None);
    Ok(())
}

fn p_countdialog(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    state.require_protected_player()?;
    state.suspend(ExecutionState::CountDown, None);
    Ok(())
}

fn last_int(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    state.push_int(state.last_int);
    Ok(())
}

fn coord(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let player = state.require_player()?;
    let info = env.world.player(player.pid)?;
    state.push_int(info.coord.to_script_int());
    Ok(())
}

fn displayname(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let player = state.require_player()?;
    let info = env.world.player(player.pid)?;
    state.push_string(info.display_name);
    Ok(())
}

fn uid(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let player = state.require_player()?;
    state.push_int(player.pid);
    Ok(())
}

fn p_telejump(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let coord = Coord::from_script_int(state.pop_int()?);
    let player = state.require_protected_player()?;
    env.world.teleport(player.pid, coord)
}

fn stat(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let stat = state.pop_int()?;
    let player = state.require_player()?;
    let level = env.world.stat(player.pid, stat)?;
    state.push_int(level.level);
    Ok(())
}

fn stat_base(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let stat = state.pop_int()?;
    let player = state.require_player()?;
    let level = env.world.stat(player.pid, stat)?;
    state.push_int(level.base);
    Ok(())
}

fn givexp(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let [stat, xp] = pop_array(state)?;
    let player = state.require_protected_player()?;
    env.world.give_xp(player.pid, stat, xp)
}

fn anim(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let [seq, delay] = pop_array(state)?;
    let player = state.require_player()?;
    env.world.player_anim(player.pid, seq, delay)
}

fn say(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let text = state.pop_string()?;
    let player = state.require_player()?;
    env.world.player_say(player.pid, &text)
}

fn queue(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let [script, delay] = pop_array(state)?;
    let player = state.require_player()?;
    let target = env.scripts.require(script)?;
    env.world.queue_player_script(player.pid, target.id, delay)
}
