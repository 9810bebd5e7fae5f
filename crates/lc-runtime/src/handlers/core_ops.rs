use std::sync::Arc;

use lc_core::{ExecutionState, Script, ScriptError, ScriptErrorKind, ScriptValue};

use crate::opcode::ScriptOpcode;
use crate::registry::{HandlerTable, ScriptEnv};
use crate::state::ScriptState;

pub(crate) const HANDLERS: HandlerTable = &[
    (ScriptOpcode::PUSH_CONSTANT_INT, push_constant_int),
    (ScriptOpcode::PUSH_VARP, push_varp),
    (ScriptOpcode::POP_VARP, pop_varp),
    (ScriptOpcode::PUSH_CONSTANT_STRING, push_constant_string),
    (ScriptOpcode::PUSH_VARN, push_varn),
    (ScriptOpcode::POP_VARN, pop_varn),
    (ScriptOpcode::BRANCH, branch),
    (ScriptOpcode::BRANCH_NOT, branch_not),
    (ScriptOpcode::BRANCH_EQUALS, branch_equals),
    (ScriptOpcode::BRANCH_LESS_THAN, branch_less_than),
    (ScriptOpcode::BRANCH_GREATER_THAN, branch_greater_than),
    (ScriptOpcode::RETURN, return_op),
    (ScriptOpcode::GOSUB, gosub),
    (ScriptOpcode::JUMP, jump),
    (ScriptOpcode::SWITCH, switch),
    (ScriptOpcode::BRANCH_LESS_THAN_OR_EQUALS, branch_less_than_or_equals),
    (ScriptOpcode::BRANCH_GREATER_THAN_OR_EQUALS, branch_greater_than_or_equals),
    (ScriptOpcode::PUSH_INT_LOCAL, push_int_local),
    (ScriptOpcode::POP_INT_LOCAL, pop_int_local),
    (ScriptOpcode::PUSH_STRING_LOCAL, push_string_local),
    (ScriptOpcode::POP_STRING_LOCAL, pop_string_local),
    (ScriptOpcode::JOIN_STRING, join_string),
    (ScriptOpcode::POP_INT_DISCARD, pop_int_discard),
    (ScriptOpcode::POP_STRING_DISCARD, pop_string_discard),
    (ScriptOpcode::GOSUB_WITH_PARAMS, gosub_with_params),
    (ScriptOpcode::JUMP_WITH_PARAMS, jump_with_params),
];

type HandlerResult = Result<(), ScriptError>;

fn push_constant_int(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    state.push_int(state.int_operand());
    Ok(())
}

fn push_constant_string(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let value = state.string_operand()?;
    state.push_string(value);
    Ok(())
}

/// Var operands carry the var id in the low 16 bits and the slot in bit 16.
fn var_operand(state: &ScriptState) -> (i32, bool) {
    let operand = state.int_operand();
    (operand & 0xffff, (operand >> 16) & 1 == 1)
}

fn push_varp(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let (varp, secondary) = var_operand(state);
    let player = state.require_player_slot(secondary, false)?;
    let value = env.world.varp(player.pid, varp)?;
    state.push_int(value);
    Ok(())
}

fn pop_varp(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let (varp, secondary) = var_operand(state);
    let player = state.require_player_slot(secondary, true)?;
    let value = state.pop_int()?;
    env.world.set_varp(player.pid, varp, value)
}

fn push_varn(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let (varn, secondary) = var_operand(state);
    let npc = state.require_npc_slot(secondary)?;
    let value = env.world.varn(npc.nid, varn)?;
    state.push_int(value);
    Ok(())
}

fn pop_varn(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let (varn, secondary) = var_operand(state);
    let npc = state.require_npc_slot(secondary)?;
    let value = state.pop_int()?;
    env.world.set_varn(npc.nid, varn, value)
}

fn jump_by(state: &mut ScriptState, offset: i32) -> HandlerResult {
    state.pc = state.pc.checked_add(offset).ok_or_else(|| {
        ScriptError::new(
            ScriptErrorKind::InvalidProgramCounter,
            format!("Branch offset {} overflows pc {}.", offset, state.pc),
        )
    })?;
    Ok(())
}

fn branch(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let offset = state.int_operand();
    jump_by(state, offset)
}

fn branch_if(state: &mut ScriptState, taken: fn(i32, i32) -> bool) -> HandlerResult {
    let b = state.pop_int()?;
    let a = state.pop_int()?;
    if taken(a, b) {
        let offset = state.int_operand();
        return jump_by(state, offset);
    }
    Ok(())
}

fn branch_not(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    branch_if(state, |a, b| a != b)
}

fn branch_equals(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    branch_if(state, |a, b| a == b)
}

fn branch_less_than(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    branch_if(state, |a, b| a < b)
}

fn branch_greater_than(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    branch_if(state, |a, b| a > b)
}

fn branch_less_than_or_equals(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    branch_if(state, |a, b| a <= b)
}

fn branch_greater_than_or_equals(
    state: &mut ScriptState,
    _env: &mut ScriptEnv<'_>,
) -> HandlerResult {
    branch_if(state, |a, b| a >= b)
}

fn return_op(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    if !state.return_from_call() {
        state.execution = ExecutionState::Finished;
    }
    Ok(())
}

/// Pops the callee's declared arguments, ints first in push order, then strings.
fn pop_call_args(state: &mut ScriptState, callee: &Script) -> Result<Vec<ScriptValue>, ScriptError> {
    let strings = state.pop_strings(callee.string_arg_count)?;
    let ints = state.pop_ints(callee.int_arg_count)?;
    Ok(ints
        .into_iter()
        .map(ScriptValue::Int)
        .chain(strings.into_iter().map(ScriptValue::String))
        .collect())
}

fn callee(state: &ScriptState, env: &ScriptEnv<'_>) -> Result<Arc<Script>, ScriptError> {
    env.scripts.require(state.int_operand())
}

fn gosub(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let target = callee(state, env)?;
    state.gosub(target, Vec::new())
}

fn gosub_with_params(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let target = callee(state, env)?;
    let args = pop_call_args(state, &target)?;
    state.gosub(target, args)
}

fn jump(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let target = callee(state, env)?;
    state.jump(target, Vec::new());
    Ok(())
}

fn jump_with_params(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let target = callee(state, env)?;
    let args = pop_call_args(state, &target)?;
    state.jump(target, args);
    Ok(())
}

fn switch(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let key = state.pop_int()?;
    let table = state
        .script
        .switch_table(state.int_operand())
        .ok_or_else(|| {
            ScriptError::runtime(format!("Missing switch table {}.", state.int_operand()))
        })?;
    let offset = table.get(&key).copied();
    match offset {
        Some(offset) => jump_by(state, offset),
        None => Ok(()),
    }
}

fn local_index(state: &ScriptState) -> Result<usize, ScriptError> {
    usize::try_from(state.int_operand())
        .map_err(|_| ScriptError::runtime(format!("Invalid local index {}.", state.int_operand())))
}

fn push_int_local(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let index = local_index(state)?;
    let value = state
        .int_locals
        .get(index)
        .copied()
        .ok_or_else(|| ScriptError::runtime(format!("Int local {} is not set.", index)))?;
    state.push_int(value);
    Ok(())
}

fn pop_int_local(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let index = local_index(state)?;
    let value = state.pop_int()?;
    let slot = state
        .int_locals
        .get_mut(index)
        .ok_or_else(|| ScriptError::runtime(format!("Int local {} is out of range.", index)))?;
    *slot = value;
    Ok(())
}

fn push_string_local(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let index = local_index(state)?;
    let value = state
        .string_locals
        .get(index)
        .cloned()
        .ok_or_else(|| ScriptError::runtime(format!("String local {} is not set.", index)))?;
    state.push_string(value);
    Ok(())
}

fn pop_string_local(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let index = local_index(state)?;
    let value = state.pop_string()?;
    let slot = state.string_locals.get_mut(index).ok_or_else(|| {
        ScriptError::runtime(format!("String local {} is out of range.", index))
    })?;
    *slot = value;
    Ok(())
}

fn join_string(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let count = local_index(state)?;
    let parts = state.pop_strings(count)?;
    state.push_string(parts.concat());
    Ok(())
}

fn pop_int_discard(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    state.pop_int().map(drop)
}

fn pop_string_discard(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    state.pop_string().map(drop)
}
