use lc_core::{ScriptError, ScriptErrorKind, ScriptValue, VarType};

use crate::opcode::ScriptOpcode;
use crate::registry::{HandlerTable, ScriptEnv};
use crate::state::ScriptState;

mod core_ops;
mod db;
mod debug;
mod enums;
mod inv;
mod loc;
mod loc_config;
mod npc;
mod npc_config;
mod number;
mod obj;
mod obj_config;
mod player;
mod server;
mod string;

pub(crate) const ALL_TABLES: &[HandlerTable] = &[
    core_ops::HANDLERS,
    server::HANDLERS,
    player::HANDLERS,
    npc::HANDLERS,
    loc::HANDLERS,
    obj::HANDLERS,
    npc_config::HANDLERS,
    loc_config::HANDLERS,
    obj_config::HANDLERS,
    inv::HANDLERS,
    enums::HANDLERS,
    string::HANDLERS,
    number::HANDLERS,
    db::HANDLERS,
    debug::HANDLERS,
];

/// Shared by every opcode that is declared but has no behaviour yet.
pub(crate) fn unimplemented(
    state: &mut ScriptState,
    _env: &mut ScriptEnv<'_>,
) -> Result<(), ScriptError> {
    let opcode = state.script.opcode(state.pc).unwrap_or(-1);
    let name = ScriptOpcode::from_id(opcode)
        .map(ScriptOpcode::name)
        .unwrap_or("?");
    Err(ScriptError::new(
        ScriptErrorKind::UnimplementedOpcode,
        format!("Unimplemented opcode {} ({})", name, opcode),
    ))
}

/// Pushes a resolved param onto the stack its type lives on.
pub(crate) fn push_param(
    state: &mut ScriptState,
    var_type: VarType,
    value: ScriptValue,
) -> Result<(), ScriptError> {
    match (var_type.is_string(), value) {
        (true, ScriptValue::String(value)) => state.push_string(value),
        (false, ScriptValue::Int(value)) => state.push_int(value),
        (_, value) => {
            return Err(ScriptError::runtime(format!(
                "Param value {:?} does not match its declared type {:?}.",
                value, var_type
            )))
        }
    }
    Ok(())
}

/// Pops `N` ints in push order, so `let [a, b] = pop_array(state)?` reads left to right.
pub(crate) fn pop_array<const N: usize>(state: &mut ScriptState) -> Result<[i32; N], ScriptError> {
    let values = state.pop_ints(N)?;
    let mut popped = [0; N];
    popped.copy_from_slice(&values);
    Ok(popped)
}

pub(crate) fn name_or_null(name: Option<&String>) -> String {
    name.cloned().unwrap_or_else(|| "null".to_string())
}

pub(crate) fn bool_int(value: bool) -> i32 {
    i32::from(value)
}
