use lc_core::{ScriptError, VarType};

use super::{pop_array, push_param};
use crate::opcode::ScriptOpcode;
use crate::registry::{HandlerTable, ScriptEnv};
use crate::state::ScriptState;

pub(crate) const HANDLERS: HandlerTable = &[
    (ScriptOpcode::ENUM, enum_lookup),
    (ScriptOpcode::ENUM_GETOUTPUTCOUNT, enum_getoutputcount),
];

/// Operands are `[input type, output type, enum id, key]`, types as char codes.
fn enum_lookup(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let [input_type, output_type, enum_id, key] = pop_array(state)?;
    let enum_type = env.config.enum_type(enum_id)?;
    let expected = (
        VarType::from_char_code(input_type),
        VarType::from_char_code(output_type),
    );
    if expected != (Some(enum_type.input_type), Some(enum_type.output_type)) {
        return Err(ScriptError::runtime(format!(
            "Enum {} is {}:{} but was read as {}:{}.",
            enum_id,
            enum_type.input_type.char_code(),
            enum_type.output_type.char_code(),
            input_type,
            output_type
        )));
    }
    push_param(state, enum_type.output_type, enum_type.get(key))
}

fn enum_getoutputcount(
    state: &mut ScriptState,
    env: &mut ScriptEnv<'_>,
) -> Result<(), ScriptError> {
    let enum_type = env.config.enum_type(state.pop_int()?)?;
    state.push_int(enum_type.values.len() as i32);
    Ok(())
}
