use lc_core::{default_value_from_type, DbColumn, ScriptError, ScriptValue};

use super::{pop_array, push_param, unimplemented};
use crate::opcode::ScriptOpcode;
use crate::registry::{HandlerTable, ScriptEnv};
use crate::state::ScriptState;

pub(crate) const HANDLERS: HandlerTable = &[
    (ScriptOpcode::DB_FIND, db_find),
    (ScriptOpcode::DB_FINDNEXT, db_findnext),
    (ScriptOpcode::DB_GETFIELD, db_getfield),
    (ScriptOpcode::DB_GETFIELDCOUNT, db_getfieldcount),
    (ScriptOpcode::DB_LISTALL, db_listall),
    (ScriptOpcode::DB_FIND_WITH_COUNT, unimplemented),
];

/// `table << 12 | column << 4 | tuple index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnRef {
    table: i32,
    column: i32,
    tuple: usize,
}

impl ColumnRef {
    fn unpack(packed: i32) -> Self {
        Self {
            table: (packed >> 12) & 0xffff,
            column: (packed >> 4) & 0x7f,
            tuple: (packed & 0xf) as usize,
        }
    }
}

fn column<'a>(env: &ScriptEnv<'a>, column: ColumnRef) -> Result<&'a DbColumn, ScriptError> {
    env.config
        .db_table(column.table)?
        .columns
        .get(column.column as usize)
        .ok_or_else(|| {
            ScriptError::runtime(format!(
                "Db table {} has no column {}.",
                column.table, column.column
            ))
        })
}

/// Operand 1 searches by a string key, anything else by an int key.
fn db_find(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let key = if state.int_operand() == 1 {
        ScriptValue::String(state.pop_string()?)
    } else {
        ScriptValue::Int(state.pop_int()?)
    };
    let target = ColumnRef::unpack(state.pop_int()?);
    let width = column(env, target)?.types.len().max(1);

    let rows = env
        .config
        .db_rows_in_table(target.table)
        .filter(|row| {
            row.columns.get(&target.column).is_some_and(|values| {
                values
                    .chunks(width)
                    .any(|tuple| tuple.get(target.tuple) == Some(&key))
            })
        })
        .map(|row| row.id)
        .collect();
    state.db_table = target.table;
    state.db_row_query = rows;
    state.db_cursor = 0;
    Ok(())
}

fn db_findnext(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    if state.db_table == -1 {
        return Err(ScriptError::runtime("No db query is active."));
    }
    match state.db_row_query.get(state.db_cursor).copied() {
        Some(row) => {
            state.db_cursor += 1;
            state.push_int(row);
        }
        None => state.push_int(-1),
    }
    Ok(())
}

/// Operands `[row, packed column, list index]`; pushes every field of the tuple.
fn db_getfield(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let [row, packed, list_index] = pop_array(state)?;
    let target = ColumnRef::unpack(packed);
    let types = &column(env, target)?.types;
    let row = env.config.db_row(row)?;
    if row.table != target.table {
        return Err(ScriptError::runtime(format!(
            "Db row {} is not in table {}.",
            row.id, target.table
        )));
    }

    let start = usize::try_from(list_index).unwrap_or(usize::MAX);
    let tuple = row
        .columns
        .get(&target.column)
        .and_then(|values| values.chunks(types.len().max(1)).nth(start));
    for (index, var_type) in types.iter().enumerate() {
        let value = tuple
            .and_then(|tuple| tuple.get(index))
            .cloned()
            .unwrap_or_else(|| default_value_from_type(*var_type));
        push_param(state, *var_type, value)?;
    }
    Ok(())
}

fn db_getfieldcount(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let [row, packed] = pop_array(state)?;
    let target = ColumnRef::unpack(packed);
    let width = column(env, target)?.types.len().max(1);
    let count = env
        .config
        .db_row(row)?
        .columns
        .get(&target.column)
        .map(|values| values.len() / width)
        .unwrap_or(0);
    state.push_int(count as i32);
    Ok(())
}

fn db_listall(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let table = state.pop_int()?;
    env.config.db_table(table)?;
    state.db_row_query = env.config.db_rows_in_table(table).map(|row| row.id).collect();
    state.db_table = table;
    state.db_cursor = 0;
    Ok(())
}
