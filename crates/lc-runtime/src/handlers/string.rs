use std::cmp::Ordering;

use lc_core::ScriptError;

use super::pop_array;
use crate::opcode::ScriptOpcode;
use crate::registry::{HandlerTable, ScriptEnv};
use crate::state::ScriptState;

pub(crate) const HANDLERS: HandlerTable = &[
    (ScriptOpcode::APPEND, append),
    (ScriptOpcode::APPEND_CHAR, append_char),
    (ScriptOpcode::APPEND_NUM, append_num),
    (ScriptOpcode::APPEND_SIGNNUM, append_signnum),
    (ScriptOpcode::COMPARE, compare),
    (ScriptOpcode::LOWERCASE, lowercase),
    (ScriptOpcode::STRING_INDEXOF_CHAR, string_indexof_char),
    (ScriptOpcode::STRING_INDEXOF_STRING, string_indexof_string),
    (ScriptOpcode::STRING_LENGTH, string_length),
    (ScriptOpcode::SUBSTRING, substring),
    (ScriptOpcode::TOSTRING, tostring),
];

type HandlerResult = Result<(), ScriptError>;

fn pop_string_pair(state: &mut ScriptState) -> Result<(String, String), ScriptError> {
    let right = state.pop_string()?;
    let left = state.pop_string()?;
    Ok((left, right))
}

fn pop_char(state: &mut ScriptState) -> Result<char, ScriptError> {
    let code = state.pop_int()?;
    u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| ScriptError::runtime(format!("Invalid char code {}.", code)))
}

fn append(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let (left, right) = pop_string_pair(state)?;
    state.push_string(left + &right);
    Ok(())
}

fn append_char(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let ch = pop_char(state)?;
    let mut text = state.pop_string()?;
    text.push(ch);
    state.push_string(text);
    Ok(())
}

fn append_num(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let number = state.pop_int()?;
    let text = state.pop_string()?;
    state.push_string(format!("{}{}", text, number));
    Ok(())
}

fn append_signnum(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let number = state.pop_int()?;
    let text = state.pop_string()?;
    state.push_string(format!("{}{:+}", text, number));
    Ok(())
}

fn compare(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let (left, right) = pop_string_pair(state)?;
    let result = match left.cmp(&right) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    };
    state.push_int(result);
    Ok(())
}

fn lowercase(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let text = state.pop_string()?;
    state.push_string(text.to_lowercase());
    Ok(())
}

/// Index in chars, not bytes.
fn char_index(haystack: &str, byte_index: Option<usize>) -> i32 {
    byte_index
        .map(|index| haystack[..index].chars().count() as i32)
        .unwrap_or(-1)
}

fn string_indexof_char(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let ch = pop_char(state)?;
    let text = state.pop_string()?;
    state.push_int(char_index(&text, text.find(ch)));
    Ok(())
}

fn string_indexof_string(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let (text, needle) = pop_string_pair(state)?;
    state.push_int(char_index(&text, text.find(needle.as_str())));
    Ok(())
}

fn string_length(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let text = state.pop_string()?;
    state.push_int(text.chars().count() as i32);
    Ok(())
}

/// `[start, end)` in chars, clamped to the string.
fn substring(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let [start, end] = pop_array(state)?;
    let text = state.pop_string()?;
    let len = text.chars().count();
    let clamp = |value: i32| usize::try_from(value).unwrap_or(0).min(len);
    let (start, end) = (clamp(start), clamp(end));
    let sliced: String = text
        .chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect();
    state.push_string(sliced);
    Ok(())
}

fn tostring(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let number = state.pop_int()?;
    state.push_string(number.to_string());
    Ok(())
}
