use lc_core::ScriptError;

use super::{bool_int, pop_array};
use crate::opcode::ScriptOpcode;
use crate::registry::{HandlerTable, ScriptEnv};
use crate::state::ScriptState;

pub(crate) const HANDLERS: HandlerTable = &[
    (ScriptOpcode::ADD, add),
    (ScriptOpcode::SUB, sub),
    (ScriptOpcode::MULTIPLY, multiply),
    (ScriptOpcode::DIVIDE, divide),
    (ScriptOpcode::MODULO, modulo),
    (ScriptOpcode::RANDOM, random),
    (ScriptOpcode::RANDOMINC, randominc),
    (ScriptOpcode::INTERPOLATE, interpolate),
    (ScriptOpcode::ADDPERCENT, addpercent),
    (ScriptOpcode::SETBIT, setbit),
    (ScriptOpcode::CLEARBIT, clearbit),
    (ScriptOpcode::TESTBIT, testbit),
    (ScriptOpcode::TOGGLEBIT, togglebit),
    (ScriptOpcode::POW, pow),
    (ScriptOpcode::INVPOW, invpow),
    (ScriptOpcode::AND, and),
    (ScriptOpcode::OR, or),
    (ScriptOpcode::MIN, min),
    (ScriptOpcode::MAX, max),
    (ScriptOpcode::SCALE, scale),
    (ScriptOpcode::BITCOUNT, bitcount),
    (ScriptOpcode::ABS, abs),
];

type HandlerResult = Result<(), ScriptError>;

fn binary(
    state: &mut ScriptState,
    apply: impl FnOnce(i32, i32) -> Result<i32, ScriptError>,
) -> HandlerResult {
    let [a, b] = pop_array(state)?;
    let result = apply(a, b)?;
    state.push_int(result);
    Ok(())
}

fn nonzero(divisor: i32) -> Result<i32, ScriptError> {
    if divisor == 0 {
        return Err(ScriptError::runtime("Division by zero."));
    }
    Ok(divisor)
}

fn bit(index: i32) -> Result<i32, ScriptError> {
    if !(0..32).contains(&index) {
        return Err(ScriptError::runtime(format!("Bit {} is out of range.", index)));
    }
    Ok(1i32.wrapping_shl(index as u32))
}

fn add(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    binary(state, |a, b| Ok(a.wrapping_add(b)))
}

fn sub(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    binary(state, |a, b| Ok(a.wrapping_sub(b)))
}

fn multiply(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    binary(state, |a, b| Ok(a.wrapping_mul(b)))
}

fn divide(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    binary(state, |a, b| Ok(a.wrapping_div(nonzero(b)?)))
}

fn modulo(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    binary(state, |a, b| Ok(a.wrapping_rem(nonzero(b)?)))
}

fn random(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let bound = state.pop_int()?;
    state.push_int(env.world.random(bound));
    Ok(())
}

fn randominc(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let bound = state.pop_int()?;
    state.push_int(env.world.random(bound.saturating_add(1)));
    Ok(())
}

fn floor_div(a: i64, b: i64) -> i64 {
    let quotient = a / b;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        quotient - 1
    } else {
        quotient
    }
}

/// Operands `[y0, y1, x0, x1, x]`; the slope is floored before scaling.
fn interpolate(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let [y0, y1, x0, x1, x] = pop_array(state)?;
    let run = i64::from(x1) - i64::from(x0);
    if run == 0 {
        return Err(ScriptError::runtime("Division by zero."));
    }
    let slope = floor_div(i64::from(y1) - i64::from(y0), run);
    let value = slope
        .wrapping_mul(i64::from(x) - i64::from(x0))
        .wrapping_add(i64::from(y0));
    state.push_int(value as i32);
    Ok(())
}

fn addpercent(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    binary(state, |number, percent| {
        let added = i64::from(number) * i64::from(percent) / 100;
        Ok((added + i64::from(number)) as i32)
    })
}

fn setbit(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    binary(state, |value, index| Ok(value | bit(index)?))
}

fn clearbit(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    binary(state, |value, index| Ok(value & !bit(index)?))
}

fn testbit(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    binary(state, |value, index| Ok(bool_int(value & bit(index)? != 0)))
}

fn togglebit(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    binary(state, |value, index| Ok(value ^ bit(index)?))
}

fn pow(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    binary(state, |base, exponent| {
        let exponent = u32::try_from(exponent)
            .map_err(|_| ScriptError::runtime(format!("Invalid exponent {}.", exponent)))?;
        Ok(base.wrapping_pow(exponent))
    })
}

/// Integer `exponent`-th root, rounded down.
fn invpow(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    binary(state, |number, exponent| {
        if number < 0 || exponent <= 0 {
            return Err(ScriptError::runtime(format!(
                "Cannot take root {} of {}.",
                exponent, number
            )));
        }
        let exponent = exponent as u32;
        let fits = |root: i64| {
            root.checked_pow(exponent)
                .is_some_and(|power| power <= i64::from(number))
        };
        let mut root = (f64::from(number).powf(1.0 / f64::from(exponent))) as i64;
        while root > 0 && !fits(root) {
            root -= 1;
        }
        while fits(root + 1) {
            root += 1;
        }
        Ok(root as i32)
    })
}

fn and(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    binary(state, |a, b| Ok(a & b))
}

fn or(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    binary(state, |a, b| Ok(a | b))
}

fn min(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    binary(state, |a, b| Ok(a.min(b)))
}

fn max(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    binary(state, |a, b| Ok(a.max(b)))
}

/// Operands `[a, b, c]`, result `a * c / b`.
fn scale(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let [a, b, c] = pop_array(state)?;
    let divisor = i64::from(nonzero(b)?);
    state.push_int((i64::from(a) * i64::from(c) / divisor) as i32);
    Ok(())
}

fn bitcount(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let value = state.pop_int()?;
    state.push_int(value.count_ones() as i32);
    Ok(())
}

fn abs(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let value = state.pop_int()?;
    state.push_int(value.wrapping_abs());
    Ok(())
}
