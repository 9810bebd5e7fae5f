use lc_core::ScriptError;

use super::pop_array;
use crate::opcode::ScriptOpcode;
use crate::registry::{HandlerTable, ScriptEnv};
use crate::state::ScriptState;
use crate::world::InvItem;

pub(crate) const HANDLERS: HandlerTable = &[
    (ScriptOpcode::INV_ADD, inv_add),
    (ScriptOpcode::INV_CLEAR, inv_clear),
    (ScriptOpcode::INV_DEL, inv_del),
    (ScriptOpcode::INV_FREESPACE, inv_freespace),
    (ScriptOpcode::INV_SIZE, inv_size),
    (ScriptOpcode::INV_TOTAL, inv_total),
];

/// Stackable objs merge into one slot; others take one slot per item.
/// Whatever does not fit is dropped.
fn inv_add(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let [inv, obj, count] = pop_array(state)?;
    let player = state.require_protected_player()?;
    let stackable = env.config.obj(obj)?.stackable;
    let mut items = env.world.inv_items(player.pid, inv)?;

    let mut remaining = count.max(0);
    if stackable {
        let existing = items
            .iter_mut()
            .flatten()
            .find(|item| item.obj == obj);
        match existing {
            Some(item) => {
                item.count = item.count.saturating_add(remaining);
                remaining = 0;
            }
            None => {
                if let Some(slot) = items.iter_mut().find(|slot| slot.is_none()) {
                    *slot = Some(InvItem {
                        obj,
                        count: remaining,
                    });
                    remaining = 0;
                }
            }
        }
    } else {
        for slot in items.iter_mut().filter(|slot| slot.is_none()) {
            if remaining == 0 {
                break;
            }
            *slot = Some(InvItem { obj, count: 1 });
            remaining -= 1;
        }
    }
    if remaining > 0 {
        log::debug!(
            "inv {} of player {} is full, {} x {} dropped",
            inv,
            player.pid,
            remaining,
            obj
        );
    }
    env.world.set_inv_items(player.pid, inv, items)
}

fn inv_clear(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let inv = state.pop_int()?;
    let player = state.require_protected_player()?;
    let size = env.world.inv_items(player.pid, inv)?.len();
    env.world.set_inv_items(player.pid, inv, vec![None; size])
}

fn inv_del(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let [inv, obj, count] = pop_array(state)?;
    let player = state.require_protected_player()?;
    let mut items = env.world.inv_items(player.pid, inv)?;

    let mut remaining = count.max(0);
    for slot in items.iter_mut() {
        if remaining == 0 {
            break;
        }
        let Some(item) = slot.as_mut().filter(|item| item.obj == obj) else {
            continue;
        };
        let taken = item.count.min(remaining);
        item.count -= taken;
        remaining -= taken;
        if item.count == 0 {
            *slot = None;
        }
    }
    env.world.set_inv_items(player.pid, inv, items)
}

fn inv_freespace(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let inv = state.pop_int()?;
    let player = state.require_player()?;
    let items = env.world.inv_items(player.pid, inv)?;
    state.push_int(items.iter().filter(|slot| slot.is_none()).count() as i32);
    Ok(())
}

fn inv_size(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let inv = state.pop_int()?;
    let player = state.require_player()?;
    state.push_int(env.world.inv_items(player.pid, inv)?.len() as i32);
    Ok(())
}

fn inv_total(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> Result<(), ScriptError> {
    let [inv, obj] = pop_array(state)?;
    let player = state.require_player()?;
    let total = env
        .world
        .inv_items(player.pid, inv)?
        .into_iter()
        .flatten()
        .filter(|item| item.obj == obj)
        .fold(0i32, |total, item| total.saturating_add(item.count));
    state.push_int(total);
    Ok(())
}

#[cfg(test)]
mod inv_tests {
    use lc_core::ExecutionState;

    use crate::opcode::ScriptOpcode::*;
    use crate::runtime_test_support::*;
    use crate::world::{InvItem, World};

    fn push3(code: &mut Vec<Instr>, values: [i32; 3]) {
        for value in values {
            code.push(int(PUSH_CONSTANT_INT, value));
        }
    }

    #[test]
    fn add_stacks_coins_and_spreads_bread() {
        let mut code = Vec::new();
        push3(&mut code, [93, 995, 10]);
        code.push(op(INV_ADD));
        push3(&mut code, [93, 995, 15]);
        code.push(op(INV_ADD));
        push3(&mut code, [93, 3, 5]);
        code.push(op(INV_ADD));
        code.push(int(PUSH_CONSTANT_INT, 93));
        code.push(op(INV_FREESPACE));
        code.push(int(PUSH_CONSTANT_INT, 93));
        code.push(op(INV_SIZE));
        code.push(int(PUSH_CONSTANT_INT, 93));
        code.push(int(PUSH_CONSTANT_INT, 995));
        code.push(op(INV_TOTAL));
        code.push(op(RETURN));

        let mut harness = Harness::new(vec![script(0, code)]);
        let mut state = harness.init(0, Some(player_entity(1)), &[], vec![]);
        assert_eq!(harness.run(&mut state), ExecutionState::Finished);
        assert_eq!(state.int_stack, vec![0, 4, 25]);
        let items = harness.world.inv_items(1, 93).expect("inv should exist");
        assert_eq!(items[0], Some(InvItem { obj: 995, count: 25 }));
        assert_eq!(items[3], Some(InvItem { obj: 3, count: 1 }));
    }

    #[test]
    fn del_and_clear() {
        let mut code = Vec::new();
        push3(&mut code, [93, 3, 3]);
        code.push(op(INV_ADD));
        push3(&mut code, [93, 3, 2]);
        code.push(op(INV_DEL));
        code.push(int(PUSH_CONSTANT_INT, 93));
        code.push(int(PUSH_CONSTANT_INT, 3));
        code.push(op(INV_TOTAL));
        code.push(int(PUSH_CONSTANT_INT, 93));
        code.push(op(INV_CLEAR));
        code.push(int(PUSH_CONSTANT_INT, 93));
        code.push(op(INV_FREESPACE));
        code.push(op(RETURN));

        let mut harness = Harness::new(vec![script(0, code)]);
        let mut state = harness.init(0, Some(player_entity(1)), &[], vec![]);
        assert_eq!(harness.run(&mut state), ExecutionState::Finished);
        assert_eq!(state.int_stack, vec![1, 4]);
    }
}
