use lc_core::{Coord, ExecutionState, Npc, PointerSet, ScriptError, ServerTriggerType};

use super::{name_or_null, pop_array, push_param, unimplemented};
use crate::opcode::ScriptOpcode;
use crate::registry::{HandlerTable, ScriptEnv};
use crate::state::ScriptState;

pub(crate) const HANDLERS: HandlerTable = &[
    (ScriptOpcode::NPC_FINDUID, npc_finduid),
    (ScriptOpcode::NPC_ADD, unimplemented),
    (ScriptOpcode::NPC_ANIM, npc_anim),
    (ScriptOpcode::NPC_BASESTAT, npc_basestat),
    (ScriptOpcode::NPC_CATEGORY, npc_category),
    (ScriptOpcode::NPC_COORD, npc_coord),
    (ScriptOpcode::NPC_DEL, npc_del),
    (ScriptOpcode::NPC_DELAY, npc_delay),
    (ScriptOpcode::NPC_FACESQUARE, unimplemented),
    (ScriptOpcode::NPC_FINDEXACT, unimplemented),
    (ScriptOpcode::NPC_FINDHERO, npc_findhero),
    (ScriptOpcode::NPC_PARAM, npc_param),
    (ScriptOpcode::NPC_QUEUE, npc_queue),
    (ScriptOpcode::NPC_RANGE, npc_range),
    (ScriptOpcode::NPC_SAY, npc_say),
    (ScriptOpcode::NPC_SETHUNT, unimplemented),
    (ScriptOpcode::NPC_SETHUNTMODE, unimplemented),
    (ScriptOpcode::NPC_SETMODE, unimplemented),
    (ScriptOpcode::NPC_STAT, npc_stat),
    (ScriptOpcode::NPC_STATHEAL, unimplemented),
    (ScriptOpcode::NPC_TYPE, npc_type),
    (ScriptOpcode::NPC_DAMAGE, npc_damage),
    (ScriptOpcode::NPC_NAME, npc_name),
    (ScriptOpcode::NPC_UID, npc_uid),
    (ScriptOpcode::NPC_SETTIMER, npc_settimer),
    (ScriptOpcode::SPOTANIM_NPC, spotanim_npc),
];

type HandlerResult = Result<(), ScriptError>;

/// Rebinds the selected npc slot from a uid. A stale uid is an answer, not a fault.
fn npc_finduid(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let uid = state.pop_int()?;
    let (nid, expected_type) = Npc::split_uid(uid);
    let slot = state.selected_slot();
    let pointer = PointerSet::pick(PointerSet::ACTIVE_NPC, PointerSet::ACTIVE_NPC2, slot == 1);

    let found = match env.world.npc(nid) {
        Ok(info) if info.type_id == expected_type => Some(Npc {
            nid: info.nid,
            type_id: info.type_id,
        }),
        Ok(_) => None,
        Err(error) if error.kind.is_recoverable() => None,
        Err(error) => return Err(error),
    };

    state.active_npcs.set(slot, found);
    if found.is_some() {
        state.pointer_add(pointer);
        state.push_int(1);
    } else {
        log::debug!("npc uid {} no longer resolves", uid);
        state.pointer_remove(pointer);
        state.push_int(0);
    }
    Ok(())
}

fn npc_anim(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let [seq, delay] = pop_array(state)?;
    let npc = state.require_npc()?;
    env.world.npc_anim(npc.nid, seq, delay)
}

fn npc_basestat(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let stat = state.pop_int()?;
    let npc = state.require_npc()?;
    let level = env.world.npc_stat(npc.nid, stat)?;
    state.push_int(level.base);
    Ok(())
}

fn npc_stat(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let stat = state.pop_int()?;
    let npc = state.require_npc()?;
    let level = env.world.npc_stat(npc.nid, stat)?;
    state.push_int(level.level);
    Ok(())
}

fn npc_category(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let npc = state.require_npc()?;
    state.push_int(env.config.npc(npc.type_id)?.category);
    Ok(())
}

fn npc_coord(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let npc = state.require_npc()?;
    let info = env.world.npc(npc.nid)?;
    state.push_int(info.coord.to_script_int());
    Ok(())
}

fn npc_del(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let npc = state.require_npc()?;
    env.world.npc_remove(npc.nid)
}

fn npc_delay(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let ticks = state.pop_int()?;
    state.require_npc()?;
    state.suspend(ExecutionState::NpcSuspended, Some(ticks.saturating_add(1)));
    Ok(())
}

fn npc_findhero(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let npc = state.require_npc()?;
    let info = env.world.npc(npc.nid)?;
    state.push_int(info.hero);
    Ok(())
}

fn npc_param(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let param = state.pop_int()?;
    let npc = state.require_npc()?;
    let npc_type = env.config.npc(npc.type_id)?;
    let (var_type, value) = env.config.resolve_param(&npc_type.params, param)?;
    push_param(state, var_type, value)
}

fn npc_queue(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let [queue, delay] = pop_array(state)?;
    let Some(trigger) = ServerTriggerType::ai_queue(queue.wrapping_sub(1)) else {
        return Err(ScriptError::runtime(format!("Invalid ai_queue: {}", queue)));
    };
    let npc = state.require_npc()?;
    let npc_type = env.config.npc(npc.type_id)?;
    match env
        .scripts
        .get_by_trigger(trigger, npc_type.id, npc_type.category)
    {
        Some(script) => env.world.queue_npc_script(npc.nid, script.id, delay),
        None => Ok(()),
    }
}

fn npc_range(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let coord = Coord::from_script_int(state.pop_int()?);
    let npc = state.require_npc()?;
    let info = env.world.npc(npc.nid)?;
    state.push_int(info.coord.distance(coord).unwrap_or(-1));
    Ok(())
}

fn npc_say(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let text = state.pop_string()?;
    let npc = state.require_npc()?;
    env.world.npc_say(npc.nid, &text)
}

fn npc_type(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let npc = state.require_npc()?;
    state.push_int(npc.type_id);
    Ok(())
}

fn npc_damage(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let [damage_type, amount] = pop_array(state)?;
    let npc = state.require_npc()?;
    let source = state.active_player().map(|player| player.pid);
    env.world.npc_damage(npc.nid, damage_type, amount, source)
}

fn npc_name(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let npc = state.require_npc()?;
    let name = name_or_null(env.config.npc(npc.type_id)?.name.as_ref());
    state.push_string(name);
    Ok(())
}

fn npc_uid(state: &mut ScriptState, _env: &mut ScriptEnv<'_>) -> HandlerResult {
    let npc = state.require_npc()?;
    state.push_int(npc.uid());
    Ok(())
}

fn npc_settimer(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let interval = state.pop_int()?;
    let npc = state.require_npc()?;
    env.world.npc_set_timer(npc.nid, interval)
}

fn spotanim_npc(state: &mut ScriptState, env: &mut ScriptEnv<'_>) -> HandlerResult {
    let [spotanim, height, delay] = pop_array(state)?;
    let npc = state.require_npc()?;
    env.world.npc_spotanim(npc.nid, spotanim, height, delay)
}

#[cfg(test)]
mod npc_tests {
    use std::sync::Arc;

    use lc_core::{Coord, ExecutionState, Npc, PointerSet, ScriptErrorKind, ServerTriggerType};

    use crate::opcode::ScriptOpcode::*;
    use crate::runtime_test_support::*;
    use crate::sandbox::WorldEvent;

    fn uid(nid: i32, type_id: i32) -> i32 {
        Npc { nid, type_id }.uid()
    }

    #[test]
    fn finduid_binds_live_npc_and_grants_pointer() {
        let main = script(
            0,
            vec![
                int(PUSH_CONSTANT_INT, uid(3, 2)),
                op(NPC_FINDUID),
                op(NPC_TYPE),
                op(NPC_UID),
                op(RETURN),
            ],
        );
        let mut harness = Harness::new(vec![main]);
        let mut state = harness.init(0, None, &[], vec![]);
        assert_eq!(harness.run(&mut state), ExecutionState::Finished);
        assert_eq!(state.int_stack, vec![1, 2, uid(3, 2)]);
        assert!(state.pointer_check(PointerSet::ACTIVE_NPC));
    }

    #[test]
    fn finduid_with_stale_type_clears_binding_without_aborting() {
        let main = script(
            0,
            vec![
                int(PUSH_CONSTANT_INT, uid(3, 9)),
                op(NPC_FINDUID),
                int(PUSH_CONSTANT_INT, uid(77, 2)),
                op(NPC_FINDUID),
                op(ACTIVE_NPC),
                op(RETURN),
            ],
        );
        let mut harness = Harness::new(vec![main]);
        let mut state = harness.init(0, Some(npc_entity(3, 2)), &[], vec![]);
        assert!(state.pointer_check(PointerSet::ACTIVE_NPC));
        assert_eq!(harness.run(&mut state), ExecutionState::Finished);
        assert_eq!(state.int_stack, vec![0, 0, 0]);
        assert!(state.active_npc().is_none());
        assert!(!state.pointer_check(PointerSet::ACTIVE_NPC));
    }

    #[test]
    fn reads_config_and_live_data() {
        let main = script(
            0,
            vec![
                op(NPC_CATEGORY),
                op(NPC_NAME),
                int(PUSH_CONSTANT_INT, 1),
                op(NPC_PARAM),
                int(PUSH_CONSTANT_INT, 2),
                op(NPC_PARAM),
                int(PUSH_CONSTANT_INT, 3),
                op(NPC_STAT),
                int(PUSH_CONSTANT_INT, 3),
                op(NPC_BASESTAT),
                op(NPC_COORD),
                op(NPC_FINDHERO),
                int(PUSH_CONSTANT_INT, Coord::new(0, 3200, 3200).to_script_int()),
                op(NPC_RANGE),
                int(PUSH_CONSTANT_INT, Coord::new(1, 3203, 3204).to_script_int()),
                op(NPC_RANGE),
                op(RETURN),
            ],
        );
        let mut harness = Harness::new(vec![main]);
        let mut state = harness.init(0, Some(npc_entity(3, 2)), &[], vec![]);
        assert_eq!(harness.run(&mut state), ExecutionState::Finished);
        assert_eq!(
            state.int_stack,
            vec![
                7,
                9,
                7,
                10,
                Coord::new(0, 3203, 3204).to_script_int(),
                -1,
                4,
                -1
            ]
        );
        assert_eq!(state.string_stack, vec!["Guard".to_string(), "none".to_string()]);
    }

    #[test]
    fn unnamed_type_pushes_null() {
        let main = script(0, vec![op(NPC_NAME), op(RETURN)]);
        let mut harness = Harness::new(vec![main]);
        let mut state = harness.init(0, Some(npc_entity(5, 4)), &[], vec![]);
        harness.run(&mut state);
        assert_eq!(state.string_stack, vec!["null".to_string()]);
    }

    #[test]
    fn damage_credits_the_active_player() {
        let main = script(
            0,
            vec![
                int(PUSH_CONSTANT_INT, 1),
                int(PUSH_CONSTANT_INT, 5),
                op(NPC_DAMAGE),
                op(NPC_FINDHERO),
                op(RETURN),
            ],
        );
        let mut harness = Harness::new(vec![main]);
        let mut state = harness.init(0, Some(npc_entity(3, 2)), &[player_entity(2)], vec![]);
        assert_eq!(harness.run(&mut state), ExecutionState::Finished);
        assert_eq!(state.int_stack, vec![2]);
        assert_eq!(
            harness.world.take_events(),
            vec![WorldEvent::NpcDamage {
                nid: 3,
                damage_type: 1,
                amount: 5,
                source: Some(2)
            }]
        );
    }

    #[test]
    fn queue_resolves_trigger_script_by_category() {
        let mut handler = script(1, vec![op(RETURN)]);
        let [_, by_category, _] = ServerTriggerType::AI_QUEUE1.lookup_keys(2, 7);
        if let Some(info) = Arc::make_mut(&mut handler).info.as_mut() {
            info.lookup_key = by_category;
        }
        let main = script(
            0,
            vec![
                int(PUSH_CONSTANT_INT, 1),
                int(PUSH_CONSTANT_INT, 4),
                op(NPC_QUEUE),
                int(PUSH_CONSTANT_INT, 2),
                int(PUSH_CONSTANT_INT, 0),
                op(NPC_QUEUE),
                int(PUSH_CONSTANT_INT, 21),
                int(PUSH_CONSTANT_INT, 0),
                op(NPC_QUEUE),
            ],
        );
        let mut harness = Harness::new(vec![main, handler]);
        let mut state = harness.init(0, Some(npc_entity(3, 2)), &[], vec![]);
        assert_eq!(harness.run(&mut state), ExecutionState::Aborted);
        assert_eq!(
            harness.world.events[0],
            WorldEvent::NpcQueue {
                nid: 3,
                script: 1,
                delay: 4
            }
        );
        let report = state.abort_report.expect("abort should leave a report");
        assert_eq!(report.kind, ScriptErrorKind::Runtime);
        assert_eq!(report.message, "Invalid ai_queue: 21");
    }

    #[test]
    fn npc_delay_suspends_and_del_removes() {
        let main = script(
            0,
            vec![int(PUSH_CONSTANT_INT, 0), op(NPC_DELAY), op(NPC_DEL), op(RETURN)],
        );
        let mut harness = Harness::new(vec![main]);
        let mut state = harness.init(0, Some(npc_entity(3, 2)), &[], vec![]);
        assert_eq!(harness.run(&mut state), ExecutionState::NpcSuspended);
        assert_eq!(state.delay, Some(1));
        assert_eq!(harness.run(&mut state), ExecutionState::Finished);
        assert!(!harness.world.npcs.contains_key(&3));
    }

    #[test]
    fn npc_delay_saturates_at_the_longest_wait() {
        let main = script(0, vec![int(PUSH_CONSTANT_INT, i32::MAX), op(NPC_DELAY), op(RETURN)]);
        let mut harness = Harness::new(vec![main]);
        let mut state = harness.init(0, Some(npc_entity(3, 2)), &[], vec![]);
        assert_eq!(harness.run(&mut state), ExecutionState::NpcSuspended);
        assert_eq!(state.delay, Some(i32::MAX));
    }

    #[test]
    fn npc_queue_rejects_the_lowest_queue_number() {
        let main = script(
            0,
            vec![
                int(PUSH_CONSTANT_INT, i32::MIN),
                int(PUSH_CONSTANT_INT, 0),
                op(NPC_QUEUE),
            ],
        );
        let mut harness = Harness::new(vec![main]);
        let mut state = harness.init(0, Some(npc_entity(3, 2)), &[], vec![]);
        assert_eq!(harness.run(&mut state), ExecutionState::Aborted);
        let report = state.abort_report.expect("abort should leave a report");
        assert_eq!(report.message, "Invalid ai_queue: -2147483648");
    }
}
