use std::collections::BTreeMap;

use lc_core::{Coord, Loc, Obj, ScriptError};
use serde::{Deserialize, Serialize};

use crate::rng::WorldRng;
use crate::world::{InvItem, NpcInfo, PlayerInfo, StatLevel, World};

/// A domain effect the sandbox recorded instead of performing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum WorldEvent {
    Message {
        pid: i32,
        text: String,
    },
    Xp {
        pid: i32,
        stat: i32,
        xp: i32,
    },
    Teleport {
        pid: i32,
        coord: Coord,
    },
    PlayerAnim {
        pid: i32,
        seq: i32,
        delay: i32,
    },
    PlayerSay {
        pid: i32,
        text: String,
    },
    PlayerQueue {
        pid: i32,
        script: i32,
        delay: i32,
    },
    NpcAnim {
        nid: i32,
        seq: i32,
        delay: i32,
    },
    NpcSay {
        nid: i32,
        text: String,
    },
    NpcDamage {
        nid: i32,
        damage_type: i32,
        amount: i32,
        source: Option<i32>,
    },
    NpcTimer {
        nid: i32,
        interval: i32,
    },
    NpcSpotanim {
        nid: i32,
        spotanim: i32,
        height: i32,
        delay: i32,
    },
    NpcRemoved {
        nid: i32,
    },
    NpcQueue {
        nid: i32,
        script: i32,
        delay: i32,
    },
    LocAdded {
        loc: Loc,
        duration: i32,
    },
    LocRemoved {
        loc: Loc,
        duration: i32,
    },
    ObjAdded {
        obj: Obj,
        receiver: Option<i32>,
        duration: i32,
    },
    ObjRemoved {
        obj: Obj,
        duration: i32,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxInv {
    pub size: usize,
    #[serde(default)]
    pub items: Vec<Option<InvItem>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxPlayer {
    pub pid: i32,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub coord: Coord,
    #[serde(default)]
    pub varps: BTreeMap<i32, i32>,
    #[serde(default)]
    pub stats: BTreeMap<i32, StatLevel>,
    #[serde(default)]
    pub experience: BTreeMap<i32, i32>,
    #[serde(default)]
    pub invs: BTreeMap<i32, SandboxInv>,
}

impl SandboxPlayer {
    pub fn new(pid: i32, username: impl Into<String>, coord: Coord) -> Self {
        Self {
            pid,
            username: username.into(),
            display_name: None,
            coord,
            varps: BTreeMap::new(),
            stats: BTreeMap::new(),
            experience: BTreeMap::new(),
            invs: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxNpc {
    pub nid: i32,
    pub type_id: i32,
    #[serde(default)]
    pub coord: Coord,
    #[serde(default = "no_hero")]
    pub hero: i32,
    #[serde(default)]
    pub varns: BTreeMap<i32, i32>,
    #[serde(default)]
    pub stats: BTreeMap<i32, StatLevel>,
    #[serde(default)]
    pub timer: Option<i32>,
}

impl SandboxNpc {
    pub fn new(nid: i32, type_id: i32, coord: Coord) -> Self {
        Self {
            nid,
            type_id,
            coord,
            hero: no_hero(),
            varns: BTreeMap::new(),
            stats: BTreeMap::new(),
            timer: None,
        }
    }
}

fn no_hero() -> i32 {
    -1
}

/// In-memory world for running scripts without a game server. Effects with
/// no state of their own are appended to `events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxWorld {
    #[serde(default)]
    pub clock: i32,
    #[serde(default)]
    pub members: bool,
    #[serde(default)]
    pub rng_state: WorldRng,
    #[serde(default)]
    pub players: BTreeMap<i32, SandboxPlayer>,
    #[serde(default)]
    pub npcs: BTreeMap<i32, SandboxNpc>,
    #[serde(default)]
    pub locs: Vec<Loc>,
    #[serde(default)]
    pub objs: Vec<Obj>,
    #[serde(default)]
    pub events: Vec<WorldEvent>,
}

impl Default for SandboxWorld {
    fn default() -> Self {
        Self {
            clock: 0,
            members: false,
            rng_state: WorldRng::default(),
            players: BTreeMap::new(),
            npcs: BTreeMap::new(),
            locs: Vec::new(),
            objs: Vec::new(),
            events: Vec::new(),
        }
    }
}

impl SandboxWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn add_player(&mut self, player: SandboxPlayer) {
        self.players.insert(player.pid, player);
    }

    pub fn add_npc(&mut self, npc: SandboxNpc) {
        self.npcs.insert(npc.nid, npc);
    }

    pub fn tick(&mut self) {
        self.clock += 1;
    }

    pub fn take_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    fn player_ref(&self, pid: i32) -> Result<&SandboxPlayer, ScriptError> {
        self.players
            .get(&pid)
            .ok_or_else(|| ScriptError::lookup(format!("Player {} is not in the world.", pid)))
    }

    fn player_mut(&mut self, pid: i32) -> Result<&mut SandboxPlayer, ScriptError> {
        self.players
            .get_mut(&pid)
            .ok_or_else(|| ScriptError::lookup(format!("Player {} is not in the world.", pid)))
    }

    fn npc_ref(&self, nid: i32) -> Result<&SandboxNpc, ScriptError> {
        self.npcs
            .get(&nid)
            .ok_or_else(|| ScriptError::lookup(format!("Npc {} is not in the world.", nid)))
    }

    fn npc_mut(&mut self, nid: i32) -> Result<&mut SandboxNpc, ScriptError> {
        self.npcs
            .get_mut(&nid)
            .ok_or_else(|| ScriptError::lookup(format!("Npc {} is not in the world.", nid)))
    }

    /// Records an effect after checking the player is still present.
    fn player_event(&mut self, pid: i32, event: WorldEvent) -> Result<(), ScriptError> {
        self.player_ref(pid)?;
        self.events.push(event);
        Ok(())
    }

    fn npc_event(&mut self, nid: i32, event: WorldEvent) -> Result<(), ScriptError> {
        self.npc_ref(nid)?;
        self.events.push(event);
        Ok(())
    }
}

impl World for SandboxWorld {
    fn map_clock(&self) -> i32 {
        self.clock
    }

    fn members(&self) -> bool {
        self.members
    }

    fn player_count(&self) -> i32 {
        self.players.len() as i32
    }

    fn random(&mut self, bound: i32) -> i32 {
        self.rng_state.below(bound)
    }

    fn player(&self, pid: i32) -> Result<PlayerInfo, ScriptError> {
        let player = self.player_ref(pid)?;
        Ok(PlayerInfo {
            pid,
            username: player.username.clone(),
            display_name: player
                .display_name
                .clone()
                .unwrap_or_else(|| player.username.clone()),
            coord: player.coord,
        })
    }

    fn message_game(&mut self, pid: i32, message: &str) -> Result<(), ScriptError> {
        self.player_event(
            pid,
            WorldEvent::Message {
                pid,
                text: message.to_string(),
            },
        )
    }

    fn varp(&self, pid: i32, varp: i32) -> Result<i32, ScriptError> {
        Ok(self
            .player_ref(pid)?
            .varps
            .get(&varp)
            .copied()
            .unwrap_or(0))
    }

    fn set_varp(&mut self, pid: i32, varp: i32, value: i32) -> Result<(), ScriptError> {
        self.player_mut(pid)?.varps.insert(varp, value);
        Ok(())
    }

    fn stat(&self, pid: i32, stat: i32) -> Result<StatLevel, ScriptError> {
        Ok(self
            .player_ref(pid)?
            .stats
            .get(&stat)
            .copied()
            .unwrap_or_default())
    }

    fn give_xp(&mut self, pid: i32, stat: i32, xp: i32) -> Result<(), ScriptError> {
        let player = self.player_mut(pid)?;
        let total = player.experience.entry(stat).or_insert(0);
        *total = total.saturating_add(xp);
        self.events.push(WorldEvent::Xp { pid, stat, xp });
        Ok(())
    }

    fn teleport(&mut self, pid: i32, coord: Coord) -> Result<(), ScriptError> {
        self.player_mut(pid)?.coord = coord;
        self.events.push(WorldEvent::Teleport { pid, coord });
        Ok(())
    }

    fn player_anim(&mut self, pid: i32, seq: i32, delay: i32) -> Result<(), ScriptError> {
        self.player_event(pid, WorldEvent::PlayerAnim { pid, seq, delay })
    }

    fn player_say(&mut self, pid: i32, text: &str) -> Result<(), ScriptError> {
        self.player_event(
            pid,
            WorldEvent::PlayerSay {
                pid,
                text: text.to_string(),
            },
        )
    }

    fn queue_player_script(
        &mut self,
        pid: i32,
        script: i32,
        delay: i32,
    ) -> Result<(), ScriptError> {
        self.player_event(pid, WorldEvent::PlayerQueue { pid, script, delay })
    }

    fn inv_items(&self, pid: i32, inv: i32) -> Result<Vec<Option<InvItem>>, ScriptError> {
        let player = self.player_ref(pid)?;
        let Some(stored) = player.invs.get(&inv) else {
            return Err(ScriptError::runtime(format!(
                "Player {} has no inventory {}.",
                pid, inv
            )));
        };
        let mut items = stored.items.clone();
        items.resize(stored.size, None);
        Ok(items)
    }

    fn set_inv_items(
        &mut self,
        pid: i32,
        inv: i32,
        items: Vec<Option<InvItem>>,
    ) -> Result<(), ScriptError> {
        let player = self.player_mut(pid)?;
        let Some(stored) = player.invs.get_mut(&inv) else {
            return Err(ScriptError::runtime(format!(
                "Player {} has no inventory {}.",
                pid, inv
            )));
        };
        stored.items = items;
        stored.items.truncate(stored.size);
        Ok(())
    }

    fn npc(&self, nid: i32) -> Result<NpcInfo, ScriptError> {
        let npc = self.npc_ref(nid)?;
        Ok(NpcInfo {
            nid,
            type_id: npc.type_id,
            coord: npc.coord,
            hero: npc.hero,
        })
    }

    fn varn(&self, nid: i32, varn: i32) -> Result<i32, ScriptError> {
        Ok(self.npc_ref(nid)?.varns.get(&varn).copied().unwrap_or(0))
    }

    fn set_varn(&mut self, nid: i32, varn: i32, value: i32) -> Result<(), ScriptError> {
        self.npc_mut(nid)?.varns.insert(varn, value);
        Ok(())
    }

    fn npc_stat(&self, nid: i32, stat: i32) -> Result<StatLevel, ScriptError> {
        Ok(self
            .npc_ref(nid)?
            .stats
            .get(&stat)
            .copied()
            .unwrap_or_default())
    }

    fn npc_anim(&mut self, nid: i32, seq: i32, delay: i32) -> Result<(), ScriptError> {
        self.npc_event(nid, WorldEvent::NpcAnim { nid, seq, delay })
    }

    fn npc_say(&mut self, nid: i32, text: &str) -> Result<(), ScriptError> {
        self.npc_event(
            nid,
            WorldEvent::NpcSay {
                nid,
                text: text.to_string(),
            },
        )
    }

    fn npc_damage(
        &mut self,
        nid: i32,
        damage_type: i32,
        amount: i32,
        source: Option<i32>,
    ) -> Result<(), ScriptError> {
        let npc = self.npc_mut(nid)?;
        // hitpoints
        if let Some(stat) = npc.stats.get_mut(&3) {
            stat.level = (stat.level - amount).max(0);
        }
        if let Some(pid) = source {
            npc.hero = pid;
        }
        self.events.push(WorldEvent::NpcDamage {
            nid,
            damage_type,
            amount,
            source,
        });
        Ok(())
    }

    fn npc_set_timer(&mut self, nid: i32, interval: i32) -> Result<(), ScriptError> {
        self.npc_mut(nid)?.timer = Some(interval);
        self.events.push(WorldEvent::NpcTimer { nid, interval });
        Ok(())
    }

    fn npc_spotanim(
        &mut self,
        nid: i32,
        spotanim: i32,
        height: i32,
        delay: i32,
    ) -> Result<(), ScriptError> {
        self.npc_event(
            nid,
            WorldEvent::NpcSpotanim {
                nid,
                spotanim,
                height,
                delay,
            },
        )
    }

    fn npc_remove(&mut self, nid: i32) -> Result<(), ScriptError> {
        self.npcs
            .remove(&nid)
            .ok_or_else(|| ScriptError::lookup(format!("Npc {} is not in the world.", nid)))?;
        self.events.push(WorldEvent::NpcRemoved { nid });
        Ok(())
    }

    fn queue_npc_script(&mut self, nid: i32, script: i32, delay: i32) -> Result<(), ScriptError> {
        self.npc_event(nid, WorldEvent::NpcQueue { nid, script, delay })
    }

    fn add_loc(&mut self, loc: Loc, duration: i32) -> Result<(), ScriptError> {
        self.locs.push(loc);
        self.events.push(WorldEvent::LocAdded { loc, duration });
        Ok(())
    }

    fn remove_loc(&mut self, loc: Loc, duration: i32) -> Result<(), ScriptError> {
        let Some(index) = self.locs.iter().position(|existing| *existing == loc) else {
            return Err(ScriptError::lookup(format!(
                "Loc {} is not at {:?}.",
                loc.type_id, loc.coord
            )));
        };
        self.locs.remove(index);
        self.events.push(WorldEvent::LocRemoved { loc, duration });
        Ok(())
    }

    fn add_obj(
        &mut self,
        obj: Obj,
        receiver: Option<i32>,
        duration: i32,
    ) -> Result<(), ScriptError> {
        self.objs.push(obj);
        self.events.push(WorldEvent::ObjAdded {
            obj,
            receiver,
            duration,
        });
        Ok(())
    }

    fn remove_obj(&mut self, obj: Obj, duration: i32) -> Result<(), ScriptError> {
        let Some(index) = self.objs.iter().position(|existing| *existing == obj) else {
            return Err(ScriptError::lookup(format!(
                "Obj {} is not at {:?}.",
                obj.type_id, obj.coord
            )));
        };
        self.objs.remove(index);
        self.events.push(WorldEvent::ObjRemoved { obj, duration });
        Ok(())
    }
}
