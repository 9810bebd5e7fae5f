use lc_core::{Coord, Loc, Obj, ScriptError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub pid: i32,
    pub username: String,
    pub display_name: String,
    pub coord: Coord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcInfo {
    pub nid: i32,
    pub type_id: i32,
    pub coord: Coord,
    /// pid of the player that dealt the most damage, or -1.
    pub hero: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatLevel {
    pub level: i32,
    pub base: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvItem {
    pub obj: i32,
    pub count: i32,
}

/// Entity callbacks the handlers reach through. Every entity is addressed by
/// its handle and re-validated on each call, so a stale handle surfaces as an
/// `EntityLookupFailure` instead of touching a reused slot.
pub trait World {
    fn map_clock(&self) -> i32;
    fn members(&self) -> bool;
    fn player_count(&self) -> i32;
    /// Uniform in `0..bound`; zero when `bound <= 0`.
    fn random(&mut self, bound: i32) -> i32;

    fn player(&self, pid: i32) -> Result<PlayerInfo, ScriptError>;
    fn message_game(&mut self, pid: i32, message: &str) -> Result<(), ScriptError>;
    fn varp(&self, pid: i32, varp: i32) -> Result<i32, ScriptError>;
    fn set_varp(&mut self, pid: i32, varp: i32, value: i32) -> Result<(), ScriptError>;
    fn stat(&self, pid: i32, stat: i32) -> Result<StatLevel, ScriptError>;
    fn give_xp(&mut self, pid: i32, stat: i32, xp: i32) -> Result<(), ScriptError>;
    fn teleport(&mut self, pid: i32, coord: Coord) -> Result<(), ScriptError>;
    fn player_anim(&mut self, pid: i32, seq: i32, delay: i32) -> Result<(), ScriptError>;
    fn player_say(&mut self, pid: i32, text: &str) -> Result<(), ScriptError>;
    fn queue_player_script(
        &mut self,
        pid: i32,
        script: i32,
        delay: i32,
    ) -> Result<(), ScriptError>;

    fn inv_items(&self, pid: i32, inv: i32) -> Result<Vec<Option<InvItem>>, ScriptError>;
    fn set_inv_items(
        &mut self,
        pid: i32,
        inv: i32,
        items: Vec<Option<InvItem>>,
    ) -> Result<(), ScriptError>;

    fn npc(&self, nid: i32) -> Result<NpcInfo, ScriptError>;
    fn varn(&self, nid: i32, varn: i32) -> Result<i32, ScriptError>;
    fn set_varn(&mut self, nid: i32, varn: i32, value: i32) -> Result<(), ScriptError>;
    fn npc_stat(&self, nid: i32, stat: i32) -> Result<StatLevel, ScriptError>;
    fn npc_anim(&mut self, nid: i32, seq: i32, delay: i32) -> Result<(), ScriptError>;
    fn npc_say(&mut self, nid: i32, text: &str) -> Result<(), ScriptError>;
    fn npc_damage(
        &mut self,
        nid: i32,
        damage_type: i32,
        amount: i32,
        source: Option<i32>,
    ) -> Result<(), ScriptError>;
    fn npc_set_timer(&mut self, nid: i32, interval: i32) -> Result<(), ScriptError>;
    fn npc_spotanim(
        &mut self,
        nid: i32,
        spotanim: i32,
        height: i32,
        delay: i32,
    ) -> Result<(), ScriptError>;
    fn npc_remove(&mut self, nid: i32) -> Result<(), ScriptError>;
    fn queue_npc_script(&mut self, nid: i32, script: i32, delay: i32) -> Result<(), ScriptError>;

    fn add_loc(&mut self, loc: Loc, duration: i32) -> Result<(), ScriptError>;
    fn remove_loc(&mut self, loc: Loc, duration: i32) -> Result<(), ScriptError>;
    fn add_obj(&mut self, obj: Obj, receiver: Option<i32>, duration: i32)
        -> Result<(), ScriptError>;
    fn remove_obj(&mut self, obj: Obj, duration: i32) -> Result<(), ScriptError>;
}
