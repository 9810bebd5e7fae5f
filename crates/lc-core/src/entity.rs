use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    pub level: i32,
    pub x: i32,
    pub z: i32,
}

impl Coord {
    pub const MASK: i64 = 0x3fff;

    pub fn new(level: i32, x: i32, z: i32) -> Self {
        Self { level, x, z }
    }

    pub fn pack(self) -> i64 {
        ((i64::from(self.level) & Self::MASK) << 28)
            | ((i64::from(self.x) & Self::MASK) << 14)
            | (i64::from(self.z) & Self::MASK)
    }

    pub fn unpack(packed: i64) -> Self {
        Self {
            level: ((packed >> 28) & Self::MASK) as i32,
            x: ((packed >> 14) & Self::MASK) as i32,
            z: (packed & Self::MASK) as i32,
        }
    }

    /// Packed form as it travels on the int stack. Only levels 0..=7 survive.
    pub fn to_script_int(self) -> i32 {
        self.pack() as i32
    }

    pub fn from_script_int(packed: i32) -> Self {
        Self::unpack(i64::from(packed))
    }

    pub fn translate(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            level: self.level + dy,
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    /// Chebyshev distance on the same level, `None` across levels.
    pub fn distance(self, other: Self) -> Option<i32> {
        if self.level != other.level {
            return None;
        }
        Some((self.x - other.x).abs().max((self.z - other.z).abs()))
    }

    pub fn zone_index(self) -> (i32, i32, i32) {
        (self.level, self.x >> 3, self.z >> 3)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub pid: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Npc {
    pub nid: i32,
    pub type_id: i32,
}

impl Npc {
    pub fn uid(self) -> i32 {
        (self.type_id << 16) | self.nid
    }

    /// Splits a uid into `(slot, type)`.
    pub fn split_uid(uid: i32) -> (i32, i32) {
        (uid & 0xffff, (uid >> 16) & 0xffff)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loc {
    pub type_id: i32,
    pub coord: Coord,
    pub shape: i32,
    pub angle: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Obj {
    pub type_id: i32,
    pub coord: Coord,
    pub count: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Npc,
    Loc,
    Obj,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entity {
    Player(Player),
    Npc(Npc),
    Loc(Loc),
    Obj(Obj),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Player(_) => EntityKind::Player,
            Self::Npc(_) => EntityKind::Npc,
            Self::Loc(_) => EntityKind::Loc,
            Self::Obj(_) => EntityKind::Obj,
        }
    }
}
