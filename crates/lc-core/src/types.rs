use bitflags::bitflags;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutionState {
    /// Built by `init`, nothing executed yet.
    #[default]
    Ready,
    Running,
    Finished,
    Aborted,
    /// Player delay; wakes after `delay` ticks.
    Suspended,
    PauseButton,
    CountDown,
    NpcSuspended,
    WorldSuspended,
}

impl ExecutionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Aborted)
    }

    pub fn is_suspended(self) -> bool {
        matches!(
            self,
            Self::Suspended
                | Self::PauseButton
                | Self::CountDown
                | Self::NpcSuspended
                | Self::WorldSuspended
        )
    }

    /// Timed waits resume on a later tick by themselves. `PauseButton` and
    /// `CountDown` need an external event first.
    pub fn resumes_automatically(self) -> bool {
        matches!(
            self,
            Self::Suspended | Self::NpcSuspended | Self::WorldSuspended
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::Running => "RUNNING",
            Self::Finished => "FINISHED",
            Self::Aborted => "ABORTED",
            Self::Suspended => "SUSPENDED",
            Self::PauseButton => "PAUSEBUTTON",
            Self::CountDown => "COUNTDOWN",
            Self::NpcSuspended => "NPC_SUSPENDED",
            Self::WorldSuspended => "WORLD_SUSPENDED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ServerTriggerType(pub u8);

impl ServerTriggerType {
    pub const PROC: Self = Self(0);
    pub const LABEL: Self = Self(1);
    pub const DEBUGPROC: Self = Self(2);
    pub const OPNPC1: Self = Self(3);
    pub const OPNPC2: Self = Self(4);
    pub const OPNPC3: Self = Self(5);
    pub const OPNPC4: Self = Self(6);
    pub const OPNPC5: Self = Self(7);
    pub const APNPC1: Self = Self(8);
    pub const APNPC2: Self = Self(9);
    pub const APNPC3: Self = Self(10);
    pub const APNPC4: Self = Self(11);
    pub const APNPC5: Self = Self(12);
    pub const AI_QUEUE1: Self = Self(20);
    pub const AI_TIMER: Self = Self(40);
    pub const QUEUE: Self = Self(41);
    pub const WEAKQUEUE: Self = Self(42);
    pub const TIMER: Self = Self(43);
    pub const LOGIN: Self = Self(44);
    pub const LOGOUT: Self = Self(45);

    pub const AI_QUEUE_COUNT: i32 = 20;

    /// `ai_queue1` through `ai_queue20`; `index` is zero based.
    pub fn ai_queue(index: i32) -> Option<Self> {
        if !(0..Self::AI_QUEUE_COUNT).contains(&index) {
            return None;
        }
        Some(Self(Self::AI_QUEUE1.0 + index as u8))
    }

    /// Keys in the order a trigger lookup tries them: by type, by category, default.
    pub fn lookup_keys(self, type_id: i32, category: i32) -> [i32; 3] {
        let trigger = i32::from(self.0);
        [
            trigger | (2 << 8) | (type_id << 10),
            trigger | (1 << 8) | (category << 10),
            trigger,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarType {
    Int,
    String,
    Boolean,
    Coord,
    Obj,
    NamedObj,
    Npc,
    Loc,
    Stat,
    Seq,
}

impl VarType {
    pub fn char_code(self) -> i32 {
        let code = match self {
            Self::Int => 'i',
            Self::String => 's',
            Self::Boolean => '1',
            Self::Coord => 'c',
            Self::Obj => 'o',
            Self::NamedObj => 'O',
            Self::Npc => 'n',
            Self::Loc => 'l',
            Self::Stat => 'S',
            Self::Seq => 'A',
        };
        code as i32
    }

    pub fn from_char_code(code: i32) -> Option<Self> {
        let ch = char::from_u32(u32::try_from(code).ok()?)?;
        Some(match ch {
            'i' => Self::Int,
            's' => Self::String,
            '1' => Self::Boolean,
            'c' => Self::Coord,
            'o' => Self::Obj,
            'O' => Self::NamedObj,
            'n' => Self::Npc,
            'l' => Self::Loc,
            'S' => Self::Stat,
            'A' => Self::Seq,
            _ => return None,
        })
    }

    pub fn is_string(self) -> bool {
        matches!(self, Self::String)
    }
}

bitflags! {
    /// Capabilities granted to an invocation for touching its active entities.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct PointerSet: u32 {
        const ACTIVE_PLAYER = 1 << 0;
        const ACTIVE_PLAYER2 = 1 << 1;
        const PROTECTED_ACTIVE_PLAYER = 1 << 2;
        const PROTECTED_ACTIVE_PLAYER2 = 1 << 3;
        const ACTIVE_NPC = 1 << 4;
        const ACTIVE_NPC2 = 1 << 5;
        const ACTIVE_LOC = 1 << 6;
        const ACTIVE_LOC2 = 1 << 7;
        const ACTIVE_OBJ = 1 << 8;
        const ACTIVE_OBJ2 = 1 << 9;
    }
}

impl PointerSet {
    /// Primary (`secondary == false`) or secondary pointer of a pair.
    pub fn pick(primary: Self, secondary_flag: Self, secondary: bool) -> Self {
        if secondary {
            secondary_flag
        } else {
            primary
        }
    }
}
