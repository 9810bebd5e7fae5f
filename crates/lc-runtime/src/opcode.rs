macro_rules! script_opcodes {
    ($($name:ident = $value:literal,)*) => {
        #[allow(non_camel_case_types, clippy::upper_case_acronyms)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(i32)]
        pub enum ScriptOpcode {
            $($name = $value,)*
        }

        impl ScriptOpcode {
            pub const ALL: &'static [ScriptOpcode] = &[$(Self::$name,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$name => stringify!($name),)*
                }
            }

            pub fn from_id(id: i32) -> Option<Self> {
                match id {
                    $($value => Some(Self::$name),)*
                    _ => None,
                }
            }
        }
    };
}

script_opcodes! {
    // core language
    PUSH_CONSTANT_INT = 0,
    PUSH_VARP = 1,
    POP_VARP = 2,
    PUSH_CONSTANT_STRING = 3,
    PUSH_VARN = 4,
    POP_VARN = 5,
    BRANCH = 6,
    BRANCH_NOT = 7,
    BRANCH_EQUALS = 8,
    BRANCH_LESS_THAN = 9,
    BRANCH_GREATER_THAN = 10,
    RETURN = 21,
    GOSUB = 22,
    JUMP = 23,
    SWITCH = 24,
    BRANCH_LESS_THAN_OR_EQUALS = 31,
    BRANCH_GREATER_THAN_OR_EQUALS = 32,
    PUSH_INT_LOCAL = 33,
    POP_INT_LOCAL = 34,
    PUSH_STRING_LOCAL = 35,
    POP_STRING_LOCAL = 36,
    JOIN_STRING = 37,
    POP_INT_DISCARD = 38,
    POP_STRING_DISCARD = 39,
    GOSUB_WITH_PARAMS = 40,
    JUMP_WITH_PARAMS = 41,

    // server
    MAP_CLOCK = 1000,
    MAP_MEMBERS = 1001,
    MAP_PLAYERCOUNT = 1002,
    COORDX = 1003,
    COORDY = 1004,
    COORDZ = 1005,
    MOVECOORD = 1006,
    DISTANCE = 1007,
    WORLD_DELAY = 1008,
    INZONE = 1009,
    MAP_FINDSQUARE = 1010,
    LINEOFWALK = 1011,
    PROJANIM_PL = 1012,

    // player
    MES = 2000,
    P_DELAY = 2001,
    P_PAUSEBUTTON = 2002,
    P_COUNTDIALOG = 2003,
    LAST_INT = 2004,
    COORD = 2005,
    DISPLAYNAME = 2006,
    UID = 2007,
    P_TELEJUMP = 2008,
    STAT = 2009,
    STAT_BASE = 2010,
    GIVEXP = 2011,
    ANIM = 2012,
    SAY = 2013,
    QUEUE = 2014,
    WEAKQUEUE = 2015,
    ALLOWDESIGN = 2016,

    // npc
    NPC_FINDUID = 2500,
    NPC_ADD = 2501,
    NPC_ANIM = 2502,
    NPC_BASESTAT = 2503,
    NPC_CATEGORY = 2504,
    NPC_COORD = 2505,
    NPC_DEL = 2506,
    NPC_DELAY = 2507,
    NPC_FACESQUARE = 2508,
    NPC_FINDEXACT = 2509,
    NPC_FINDHERO = 2510,
    NPC_PARAM = 2511,
    NPC_QUEUE = 2512,
    NPC_RANGE = 2513,
    NPC_SAY = 2514,
    NPC_SETHUNT = 2515,
    NPC_SETHUNTMODE = 2516,
    NPC_SETMODE = 2517,
    NPC_STAT = 2518,
    NPC_STATHEAL = 2519,
    NPC_TYPE = 2520,
    NPC_DAMAGE = 2521,
    NPC_NAME = 2522,
    NPC_UID = 2523,
    NPC_SETTIMER = 2524,
    SPOTANIM_NPC = 2525,

    // loc
    LOC_ADD = 3000,
    LOC_ANGLE = 3001,
    LOC_ANIM = 3002,
    LOC_CATEGORY = 3003,
    LOC_CHANGE = 3004,
    LOC_COORD = 3005,
    LOC_DEL = 3006,
    LOC_FINDALLZONE = 3007,
    LOC_FINDNEXT = 3008,
    LOC_PARAM = 3009,
    LOC_TYPE = 3010,
    LOC_NAME = 3011,
    LOC_SHAPE = 3012,

    // obj
    OBJ_ADD = 3500,
    OBJ_ADDALL = 3501,
    OBJ_COORD = 3502,
    OBJ_COUNT = 3503,
    OBJ_DEL = 3504,
    OBJ_NAME = 3505,
    OBJ_PARAM = 3506,
    OBJ_TYPE = 3507,
    OBJ_TAKEITEM = 3508,

    // npc config
    NC_CATEGORY = 4000,
    NC_DEBUGNAME = 4001,
    NC_DESC = 4002,
    NC_NAME = 4003,
    NC_PARAM = 4004,

    // loc config
    LC_CATEGORY = 4100,
    LC_DEBUGNAME = 4101,
    LC_DESC = 4102,
    LC_NAME = 4103,
    LC_PARAM = 4104,

    // obj config
    OC_CATEGORY = 4200,
    OC_COST = 4201,
    OC_DEBUGNAME = 4202,
    OC_DESC = 4203,
    OC_MEMBERS = 4204,
    OC_NAME = 4205,
    OC_PARAM = 4206,
    OC_STACKABLE = 4207,
    OC_WEIGHT = 4208,

    // inventory
    INV_ADD = 4300,
    INV_CLEAR = 4301,
    INV_DEL = 4302,
    INV_FREESPACE = 4303,
    INV_SIZE = 4304,
    INV_TOTAL = 4305,

    // enum
    ENUM = 4400,
    ENUM_GETOUTPUTCOUNT = 4401,

    // string
    APPEND = 4500,
    APPEND_CHAR = 4501,
    APPEND_NUM = 4502,
    APPEND_SIGNNUM = 4503,
    COMPARE = 4504,
    LOWERCASE = 4505,
    STRING_INDEXOF_CHAR = 4506,
    STRING_INDEXOF_STRING = 4507,
    STRING_LENGTH = 4508,
    SUBSTRING = 4509,
    TOSTRING = 4510,

    // number
    ADD = 4600,
    SUB = 4601,
    MULTIPLY = 4602,
    DIVIDE = 4603,
    MODULO = 4604,
    RANDOM = 4605,
    RANDOMINC = 4606,
    INTERPOLATE = 4607,
    ADDPERCENT = 4608,
    SETBIT = 4609,
    CLEARBIT = 4610,
    TESTBIT = 4611,
    TOGGLEBIT = 4612,
    POW = 4613,
    INVPOW = 4614,
    AND = 4615,
    OR = 4616,
    MIN = 4617,
    MAX = 4618,
    SCALE = 4619,
    BITCOUNT = 4620,
    ABS = 4621,

    // db
    DB_FIND = 7500,
    DB_FINDNEXT = 7501,
    DB_GETFIELD = 7502,
    DB_GETFIELDCOUNT = 7503,
    DB_LISTALL = 7504,
    DB_FIND_WITH_COUNT = 7505,

    // debug
    ERROR = 10000,
    ACTIVE_NPC = 10001,
    ACTIVE_PLAYER = 10002,
    ACTIVE_LOC = 10003,
    ACTIVE_OBJ = 10004,
}

impl ScriptOpcode {
    pub fn id(self) -> i32 {
        self as i32
    }
}

#[cfg(test)]
mod opcode_tests {
    use super::*;

    #[test]
    fn from_id_round_trips_every_opcode() {
        for opcode in ScriptOpcode::ALL {
            assert_eq!(ScriptOpcode::from_id(opcode.id()), Some(*opcode));
        }
        assert_eq!(ScriptOpcode::from_id(11), None);
        assert_eq!(ScriptOpcode::from_id(-1), None);
    }

    #[test]
    fn name_matches_variant() {
        assert_eq!(ScriptOpcode::NPC_FINDUID.name(), "NPC_FINDUID");
        assert_eq!(ScriptOpcode::PUSH_CONSTANT_INT.id(), 0);
    }
}
