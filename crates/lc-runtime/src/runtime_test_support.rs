use std::sync::Arc;

use lc_core::{
    ConfigStore, Coord, Entity, ExecutionState, Loc, Npc, Obj, Player, PointerSet, Script,
    ScriptInfo, ScriptValue,
};

use crate::opcode::ScriptOpcode;
use crate::provider::ScriptProvider;
use crate::runner::{ScriptRunner, ScriptRunnerOptions};
use crate::sandbox::{SandboxInv, SandboxNpc, SandboxPlayer, SandboxWorld};
use crate::state::ScriptState;
use crate::world::StatLevel;

pub(crate) struct Instr {
    opcode: ScriptOpcode,
    int_operand: i32,
    string_operand: Option<String>,
}

pub(crate) fn op(opcode: ScriptOpcode) -> Instr {
    int(opcode, 0)
}

pub(crate) fn int(opcode: ScriptOpcode, operand: i32) -> Instr {
    Instr {
        opcode,
        int_operand: operand,
        string_operand: None,
    }
}

pub(crate) fn str_op(opcode: ScriptOpcode, operand: &str) -> Instr {
    Instr {
        opcode,
        int_operand: 0,
        string_operand: Some(operand.to_string()),
    }
}

/// `[proc,test_<id>]` in `scripts/test_<id>.rs2`, one source line per instruction.
pub(crate) fn script(id: i32, code: Vec<Instr>) -> Arc<Script> {
    let len = code.len() as i32;
    Arc::new(Script {
        id,
        info: Some(ScriptInfo {
            script_name: format!("[proc,test_{}]", id),
            source_file_path: format!("scripts/test_{}.rs2", id),
            lookup_key: -1,
            parameter_types: Vec::new(),
            pcs: (0..len).collect(),
            lines: (1..=len).collect(),
        }),
        int_local_count: 0,
        string_local_count: 0,
        int_arg_count: 0,
        string_arg_count: 0,
        opcodes: code.iter().map(|instr| instr.opcode.id()).collect(),
        int_operands: code.iter().map(|instr| instr.int_operand).collect(),
        string_operands: code.into_iter().map(|instr| instr.string_operand).collect(),
        switch_tables: Vec::new(),
    })
}

pub(crate) fn player_entity(pid: i32) -> Entity {
    Entity::Player(Player { pid })
}

pub(crate) fn npc_entity(nid: i32, type_id: i32) -> Entity {
    Entity::Npc(Npc { nid, type_id })
}

pub(crate) fn loc_entity(type_id: i32) -> Entity {
    Entity::Loc(Loc {
        type_id,
        coord: Coord::new(0, 3200, 3201),
        shape: 10,
        angle: 1,
    })
}

pub(crate) fn obj_entity(type_id: i32) -> Entity {
    Entity::Obj(Obj {
        type_id,
        coord: Coord::new(0, 3200, 3202),
        count: 3,
    })
}

pub(crate) fn test_config() -> ConfigStore {
    ConfigStore::from_json(
        r#"{
  "params": [
    {"id": 1, "debugname": "damage", "varType": "int", "defaultValue": 4},
    {"id": 2, "debugname": "title", "varType": "string", "defaultValue": "none"}
  ],
  "npcs": [
    {"id": 2, "debugname": "guard", "name": "Guard", "desc": "On duty.", "category": 7, "params": {"1": 9}},
    {"id": 4, "debugname": "rat"}
  ],
  "locs": [
    {"id": 1, "debugname": "tree", "name": "Tree", "category": 3, "params": {"2": "oak"}}
  ],
  "objs": [
    {"id": 3, "debugname": "bread", "name": "Bread", "cost": 12, "weight": 1},
    {"id": 995, "debugname": "coins", "name": "Coins", "stackable": true},
    {"id": 1511, "debugname": "logs", "name": "Logs", "members": true, "weight": 2, "cost": 4, "category": 5}
  ],
  "enums": [
    {"id": 5, "inputType": "int", "outputType": "string", "defaultValue": "none", "values": {"1": "one", "2": "two"}},
    {"id": 6, "inputType": "int", "outputType": "obj", "values": {"1": 995}}
  ],
  "dbTables": [
    {"id": 1, "debugname": "drops", "columns": [
      {"name": "item", "types": ["obj", "int"]},
      {"name": "label", "types": ["string"]}
    ]}
  ],
  "dbRows": [
    {"id": 10, "table": 1, "columns": {"0": [995, 10], "1": ["gold"]}},
    {"id": 11, "table": 1, "columns": {"0": [1511, 1], "1": ["wood"]}},
    {"id": 12, "table": 1, "columns": {"0": [995, 3]}}
  ]
}"#,
    )
    .expect("test config should parse")
}

/// Two players (1 bob, 2 alice) and two npcs (3 guard, 5 rat).
pub(crate) fn test_world() -> SandboxWorld {
    let mut world = SandboxWorld::new();
    let mut bob = SandboxPlayer::new(1, "bob", Coord::new(0, 3200, 3200));
    bob.stats.insert(0, StatLevel { level: 10, base: 12 });
    bob.invs.insert(
        93,
        SandboxInv {
            size: 4,
            items: Vec::new(),
        },
    );
    world.add_player(bob);
    world.add_player(SandboxPlayer::new(2, "alice", Coord::new(0, 3210, 3205)));
    let mut guard = SandboxNpc::new(3, 2, Coord::new(0, 3203, 3204));
    guard.stats.insert(3, StatLevel { level: 7, base: 10 });
    world.add_npc(guard);
    world.add_npc(SandboxNpc::new(5, 4, Coord::new(1, 3200, 3200)));
    world
}

pub(crate) struct Harness {
    pub runner: ScriptRunner,
    pub world: SandboxWorld,
}

impl Harness {
    pub fn new(scripts: Vec<Arc<Script>>) -> Self {
        Self::with_budget(scripts, None)
    }

    pub fn with_budget(scripts: Vec<Arc<Script>>, budget: Option<u32>) -> Self {
        let scripts = scripts.into_iter().map(Arc::unwrap_or_clone).collect();
        let runner = ScriptRunner::new(ScriptRunnerOptions {
            scripts: Arc::new(ScriptProvider::new(scripts).expect("test scripts should load")),
            config: Arc::new(test_config()),
            instruction_budget: budget,
        })
        .expect("runner should build");
        Self {
            runner,
            world: test_world(),
        }
    }

    fn script(&self, id: i32) -> Arc<Script> {
        self.runner
            .scripts()
            .require(id)
            .expect("test script should exist")
    }

    /// Binds the entities and grants every matching pointer.
    pub fn init(
        &self,
        id: i32,
        primary: Option<Entity>,
        active: &[Entity],
        args: Vec<ScriptValue>,
    ) -> ScriptState {
        let mut state =
            ScriptRunner::init(self.script(id), primary, active, PointerSet::empty(), args)
                .expect("init should pass");
        state.grant_bound_pointers();
        state
    }

    pub fn init_with_pointers(
        &self,
        id: i32,
        primary: Option<Entity>,
        active: &[Entity],
        pointers: PointerSet,
    ) -> ScriptState {
        ScriptRunner::init(self.script(id), primary, active, pointers, Vec::new())
            .expect("init should pass")
    }

    pub fn run(&mut self, state: &mut ScriptState) -> ExecutionState {
        self.runner.execute(state, &mut self.world, false, false)
    }
}
