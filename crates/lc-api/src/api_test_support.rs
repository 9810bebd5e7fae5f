use std::collections::BTreeMap;

use lc_core::{Entity, Player};

pub(crate) fn bob() -> Entity {
    Entity::Player(Player { pid: 1 })
}

/// `[proc,greet]` says hello to the active player; `[proc,patience]` waits
/// two ticks between two messages.
pub(crate) fn greeting_pack() -> BTreeMap<String, String> {
    let mut files = BTreeMap::new();
    files.insert(
        "greet.script.json".to_string(),
        r#"{
  "id": 0,
  "info": {"scriptName": "[proc,greet]", "sourceFilePath": "scripts/greet.rs2", "pcs": [0], "lines": [1]},
  "opcodes": [3, 2006, 37, 2000, 21],
  "intOperands": [0, 0, 2, 0, 0],
  "stringOperands": ["Hello "]
}"#
        .to_string(),
    );
    files.insert(
        "patience.script.json".to_string(),
        r#"{
  "id": 1,
  "info": {"scriptName": "[proc,patience]", "sourceFilePath": "scripts/patience.rs2", "pcs": [0, 2, 4], "lines": [1, 2, 3]},
  "opcodes": [3, 2000, 0, 2001, 3, 2000, 21],
  "intOperands": [0, 0, 2, 0, 0, 0, 0],
  "stringOperands": ["before", null, null, null, "after"]
}"#
        .to_string(),
    );
    files.insert(
        "config.json".to_string(),
        r#"{"npcs": [{"id": 2, "debugname": "guard", "name": "Guard"}]}"#.to_string(),
    );
    files.insert(
        "world.json".to_string(),
        r#"{
  "players": {"1": {"pid": 1, "username": "bob", "coord": {"level": 0, "x": 3200, "z": 3200}}}
}"#
        .to_string(),
    );
    files
}
