use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use lc_api::ScriptSession;
use lc_core::{Entity, Player};

use crate::{load_pack_by_dir, start_session, InvocationArgs, SessionStateV1, LC_SESSION_SCHEMA};

pub(crate) fn temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should be monotonic")
        .as_nanos();
    std::env::temp_dir().join(format!("lc-cli-{}-{}", name, nanos))
}

pub(crate) fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent should be created");
    }
    fs::write(path, content).expect("file should be written");
}

pub(crate) fn fixture_pack(name: &str) -> String {
    lc_test_example::pack_dir(name)
        .to_string_lossy()
        .to_string()
}

/// Invocation of `entry` as player 1; callers set `pack_dir` when it matters.
pub(crate) fn invocation(entry: &str) -> InvocationArgs {
    InvocationArgs {
        pack_dir: String::new(),
        entry: entry.to_string(),
        self_entity: Some(Entity::Player(Player { pid: 1 })),
        active: Vec::new(),
        args: Vec::new(),
        budget: None,
    }
}

pub(crate) fn start_fixture(pack: &str, entry: &str) -> ScriptSession {
    let loaded = load_pack_by_dir(&fixture_pack(pack)).expect("fixture pack should load");
    start_session(&loaded, &invocation(entry)).expect("session should start")
}

/// `withdraw` from the count dialog pack, parked on its dialog.
pub(crate) fn suspended_state() -> SessionStateV1 {
    let loaded = load_pack_by_dir(&fixture_pack("05-countdialog")).expect("fixture pack should load");
    let mut session = start_session(&loaded, &invocation("withdraw")).expect("session should start");
    session.step();
    SessionStateV1 {
        schema_version: LC_SESSION_SCHEMA.to_string(),
        pack_id: loaded.id,
        entry_script: "withdraw".to_string(),
        instruction_budget: None,
        snapshot: session.snapshot().expect("dialog should snapshot"),
    }
}
