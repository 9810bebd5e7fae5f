use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) fn temp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should move forward")
        .as_nanos();
    std::env::temp_dir().join(format!("lc-tool-{}-{}", name, nanos))
}

pub(crate) fn write_file(path: &Path, content: &str) {
    let parent = path.parent().expect("path should have parent");
    fs::create_dir_all(parent).expect("parent dir should be created");
    fs::write(path, content).expect("file should be written");
}

/// A one-script pack: `[proc,main]` built from the given opcodes and string operands.
pub(crate) fn write_pack(root: &Path, opcodes: &str, int_operands: &str, strings: &str) {
    write_file(
        &root.join("main.script.json"),
        &format!(
            r#"{{
  "id": 0,
  "info": {{"scriptName": "[proc,main]", "sourceFilePath": "main.rs2", "pcs": [0], "lines": [1]}},
  "opcodes": {},
  "intOperands": {},
  "stringOperands": {}
}}"#,
            opcodes, int_operands, strings
        ),
    );
    write_file(
        &root.join("world.json"),
        r#"{"players": {"1": {"pid": 1, "username": "bob"}}}"#,
    );
}
