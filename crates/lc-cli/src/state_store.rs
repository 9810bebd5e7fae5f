use std::fs;
use std::path::Path;

use crate::{
    map_cli_output, map_cli_state_invalid, map_cli_state_read, map_cli_state_write, CliError,
    SessionStateV1, LC_SESSION_SCHEMA,
};

pub(crate) fn save_session_state(path: &Path, state: &SessionStateV1) -> Result<(), CliError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(map_cli_state_write)?;

    let payload = serde_json::to_string(state).map_err(map_cli_output)?;
    fs::write(path, payload).map_err(map_cli_state_write)
}

pub(crate) fn load_session_state(path: &Path) -> Result<SessionStateV1, CliError> {
    if !path.exists() {
        return Err(CliError::new(
            "CLI_STATE_NOT_FOUND",
            format!("State file does not exist: {}", path.display()),
        ));
    }

    let raw = fs::read_to_string(path).map_err(map_cli_state_read)?;

    let state: SessionStateV1 = serde_json::from_str(&raw).map_err(map_cli_state_invalid)?;

    if state.schema_version != LC_SESSION_SCHEMA {
        return Err(CliError::new(
            "CLI_STATE_SCHEMA",
            format!("Unsupported session state schema: {}", state.schema_version),
        ));
    }

    Ok(state)
}

#[cfg(test)]
mod state_store_tests {
    use super::*;
    use crate::cli_test_support::*;

    #[test]
    fn missing_state_file_is_reported() {
        let error = load_session_state(&temp_path("absent-state.json"))
            .expect_err("missing file should fail");
        assert_eq!(error.code, "CLI_STATE_NOT_FOUND");
    }

    #[test]
    fn invalid_json_and_schema_are_rejected() {
        let broken = temp_path("broken-state.json");
        write_file(&broken, "{");
        let error = load_session_state(&broken).expect_err("broken json should fail");
        assert_eq!(error.code, "CLI_STATE_INVALID");

        let state = suspended_state();
        let path = temp_path("old-schema-state.json");
        let mut old = state;
        old.schema_version = "lc-session.v0".to_string();
        save_session_state(&path, &old).expect("save should pass");
        let error = load_session_state(&path).expect_err("schema should fail");
        assert_eq!(error.code, "CLI_STATE_SCHEMA");
    }

    #[test]
    fn save_and_load_round_trip() {
        let path = temp_path("nested").join("state.json");
        let state = suspended_state();
        save_session_state(&path, &state).expect("save should pass");
        let loaded = load_session_state(&path).expect("load should pass");
        assert_eq!(loaded.pack_id, state.pack_id);
        assert_eq!(loaded.entry_script, "withdraw");
        assert_eq!(loaded.snapshot, state.snapshot);
    }
}
