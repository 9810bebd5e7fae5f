use std::path::Path;

use lc_api::{ResumeSessionOptions, ScriptSession, StartSessionOptions};

use crate::{
    emit_boundary, load_pack_by_ref, load_session_state, save_session_state, BoundaryResult,
    CliError, InvocationArgs, LoadedPack, SessionStateV1, LC_SESSION_SCHEMA,
};

pub(crate) fn start_session(
    loaded: &LoadedPack,
    invocation: &InvocationArgs,
) -> Result<ScriptSession, CliError> {
    Ok(ScriptSession::start(StartSessionOptions {
        pack: loaded.pack.clone(),
        entry_script: invocation.entry.clone(),
        self_entity: invocation.self_entity,
        active: invocation.active.clone(),
        pointers: None,
        args: invocation.args.clone(),
        world: None,
        instruction_budget: invocation.budget,
    })?)
}

pub(crate) fn resume_session_for_state(
    loaded: &LoadedPack,
    state: &SessionStateV1,
) -> Result<ScriptSession, CliError> {
    Ok(ScriptSession::resume(ResumeSessionOptions {
        pack: loaded.pack.clone(),
        snapshot: state.snapshot.clone(),
        instruction_budget: state.instruction_budget,
    })?)
}

pub(crate) fn save_session(
    path: &Path,
    session: &ScriptSession,
    pack_id: &str,
    entry_script: &str,
    instruction_budget: Option<u32>,
) -> Result<(), CliError> {
    let state = SessionStateV1 {
        schema_version: LC_SESSION_SCHEMA.to_string(),
        pack_id: pack_id.to_string(),
        entry_script: entry_script.to_string(),
        instruction_budget,
        snapshot: session.snapshot()?,
    };
    save_session_state(path, &state)
}

pub(crate) fn load_session_for_ref(
    path: &Path,
) -> Result<(LoadedPack, SessionStateV1, ScriptSession), CliError> {
    let state = load_session_state(path)?;
    let loaded = load_pack_by_ref(&state.pack_id)?;
    let session = resume_session_for_state(&loaded, &state)?;
    Ok((loaded, state, session))
}

pub(crate) fn emit_boundary_with_saved_state(
    session: &ScriptSession,
    boundary: BoundaryResult,
    state_out: &str,
    pack_id: &str,
    entry_script: &str,
    instruction_budget: Option<u32>,
) -> Result<i32, CliError> {
    if boundary.awaits_input() {
        save_session(
            Path::new(state_out),
            session,
            pack_id,
            entry_script,
            instruction_budget,
        )?;
        emit_boundary(boundary, Some(state_out.to_string()))?;
        return Ok(0);
    }

    emit_boundary(boundary, None)?;
    Ok(0)
}

#[cfg(test)]
mod session_ops_tests {
    use super::*;
    use crate::cli_test_support::*;
    use crate::{load_pack_by_dir, run_to_boundary};
    use lc_core::ExecutionState;

    #[test]
    fn session_helpers_cover_start_save_load_and_emit_paths() {
        let loaded = load_pack_by_dir(&fixture_pack("05-countdialog")).expect("pack should load");
        let mut session =
            start_session(&loaded, &invocation("withdraw")).expect("session should start");
        session.step();
        let boundary = run_to_boundary(&mut session, 10).expect("boundary should resolve");
        assert_eq!(boundary.execution, ExecutionState::CountDown);

        let state_file = temp_path("session-ops-state.json");
        let code = emit_boundary_with_saved_state(
            &session,
            boundary,
            state_file.to_string_lossy().as_ref(),
            &loaded.id,
            "withdraw",
            None,
        )
        .expect("emit with save should pass");
        assert_eq!(code, 0);

        let (_loaded, state, mut resumed) =
            load_session_for_ref(&state_file).expect("state ref load should pass");
        assert_eq!(state.pack_id, loaded.id);
        assert_eq!(resumed.execution(), ExecutionState::CountDown);
        assert_eq!(
            resumed.continue_dialog(Some(28)).expect("dialog should continue"),
            ExecutionState::Finished
        );
    }

    #[test]
    fn finished_boundaries_are_not_saved() {
        let loaded = load_pack_by_dir(&fixture_pack("01-hello")).expect("pack should load");
        let mut session =
            start_session(&loaded, &invocation("hello")).expect("session should start");
        session.step();
        let boundary = run_to_boundary(&mut session, 10).expect("boundary should resolve");

        let state_file = temp_path("session-ops-finished.json");
        emit_boundary_with_saved_state(
            &session,
            boundary,
            state_file.to_string_lossy().as_ref(),
            &loaded.id,
            "hello",
            None,
        )
        .expect("emit should pass");
        assert!(!state_file.exists());
    }

    #[test]
    fn unknown_entry_maps_to_a_pack_code() {
        let loaded = load_pack_by_dir(&fixture_pack("01-hello")).expect("pack should load");
        let error = start_session(&loaded, &invocation("nowhere"))
            .err()
            .expect("unknown entry should fail");
        assert_eq!(error.code, "PACK_ENTRY_NOT_FOUND");
    }
}
