use std::path::Path;

use lc_core::ExecutionState;

use crate::{
    emit_boundary_with_saved_state, load_pack_by_dir, load_session_for_ref, run_to_boundary,
    start_session, AgentArgs, AgentCommand, CliError, ResumeArgs, StartArgs,
};

pub(super) fn run_agent(args: AgentArgs) -> Result<i32, CliError> {
    match args.command {
        AgentCommand::Start(args) => run_start(args),
        AgentCommand::Resume(args) => run_resume(args),
    }
}

pub(super) fn run_start(args: StartArgs) -> Result<i32, CliError> {
    let loaded = load_pack_by_dir(&args.invocation.pack_dir)?;
    let mut session = start_session(&loaded, &args.invocation)?;
    session.step();

    let boundary = run_to_boundary(&mut session, args.max_waits)?;
    emit_boundary_with_saved_state(
        &session,
        boundary,
        &args.state_out,
        &loaded.id,
        &args.invocation.entry,
        args.invocation.budget,
    )
}

pub(super) fn run_resume(args: ResumeArgs) -> Result<i32, CliError> {
    let (_loaded, state, mut session) = load_session_for_ref(Path::new(&args.state_in))?;
    match session.execution() {
        ExecutionState::PauseButton | ExecutionState::CountDown => {
            session.continue_dialog(args.last_int)?;
        }
        other => {
            log::debug!("resuming from {} without dialog input", other.name());
            session.wait()?;
        }
    }

    let boundary = run_to_boundary(&mut session, args.max_waits)?;
    emit_boundary_with_saved_state(
        &session,
        boundary,
        &args.state_out,
        &state.pack_id,
        &state.entry_script,
        state.instruction_budget,
    )
}
