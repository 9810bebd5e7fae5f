use std::ffi::OsString;

use clap::Parser;

mod agent;
mod boundary_runner;
mod cli_args;
mod error_map;
mod models;
mod session_ops;
mod source_loader;
mod state_store;

pub use error_map::CliError;

pub(crate) use boundary_runner::{emit_boundary, run_to_boundary};
pub(crate) use cli_args::{
    AgentArgs, AgentCommand, Cli, InvocationArgs, Mode, ResumeArgs, RunArgs, StartArgs,
};
pub(crate) use error_map::{
    emit_error, map_cli_output, map_cli_source_path, map_cli_source_read, map_cli_source_scan,
    map_cli_state_invalid, map_cli_state_read, map_cli_state_write,
};
pub(crate) use models::{BoundaryResult, LoadedPack, SessionStateV1, LC_SESSION_SCHEMA};
pub(crate) use session_ops::{emit_boundary_with_saved_state, load_session_for_ref, start_session};
pub(crate) use source_loader::{load_pack_by_dir, load_pack_by_ref};
pub(crate) use state_store::{load_session_state, save_session_state};

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, CliError> {
    match cli.command {
        Mode::Run(args) => run_once(args),
        Mode::Agent(args) => agent::run_agent(args),
    }
}

/// Runs until the script ends or stops at a dialog; nothing is saved.
fn run_once(args: RunArgs) -> Result<i32, CliError> {
    let loaded = load_pack_by_dir(&args.invocation.pack_dir)?;
    let mut session = start_session(&loaded, &args.invocation)?;
    session.step();
    let boundary = run_to_boundary(&mut session, args.max_waits)?;
    emit_boundary(boundary, None)?;
    Ok(0)
}

#[cfg(test)]
mod cli_test_support;
