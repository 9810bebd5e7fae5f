use lc_api::ScriptSession;

use crate::{map_cli_output, BoundaryResult, CliError};

/// Settles timed waits, then drains what the script did along the way.
pub(crate) fn run_to_boundary(
    session: &mut ScriptSession,
    max_waits: usize,
) -> Result<BoundaryResult, CliError> {
    let execution = session.settle(max_waits)?;
    Ok(BoundaryResult {
        execution,
        events: session.take_events(),
        abort: session.state().abort_report.clone(),
    })
}

pub(crate) fn emit_boundary(
    boundary: BoundaryResult,
    state_out: Option<String>,
) -> Result<(), CliError> {
    let mut lines = vec![
        "RESULT:OK".to_string(),
        format!("EXECUTION:{}", boundary.execution.name()),
    ];

    for event in &boundary.events {
        lines.push(format!(
            "EVENT_JSON:{}",
            serde_json::to_string(event).map_err(map_cli_output)?
        ));
    }

    if let Some(abort) = &boundary.abort {
        lines.push(format!(
            "ABORT_JSON:{}",
            serde_json::to_string(abort).map_err(map_cli_output)?
        ));
    }

    lines.push(format!(
        "STATE_OUT:{}",
        state_out.unwrap_or_else(|| "NONE".to_string())
    ));

    for line in lines {
        println!("{}", line);
    }
    Ok(())
}
