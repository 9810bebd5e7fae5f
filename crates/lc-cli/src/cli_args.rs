use clap::{Args, Parser, Subcommand};
use lc_core::{Coord, Entity, Loc, Npc, Obj, Player, ScriptValue};

#[derive(Debug, Parser)]
#[command(name = "lc-cli")]
#[command(about = "Runs compiled script packs against a sandbox world")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    /// Runs a script until it ends or needs dialog input.
    Run(RunArgs),
    Agent(AgentArgs),
}

#[derive(Debug, Args)]
pub(crate) struct InvocationArgs {
    #[arg(long = "pack-dir")]
    pub(crate) pack_dir: String,
    #[arg(long = "entry")]
    pub(crate) entry: String,
    /// player:PID | npc:NID:TYPE | loc:TYPE:LEVEL:X:Z:SHAPE:ANGLE | obj:TYPE:LEVEL:X:Z:COUNT
    #[arg(long = "self", value_parser = parse_entity)]
    pub(crate) self_entity: Option<Entity>,
    #[arg(long = "active", value_parser = parse_entity)]
    pub(crate) active: Vec<Entity>,
    /// An int, or `str:TEXT` for a string argument.
    #[arg(long = "arg", value_parser = parse_script_value, allow_hyphen_values = true)]
    pub(crate) args: Vec<ScriptValue>,
    #[arg(long = "budget")]
    pub(crate) budget: Option<u32>,
}

#[derive(Debug, Args)]
pub(crate) struct RunArgs {
    #[command(flatten)]
    pub(crate) invocation: InvocationArgs,
    #[arg(long = "max-waits", default_value_t = 1000)]
    pub(crate) max_waits: usize,
}

#[derive(Debug, Args)]
pub(crate) struct AgentArgs {
    #[command(subcommand)]
    pub(crate) command: AgentCommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum AgentCommand {
    Start(StartArgs),
    Resume(ResumeArgs),
}

#[derive(Debug, Args)]
pub(crate) struct StartArgs {
    #[command(flatten)]
    pub(crate) invocation: InvocationArgs,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
    #[arg(long = "max-waits", default_value_t = 1000)]
    pub(crate) max_waits: usize,
}

#[derive(Debug, Args)]
pub(crate) struct ResumeArgs {
    #[arg(long = "state-in")]
    pub(crate) state_in: String,
    /// Answer for a count dialog.
    #[arg(long = "last-int", allow_hyphen_values = true)]
    pub(crate) last_int: Option<i32>,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
    #[arg(long = "max-waits", default_value_t = 1000)]
    pub(crate) max_waits: usize,
}

fn parse_fields(raw: &str, fields: &[&str]) -> Result<Vec<i32>, String> {
    fields
        .iter()
        .map(|field| {
            field
                .parse::<i32>()
                .map_err(|_| format!("invalid number \"{}\" in \"{}\"", field, raw))
        })
        .collect()
}

pub(crate) fn parse_entity(raw: &str) -> Result<Entity, String> {
    let mut parts = raw.split(':');
    let kind = parts.next().unwrap_or_default();
    let fields = parts.collect::<Vec<_>>();
    let numbers = parse_fields(raw, &fields)?;

    match (kind, numbers.as_slice()) {
        ("player", [pid]) => Ok(Entity::Player(Player { pid: *pid })),
        ("npc", [nid, type_id]) => Ok(Entity::Npc(Npc {
            nid: *nid,
            type_id: *type_id,
        })),
        ("loc", [type_id, level, x, z, shape, angle]) => Ok(Entity::Loc(Loc {
            type_id: *type_id,
            coord: Coord::new(*level, *x, *z),
            shape: *shape,
            angle: *angle,
        })),
        ("obj", [type_id, level, x, z, count]) => Ok(Entity::Obj(Obj {
            type_id: *type_id,
            coord: Coord::new(*level, *x, *z),
            count: *count,
        })),
        ("player" | "npc" | "loc" | "obj", _) => Err(format!(
            "wrong field count for {} in \"{}\"",
            kind, raw
        )),
        _ => Err(format!("unknown entity kind \"{}\"", kind)),
    }
}

pub(crate) fn parse_script_value(raw: &str) -> Result<ScriptValue, String> {
    if let Some(text) = raw.strip_prefix("str:") {
        return Ok(ScriptValue::String(text.to_string()));
    }
    raw.parse::<i32>()
        .map(ScriptValue::Int)
        .map_err(|_| format!("\"{}\" is not an int; prefix strings with str:", raw))
}
