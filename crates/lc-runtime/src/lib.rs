mod handlers;
mod opcode;
mod provider;
mod registry;
mod rng;
mod runner;
mod sandbox;
mod snapshot;
mod state;
mod world;

#[cfg(test)]
mod runtime_test_support;

pub use opcode::ScriptOpcode;
pub use provider::ScriptProvider;
pub use registry::{CommandHandler, HandlerRegistry, ScriptEnv};
pub use rng::WorldRng;
pub use runner::{AbortReport, ScriptRunner, ScriptRunnerOptions, DEFAULT_INSTRUCTION_BUDGET};
pub use sandbox::{SandboxInv, SandboxNpc, SandboxPlayer, SandboxWorld, WorldEvent};
pub use snapshot::{FrameSnapshot, ScriptSnapshot, SCRIPT_SNAPSHOT_SCHEMA_V1};
pub use state::{ActiveSlots, GosubFrame, ScriptState, ACTIVE_SLOT_CAPACITY, MAX_FRAMES};
pub use world::{InvItem, NpcInfo, PlayerInfo, StatLevel, World};
