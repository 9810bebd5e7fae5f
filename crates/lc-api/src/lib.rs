mod pack;
mod session;

pub use pack::{load_pack_from_map, ScriptPack, CONFIG_FILE, SCRIPT_SUFFIX, WORLD_FILE};
pub use session::{
    ResumeSessionOptions, ScriptSession, SessionSnapshot, StartSessionOptions,
    SESSION_SNAPSHOT_SCHEMA_V1,
};

use lc_core::ScriptError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("Failed to parse script {path}: {source}")]
    ParseScript {
        path: String,
        source: serde_json::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    ParseConfig {
        path: String,
        source: serde_json::Error,
    },
    #[error("Failed to parse world {path}: {source}")]
    ParseWorld {
        path: String,
        source: serde_json::Error,
    },
    #[error("Pack contains no *.script.json files.")]
    NoScripts,
    #[error("Entry script \"{entry}\" is not in the pack.")]
    EntryNotFound { entry: String },
    #[error("Unsupported session snapshot schema \"{found}\".")]
    SnapshotSchema { found: String },
    #[error("Session is {execution}; there is nothing to continue.")]
    NotWaiting { execution: &'static str },
    #[error("A count dialog needs a value to continue.")]
    MissingLastInt,
    #[error("Still waiting after {max_waits} timed waits.")]
    WaitLimit { max_waits: usize },
    #[error(transparent)]
    Script(#[from] ScriptError),
}

impl PackError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ParseScript { .. } => "PACK_SCRIPT_INVALID",
            Self::ParseConfig { .. } => "PACK_CONFIG_INVALID",
            Self::ParseWorld { .. } => "PACK_WORLD_INVALID",
            Self::NoScripts => "PACK_EMPTY",
            Self::EntryNotFound { .. } => "PACK_ENTRY_NOT_FOUND",
            Self::SnapshotSchema { .. } => "SESSION_SNAPSHOT_SCHEMA",
            Self::NotWaiting { .. } => "SESSION_NOT_WAITING",
            Self::MissingLastInt => "SESSION_LAST_INT_MISSING",
            Self::WaitLimit { .. } => "SESSION_WAIT_LIMIT",
            Self::Script(error) => error.code(),
        }
    }
}

#[cfg(test)]
mod api_test_support;
