use std::collections::BTreeMap;
use std::sync::Arc;

use lc_core::{ConfigStore, Script};
use lc_runtime::{SandboxWorld, ScriptProvider, ScriptRunner, ScriptRunnerOptions};

use crate::PackError;

pub const SCRIPT_SUFFIX: &str = ".script.json";
pub const CONFIG_FILE: &str = "config.json";
pub const WORLD_FILE: &str = "world.json";

/// Compiled scripts plus the config tables they read, shared by every session.
#[derive(Debug, Clone)]
pub struct ScriptPack {
    pub scripts: Arc<ScriptProvider>,
    pub config: Arc<ConfigStore>,
    /// Initial sandbox world, when the pack ships one.
    pub world: Option<SandboxWorld>,
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Builds a pack from relative path → content. Unrelated files are skipped.
pub fn load_pack_from_map(files: &BTreeMap<String, String>) -> Result<ScriptPack, PackError> {
    let mut scripts = Vec::new();
    let mut config = ConfigStore::default();
    let mut world = None;

    for (path, content) in files {
        if path.ends_with(SCRIPT_SUFFIX) {
            let script: Script =
                serde_json::from_str(content).map_err(|source| PackError::ParseScript {
                    path: path.clone(),
                    source,
                })?;
            scripts.push(script);
            continue;
        }
        match file_name(path) {
            CONFIG_FILE => {
                config =
                    ConfigStore::from_json(content).map_err(|source| PackError::ParseConfig {
                        path: path.clone(),
                        source,
                    })?;
            }
            WORLD_FILE => {
                world = Some(SandboxWorld::from_json(content).map_err(|source| {
                    PackError::ParseWorld {
                        path: path.clone(),
                        source,
                    }
                })?);
            }
            _ => {}
        }
    }

    if scripts.is_empty() {
        return Err(PackError::NoScripts);
    }
    log::debug!("loaded pack with {} scripts", scripts.len());

    Ok(ScriptPack {
        scripts: Arc::new(ScriptProvider::new(scripts)?),
        config: Arc::new(config),
        world,
    })
}

impl ScriptPack {
    /// Accepts a full script name, a bare proc name, or a numeric id.
    pub fn resolve_entry(&self, entry: &str) -> Result<Arc<Script>, PackError> {
        let found = self
            .scripts
            .get_by_name(entry)
            .or_else(|| self.scripts.get_by_name(&format!("[proc,{}]", entry)))
            .or_else(|| {
                entry
                    .parse::<i32>()
                    .ok()
                    .and_then(|id| self.scripts.get(id))
            });
        found.ok_or_else(|| PackError::EntryNotFound {
            entry: entry.to_string(),
        })
    }

    pub fn runner(&self, instruction_budget: Option<u32>) -> Result<ScriptRunner, PackError> {
        Ok(ScriptRunner::new(ScriptRunnerOptions {
            scripts: Arc::clone(&self.scripts),
            config: Arc::clone(&self.config),
            instruction_budget,
        })?)
    }
}
