use std::collections::BTreeMap;
use std::sync::Arc;

use lc_core::{Script, ScriptError, ServerTriggerType};

/// Loaded scripts, indexed by id, name and trigger lookup key.
#[derive(Debug, Clone, Default)]
pub struct ScriptProvider {
    by_id: BTreeMap<i32, Arc<Script>>,
    by_name: BTreeMap<String, i32>,
    by_lookup: BTreeMap<i32, i32>,
}

impl ScriptProvider {
    pub fn new(scripts: Vec<Script>) -> Result<Self, ScriptError> {
        let mut provider = Self::default();
        for script in scripts {
            provider.insert(script)?;
        }
        Ok(provider)
    }

    fn insert(&mut self, script: Script) -> Result<(), ScriptError> {
        if self.by_id.contains_key(&script.id) {
            return Err(ScriptError::runtime(format!(
                "Duplicate script id {}.",
                script.id
            )));
        }
        if let Some(info) = &script.info {
            self.by_name.insert(info.script_name.clone(), script.id);
            if info.lookup_key != -1 {
                self.by_lookup.insert(info.lookup_key, script.id);
            }
        }
        self.by_id.insert(script.id, Arc::new(script));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn get(&self, id: i32) -> Option<Arc<Script>> {
        self.by_id.get(&id).cloned()
    }

    pub fn require(&self, id: i32) -> Result<Arc<Script>, ScriptError> {
        self.get(id)
            .ok_or_else(|| ScriptError::runtime(format!("Script {} does not exist.", id)))
    }

    pub fn get_by_name(&self, name: &str) -> Option<Arc<Script>> {
        self.by_name.get(name).and_then(|id| self.get(*id))
    }

    /// Most specific trigger script: by type, then by category, then the default.
    pub fn get_by_trigger(
        &self,
        trigger: ServerTriggerType,
        type_id: i32,
        category: i32,
    ) -> Option<Arc<Script>> {
        trigger
            .lookup_keys(type_id, category)
            .into_iter()
            .find_map(|key| self.by_lookup.get(&key))
            .and_then(|id| self.get(*id))
    }
}
