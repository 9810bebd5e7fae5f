use lc_core::{ConfigStore, ScriptError, ScriptErrorKind};

use crate::handlers;
use crate::opcode::ScriptOpcode;
use crate::provider::ScriptProvider;
use crate::state::ScriptState;
use crate::world::World;

/// Everything a handler may reach besides its own execution context.
pub struct ScriptEnv<'a> {
    pub world: &'a mut dyn World,
    pub scripts: &'a ScriptProvider,
    pub config: &'a ConfigStore,
}

pub type CommandHandler = fn(&mut ScriptState, &mut ScriptEnv<'_>) -> Result<(), ScriptError>;

pub(crate) type HandlerTable = &'static [(ScriptOpcode, CommandHandler)];

#[derive(Clone, Copy)]
struct HandlerEntry {
    opcode: ScriptOpcode,
    handler: CommandHandler,
}

/// Dense opcode to handler table, immutable once built.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    entries: Vec<Option<HandlerEntry>>,
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.len())
            .finish()
    }
}

impl HandlerRegistry {
    /// Merges disjoint tables. Two tables claiming the same opcode is an error.
    pub fn build(tables: &[HandlerTable]) -> Result<Self, ScriptError> {
        let mut entries: Vec<Option<HandlerEntry>> = Vec::new();
        for table in tables {
            for (opcode, handler) in table.iter() {
                let index = usize::try_from(opcode.id()).map_err(|_| {
                    ScriptError::new(
                        ScriptErrorKind::RegistryConflict,
                        format!("Opcode {} has a negative id.", opcode.name()),
                    )
                })?;
                if entries.len() <= index {
                    entries.resize(index + 1, None);
                }
                if entries[index].is_some() {
                    return Err(ScriptError::new(
                        ScriptErrorKind::RegistryConflict,
                        format!("Opcode {} is registered twice.", opcode.name()),
                    ));
                }
                entries[index] = Some(HandlerEntry {
                    opcode: *opcode,
                    handler: *handler,
                });
            }
        }
        Ok(Self { entries })
    }

    /// Every handler group the VM ships with.
    pub fn standard() -> Result<Self, ScriptError> {
        Self::build(handlers::ALL_TABLES)
    }

    pub fn get(&self, opcode: i32) -> Option<CommandHandler> {
        self.entry(opcode).map(|entry| entry.handler)
    }

    pub fn opcode(&self, opcode: i32) -> Option<ScriptOpcode> {
        self.entry(opcode).map(|entry| entry.opcode)
    }

    fn entry(&self, opcode: i32) -> Option<&HandlerEntry> {
        usize::try_from(opcode)
            .ok()
            .and_then(|index| self.entries.get(index))
            .and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
