use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::VarType;

/// Debug metadata attached by the compiler. Scripts without it cannot run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptInfo {
    pub script_name: String,
    pub source_file_path: String,
    #[serde(default = "default_lookup_key")]
    pub lookup_key: i32,
    #[serde(default)]
    pub parameter_types: Vec<VarType>,
    #[serde(default)]
    pub pcs: Vec<i32>,
    #[serde(default)]
    pub lines: Vec<i32>,
}

fn default_lookup_key() -> i32 {
    -1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    pub id: i32,
    #[serde(default)]
    pub info: Option<ScriptInfo>,
    #[serde(default)]
    pub int_local_count: usize,
    #[serde(default)]
    pub string_local_count: usize,
    #[serde(default)]
    pub int_arg_count: usize,
    #[serde(default)]
    pub string_arg_count: usize,
    pub opcodes: Vec<i32>,
    #[serde(default)]
    pub int_operands: Vec<i32>,
    #[serde(default)]
    pub string_operands: Vec<Option<String>>,
    #[serde(default)]
    pub switch_tables: Vec<BTreeMap<i32, i32>>,
}

impl Script {
    pub fn len(&self) -> usize {
        self.opcodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opcodes.is_empty()
    }

    pub fn name(&self) -> &str {
        self.info
            .as_ref()
            .map(|info| info.script_name.as_str())
            .unwrap_or("<unknown>")
    }

    pub fn file_name(&self) -> &str {
        let Some(info) = &self.info else {
            return "<unknown>";
        };
        info.source_file_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(info.source_file_path.as_str())
    }

    pub fn line_number(&self, pc: i32) -> i32 {
        let Some(info) = &self.info else {
            return 0;
        };
        let seen = info.pcs.partition_point(|start| *start <= pc);
        info.lines
            .get(seen.saturating_sub(1))
            .copied()
            .unwrap_or(0)
    }

    pub fn opcode(&self, pc: i32) -> Option<i32> {
        usize::try_from(pc)
            .ok()
            .and_then(|index| self.opcodes.get(index))
            .copied()
    }

    /// Missing operands read as zero, which is also the primary-slot selector.
    pub fn int_operand(&self, pc: i32) -> i32 {
        usize::try_from(pc)
            .ok()
            .and_then(|index| self.int_operands.get(index))
            .copied()
            .unwrap_or(0)
    }

    pub fn string_operand(&self, pc: i32) -> Option<&str> {
        usize::try_from(pc)
            .ok()
            .and_then(|index| self.string_operands.get(index))
            .and_then(|operand| operand.as_deref())
    }

    pub fn switch_table(&self, index: i32) -> Option<&BTreeMap<i32, i32>> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.switch_tables.get(index))
    }
}
