use serde::{Deserialize, Serialize};

use crate::types::VarType;

/// A value held in config tables and invocation arguments. The operand stacks
/// themselves are split by type, so this only appears at the edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptValue {
    Int(i32),
    String(String),
}

impl ScriptValue {
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::String(_) => "string",
        }
    }
}

pub fn default_value_from_type(ty: VarType) -> ScriptValue {
    match ty {
        VarType::String => ScriptValue::String(String::new()),
        VarType::Int | VarType::Boolean | VarType::Stat => ScriptValue::Int(0),
        // entity references default to "null"
        _ => ScriptValue::Int(-1),
    }
}

pub fn is_type_compatible(value: &ScriptValue, ty: VarType) -> bool {
    matches!(
        (ty.is_string(), value),
        (true, ScriptValue::String(_)) | (false, ScriptValue::Int(_))
    )
}
