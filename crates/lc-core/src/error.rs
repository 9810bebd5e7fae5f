use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScriptErrorKind {
    StackUnderflow,
    InvalidProgramCounter,
    InstructionBudgetExceeded,
    UnknownOpcode,
    UnimplementedOpcode,
    CapacityViolation,
    EntityLookupFailure,
    PointerMissing,
    RegistryConflict,
    Runtime,
}

impl ScriptErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::StackUnderflow => "STACK_UNDERFLOW",
            Self::InvalidProgramCounter => "INVALID_PROGRAM_COUNTER",
            Self::InstructionBudgetExceeded => "INSTRUCTION_BUDGET_EXCEEDED",
            Self::UnknownOpcode => "UNKNOWN_OPCODE",
            Self::UnimplementedOpcode => "UNIMPLEMENTED_OPCODE",
            Self::CapacityViolation => "CAPACITY_VIOLATION",
            Self::EntityLookupFailure => "ENTITY_LOOKUP_FAILURE",
            Self::PointerMissing => "POINTER_MISSING",
            Self::RegistryConflict => "REGISTRY_CONFLICT",
            Self::Runtime => "RUNTIME",
        }
    }

    /// Only lookup failures may be absorbed by a handler that pushes a result code instead.
    pub fn is_recoverable(self) -> bool {
        matches!(self, Self::EntityLookupFailure)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{}: {}", .kind.code(), .message)]
pub struct ScriptError {
    pub kind: ScriptErrorKind,
    pub message: String,
}

impl ScriptError {
    pub fn new(kind: ScriptErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(ScriptErrorKind::Runtime, message)
    }

    pub fn stack_underflow(stack: &str) -> Self {
        Self::new(
            ScriptErrorKind::StackUnderflow,
            format!("Attempted to pop from an empty {} stack.", stack),
        )
    }

    pub fn capacity(message: impl Into<String>) -> Self {
        Self::new(ScriptErrorKind::CapacityViolation, message)
    }

    pub fn lookup(message: impl Into<String>) -> Self {
        Self::new(ScriptErrorKind::EntityLookupFailure, message)
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}
