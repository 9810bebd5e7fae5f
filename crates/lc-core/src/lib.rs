pub mod config;
pub mod entity;
pub mod error;
pub mod script;
pub mod types;
pub mod value;

pub use config::*;
pub use entity::*;
pub use error::{ScriptError, ScriptErrorKind};
pub use script::*;
pub use types::*;
pub use value::*;
