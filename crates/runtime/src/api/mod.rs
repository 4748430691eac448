//! Types downstream clients interact with.

mod errors;
mod providers;

pub use errors::{Result, RuntimeError};
pub use providers::{ActionProvider, PolicyProvider, ScriptedProvider};
