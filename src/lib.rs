pub mod config;
pub mod context;
pub mod engine;
pub mod errors;
pub mod invocable;
pub mod sandbox;

pub use config::{SandboxConfig, SeedPolicy};
pub use context::EvaluationContext;
pub use engine::ScriptEngine;
pub use errors::{EngineError, Error, ErrorKind, Result};
pub use invocable::{HostType, Invocable};
pub use sandbox::Sandbox;

/// Engine value types callers need to build bindings.
pub use rhai::{Dynamic, FnPtr, Map};

/// Convenience: evaluate `script` in a fresh, empty sandbox.
pub fn eval(script: &str) -> Result<Dynamic> {
    Sandbox::new().evaluate(script)
}

