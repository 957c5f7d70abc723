use std::sync::Arc;

use rhai::{Dynamic, ImmutableString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::SandboxConfig;
use crate::context::EvaluationContext;
use crate::engine::ScriptEngine;
use crate::errors::{Error, Result};
use crate::invocable::Invocable;

/// A chainable handle around one isolated evaluation context.
///
/// Every mutating operation returns `&mut Self` so calls can be chained with `?`:
///
/// ```
/// use sandbox_context::{Dynamic, Sandbox};
///
/// # fn main() -> sandbox_context::Result<()> {
/// let mut sandbox = Sandbox::new();
/// sandbox
///     .bind_value("x", Dynamic::from(40_i64))?
///     .execute("let y = x + 2;")?;
/// assert_eq!(sandbox.evaluate_as::<i64>("y")?, 42);
/// # Ok(())
/// # }
/// ```
///
/// Cloning produces an independent sandbox seeded from the current bindings
/// and declared functions. The copy is shallow: values made shared by the
/// engine (for example variables captured by closures) stay aliased.
#[derive(Debug, Clone)]
pub struct Sandbox {
    engine: Arc<ScriptEngine>,
    context: EvaluationContext,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Sandbox {
    /// An empty sandbox on a default engine.
    pub fn new() -> Self {
        Self::from_context(Arc::new(ScriptEngine::default()), EvaluationContext::new())
    }

    /// A sandbox on a default engine whose initial bindings come from `seed`.
    pub fn with_seed(seed: impl Into<Option<Dynamic>>) -> Result<Self> {
        Self::with_engine(Arc::new(ScriptEngine::default()), seed)
    }

    pub fn with_config(config: SandboxConfig, seed: impl Into<Option<Dynamic>>) -> Result<Self> {
        Self::with_engine(Arc::new(ScriptEngine::new(config)), seed)
    }

    /// A sandbox on a caller-supplied engine. The seed is handled according to
    /// the engine's [`SeedPolicy`](crate::SeedPolicy).
    pub fn with_engine(engine: Arc<ScriptEngine>, seed: impl Into<Option<Dynamic>>) -> Result<Self> {
        let context = EvaluationContext::from_seed(seed.into(), engine.config().seed_policy)?;
        Ok(Self::from_context(engine, context))
    }

    /// Wrap an existing context.
    pub fn from_context(engine: Arc<ScriptEngine>, context: EvaluationContext) -> Self {
        Self { engine, context }
    }

    /// Seed from a JSON document; an object's members become the bindings.
    pub fn from_json(seed: &Value) -> Result<Self> {
        let seed = rhai::serde::to_dynamic(seed).map_err(|e| Error::Convert(e.to_string()))?;
        Self::with_seed(seed)
    }

    /// Run `script` inside this sandbox's context.
    ///
    /// Top-level variables and functions the script declares remain visible to
    /// later calls. Engine failures are returned as [`Error::Engine`].
    pub fn execute(&mut self, script: &str) -> Result<&mut Self> {
        debug!(len = script.len(), "executing script");
        self.engine.run(&mut self.context, script)?;
        Ok(self)
    }

    /// Like [`execute`](Self::execute) but returns the value of the last expression.
    pub fn evaluate(&mut self, script: &str) -> Result<Dynamic> {
        debug!(len = script.len(), "evaluating script");
        Ok(self.engine.eval(&mut self.context, script)?)
    }

    pub fn evaluate_as<T: DeserializeOwned>(&mut self, script: &str) -> Result<T> {
        let value = self.evaluate(script)?;
        rhai::serde::from_dynamic(&value).map_err(|e| Error::Convert(e.to_string()))
    }

    pub fn evaluate_json(&mut self, script: &str) -> Result<Value> {
        self.evaluate_as(script)
    }

    /// Bind any value under `identifier`, replacing an earlier binding.
    ///
    /// `None` as the value is a missing argument. The identifier must be a
    /// non-empty string.
    pub fn bind_value(
        &mut self,
        identifier: impl Into<Dynamic>,
        value: impl Into<Option<Dynamic>>,
    ) -> Result<&mut Self> {
        let value = value.into().ok_or(Error::MissingArgument("value"))?;
        let name = self.identifier(identifier.into())?;
        debug!(identifier = %name, kind = self.engine.type_name(&value), "binding value");
        self.context.set(&name, value);
        Ok(self)
    }

    /// Bind a function pointer or [`HostType`](crate::HostType) under `identifier`.
    ///
    /// Storage is the same as [`bind_value`](Self::bind_value); only the checks differ.
    pub fn bind_type(
        &mut self,
        identifier: impl Into<Dynamic>,
        value: impl Into<Dynamic>,
    ) -> Result<&mut Self> {
        let name = self.identifier(identifier.into())?;
        let value = value.into();
        let Some(kind) = Invocable::classify(&value) else {
            return Err(Error::NotConstructor {
                found: self.engine.type_name(&value).to_string(),
            });
        };
        debug!(identifier = %name, ?kind, "binding type");
        self.context.set(&name, value);
        Ok(self)
    }

    /// Bind a JSON value, converted to the engine's representation.
    pub fn bind_json(&mut self, identifier: &str, value: Option<&Value>) -> Result<&mut Self> {
        let value = value
            .map(rhai::serde::to_dynamic)
            .transpose()
            .map_err(|e| Error::Convert(e.to_string()))?;
        self.bind_value(identifier, value)
    }

    /// The context this sandbox owns.
    pub fn context(&self) -> &EvaluationContext {
        &self.context
    }

    pub fn engine(&self) -> &Arc<ScriptEngine> {
        &self.engine
    }

    /// A new sandbox seeded from this one's current context, sharing the engine.
    pub fn fork(&self) -> Self {
        Self::from_context(Arc::clone(&self.engine), self.context.clone())
    }

    fn identifier(&self, identifier: Dynamic) -> Result<ImmutableString> {
        if !identifier.is_string() {
            return Err(Error::IdentifierType {
                found: self.engine.type_name(&identifier).to_string(),
            });
        }
        let name = identifier
            .into_immutable_string()
            .map_err(|found| Error::IdentifierType { found: found.to_string() })?;
        if name.is_empty() {
            return Err(Error::InvalidArgument {
                name: "identifier",
                reason: "must not be empty".into(),
            });
        }
        Ok(name)
    }
}
