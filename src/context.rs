use itertools::Itertools;
use rhai::{Dynamic, Map, Scope, AST};
use serde_json::Value;
use tracing::{trace, warn};

use crate::config::SeedPolicy;
use crate::errors::{Error, Result};
use crate::invocable::Invocable;

/// An isolated namespace of bindings that scripts run against.
///
/// Holds the variable scope and every function declared by scripts executed so
/// far, so both kinds of declaration survive from one run to the next.
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    pub(crate) scope: Scope<'static>,
    pub(crate) functions: AST,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the entries of `map` into a fresh context.
    pub fn from_map(map: Map) -> Self {
        let mut ctx = Self::new();
        for (name, value) in map {
            ctx.scope.push_dynamic(name, value);
        }
        ctx
    }

    /// Build a context from an optional seed value.
    ///
    /// Absent and unit seeds give an empty context, maps are copied. Anything
    /// else is rejected or ignored depending on `policy`.
    pub fn from_seed(seed: Option<Dynamic>, policy: SeedPolicy) -> Result<Self> {
        let seed = match seed {
            Some(seed) if !seed.is_unit() => seed,
            _ => {
                trace!("creating empty context");
                return Ok(Self::new());
            }
        };
        let found = seed.type_name();
        if let Some(map) = seed.try_cast::<Map>() {
            trace!(bindings = map.len(), "creating seeded context");
            return Ok(Self::from_map(map));
        }
        match policy {
            SeedPolicy::Strict => Err(Error::InvalidArgument {
                name: "seed",
                reason: format!("expected a map, got {found}"),
            }),
            SeedPolicy::Lenient => {
                warn!(found, "ignoring non-map seed");
                Ok(Self::new())
            }
        }
    }

    /// Write a binding; the newest binding for a name always wins.
    ///
    /// Constant and shared entries are shadowed rather than written through, so
    /// a rebinding never leaks into values aliased by a clone.
    pub fn set(&mut self, name: &str, value: Dynamic) {
        let writable = self
            .scope
            .iter_raw()
            .filter(|(n, _, _)| *n == name)
            .last()
            .map(|(_, constant, current)| !constant && !current.is_shared());
        if writable == Some(true) {
            self.scope.set_value(name, value);
        } else {
            self.scope.push_dynamic(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<Dynamic> {
        self.scope.get_value::<Dynamic>(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scope.contains(name)
    }

    /// Distinct bound names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.scope
            .iter_raw()
            .map(|(name, _, _)| name.to_string())
            .unique()
            .sorted()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.scope.is_empty()
    }

    /// Raw engine scope, for use with rhai APIs directly.
    pub fn scope(&self) -> &Scope<'static> {
        &self.scope
    }

    pub(crate) fn scope_mut(&mut self) -> &mut Scope<'static> {
        &mut self.scope
    }

    /// Functions declared by scripts run in this context.
    pub fn functions(&self) -> &AST {
        &self.functions
    }

    /// JSON snapshot of the data bindings. Invocables are skipped.
    pub fn to_json(&self) -> Result<Value> {
        let mut out = serde_json::Map::new();
        for name in self.names() {
            let Some(value) = self.get(&name) else { continue };
            if Invocable::classify(&value).is_some() {
                continue;
            }
            let json = rhai::serde::from_dynamic::<Value>(&value)
                .map_err(|e| Error::Convert(format!("binding '{name}': {e}")))?;
            out.insert(name, json);
        }
        Ok(Value::Object(out))
    }
}
