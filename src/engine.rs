use rhai::{Dynamic, Engine, AST};
use tracing::{debug, info};

use crate::config::SandboxConfig;
use crate::context::EvaluationContext;
use crate::errors::EngineError;
use crate::invocable;

/// The embedded evaluator every [`Sandbox`](crate::Sandbox) delegates to.
///
/// Immutable once built, so one instance is shared between a sandbox and all
/// of its clones.
#[derive(Debug)]
pub struct ScriptEngine {
    engine: Engine,
    config: SandboxConfig,
}

impl Default for ScriptEngine {
    fn default() -> Self {
        Self::new(SandboxConfig::default())
    }
}

impl ScriptEngine {
    pub fn new(config: SandboxConfig) -> Self {
        Self::with_customizer(config, |_| {})
    }

    /// Build an engine and let the host register its own functions and types.
    ///
    /// ```
    /// use sandbox_context::{SandboxConfig, ScriptEngine};
    ///
    /// let engine = ScriptEngine::with_customizer(SandboxConfig::default(), |e| {
    ///     e.register_fn("double", |x: i64| x * 2);
    /// });
    /// ```
    pub fn with_customizer(config: SandboxConfig, customize: impl FnOnce(&mut Engine)) -> Self {
        let mut engine = Engine::new();
        engine.set_strict_variables(config.strict_variables);
        engine.set_allow_shadowing(config.allow_shadowing);
        engine.on_print(|text| info!(target: "script", "{text}"));
        engine.on_debug(|text, source, pos| {
            debug!(target: "script", source = source.unwrap_or("<script>"), %pos, "{text}")
        });
        invocable::register_host_type(&mut engine);
        customize(&mut engine);
        Self { engine, config }
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// The wrapped rhai engine.
    pub fn raw(&self) -> &Engine {
        &self.engine
    }

    /// Script-visible name of a value's type.
    pub fn type_name<'a>(&'a self, value: &'a Dynamic) -> &'a str {
        self.engine.map_type_name(value.type_name())
    }

    /// Compile `script` against the context, keeping any functions it declares.
    fn compile(&self, context: &mut EvaluationContext, script: &str) -> Result<AST, EngineError> {
        let ast = self.engine.compile_with_scope(&context.scope, script)?;
        let program = context.functions.merge(&ast);
        context.functions = program.clone_functions_only();
        Ok(program)
    }

    /// Run `script` to completion inside `context`.
    pub fn run(&self, context: &mut EvaluationContext, script: &str) -> Result<(), EngineError> {
        self.eval(context, script).map(|_| ())
    }

    /// Run `script` inside `context` and return the value of its last expression.
    pub fn eval(&self, context: &mut EvaluationContext, script: &str) -> Result<Dynamic, EngineError> {
        let program = self.compile(context, script)?;
        let value = self
            .engine
            .eval_ast_with_scope::<Dynamic>(&mut context.scope, &program)?;
        Ok(value)
    }
}
