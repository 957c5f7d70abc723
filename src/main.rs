use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sandbox_context::{Sandbox, SandboxConfig, ScriptEngine};
use serde_json::Value;
use tracing::Level;

/// Run script snippets in one sandbox and print the outcome as JSON.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Inline scripts, executed in order after any --file scripts.
    scripts: Vec<String>,
    /// Script files, executed in order.
    #[arg(short, long = "file")]
    files: Vec<PathBuf>,
    /// Initial bindings as a JSON object.
    #[arg(long)]
    seed: Option<String>,
    /// NAME=JSON binding. Values that are not valid JSON are bound as strings.
    #[arg(short, long = "bind")]
    binds: Vec<String>,
    /// Sandbox config file (JSON).
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Expression evaluated last; its value is printed.
    #[arg(short, long)]
    eval: Option<String>,
    /// Print every data binding once all scripts have run.
    #[arg(long)]
    dump: bool,
    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => SandboxConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SandboxConfig::default(),
    };

    let seed = match &args.seed {
        Some(s) => {
            let json: Value = serde_json::from_str(s).context("seed is not valid JSON")?;
            Some(rhai_seed(&json)?)
        }
        None => None,
    };
    let mut sandbox = Sandbox::with_engine(Arc::new(ScriptEngine::new(config)), seed)?;

    for bind in &args.binds {
        let (name, value) = parse_bind(bind);
        sandbox
            .bind_json(name, value.as_ref())
            .with_context(|| format!("binding {name}"))?;
    }

    for path in &args.files {
        let script = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        sandbox
            .execute(&script)
            .with_context(|| format!("running {}", path.display()))?;
    }
    for (i, script) in args.scripts.iter().enumerate() {
        sandbox
            .execute(script)
            .with_context(|| format!("running inline script #{}", i + 1))?;
    }

    if let Some(expr) = &args.eval {
        let out = sandbox.evaluate_json(expr).context("evaluating --eval")?;
        println!("{}", serde_json::to_string_pretty(&out)?);
    }
    if args.dump {
        let out = sandbox.context().to_json()?;
        println!("{}", serde_json::to_string_pretty(&out)?);
    }
    Ok(())
}

fn rhai_seed(json: &Value) -> Result<sandbox_context::Dynamic> {
    rhai::serde::to_dynamic(json).map_err(|e| anyhow::anyhow!("converting seed: {e}"))
}

/// Split a `NAME=JSON` argument. A bare `NAME` has no value.
fn parse_bind(bind: &str) -> (&str, Option<Value>) {
    match bind.split_once('=') {
        Some((name, raw)) => {
            let value = serde_json::from_str::<Value>(raw)
                .unwrap_or_else(|_| Value::String(raw.to_string()));
            (name, Some(value))
        }
        None => (bind, None),
    }
}
