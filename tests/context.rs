use pretty_assertions::assert_eq;
use sandbox_context::{
    Dynamic, EngineError, Error, ErrorKind, Map, Sandbox, SandboxConfig, SeedPolicy,
};
use serde_json::json;

#[test]
fn seeded_sandbox_sees_seed_bindings() {
    let mut seed = Map::new();
    seed.insert("y".into(), Dynamic::from(5_i64));
    let mut sandbox = Sandbox::with_seed(Dynamic::from(seed)).unwrap();
    assert_eq!(sandbox.evaluate_as::<i64>("y").unwrap(), 5);
}

#[test]
fn unseeded_sandbox_has_no_bindings() {
    let mut sandbox = Sandbox::with_seed(None::<Dynamic>).unwrap();
    assert!(sandbox.context().is_empty());
    let err = sandbox.evaluate("y").unwrap_err();
    assert!(matches!(err, Error::Engine(EngineError::Runtime(_))));
}

#[test]
fn strict_policy_rejects_non_map_seeds() {
    let err = Sandbox::with_seed(Dynamic::from("nope")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Argument);
}

#[test]
fn lenient_policy_ignores_non_map_seeds() {
    let config = SandboxConfig {
        seed_policy: SeedPolicy::Lenient,
        ..SandboxConfig::default()
    };
    let sandbox = Sandbox::with_config(config, Dynamic::from(7_i64)).unwrap();
    assert!(sandbox.context().is_empty());
}

#[test]
fn declarations_persist_across_executions() {
    let mut sandbox = Sandbox::new();
    sandbox.execute("let z = 1;").unwrap();
    assert_eq!(sandbox.evaluate_as::<i64>("z + 1").unwrap(), 2);
}

#[test]
fn functions_are_kept_when_the_script_fails_at_runtime() {
    let mut sandbox = Sandbox::new();
    let err = sandbox
        .execute("fn later() { 7 } throw \"stop\";")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Engine);
    assert_eq!(sandbox.evaluate_as::<i64>("later()").unwrap(), 7);
}

#[test]
fn json_seed_becomes_bindings() {
    let mut sandbox = Sandbox::from_json(&json!({"name": "probe", "ports": [80, 443]})).unwrap();
    assert_eq!(sandbox.evaluate_as::<String>("name").unwrap(), "probe");
    assert_eq!(sandbox.evaluate_as::<i64>("ports[1]").unwrap(), 443);
    assert_eq!(sandbox.context().names(), vec!["name", "ports"]);
}

#[test]
fn raw_context_is_usable_with_the_engine() {
    let mut sandbox = Sandbox::new();
    sandbox.bind_value("x", Dynamic::from(2_i64)).unwrap();
    let engine = sandbox.engine().clone();
    let mut scope = sandbox.context().scope().clone();
    let out: i64 = engine.raw().eval_with_scope(&mut scope, "x * 10").unwrap();
    assert_eq!(out, 20);
}

#[test]
fn one_shot_eval_uses_a_fresh_sandbox() {
    assert_eq!(sandbox_context::eval("40 + 2").unwrap().as_int().unwrap(), 42);
}
