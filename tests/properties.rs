use proptest::prelude::*;
use sandbox_context::{Dynamic, ErrorKind, Sandbox};

/// Prefixed so no generated name collides with a script keyword.
fn identifier() -> impl Strategy<Value = String> {
    "v_[a-z0-9_]{0,12}"
}

proptest! {
    #[test]
    fn last_binding_wins(name in identifier(), values in prop::collection::vec(any::<i64>(), 1..8)) {
        let mut sandbox = Sandbox::new();
        for v in &values {
            sandbox.bind_value(name.as_str(), Dynamic::from(*v)).unwrap();
        }
        let seen: i64 = sandbox.evaluate_as(&name).unwrap();
        prop_assert_eq!(seen, *values.last().unwrap());
        prop_assert_eq!(sandbox.context().len(), 1);
    }

    #[test]
    fn non_string_identifiers_never_bind(id in any::<i64>(), flag in any::<bool>()) {
        let mut sandbox = Sandbox::new();
        let err = sandbox.bind_value(Dynamic::from(id), Dynamic::from(flag)).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        prop_assert!(sandbox.context().is_empty());
    }

    #[test]
    fn strings_are_never_constructors(name in identifier(), text in ".*") {
        let mut sandbox = Sandbox::new();
        let err = sandbox.bind_type(name.as_str(), Dynamic::from(text)).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        prop_assert!(!sandbox.context().contains(&name));
    }
}
