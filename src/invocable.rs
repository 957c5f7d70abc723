//! Deciding what counts as "invocable" for `bind_type`.
//!
//! Two shapes are accepted and nothing else:
//!
//! * [`Invocable::Function`]: any [`FnPtr`]. This covers `Fn("name")` pointers to
//!   script or native functions and anonymous closures (`|x| x + 1`).
//! * [`Invocable::Constructor`]: a [`HostType`], a named constructor the host
//!   hands to scripts as a type. Scripts build instances with `T.construct(..)`.

use std::fmt;

use rhai::{Dynamic, Engine, EvalAltResult, FnPtr, FuncArgs, ImmutableString, NativeCallContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocable {
    Function,
    Constructor,
}

impl Invocable {
    /// Function pointers are checked first, host types second.
    pub fn classify(value: &Dynamic) -> Option<Self> {
        if value.is::<FnPtr>() {
            Some(Invocable::Function)
        } else if value.is::<HostType>() {
            Some(Invocable::Constructor)
        } else {
            None
        }
    }
}

/// A host-provided type: a name plus the function that builds its instances.
#[derive(Debug, Clone)]
pub struct HostType {
    name: ImmutableString,
    constructor: FnPtr,
}

impl HostType {
    pub fn new(name: impl Into<ImmutableString>, constructor: FnPtr) -> Self {
        Self {
            name: name.into(),
            constructor,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn constructor(&self) -> &FnPtr {
        &self.constructor
    }

    fn construct(
        &self,
        ctx: &NativeCallContext,
        args: impl FuncArgs,
    ) -> Result<Dynamic, Box<EvalAltResult>> {
        self.constructor.call_within_context::<Dynamic>(ctx, args)
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<type {}>", self.name)
    }
}

/// Script-side API of [`HostType`].
pub(crate) fn register_host_type(engine: &mut Engine) {
    engine
        .register_type_with_name::<HostType>("HostType")
        .register_get("name", |ty: &mut HostType| ty.name.clone())
        .register_fn("construct", |ctx: NativeCallContext, ty: &mut HostType| {
            ty.construct(&ctx, ())
        })
        .register_fn(
            "construct",
            |ctx: NativeCallContext, ty: &mut HostType, a: Dynamic| ty.construct(&ctx, (a,)),
        )
        .register_fn(
            "construct",
            |ctx: NativeCallContext, ty: &mut HostType, a: Dynamic, b: Dynamic| {
                ty.construct(&ctx, (a, b))
            },
        )
        .register_fn(
            "construct",
            |ctx: NativeCallContext, ty: &mut HostType, a: Dynamic, b: Dynamic, c: Dynamic| {
                ty.construct(&ctx, (a, b, c))
            },
        )
        .register_fn("to_string", |ty: &mut HostType| ty.to_string())
        .register_fn("to_debug", |ty: &mut HostType| format!("{ty:?}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_enumerated_shapes_only() {
        let ptr = FnPtr::new("make").unwrap();
        assert_eq!(
            Invocable::classify(&Dynamic::from(ptr.clone())),
            Some(Invocable::Function)
        );
        assert_eq!(
            Invocable::classify(&Dynamic::from(HostType::new("Point", ptr))),
            Some(Invocable::Constructor)
        );
        assert_eq!(Invocable::classify(&Dynamic::from("make")), None);
        assert_eq!(Invocable::classify(&Dynamic::UNIT), None);
        assert_eq!(Invocable::classify(&Dynamic::from(rhai::Map::new())), None);
    }

    #[test]
    fn host_type_displays_its_name() {
        let ty = HostType::new("Point", FnPtr::new("make_point").unwrap());
        assert_eq!(ty.to_string(), "<type Point>");
        assert_eq!(ty.name(), "Point");
        assert_eq!(ty.constructor().fn_name(), "make_point");
    }
}
